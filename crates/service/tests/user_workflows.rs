//! Integration tests for user workflows through the service boundary:
//! error kinds, search clamping, read-back updates, and the atomic
//! registration provisioning.

use assert_matches::assert_matches;
use sqlx::PgPool;

use bookline_core::audit::actions;
use bookline_core::defaults::Defaults;
use bookline_core::error::DomainError;
use bookline_core::roles::ROLE_OWNER;
use bookline_core::types::new_id;
use bookline_db::entity::Entity;
use bookline_db::models::user::{CreateUser, UpdateUser, User};
use bookline_db::repositories::AuditLogRepo;
use bookline_service::{BusinessService, UserService};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn service(pool: &PgPool) -> UserService {
    UserService::new(pool.clone(), Defaults::default())
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: None,
    }
}

// ---------------------------------------------------------------------------
// Test: create, duplicate conflict, then search finds the original
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_duplicate_then_search(pool: PgPool) {
    let users = service(&pool);
    let actor = new_id();

    let created = users.create(new_user("a@x.com"), actor).await.unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(created.full_name, "Ada Lovelace");

    let err = users.create(new_user("a@x.com"), actor).await.unwrap_err();
    assert_matches!(err, DomainError::Conflict(_));

    let found = users.search("a@x", Some(10)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);
}

// ---------------------------------------------------------------------------
// Test: search input handling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_search_rejects_empty_query(pool: PgPool) {
    let users = service(&pool);

    let err = users.search("", Some(10)).await.unwrap_err();
    assert_matches!(err, DomainError::Validation(_));
    let err = users.search("   ", None).await.unwrap_err();
    assert_matches!(err, DomainError::Validation(_));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_search_out_of_range_limit_falls_back(pool: PgPool) {
    let users = service(&pool);
    let actor = new_id();
    users.create(new_user("a@x.com"), actor).await.unwrap();

    // 0 and 1000 are out of [1, 100]; both resolve to the default of 50.
    assert_eq!(users.search("a@x", Some(0)).await.unwrap().len(), 1);
    assert_eq!(users.search("a@x", Some(1000)).await.unwrap().len(), 1);
    // A LIKE metacharacter in the query is matched literally.
    assert!(users.search("%", None).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: validation enumerates every failing field in one pass
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_validation_reports_all_fields(pool: PgPool) {
    let users = service(&pool);

    let bad = CreateUser {
        email: "not-an-email".to_string(),
        first_name: "".to_string(),
        last_name: "  ".to_string(),
        phone: None,
    };
    let err = users.create(bad, new_id()).await.unwrap_err();
    match err {
        DomainError::Validation(errors) => {
            let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
            assert_eq!(fields, vec!["email", "first_name", "last_name"]);
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: update semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_rejects_empty_patch(pool: PgPool) {
    let users = service(&pool);
    let actor = new_id();
    let created = users.create(new_user("a@x.com"), actor).await.unwrap();

    let err = users
        .update(created.id, UpdateUser::default(), actor)
        .await
        .unwrap_err();
    assert_matches!(err, DomainError::Validation(_));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_returns_read_back_entity(pool: PgPool) {
    let users = service(&pool);
    let actor = new_id();
    let created = users.create(new_user("a@x.com"), actor).await.unwrap();

    let patch = UpdateUser {
        last_name: Some("Byron".to_string()),
        ..Default::default()
    };
    let updated = users.update(created.id, patch, actor).await.unwrap();
    assert_eq!(updated.full_name, "Ada Byron");
    assert_eq!(updated.email, "a@x.com");

    let fetched = users.get(created.id).await.unwrap();
    assert_eq!(fetched.full_name, "Ada Byron");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_missing_user_is_not_found(pool: PgPool) {
    let users = service(&pool);
    let patch = UpdateUser {
        first_name: Some("Nobody".to_string()),
        ..Default::default()
    };
    let err = users.update(new_id(), patch, new_id()).await.unwrap_err();
    assert_matches!(err, DomainError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Test: delete semantics through the service boundary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_then_get_and_double_delete(pool: PgPool) {
    let users = service(&pool);
    let actor = new_id();
    let created = users.create(new_user("a@x.com"), actor).await.unwrap();

    users.delete(created.id, actor).await.unwrap();

    let err = users.get(created.id).await.unwrap_err();
    assert_matches!(err, DomainError::NotFound { .. });

    // Deleted rows are invisible, so a second delete is NotFound rather
    // than a silent success.
    let err = users.delete(created.id, actor).await.unwrap_err();
    assert_matches!(err, DomainError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Test: registration provisions the default workspace atomically
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_provisions_default_workspace(pool: PgPool) {
    let users = service(&pool);

    let registration = users.register(new_user("founder@x.com")).await.unwrap();

    assert_eq!(registration.business.owner_id, registration.user.id);
    assert_eq!(registration.business.name, "Ada's Business");
    assert_eq!(registration.business.currency, "USD");
    assert_eq!(registration.business.timezone, "UTC");

    assert_eq!(registration.staff.business_id, registration.business.id);
    assert_eq!(registration.staff.email.as_deref(), Some("founder@x.com"));

    assert_eq!(registration.assignment.role, ROLE_OWNER);
    assert!(registration.assignment.is_active);
    assert!(registration.assignment.end_date.is_none());

    // The workflow records a single audit entry for the registration.
    let trail = AuditLogRepo::list_for_entity(&pool, User::NAME, registration.user.id, 10)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, actions::USER_REGISTER);
    assert_eq!(trail[0].actor_id, registration.user.id);

    // The provisioned business is reachable through the owner finder.
    let owned = BusinessService::new(pool.clone(), Defaults::default())
        .list_by_owner(registration.user.id)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, registration.business.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let users = service(&pool);

    users.register(new_user("founder@x.com")).await.unwrap();
    let err = users.register(new_user("founder@x.com")).await.unwrap_err();
    assert_matches!(err, DomainError::Conflict(_));
}

// ---------------------------------------------------------------------------
// Test: list pagination through the service boundary
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_clamps_page_size(pool: PgPool) {
    let users = service(&pool);
    let actor = new_id();
    for i in 0..3 {
        users
            .create(new_user(&format!("u{i}@x.com")), actor)
            .await
            .unwrap();
    }

    let (page, total) = users.list(Some(1), Some(2)).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(total, 3);

    // An out-of-range page size falls back to the default rather than
    // being applied verbatim.
    let (page, total) = users.list(Some(1), Some(0)).await.unwrap();
    assert_eq!(page.len(), 3);
    assert_eq!(total, 3);
}
