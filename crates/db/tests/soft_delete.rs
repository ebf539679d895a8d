//! Integration tests for soft-delete behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted entities are hidden from `find_by_id` and list queries
//! - The second soft-delete of the same row returns `false`
//! - Deletion stamps `deleted_at`/`deleted_by` exactly once
//! - The pattern is consistent across entity types (user, business, client)

use sqlx::PgPool;

use bookline_core::pagination::Page;
use bookline_core::types::{new_id, DbId};
use bookline_db::entity;
use bookline_db::models::business::{Business, CreateBusiness};
use bookline_db::models::client::CreateClient;
use bookline_db::models::user::{CreateUser, User};
use bookline_db::repositories::{BusinessRepo, ClientRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        phone: None,
    }
}

async fn seed_business(pool: &PgPool, actor: DbId) -> Business {
    let owner = UserRepo::create(pool, &new_user("owner@example.com"), actor)
        .await
        .unwrap();
    BusinessRepo::create(
        pool,
        &CreateBusiness {
            owner_id: owner.id,
            name: "Harbor Salon".to_string(),
            currency: None,
            timezone: None,
        },
        actor,
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: soft delete hides entity from find_by_id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_delete_hides_from_find_by_id(pool: PgPool) {
    let actor = new_id();
    let user = UserRepo::create(&pool, &new_user("hidden@example.com"), actor)
        .await
        .unwrap();

    let deleted = UserRepo::soft_delete(&pool, user.id, actor).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let found = UserRepo::find_by_id(&pool, user.id).await.unwrap();
    assert!(found.is_none(), "find_by_id should return None for soft-deleted user");
}

// ---------------------------------------------------------------------------
// Test: soft delete hides entity from list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_delete_hides_from_list(pool: PgPool) {
    let actor = new_id();
    let user = UserRepo::create(&pool, &new_user("listed@example.com"), actor)
        .await
        .unwrap();

    let (before, total_before) = UserRepo::list(&pool, Page::default()).await.unwrap();
    assert!(before.iter().any(|u| u.id == user.id));
    assert_eq!(total_before, 1);

    UserRepo::soft_delete(&pool, user.id, actor).await.unwrap();

    let (after, total_after) = UserRepo::list(&pool, Page::default()).await.unwrap();
    assert!(!after.iter().any(|u| u.id == user.id));
    assert_eq!(total_after, 0, "deleted rows are excluded from the total count");
}

// ---------------------------------------------------------------------------
// Test: second soft delete returns false
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_second_soft_delete_returns_false(pool: PgPool) {
    let actor = new_id();
    let user = UserRepo::create(&pool, &new_user("twice@example.com"), actor)
        .await
        .unwrap();

    let first = UserRepo::soft_delete(&pool, user.id, actor).await.unwrap();
    assert!(first, "first soft_delete should return true");

    let second = UserRepo::soft_delete(&pool, user.id, actor).await.unwrap();
    assert!(!second, "second soft_delete should return false (already deleted)");
}

// ---------------------------------------------------------------------------
// Test: deletion stamps the acting principal, and only once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_delete_stamps_actor_once(pool: PgPool) {
    let creator = new_id();
    let deleter = new_id();
    let user = UserRepo::create(&pool, &new_user("stamped@example.com"), creator)
        .await
        .unwrap();

    UserRepo::soft_delete(&pool, user.id, deleter).await.unwrap();

    // The historical row is still physically stored for audit reads.
    let row = entity::find_by_id_include_deleted::<User>(&pool, user.id)
        .await
        .unwrap()
        .expect("row remains stored after soft delete");
    assert!(row.lifecycle.deleted_at.is_some());
    assert_eq!(row.lifecycle.deleted_by, Some(deleter));

    // A later attempt by someone else must not restamp.
    let other = new_id();
    UserRepo::soft_delete(&pool, user.id, other).await.unwrap();
    let row = entity::find_by_id_include_deleted::<User>(&pool, user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.lifecycle.deleted_by, Some(deleter), "stamp applied exactly once");
}

// ---------------------------------------------------------------------------
// Test: the pattern is consistent across entity types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_soft_delete_consistent_across_entities(pool: PgPool) {
    let actor = new_id();
    let business = seed_business(&pool, actor).await;
    let client = ClientRepo::create(
        &pool,
        &CreateClient {
            business_id: business.id,
            first_name: "Joan".to_string(),
            last_name: "Clarke".to_string(),
            email: Some("joan@example.com".to_string()),
            phone: None,
        },
        actor,
    )
    .await
    .unwrap();

    // Typed finders are scoped to active rows too.
    assert!(ClientRepo::find_by_email(&pool, business.id, "JOAN@example.com")
        .await
        .unwrap()
        .is_some());

    assert!(ClientRepo::soft_delete(&pool, client.id, actor).await.unwrap());
    assert!(ClientRepo::find_by_id(&pool, client.id).await.unwrap().is_none());
    assert!(ClientRepo::find_by_email(&pool, business.id, "joan@example.com")
        .await
        .unwrap()
        .is_none());

    assert!(BusinessRepo::soft_delete(&pool, business.id, actor).await.unwrap());
    assert!(BusinessRepo::find_by_id(&pool, business.id)
        .await
        .unwrap()
        .is_none());
    assert!(!BusinessRepo::soft_delete(&pool, business.id, actor).await.unwrap());
}
