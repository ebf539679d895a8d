//! Integration tests for the scoped-uniqueness invariant: at most one
//! active assignment per (scope, subject) pair, unlimited history.
//!
//! The partial unique indexes make the check-and-insert atomic, so the
//! racing-creates test must see exactly one winner no matter how the
//! scheduler interleaves the attempts.

use futures::future::join_all;
use sqlx::PgPool;

use bookline_core::roles::{ROLE_MANAGER, ROLE_STAFF};
use bookline_core::types::{new_id, DbId};
use bookline_db::models::business::{Business, CreateBusiness};
use bookline_db::models::service::CreateService;
use bookline_db::models::service_assignment::CreateServiceAssignment;
use bookline_db::models::staff::{CreateStaff, Staff};
use bookline_db::models::staff_assignment::CreateStaffAssignment;
use bookline_db::models::user::CreateUser;
use bookline_db::repositories::{
    BusinessRepo, ServiceAssignmentRepo, ServiceRepo, StaffAssignmentRepo, StaffRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_business(pool: &PgPool, actor: DbId) -> Business {
    let owner = UserRepo::create(
        pool,
        &CreateUser {
            email: "owner@example.com".to_string(),
            first_name: "Mary".to_string(),
            last_name: "Jackson".to_string(),
            phone: None,
        },
        actor,
    )
    .await
    .unwrap();
    BusinessRepo::create(
        pool,
        &CreateBusiness {
            owner_id: owner.id,
            name: "Jackson & Co".to_string(),
            currency: None,
            timezone: None,
        },
        actor,
    )
    .await
    .unwrap()
}

async fn seed_staff(pool: &PgPool, business_id: DbId, actor: DbId) -> Staff {
    StaffRepo::create(
        pool,
        &CreateStaff {
            business_id,
            first_name: "Sam".to_string(),
            last_name: "Rivera".to_string(),
            email: None,
            phone: None,
        },
        actor,
    )
    .await
    .unwrap()
}

fn assignment(business_id: DbId, staff_id: DbId, role: &str) -> CreateStaffAssignment {
    CreateStaffAssignment {
        business_id,
        staff_id,
        role: role.to_string(),
    }
}

fn assert_active_conflict(err: sqlx::Error, constraint: &str) {
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some(constraint));
        }
        other => panic!("expected a unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: a second active assignment for the same pair is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_active_assignment_rejected(pool: PgPool) {
    let actor = new_id();
    let business = seed_business(&pool, actor).await;
    let staff = seed_staff(&pool, business.id, actor).await;

    let first = StaffAssignmentRepo::create(&pool, &assignment(business.id, staff.id, ROLE_STAFF), actor)
        .await
        .unwrap();
    assert!(first.is_active);
    assert!(first.end_date.is_none());

    // Even with a different role: the pair already has an active row.
    let err = StaffAssignmentRepo::create(&pool, &assignment(business.id, staff.id, ROLE_MANAGER), actor)
        .await
        .unwrap_err();
    assert_active_conflict(err, "uq_staff_assignments_active");
}

// ---------------------------------------------------------------------------
// Test: concurrent creates racing on the same pair yield one winner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_creates_yield_single_winner(pool: PgPool) {
    let actor = new_id();
    let business = seed_business(&pool, actor).await;
    let staff = seed_staff(&pool, business.id, actor).await;

    let attempts = 8;
    let results = join_all((0..attempts).map(|_| {
        let pool = pool.clone();
        let input = assignment(business.id, staff.id, ROLE_STAFF);
        async move { StaffAssignmentRepo::create(&pool, &input, actor).await }
    }))
    .await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one concurrent create must succeed");
    for result in results {
        if let Err(err) = result {
            assert_active_conflict(err, "uq_staff_assignments_active");
        }
    }

    let history = StaffAssignmentRepo::list_for_pair(&pool, business.id, staff.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: end then reassign preserves history as separate rows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_end_then_reassign_creates_new_row(pool: PgPool) {
    let actor = new_id();
    let business = seed_business(&pool, actor).await;
    let staff = seed_staff(&pool, business.id, actor).await;

    let first = StaffAssignmentRepo::create(&pool, &assignment(business.id, staff.id, ROLE_STAFF), actor)
        .await
        .unwrap();

    let ended = StaffAssignmentRepo::end(&pool, first.id, actor).await.unwrap();
    assert!(ended);

    // Ending never conflicts, and the pair is free again.
    let second = StaffAssignmentRepo::create(
        &pool,
        &assignment(business.id, staff.id, ROLE_MANAGER),
        actor,
    )
    .await
    .unwrap();
    assert_ne!(second.id, first.id, "reactivation inserts a fresh row");

    let history = StaffAssignmentRepo::list_for_pair(&pool, business.id, staff.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].end_date.is_some(), "historical row keeps its end date");
    assert!(!history[0].is_active);
    assert!(history[1].is_active);
    assert!(history[1].end_date.is_none());

    let active = StaffAssignmentRepo::find_active(&pool, business.id, staff.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, second.id);

    // The business-wide active view sees exactly the one live row.
    let active_rows = StaffAssignmentRepo::list_active_by_business(&pool, business.id)
        .await
        .unwrap();
    assert_eq!(active_rows.len(), 1);
    assert_eq!(active_rows[0].id, second.id);
}

// ---------------------------------------------------------------------------
// Test: ending an already-ended assignment returns false
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_end_twice_returns_false(pool: PgPool) {
    let actor = new_id();
    let business = seed_business(&pool, actor).await;
    let staff = seed_staff(&pool, business.id, actor).await;

    let row = StaffAssignmentRepo::create(&pool, &assignment(business.id, staff.id, ROLE_STAFF), actor)
        .await
        .unwrap();

    assert!(StaffAssignmentRepo::end(&pool, row.id, actor).await.unwrap());
    assert!(!StaffAssignmentRepo::end(&pool, row.id, actor).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: the invariant applies symmetrically to service assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_service_assignment_invariant_is_symmetric(pool: PgPool) {
    let actor = new_id();
    let business = seed_business(&pool, actor).await;
    let staff = seed_staff(&pool, business.id, actor).await;
    let service = ServiceRepo::create(
        &pool,
        &CreateService {
            business_id: business.id,
            name: "Haircut".to_string(),
            description: None,
            price_minor: 4_500,
            currency: None,
            duration_minutes: 45,
        },
        actor,
    )
    .await
    .unwrap();

    let input = CreateServiceAssignment {
        business_id: business.id,
        service_id: service.id,
        staff_id: staff.id,
    };
    let first = ServiceAssignmentRepo::create(&pool, &input, actor).await.unwrap();
    assert!(first.is_active);

    let err = ServiceAssignmentRepo::create(&pool, &input, actor)
        .await
        .unwrap_err();
    assert_active_conflict(err, "uq_service_assignments_active");

    assert!(ServiceAssignmentRepo::end(&pool, first.id, actor).await.unwrap());
    let second = ServiceAssignmentRepo::create(&pool, &input, actor).await.unwrap();

    let history = ServiceAssignmentRepo::list_for_pair(&pool, business.id, service.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].id, second.id);
}
