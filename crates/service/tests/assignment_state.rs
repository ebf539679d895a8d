//! Integration tests for the assignment state machine through the
//! service boundary: conflicts carry the `Conflict` kind, ended rows stay
//! as history, and reassignment inserts a fresh row.

use assert_matches::assert_matches;
use sqlx::PgPool;

use bookline_core::defaults::Defaults;
use bookline_core::error::DomainError;
use bookline_core::roles::{ROLE_MANAGER, ROLE_STAFF};
use bookline_core::types::DbId;
use bookline_db::models::service::CreateService;
use bookline_db::models::service_assignment::CreateServiceAssignment;
use bookline_db::models::staff::{CreateStaff, Staff};
use bookline_db::models::staff_assignment::CreateStaffAssignment;
use bookline_db::models::user::CreateUser;
use bookline_service::users::Registration;
use bookline_service::{AssignmentService, CatalogService, StaffService, UserService};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn register_owner(pool: &PgPool, email: &str) -> Registration {
    UserService::new(pool.clone(), Defaults::default())
        .register(CreateUser {
            email: email.to_string(),
            first_name: "Kat".to_string(),
            last_name: "Yee".to_string(),
            phone: None,
        })
        .await
        .unwrap()
}

async fn hire_staff(pool: &PgPool, business_id: DbId, actor: DbId, first_name: &str) -> Staff {
    StaffService::new(pool.clone())
        .create(
            CreateStaff {
                business_id,
                first_name: first_name.to_string(),
                last_name: "Nguyen".to_string(),
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

// ---------------------------------------------------------------------------
// Test: the full (B1, S1) scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_assign_conflict_end_reassign(pool: PgPool) {
    let registration = register_owner(&pool, "owner@x.com").await;
    let actor = registration.user.id;
    let business_id = registration.business.id;
    let staff = hire_staff(&pool, business_id, actor, "Sam").await;
    let assignments = AssignmentService::new(pool.clone());

    // no-record -> active
    let first = assignments
        .assign_staff(assignment(business_id, staff.id, ROLE_STAFF), actor)
        .await
        .unwrap();
    assert!(first.is_active);

    // A second active assignment for the same pair conflicts.
    let err = assignments
        .assign_staff(assignment(business_id, staff.id, ROLE_MANAGER), actor)
        .await
        .unwrap_err();
    assert_matches!(err, DomainError::Conflict(_));

    // active -> ended
    assignments.end_staff_assignment(first.id, actor).await.unwrap();
    assert!(assignments
        .active_staff_assignment(business_id, staff.id)
        .await
        .unwrap()
        .is_none());

    // no-record -> active again: a fresh row, history preserved.
    let second = assignments
        .assign_staff(assignment(business_id, staff.id, ROLE_MANAGER), actor)
        .await
        .unwrap();
    assert_ne!(second.id, first.id);

    let history = assignments.staff_history(business_id, staff.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(!history[0].is_active);
    assert!(history[1].is_active);
}

// ---------------------------------------------------------------------------
// Test: ending twice or ending the unknown is NotFound
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_end_is_not_repeatable(pool: PgPool) {
    let registration = register_owner(&pool, "owner@x.com").await;
    let actor = registration.user.id;

    // The registration provisioned an active owner assignment.
    let owner_assignment = registration.assignment;
    let assignments = AssignmentService::new(pool.clone());

    assignments
        .end_staff_assignment(owner_assignment.id, actor)
        .await
        .unwrap();
    let err = assignments
        .end_staff_assignment(owner_assignment.id, actor)
        .await
        .unwrap_err();
    assert_matches!(err, DomainError::NotFound { .. });
}

// ---------------------------------------------------------------------------
// Test: invalid input never reaches storage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_assign_rejects_unknown_role_and_cross_business_staff(pool: PgPool) {
    let registration = register_owner(&pool, "owner@x.com").await;
    let actor = registration.user.id;
    let business_id = registration.business.id;
    let staff = hire_staff(&pool, business_id, actor, "Sam").await;
    let assignments = AssignmentService::new(pool.clone());

    let err = assignments
        .assign_staff(assignment(business_id, staff.id, "intern"), actor)
        .await
        .unwrap_err();
    assert_matches!(err, DomainError::Validation(_));

    // A staff member of another business cannot be assigned here.
    let other = register_owner(&pool, "other@x.com").await;
    let err = assignments
        .assign_staff(assignment(other.business.id, staff.id, ROLE_STAFF), actor)
        .await
        .unwrap_err();
    assert_matches!(err, DomainError::Validation(_));
}

// ---------------------------------------------------------------------------
// Test: service assignments run the same state machine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_service_assignment_state_machine(pool: PgPool) {
    let registration = register_owner(&pool, "owner@x.com").await;
    let actor = registration.user.id;
    let business_id = registration.business.id;
    let staff = hire_staff(&pool, business_id, actor, "Sam").await;
    let backup = hire_staff(&pool, business_id, actor, "Riley").await;

    let service = CatalogService::new(pool.clone(), Defaults::default())
        .create(
            CreateService {
                business_id,
                name: "Deep Tissue Massage".to_string(),
                description: None,
                price_minor: 9_000,
                currency: None,
                duration_minutes: 60,
            },
            actor,
        )
        .await
        .unwrap();

    let assignments = AssignmentService::new(pool.clone());
    let input = CreateServiceAssignment {
        business_id,
        service_id: service.id,
        staff_id: staff.id,
    };
    let first = assignments.assign_service(input.clone(), actor).await.unwrap();

    // The scope key is (business, service): a different staff member for
    // the same service still conflicts while the first row is active.
    let err = assignments
        .assign_service(
            CreateServiceAssignment {
                business_id,
                service_id: service.id,
                staff_id: backup.id,
            },
            actor,
        )
        .await
        .unwrap_err();
    assert_matches!(err, DomainError::Conflict(_));

    assignments.end_service_assignment(first.id, actor).await.unwrap();
    assignments
        .assign_service(
            CreateServiceAssignment {
                business_id,
                service_id: service.id,
                staff_id: backup.id,
            },
            actor,
        )
        .await
        .unwrap();

    let history = assignments
        .service_history(business_id, service.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].staff_id, backup.id);
}
