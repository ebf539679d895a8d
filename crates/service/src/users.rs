//! User workflows, including the atomic registration provisioning.

use sqlx::{PgPool, Postgres, Transaction};

use bookline_core::audit::actions;
use bookline_core::defaults::{default_business_name, Defaults};
use bookline_core::error::{DomainError, DomainResult};
use bookline_core::pagination::{clamp_limit, Page, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use bookline_core::roles::ROLE_OWNER;
use bookline_core::types::DbId;
use bookline_core::validate::Validate;

use bookline_db::entity::Entity;
use bookline_db::models::audit_log::NewAuditLogEntry;
use bookline_db::models::business::{Business, CreateBusiness};
use bookline_db::models::staff::{CreateStaff, Staff};
use bookline_db::models::staff_assignment::{CreateStaffAssignment, StaffAssignment};
use bookline_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use bookline_db::repositories::{
    AuditLogRepo, BusinessRepo, StaffAssignmentRepo, StaffRepo, UserRepo,
};

use crate::error::{map_sqlx_error, not_found};

/// Everything a freshly registered user is provisioned with.
#[derive(Debug)]
pub struct Registration {
    pub user: UserResponse,
    pub business: Business,
    pub staff: Staff,
    pub assignment: StaffAssignment,
}

/// Orchestrates user lifecycle workflows on top of [`UserRepo`].
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    defaults: Defaults,
}

impl UserService {
    pub fn new(pool: PgPool, defaults: Defaults) -> Self {
        Self { pool, defaults }
    }

    /// Create a user with no dependent provisioning.
    ///
    /// The duplicate-email pre-check gives a friendly message; the
    /// authoritative check is `uq_users_email_active`, raced at insert.
    pub async fn create(&self, input: CreateUser, actor: DbId) -> DomainResult<UserResponse> {
        input.validate()?;
        if UserRepo::email_taken(&self.pool, &input.email)
            .await
            .map_err(map_sqlx_error)?
        {
            return Err(DomainError::Conflict(format!(
                "email {:?} is already in use",
                input.email
            )));
        }
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let user = UserRepo::create(&mut *tx, &input, actor)
            .await
            .map_err(map_sqlx_error)?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_CREATE, User::NAME, user.id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(user.into())
    }

    /// Register a user and provision their default workspace: a business
    /// named after them, their staff record, and an owner assignment.
    ///
    /// The workflow is all-or-nothing: every step runs in one transaction
    /// and any failure rolls the whole operation back. Only a failed
    /// rollback can leave partial state, and that case is reported as
    /// `PartialFailure` naming the steps that may have persisted.
    pub async fn register(&self, input: CreateUser) -> DomainResult<Registration> {
        input.validate()?;
        if UserRepo::email_taken(&self.pool, &input.email)
            .await
            .map_err(map_sqlx_error)?
        {
            return Err(DomainError::Conflict(format!(
                "email {:?} is already in use",
                input.email
            )));
        }

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        match Self::provision(&mut tx, &input, &self.defaults).await {
            Ok(registration) => {
                tx.commit().await.map_err(map_sqlx_error)?;
                tracing::info!(user_id = %registration.user.id, "registered user with default business");
                Ok(registration)
            }
            Err((completed, err)) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed after provisioning error");
                    return Err(DomainError::PartialFailure {
                        completed,
                        message: format!(
                            "provisioning failed ({err}) and rollback failed ({rollback_err})"
                        ),
                    });
                }
                Err(err)
            }
        }
    }

    /// Run the provisioning steps sequentially inside `tx`. On error,
    /// reports which steps had already completed.
    async fn provision(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateUser,
        defaults: &Defaults,
    ) -> Result<Registration, (Vec<&'static str>, DomainError)> {
        let user = UserRepo::create_self_registered(&mut **tx, input)
            .await
            .map_err(|e| (vec![], map_sqlx_error(e)))?;
        let actor = user.id;

        let business = BusinessRepo::create(
            &mut **tx,
            &CreateBusiness {
                owner_id: user.id,
                name: default_business_name(&user.first_name),
                currency: Some(defaults.currency.clone()),
                timezone: Some(defaults.timezone.clone()),
            },
            actor,
        )
        .await
        .map_err(|e| (vec!["user"], map_sqlx_error(e)))?;

        let staff = StaffRepo::create(
            &mut **tx,
            &CreateStaff {
                business_id: business.id,
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: Some(user.email.clone()),
                phone: user.phone.clone(),
            },
            actor,
        )
        .await
        .map_err(|e| (vec!["user", "business"], map_sqlx_error(e)))?;

        let assignment = StaffAssignmentRepo::create(
            &mut **tx,
            &CreateStaffAssignment {
                business_id: business.id,
                staff_id: staff.id,
                role: ROLE_OWNER.to_string(),
            },
            actor,
        )
        .await
        .map_err(|e| (vec!["user", "business", "staff"], map_sqlx_error(e)))?;

        AuditLogRepo::append(
            &mut **tx,
            &NewAuditLogEntry::of(actor, actions::USER_REGISTER, User::NAME, user.id),
        )
        .await
        .map_err(|e| {
            (
                vec!["user", "business", "staff", "assignment"],
                map_sqlx_error(e),
            )
        })?;

        Ok(Registration {
            user: user.into(),
            business,
            staff,
            assignment,
        })
    }

    /// Fetch an active user.
    pub async fn get(&self, id: DbId) -> DomainResult<UserResponse> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(UserResponse::from)
            .ok_or_else(|| not_found(User::NAME, id))
    }

    /// Apply a partial update and return the read-back entity. An empty
    /// patch is rejected before storage is touched.
    pub async fn update(
        &self,
        id: DbId,
        input: UpdateUser,
        actor: DbId,
    ) -> DomainResult<UserResponse> {
        if input.is_empty() {
            return Err(DomainError::invalid(
                "input",
                "non_empty",
                "update carries no fields",
            ));
        }
        input.validate()?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let user = UserRepo::update(&mut *tx, id, &input, actor)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| not_found(User::NAME, id))?;
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_UPDATE, User::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(user.into())
    }

    /// Soft-delete a user. A second call for the same id fails with
    /// `NotFound`: deleted rows are invisible to standard lookups.
    pub async fn delete(&self, id: DbId, actor: DbId) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let deleted = UserRepo::soft_delete(&mut *tx, id, actor)
            .await
            .map_err(map_sqlx_error)?;
        if !deleted {
            return Err(not_found(User::NAME, id));
        }
        AuditLogRepo::append(
            &mut *tx,
            &NewAuditLogEntry::of(actor, actions::ENTITY_DELETE, User::NAME, id),
        )
        .await
        .map_err(map_sqlx_error)?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Substring search over email and names. The limit is resolved to
    /// `[1, 100]`, defaulting to 50; an empty query is a validation error,
    /// not an empty success.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> DomainResult<Vec<UserResponse>> {
        let term = query.trim();
        if term.is_empty() {
            return Err(DomainError::invalid(
                "query",
                "required",
                "search query must not be empty",
            ));
        }
        let limit = clamp_limit(limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        let users = UserRepo::search(&self.pool, term, limit)
            .await
            .map_err(map_sqlx_error)?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// List one page of users plus the total active count.
    pub async fn list(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> DomainResult<(Vec<UserResponse>, i64)> {
        let page = Page::new(page, page_size);
        let (users, total) = UserRepo::list(&self.pool, page)
            .await
            .map_err(map_sqlx_error)?;
        Ok((users.into_iter().map(UserResponse::from).collect(), total))
    }
}
