/// Storage seam for the install wizard
///
/// The install service only talks to an [`InstallStore`]. Two backends are
/// provided:
///
/// - [`PgInstallStore`]: PostgreSQL via `sqlx`, the production backend
/// - [`MemoryInstallStore`]: in-process tables for tests and dry runs
///
/// Both enforce the same unique constraints (`users.username`,
/// `users.email`, `organizations.slug`, role ids, one membership per
/// user/org pair) and report them as [`StoreError::UniqueViolation`]
/// carrying the constraint name.
///
/// # Example
///
/// ```no_run
/// use learnhouse_shared::store::{InstallStore, PgInstallStore};
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store: Arc<dyn InstallStore> = Arc::new(PgInstallStore::new(pool));
/// let latest = store.latest_install().await?;
/// # Ok(())
/// # }
/// ```
use crate::models::{
    install::{InstallRecord, NewInstall},
    organization::{NewOrganization, Organization},
    role::{NewRole, Role, RoleType},
    user::{NewUser, User},
    user_organization::{NewUserOrganization, UserOrganization},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

pub mod memory;
pub mod postgres;

pub use memory::MemoryInstallStore;
pub use postgres::PgInstallStore;

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (constraint name attached)
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A row the operation depends on does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Underlying database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Non-database backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                )
            }
            other => StoreError::Database(other),
        }
    }
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations needed by the install wizard
///
/// Each method is one unit of work against the backing store. Methods
/// that write several rows (`insert_roles`) are atomic.
#[async_trait]
pub trait InstallStore: Send + Sync {
    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Inserts a new install record
    async fn insert_install(&self, data: NewInstall) -> StoreResult<InstallRecord>;

    /// Returns the most recently created install record, if any
    ///
    /// Ordered by `creation_date` descending, ties broken by id descending.
    async fn latest_install(&self) -> StoreResult<Option<InstallRecord>>;

    /// Overwrites `step` and `data` of an install record
    async fn update_install(
        &self,
        id: i64,
        step: i32,
        data: JsonValue,
        update_date: DateTime<Utc>,
    ) -> StoreResult<InstallRecord>;

    /// Deletes every role of the given type, returning the number removed
    async fn delete_roles_by_type(&self, role_type: RoleType) -> StoreResult<u64>;

    /// Lists roles of the given type ordered by id
    async fn list_roles_by_type(&self, role_type: RoleType) -> StoreResult<Vec<Role>>;

    /// Inserts a batch of roles atomically
    async fn insert_roles(&self, roles: Vec<NewRole>) -> StoreResult<Vec<Role>>;

    /// Inserts an organization
    async fn insert_organization(&self, data: NewOrganization) -> StoreResult<Organization>;

    /// Finds an organization by slug
    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>>;

    /// Finds a user by username
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Finds a user by email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user
    async fn insert_user(&self, data: NewUser) -> StoreResult<User>;

    /// Links a user to an organization with a role
    async fn insert_user_organization(
        &self,
        data: NewUserOrganization,
    ) -> StoreResult<UserOrganization>;

    /// Lists a user's organization memberships
    async fn list_user_organizations(&self, user_id: i64) -> StoreResult<Vec<UserOrganization>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_other_sqlx_errors_are_database_errors() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
