/// PostgreSQL-backed install store
///
/// Delegates to the query functions on each model. Role seeding runs in a
/// single transaction so a failed batch leaves no partial role set behind.
use crate::db::pool;
use crate::models::{
    install::{InstallRecord, NewInstall},
    organization::{NewOrganization, Organization},
    role::{NewRole, Role, RoleType},
    user::{NewUser, User},
    user_organization::{NewUserOrganization, UserOrganization},
};
use crate::store::{InstallStore, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::debug;

/// Install store over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgInstallStore {
    pool: PgPool,
}

impl PgInstallStore {
    /// Creates a store with the provided connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InstallStore for PgInstallStore {
    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }

    async fn insert_install(&self, data: NewInstall) -> StoreResult<InstallRecord> {
        Ok(InstallRecord::create(&self.pool, data).await?)
    }

    async fn latest_install(&self) -> StoreResult<Option<InstallRecord>> {
        Ok(InstallRecord::find_latest(&self.pool).await?)
    }

    async fn update_install(
        &self,
        id: i64,
        step: i32,
        data: JsonValue,
        update_date: DateTime<Utc>,
    ) -> StoreResult<InstallRecord> {
        Ok(InstallRecord::update_progress(&self.pool, id, step, data, update_date).await?)
    }

    async fn delete_roles_by_type(&self, role_type: RoleType) -> StoreResult<u64> {
        Ok(Role::delete_by_type(&self.pool, role_type).await?)
    }

    async fn list_roles_by_type(&self, role_type: RoleType) -> StoreResult<Vec<Role>> {
        Ok(Role::list_by_type(&self.pool, role_type).await?)
    }

    async fn insert_roles(&self, roles: Vec<NewRole>) -> StoreResult<Vec<Role>> {
        let mut tx = self.pool.begin().await?;

        let mut inserted = Vec::with_capacity(roles.len());
        for role in roles {
            debug!(role_id = role.id, role_uuid = %role.role_uuid, "Inserting role");
            inserted.push(Role::create(&mut *tx, role).await?);
        }
        Role::sync_id_sequence(&mut *tx).await?;

        tx.commit().await?;
        Ok(inserted)
    }

    async fn insert_organization(&self, data: NewOrganization) -> StoreResult<Organization> {
        Ok(Organization::create(&self.pool, data).await?)
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        Ok(Organization::find_by_slug(&self.pool, slug).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn insert_user(&self, data: NewUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn insert_user_organization(
        &self,
        data: NewUserOrganization,
    ) -> StoreResult<UserOrganization> {
        Ok(UserOrganization::create(&self.pool, data).await?)
    }

    async fn list_user_organizations(&self, user_id: i64) -> StoreResult<Vec<UserOrganization>> {
        Ok(UserOrganization::list_by_user(&self.pool, user_id).await?)
    }
}
