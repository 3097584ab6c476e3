/// In-memory install store
///
/// Keeps every table in a single mutex-guarded state so each trait call is
/// atomic. Unique constraints are checked with the same constraint names
/// the PostgreSQL schema uses, so conflict handling behaves identically.
///
/// Useful for:
/// - Testing the install service and HTTP routes without a database
/// - Dry-running the wizard
///
/// # Example
///
/// ```
/// use learnhouse_shared::store::{InstallStore, MemoryInstallStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryInstallStore::new();
/// assert!(store.latest_install().await?.is_none());
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
use crate::store::{InstallStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    installs: Vec<InstallRecord>,
    roles: Vec<Role>,
    organizations: Vec<Organization>,
    users: Vec<User>,
    user_organizations: Vec<UserOrganization>,
    next_install_id: i64,
    next_org_id: i64,
    next_user_id: i64,
    next_membership_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Install store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryInstallStore {
    tables: Mutex<Tables>,
}

impl MemoryInstallStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InstallStore for MemoryInstallStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn insert_install(&self, data: NewInstall) -> StoreResult<InstallRecord> {
        let mut tables = self.tables.lock().await;

        if tables.installs.iter().any(|i| i.install_uuid == data.install_uuid) {
            return Err(StoreError::UniqueViolation("install_install_uuid_key".to_string()));
        }

        let record = InstallRecord {
            id: next_id(&mut tables.next_install_id),
            install_uuid: data.install_uuid,
            step: data.step,
            data: data.data,
            creation_date: data.creation_date,
            update_date: data.update_date,
        };
        tables.installs.push(record.clone());
        Ok(record)
    }

    async fn latest_install(&self) -> StoreResult<Option<InstallRecord>> {
        let tables = self.tables.lock().await;

        Ok(tables
            .installs
            .iter()
            .max_by_key(|i| (i.creation_date, i.id))
            .cloned())
    }

    async fn update_install(
        &self,
        id: i64,
        step: i32,
        data: JsonValue,
        update_date: DateTime<Utc>,
    ) -> StoreResult<InstallRecord> {
        let mut tables = self.tables.lock().await;

        let record = tables
            .installs
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("install {}", id)))?;

        record.step = step;
        record.data = data;
        record.update_date = update_date;
        Ok(record.clone())
    }

    async fn delete_roles_by_type(&self, role_type: RoleType) -> StoreResult<u64> {
        let mut tables = self.tables.lock().await;

        let before = tables.roles.len();
        tables.roles.retain(|r| r.role_type != role_type);
        Ok((before - tables.roles.len()) as u64)
    }

    async fn list_roles_by_type(&self, role_type: RoleType) -> StoreResult<Vec<Role>> {
        let tables = self.tables.lock().await;

        let mut roles: Vec<Role> = tables
            .roles
            .iter()
            .filter(|r| r.role_type == role_type)
            .cloned()
            .collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn insert_roles(&self, roles: Vec<NewRole>) -> StoreResult<Vec<Role>> {
        let mut tables = self.tables.lock().await;

        // Validate the whole batch first so a conflict inserts nothing.
        for (i, role) in roles.iter().enumerate() {
            let clashes_existing = tables
                .roles
                .iter()
                .any(|r| r.id == role.id || r.role_uuid == role.role_uuid);
            let clashes_batch = roles[..i]
                .iter()
                .any(|r| r.id == role.id || r.role_uuid == role.role_uuid);

            if clashes_existing || clashes_batch {
                return Err(StoreError::UniqueViolation("roles_pkey".to_string()));
            }
        }

        let inserted: Vec<Role> = roles.into_iter().map(NewRole::into_role).collect();
        tables.roles.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn insert_organization(&self, data: NewOrganization) -> StoreResult<Organization> {
        let mut tables = self.tables.lock().await;

        if tables.organizations.iter().any(|o| o.slug == data.slug) {
            return Err(StoreError::UniqueViolation("organizations_slug_key".to_string()));
        }

        let org = Organization {
            id: next_id(&mut tables.next_org_id),
            org_uuid: data.org_uuid,
            name: data.name,
            description: data.description,
            slug: data.slug,
            email: data.email,
            logo_image: data.logo_image,
            label: data.label,
            creation_date: data.creation_date,
            update_date: data.update_date,
        };
        tables.organizations.push(org.clone());
        Ok(org)
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        let tables = self.tables.lock().await;
        Ok(tables.organizations.iter().find(|o| o.slug == slug).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, data: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.iter().any(|u| u.username == data.username) {
            return Err(StoreError::UniqueViolation("users_username_key".to_string()));
        }
        if tables.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let id = next_id(&mut tables.next_user_id);
        let user = data.into_user(id);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn insert_user_organization(
        &self,
        data: NewUserOrganization,
    ) -> StoreResult<UserOrganization> {
        let mut tables = self.tables.lock().await;

        if !tables.users.iter().any(|u| u.id == data.user_id) {
            return Err(StoreError::NotFound(format!("user {}", data.user_id)));
        }
        if !tables.organizations.iter().any(|o| o.id == data.org_id) {
            return Err(StoreError::NotFound(format!("organization {}", data.org_id)));
        }
        if tables
            .user_organizations
            .iter()
            .any(|m| m.user_id == data.user_id && m.org_id == data.org_id)
        {
            return Err(StoreError::UniqueViolation(
                "user_organizations_user_org_key".to_string(),
            ));
        }

        let membership = UserOrganization {
            id: next_id(&mut tables.next_membership_id),
            user_id: data.user_id,
            org_id: data.org_id,
            role_id: data.role_id,
            creation_date: data.creation_date,
            update_date: data.update_date,
        };
        tables.user_organizations.push(membership.clone());
        Ok(membership)
    }

    async fn list_user_organizations(&self, user_id: i64) -> StoreResult<Vec<UserOrganization>> {
        let tables = self.tables.lock().await;

        Ok(tables
            .user_organizations
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }
}
