/// Install wizard operations
///
/// The wizard runs once, before an instance is provisioned:
///
/// 1. `create_install_instance` records that an install has started
/// 2. `update_install_instance` tracks progress through the wizard steps
/// 3. `install_default_elements` seeds the global roles
/// 4. `install_create_organization` creates the first organization
/// 5. `install_create_organization_user` creates its administrator
///
/// Callers check [`gate::ensure_install_mode_enabled`] before invoking any
/// of these; the API server does so in middleware.
///
/// # Example
///
/// ```
/// use learnhouse_shared::install::InstallService;
/// use learnhouse_shared::store::MemoryInstallStore;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = InstallService::new(Arc::new(MemoryInstallStore::new()));
///
/// let install = service.create_install_instance(json!({"lang": "en"})).await?;
/// assert_eq!(install.step, 1);
/// # Ok(())
/// # }
/// ```
use crate::auth::password::PasswordHasher;
use crate::error::{InstallError, InstallResult};
use crate::models::{
    install::{InstallRecord, NewInstall},
    organization::{NewOrganization, Organization, OrganizationCreate},
    role::RoleType,
    user::{NewUser, UserCreate, UserRead},
    user_organization::NewUserOrganization,
};
use crate::store::InstallStore;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

pub mod gate;
pub mod roles;

pub use gate::ensure_install_mode_enabled;
pub use roles::{default_roles, ADMIN_ROLE_ID};

/// Runs install wizard operations against a store
#[derive(Clone)]
pub struct InstallService {
    store: Arc<dyn InstallStore>,
    hasher: PasswordHasher,
}

impl InstallService {
    /// Creates a service with the default Argon2id parameters
    pub fn new(store: Arc<dyn InstallStore>) -> Self {
        Self::with_hasher(store, PasswordHasher::default())
    }

    /// Creates a service with a specific password hasher
    pub fn with_hasher(store: Arc<dyn InstallStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Backing store
    pub fn store(&self) -> &Arc<dyn InstallStore> {
        &self.store
    }

    /// Records a new install attempt at step 1
    pub async fn create_install_instance(&self, data: JsonValue) -> InstallResult<InstallRecord> {
        let install = self.store.insert_install(NewInstall::first_step(data)).await?;

        info!(install_uuid = %install.install_uuid, "Install instance created");
        Ok(install)
    }

    /// Returns the most recently created install record
    ///
    /// # Errors
    ///
    /// `NotFound` if no install has been started.
    pub async fn get_latest_install_instance(&self) -> InstallResult<InstallRecord> {
        self.store
            .latest_install()
            .await?
            .ok_or_else(|| InstallError::NotFound("No install instance found".to_string()))
    }

    /// Overwrites step and data on the latest install record
    ///
    /// Steps are not required to increase; the last write wins.
    pub async fn update_install_instance(
        &self,
        data: JsonValue,
        step: i32,
    ) -> InstallResult<InstallRecord> {
        let latest = self.get_latest_install_instance().await?;

        if step < latest.step {
            debug!(from = latest.step, to = step, "Install step moved backwards");
        }

        let install = self
            .store
            .update_install(latest.id, step, data, Utc::now())
            .await?;

        info!(install_uuid = %install.install_uuid, step, "Install instance updated");
        Ok(install)
    }

    /// Resets the global roles to the three defaults
    ///
    /// Existing global roles are deleted first, so calling this again
    /// leaves the same three roles in place.
    ///
    /// # Errors
    ///
    /// `Conflict` if a full default set is still present after the reset,
    /// which only happens when another seeder ran concurrently.
    pub async fn install_default_elements(&self) -> InstallResult<bool> {
        let removed = self.store.delete_roles_by_type(RoleType::Global).await?;
        debug!(removed, role_type = RoleType::Global.as_str(), "Cleared roles");

        let remaining = self.store.list_roles_by_type(RoleType::Global).await?;
        if remaining.len() == roles::DEFAULT_ROLE_COUNT {
            warn!("Default roles reappeared after reset");
            return Err(InstallError::Conflict("Default roles already exist".to_string()));
        }

        let seeded = self.store.insert_roles(default_roles()).await?;

        info!(
            count = seeded.len(),
            role_type = RoleType::Global.as_str(),
            "Default roles installed"
        );
        Ok(true)
    }

    /// Creates the first organization
    ///
    /// A slug that is already taken fails with `Conflict`.
    pub async fn install_create_organization(
        &self,
        org: OrganizationCreate,
    ) -> InstallResult<Organization> {
        org.validate()?;

        let org = self.store.insert_organization(NewOrganization::from(org)).await?;

        info!(org_uuid = %org.org_uuid, slug = %org.slug, "Organization created");
        Ok(org)
    }

    /// Creates the first user of an organization and makes them its admin
    ///
    /// # Errors
    ///
    /// - `Validation` if the fields are malformed
    /// - `Conflict` if the organization does not exist, or the username or
    ///   email is already taken
    pub async fn install_create_organization_user(
        &self,
        user: UserCreate,
        org_slug: &str,
    ) -> InstallResult<UserRead> {
        user.validate()?;

        let password_hash = self.hasher.hash_blocking(&user.password).await?;
        let new_user = NewUser::from_create(user, password_hash);

        let org = match self.store.find_organization_by_slug(org_slug).await? {
            Some(org) => org,
            None => {
                warn!(org_slug, "Organization does not exist");
                return Err(InstallError::Conflict("Organization does not exist".to_string()));
            }
        };

        if self.store.find_user_by_username(&new_user.username).await?.is_some() {
            warn!(username = %new_user.username, "Username already taken");
            return Err(InstallError::Conflict("Username already exists".to_string()));
        }

        if self.store.find_user_by_email(&new_user.email).await?.is_some() {
            warn!(email = %new_user.email, "Email already taken");
            return Err(InstallError::Conflict("Email already exists".to_string()));
        }

        let user = self.store.insert_user(new_user).await?;

        let membership = self
            .store
            .insert_user_organization(NewUserOrganization::new(user.id, org.id, ADMIN_ROLE_ID))
            .await?;

        info!(
            user_uuid = %user.user_uuid,
            org_slug = %org.slug,
            role_id = membership.role_id,
            "Organization admin created"
        );

        Ok(UserRead::from(user))
    }
}
