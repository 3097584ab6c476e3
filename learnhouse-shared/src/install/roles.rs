/// The three global roles seeded at install time
///
/// | ID | Name | Rights |
/// | --- | --- | --- |
/// | 1 | Admin | everything |
/// | 2 | Maintainer | everything |
/// | 3 | User | read everywhere, create on `users` (self-registration) |
use crate::models::role::{NewRole, Permission, RoleType, Rights};
use chrono::Utc;

/// ID of the Admin role, assigned to the first organization user
pub const ADMIN_ROLE_ID: i64 = 1;

/// ID of the Maintainer role
pub const MAINTAINER_ROLE_ID: i64 = 2;

/// ID of the User role
pub const USER_ROLE_ID: i64 = 3;

/// Number of global roles the seeder creates
pub const DEFAULT_ROLE_COUNT: usize = 3;

const ADMIN_RIGHTS: Rights = Rights::uniform(Permission::all());

const MAINTAINER_RIGHTS: Rights = Rights::uniform(Permission::all());

const USER_RIGHTS: Rights = Rights {
    users: Permission::read_create(),
    ..Rights::uniform(Permission::read_only())
};

/// Builds the default global roles, stamped with the current time
pub fn default_roles() -> Vec<NewRole> {
    let now = Utc::now();

    let role = |id: i64, name: &str, description: &str, uuid: &str, rights: Rights| NewRole {
        id,
        name: name.to_string(),
        description: Some(description.to_string()),
        role_type: RoleType::Global,
        role_uuid: uuid.to_string(),
        rights,
        creation_date: now,
        update_date: now,
    };

    vec![
        role(ADMIN_ROLE_ID, "Admin", "Standard Admin Role", "role_global_admin", ADMIN_RIGHTS),
        role(
            MAINTAINER_ROLE_ID,
            "Maintainer",
            "Standard Maintainer Role",
            "role_global_maintainer",
            MAINTAINER_RIGHTS,
        ),
        role(USER_ROLE_ID, "User", "Standard User Role", "role_global_user", USER_RIGHTS),
    ]
}
