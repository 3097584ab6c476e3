/// Role model and database operations
///
/// Roles carry a permission matrix ([`Rights`]) keyed by resource. Global
/// roles apply across every organization; the install wizard seeds exactly
/// three of them (Admin, Maintainer, User).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE role_type AS ENUM (
///     'TYPE_GLOBAL', 'TYPE_ORGANIZATION', 'TYPE_ORGANIZATION_API_TOKEN'
/// );
///
/// CREATE TABLE roles (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     org_id BIGINT,
///     role_type role_type NOT NULL DEFAULT 'TYPE_GLOBAL',
///     role_uuid VARCHAR(64) NOT NULL UNIQUE,
///     rights JSONB NOT NULL DEFAULT '{}',
///     creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     update_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgExecutor, types::Json};

/// Scope of a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role_type")]
pub enum RoleType {
    /// Applies across all organizations
    #[sqlx(rename = "TYPE_GLOBAL")]
    #[serde(rename = "TYPE_GLOBAL")]
    Global,

    /// Scoped to a single organization
    #[sqlx(rename = "TYPE_ORGANIZATION")]
    #[serde(rename = "TYPE_ORGANIZATION")]
    Organization,

    /// Scoped to an organization API token
    #[sqlx(rename = "TYPE_ORGANIZATION_API_TOKEN")]
    #[serde(rename = "TYPE_ORGANIZATION_API_TOKEN")]
    OrganizationApiToken,
}

impl RoleType {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Global => "TYPE_GLOBAL",
            RoleType::Organization => "TYPE_ORGANIZATION",
            RoleType::OrganizationApiToken => "TYPE_ORGANIZATION_API_TOKEN",
        }
    }
}

/// Create/read/update/delete flags on a single resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub action_create: bool,
    pub action_read: bool,
    pub action_update: bool,
    pub action_delete: bool,
}

impl Permission {
    /// Every action allowed
    pub const fn all() -> Self {
        Self {
            action_create: true,
            action_read: true,
            action_update: true,
            action_delete: true,
        }
    }

    /// Read only
    pub const fn read_only() -> Self {
        Self {
            action_create: false,
            action_read: true,
            action_update: false,
            action_delete: false,
        }
    }

    /// Read plus create
    pub const fn read_create() -> Self {
        Self {
            action_create: true,
            ..Self::read_only()
        }
    }
}

/// Permission matrix keyed by resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rights {
    pub courses: Permission,
    pub users: Permission,
    pub usergroups: Permission,
    pub collections: Permission,
    pub organizations: Permission,
    pub coursechapters: Permission,
    pub activities: Permission,
}

impl Rights {
    /// Same permission on every resource
    pub const fn uniform(permission: Permission) -> Self {
        Self {
            courses: permission,
            users: permission,
            usergroups: permission,
            collections: permission,
            organizations: permission,
            coursechapters: permission,
            activities: permission,
        }
    }

    /// Resource name and permission pairs, in storage order
    pub fn resources(&self) -> [(&'static str, Permission); 7] {
        [
            ("courses", self.courses),
            ("users", self.users),
            ("usergroups", self.usergroups),
            ("collections", self.collections),
            ("organizations", self.organizations),
            ("coursechapters", self.coursechapters),
            ("activities", self.activities),
        ]
    }
}

/// Authorization role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Role ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Owning organization for organization-scoped roles
    pub org_id: Option<i64>,

    /// Role scope
    pub role_type: RoleType,

    /// Stable identifier (e.g. `role_global_admin`)
    pub role_uuid: String,

    /// Permission matrix (JSONB)
    #[sqlx(json)]
    pub rights: Rights,

    /// When the role was created
    pub creation_date: DateTime<Utc>,

    /// When the role was last updated
    pub update_date: DateTime<Utc>,
}

/// Input for inserting a role with an explicit ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRole {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub role_type: RoleType,
    pub role_uuid: String,
    pub rights: Rights,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl NewRole {
    /// Materializes the role as it will be stored
    pub fn into_role(self) -> Role {
        Role {
            id: self.id,
            name: self.name,
            description: self.description,
            org_id: None,
            role_type: self.role_type,
            role_uuid: self.role_uuid,
            rights: self.rights,
            creation_date: self.creation_date,
            update_date: self.update_date,
        }
    }
}

impl Role {
    /// Inserts a role with its explicit ID
    ///
    /// Accepts any executor so several inserts can share a transaction.
    pub async fn create<'e, E>(executor: E, data: NewRole) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, description, role_type, role_uuid, rights,
                               creation_date, update_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, description, org_id, role_type, role_uuid, rights,
                      creation_date, update_date
            "#,
        )
        .bind(data.id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.role_type)
        .bind(data.role_uuid)
        .bind(Json(data.rights))
        .bind(data.creation_date)
        .bind(data.update_date)
        .fetch_one(executor)
        .await?;

        Ok(role)
    }

    /// Lists roles of a given type ordered by ID
    pub async fn list_by_type<'e, E>(executor: E, role_type: RoleType) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description, org_id, role_type, role_uuid, rights,
                   creation_date, update_date
            FROM roles
            WHERE role_type = $1
            ORDER BY id
            "#,
        )
        .bind(role_type)
        .fetch_all(executor)
        .await?;

        Ok(roles)
    }

    /// Deletes all roles of a given type, returning how many were removed
    pub async fn delete_by_type<'e, E>(executor: E, role_type: RoleType) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM roles WHERE role_type = $1")
            .bind(role_type)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Moves the ID sequence past explicitly inserted IDs
    pub async fn sync_id_sequence<'e, E>(executor: E) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('roles', 'id'),
                GREATEST((SELECT COALESCE(MAX(id), 0) FROM roles), 1)
            )
            "#,
        )
        .execute(executor)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_type_serialization() {
        assert_eq!(serde_json::to_value(RoleType::Global).unwrap(), json!("TYPE_GLOBAL"));
        assert_eq!(RoleType::OrganizationApiToken.as_str(), "TYPE_ORGANIZATION_API_TOKEN");

        let parsed: RoleType = serde_json::from_value(json!("TYPE_ORGANIZATION")).unwrap();
        assert_eq!(parsed, RoleType::Organization);
    }

    #[test]
    fn test_permission_presets() {
        assert_eq!(
            Permission::read_create(),
            Permission {
                action_create: true,
                action_read: true,
                action_update: false,
                action_delete: false,
            }
        );
        assert!(!Permission::default().action_read);
    }

    #[test]
    fn test_rights_storable_form() {
        let rights = Rights::uniform(Permission::read_only());
        let value = serde_json::to_value(rights).unwrap();

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 7);
        for (resource, _) in rights.resources() {
            assert_eq!(value[resource]["action_read"], json!(true));
            assert_eq!(value[resource]["action_delete"], json!(false));
        }

        let back: Rights = serde_json::from_value(value).unwrap();
        assert_eq!(back, rights);
    }
}
