/// User-organization membership model
///
/// Links a user to an organization with a role. The install wizard creates
/// exactly one membership, giving the first user the global Admin role in
/// the first organization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_organizations (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     org_id BIGINT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     role_id BIGINT NOT NULL,
///     creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     update_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT user_organizations_user_org_key UNIQUE (user_id, org_id)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserOrganization {
    pub id: i64,
    pub user_id: i64,
    pub org_id: i64,
    pub role_id: i64,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

/// Input for creating a membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserOrganization {
    pub user_id: i64,
    pub org_id: i64,
    pub role_id: i64,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl NewUserOrganization {
    /// Membership stamped with the current time
    pub fn new(user_id: i64, org_id: i64, role_id: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            org_id,
            role_id,
            creation_date: now,
            update_date: now,
        }
    }
}

impl UserOrganization {
    /// Inserts a membership
    pub async fn create(pool: &PgPool, data: NewUserOrganization) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, UserOrganization>(
            r#"
            INSERT INTO user_organizations (user_id, org_id, role_id, creation_date, update_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, org_id, role_id, creation_date, update_date
            "#,
        )
        .bind(data.user_id)
        .bind(data.org_id)
        .bind(data.role_id)
        .bind(data.creation_date)
        .bind(data.update_date)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Lists memberships of a user, oldest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, UserOrganization>(
            r#"
            SELECT id, user_id, org_id, role_id, creation_date, update_date
            FROM user_organizations
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }
}
