/// Install record model and database operations
///
/// One row is created per install attempt. Only the latest row (by
/// creation time) is ever read or updated, and rows are never deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE install (
///     id BIGSERIAL PRIMARY KEY,
///     install_uuid VARCHAR(64) NOT NULL UNIQUE,
///     step INTEGER NOT NULL DEFAULT 1,
///     data JSONB NOT NULL DEFAULT '{}',
///     creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     update_date TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

/// Prefix of every install identifier
pub const INSTALL_UUID_PREFIX: &str = "install_";

/// Step assigned to a freshly created install record
pub const FIRST_STEP: i32 = 1;

/// Installer progress record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InstallRecord {
    /// Row ID
    pub id: i64,

    /// Generated identifier, `install_<uuid>`
    pub install_uuid: String,

    /// Current wizard step
    pub step: i32,

    /// Opaque wizard payload supplied by the caller
    pub data: JsonValue,

    /// When the record was created
    pub creation_date: DateTime<Utc>,

    /// When the record was last updated
    pub update_date: DateTime<Utc>,
}

/// Input for inserting an install record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstall {
    pub install_uuid: String,
    pub step: i32,
    pub data: JsonValue,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl NewInstall {
    /// Prepares a first-step record with a fresh identifier and timestamps
    pub fn first_step(data: JsonValue) -> Self {
        let now = Utc::now();
        Self {
            install_uuid: format!("{}{}", INSTALL_UUID_PREFIX, Uuid::new_v4()),
            step: FIRST_STEP,
            data,
            creation_date: now,
            update_date: now,
        }
    }
}

impl InstallRecord {
    /// Inserts a new install record
    pub async fn create(pool: &PgPool, data: NewInstall) -> Result<Self, sqlx::Error> {
        let install = sqlx::query_as::<_, InstallRecord>(
            r#"
            INSERT INTO install (install_uuid, step, data, creation_date, update_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, install_uuid, step, data, creation_date, update_date
            "#,
        )
        .bind(data.install_uuid)
        .bind(data.step)
        .bind(data.data)
        .bind(data.creation_date)
        .bind(data.update_date)
        .fetch_one(pool)
        .await?;

        Ok(install)
    }

    /// Finds the most recently created install record
    pub async fn find_latest(pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let install = sqlx::query_as::<_, InstallRecord>(
            r#"
            SELECT id, install_uuid, step, data, creation_date, update_date
            FROM install
            ORDER BY creation_date DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(install)
    }

    /// Overwrites the step and payload of an install record
    ///
    /// Returns `sqlx::Error::RowNotFound` if the record vanished.
    pub async fn update_progress(
        pool: &PgPool,
        id: i64,
        step: i32,
        data: JsonValue,
        update_date: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let install = sqlx::query_as::<_, InstallRecord>(
            r#"
            UPDATE install
            SET step = $2, data = $3, update_date = $4
            WHERE id = $1
            RETURNING id, install_uuid, step, data, creation_date, update_date
            "#,
        )
        .bind(id)
        .bind(step)
        .bind(data)
        .bind(update_date)
        .fetch_one(pool)
        .await?;

        Ok(install)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_step() {
        let new = NewInstall::first_step(json!({"lang": "en"}));

        assert_eq!(new.step, 1);
        assert!(new.install_uuid.starts_with("install_"));
        assert!(Uuid::parse_str(&new.install_uuid["install_".len()..]).is_ok());
        assert_eq!(new.creation_date, new.update_date);
        assert_eq!(new.data["lang"], "en");
    }

    #[test]
    fn test_install_uuids_are_unique() {
        let a = NewInstall::first_step(json!({}));
        let b = NewInstall::first_step(json!({}));
        assert_ne!(a.install_uuid, b.install_uuid);
    }
}
