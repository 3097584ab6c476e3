/// Organization model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id BIGSERIAL PRIMARY KEY,
///     org_uuid VARCHAR(64) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     slug VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     logo_image VARCHAR(512),
///     label VARCHAR(255),
///     creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     update_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT organizations_slug_key UNIQUE (slug)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Prefix of every organization identifier
pub const ORG_UUID_PREFIX: &str = "org_";

/// Organization (tenant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Row ID
    pub id: i64,

    /// Generated identifier, `org_<uuid>`
    pub org_uuid: String,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// URL slug, unique across organizations
    pub slug: String,

    /// Contact email
    pub email: String,

    /// Optional logo image file name
    pub logo_image: Option<String>,

    /// Optional short label
    pub label: Option<String>,

    /// When the organization was created
    pub creation_date: DateTime<Utc>,

    /// When the organization was last updated
    pub update_date: DateTime<Utc>,
}

/// Caller-supplied organization fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrganizationCreate {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// URL slug, any non-empty string
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: String,

    /// Contact email
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional logo image file name
    #[serde(default)]
    pub logo_image: Option<String>,

    /// Optional short label
    #[serde(default)]
    #[validate(length(max = 255, message = "Label must be at most 255 characters"))]
    pub label: Option<String>,
}

/// Input for inserting an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub org_uuid: String,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub email: String,
    pub logo_image: Option<String>,
    pub label: Option<String>,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl From<OrganizationCreate> for NewOrganization {
    /// Stamps a fresh identifier and timestamps onto the caller's fields
    fn from(org: OrganizationCreate) -> Self {
        let now = Utc::now();
        Self {
            org_uuid: format!("{}{}", ORG_UUID_PREFIX, Uuid::new_v4()),
            name: org.name,
            description: org.description,
            slug: org.slug,
            email: org.email,
            logo_image: org.logo_image,
            label: org.label,
            creation_date: now,
            update_date: now,
        }
    }
}

impl Organization {
    /// Inserts an organization
    ///
    /// A duplicate slug fails on `organizations_slug_key`.
    pub async fn create(pool: &PgPool, data: NewOrganization) -> Result<Self, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (org_uuid, name, description, slug, email, logo_image,
                                       label, creation_date, update_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, org_uuid, name, description, slug, email, logo_image, label,
                      creation_date, update_date
            "#,
        )
        .bind(data.org_uuid)
        .bind(data.name)
        .bind(data.description)
        .bind(data.slug)
        .bind(data.email)
        .bind(data.logo_image)
        .bind(data.label)
        .bind(data.creation_date)
        .bind(data.update_date)
        .fetch_one(pool)
        .await?;

        Ok(org)
    }

    /// Finds an organization by slug
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let org = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, org_uuid, name, description, slug, email, logo_image, label,
                   creation_date, update_date
            FROM organizations
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(org)
    }
}
