/// User model and database operations
///
/// Usernames and emails are unique across all users. The `password`
/// column holds an Argon2id PHC string, never plaintext, and is excluded
/// from [`UserRead`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     user_uuid VARCHAR(64) NOT NULL UNIQUE,
///     username VARCHAR(255) NOT NULL,
///     first_name VARCHAR(255) NOT NULL DEFAULT '',
///     last_name VARCHAR(255) NOT NULL DEFAULT '',
///     email VARCHAR(255) NOT NULL,
///     password VARCHAR(255) NOT NULL,
///     avatar_image VARCHAR(512) NOT NULL DEFAULT '',
///     bio TEXT NOT NULL DEFAULT '',
///     email_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     creation_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     update_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_username_key UNIQUE (username),
///     CONSTRAINT users_email_key UNIQUE (email)
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Prefix of every user identifier
pub const USER_UUID_PREFIX: &str = "user_";

/// User account as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Row ID
    pub id: i64,

    /// Generated identifier, `user_<uuid>`
    pub user_uuid: String,

    /// Login name, unique
    pub username: String,

    pub first_name: String,
    pub last_name: String,

    /// Email address, unique
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password: String,

    pub avatar_image: String,
    pub bio: String,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// When the user was created
    pub creation_date: DateTime<Utc>,

    /// When the user was last updated
    pub update_date: DateTime<Utc>,
}

/// Caller-supplied user fields
///
/// Optional profile fields left out by the caller are stored as empty
/// strings rather than overwritten with anything else.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Last name must be at most 255 characters"))]
    pub last_name: Option<String>,

    #[serde(default)]
    pub avatar_image: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,
}

/// Input for inserting a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub user_uuid: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2id hash (NOT plaintext)
    pub password: String,
    pub avatar_image: String,
    pub bio: String,
    pub email_verified: bool,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl NewUser {
    /// Prepares an unverified user from caller fields and a password hash
    ///
    /// Only fields the caller supplied are taken from `user`; the rest keep
    /// their empty defaults.
    pub fn from_create(user: UserCreate, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            user_uuid: format!("{}{}", USER_UUID_PREFIX, Uuid::new_v4()),
            username: user.username,
            first_name: user.first_name.unwrap_or_default(),
            last_name: user.last_name.unwrap_or_default(),
            email: user.email,
            password: password_hash,
            avatar_image: user.avatar_image.unwrap_or_default(),
            bio: user.bio.unwrap_or_default(),
            email_verified: false,
            creation_date: now,
            update_date: now,
        }
    }

    /// Materializes the user as it will be stored
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            user_uuid: self.user_uuid,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            avatar_image: self.avatar_image,
            bio: self.bio,
            email_verified: self.email_verified,
            creation_date: self.creation_date,
            update_date: self.update_date,
        }
    }
}

/// Read view of a user, without the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRead {
    pub id: i64,
    pub user_uuid: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_image: String,
    pub bio: String,
    pub email_verified: bool,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl From<User> for UserRead {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_uuid: user.user_uuid,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            avatar_image: user.avatar_image,
            bio: user.bio,
            email_verified: user.email_verified,
            creation_date: user.creation_date,
            update_date: user.update_date,
        }
    }
}

const USER_COLUMNS: &str = "id, user_uuid, username, first_name, last_name, email, password, \
                            avatar_image, bio, email_verified, creation_date, update_date";

impl User {
    /// Inserts a user
    ///
    /// Fails on `users_username_key` or `users_email_key` when either is
    /// already taken.
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users (user_uuid, username, first_name, last_name, email, password,
                               avatar_image, bio, email_verified, creation_date, update_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(data.user_uuid)
            .bind(data.username)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.email)
            .bind(data.password)
            .bind(data.avatar_image)
            .bind(data.bio)
            .bind(data.email_verified)
            .bind(data.creation_date)
            .bind(data.update_date)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Finds a user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }
}
