/// User model and database operations
///
/// Users are created inside the registration transaction together with their
/// profile and stats rows; `create` therefore accepts any SQLite executor so
/// it can run on a transaction as well as on the pool.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BLOB PRIMARY KEY NOT NULL,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     username TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     password_hash TEXT NOT NULL,
///     first_name TEXT NOT NULL,
///     surname TEXT NOT NULL,
///     phone TEXT NOT NULL,
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     is_online BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL,
///     last_active_at TEXT
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

/// User account row
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique and case-insensitive
    pub email: String,

    /// Username, unique and case-insensitive
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub surname: String,

    /// Phone number as submitted at registration
    pub phone: String,

    /// Whether the account may log in
    pub is_verified: bool,

    /// Online flag, flipped on login
    pub is_online: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user was last active (None if never logged in)
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Username
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub surname: String,

    /// Phone number
    pub phone: String,

    /// Initial verification flag
    pub is_verified: bool,
}

impl User {
    /// Creates a new user row
    ///
    /// Accepts any executor so registration can run it inside a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the email or username already exists
    /// (unique constraint violation) or the connection fails.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, username, password_hash, first_name, surname,
                               phone, is_verified, is_online, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, FALSE, ?, ?)
            RETURNING id, email, username, password_hash, first_name, surname, phone,
                      is_verified, is_online, created_at, updated_at, last_active_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.email)
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.first_name)
        .bind(data.surname)
        .bind(data.phone)
        .bind(data.is_verified)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, surname, phone,
                   is_verified, is_online, created_at, updated_at, last_active_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, surname, phone,
                   is_verified, is_online, created_at, updated_at, last_active_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-insensitive)
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, surname, phone,
                   is_verified, is_online, created_at, updated_at, last_active_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email or username, for login
    ///
    /// The login form accepts either identifier in a single field.
    pub async fn find_by_login(
        pool: &SqlitePool,
        identifier: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, first_name, surname, phone,
                   is_verified, is_online, created_at, updated_at, last_active_at
            FROM users
            WHERE email = ? OR username = ?
            "#,
        )
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Sets the online flag and touches the last-active timestamp
    ///
    /// Called on login. Returns true if the user existed.
    pub async fn set_online(
        pool: &SqlitePool,
        id: Uuid,
        online: bool,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_online = ?, last_active_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(online)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
