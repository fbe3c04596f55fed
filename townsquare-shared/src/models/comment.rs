/// Comment model and database operations
///
/// Comments belong to one post and one user and are immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Comment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID (UUID v4)
    pub id: Uuid,

    /// Post the comment belongs to
    pub post_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    /// Post the comment belongs to
    pub post_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Comment body
    pub content: String,
}

impl Comment {
    /// Creates a new comment
    ///
    /// The caller is responsible for verifying the post exists first so a
    /// missing post maps to 404 rather than a foreign key error.
    pub async fn create(pool: &SqlitePool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, user_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.post_id)
        .bind(data.user_id)
        .bind(data.content)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists comments on a post in chronological order
    pub async fn list_by_post(
        pool: &SqlitePool,
        post_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, content, created_at
            FROM comments
            WHERE post_id = ?
            ORDER BY created_at ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Counts comments on a post
    pub async fn count_by_post(pool: &SqlitePool, post_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
