/// Answer model and database operations
///
/// Answers belong to one question and one user. The helpful flag is settable
/// once, by the question owner; the guarded UPDATE in [`Answer::mark_helpful`]
/// enforces the once-only part at the statement level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Answer row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Answer {
    /// Unique answer ID (UUID v4)
    pub id: Uuid,

    /// Question the answer belongs to
    pub question_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Answer body
    pub content: String,

    /// Whether the question owner marked this answer helpful
    pub is_helpful: bool,

    /// When the answer was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating an answer
#[derive(Debug, Clone)]
pub struct CreateAnswer {
    /// Question the answer belongs to
    pub question_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Answer body
    pub content: String,
}

impl Answer {
    /// Creates a new answer
    ///
    /// The caller is responsible for verifying the question exists first so a
    /// missing question maps to 404 rather than a foreign key error.
    pub async fn create(pool: &SqlitePool, data: CreateAnswer) -> Result<Self, sqlx::Error> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            INSERT INTO answers (id, question_id, user_id, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, question_id, user_id, content, is_helpful, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.question_id)
        .bind(data.user_id)
        .bind(data.content)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(answer)
    }

    /// Finds an answer by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let answer = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, content, is_helpful, created_at
            FROM answers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(answer)
    }

    /// Lists answers to a question in chronological order
    pub async fn list_by_question(
        pool: &SqlitePool,
        question_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let answers = sqlx::query_as::<_, Answer>(
            r#"
            SELECT id, question_id, user_id, content, is_helpful, created_at
            FROM answers
            WHERE question_id = ?
            ORDER BY created_at ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(question_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(answers)
    }

    /// Marks an answer helpful
    ///
    /// The flag is settable once; the WHERE clause skips rows where it is
    /// already set. Returns true if the flag was flipped by this call.
    pub async fn mark_helpful(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE answers
            SET is_helpful = TRUE
            WHERE id = ? AND is_helpful = FALSE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
