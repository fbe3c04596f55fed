/// User activity counters
///
/// Each user has exactly one stats row, created at zero inside the
/// registration transaction and incremented as the user posts, comments,
/// asks, and answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

/// Activity counter row, 1:1 with a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStats {
    /// Owning user ID
    pub user_id: Uuid,

    /// Community posts created
    pub posts: i64,

    /// Comments written
    pub comments: i64,

    /// Questions asked
    pub questions: i64,

    /// Answers given
    pub answers: i64,

    /// Accepted connections
    pub connections: i64,

    /// Events attended
    pub events: i64,

    /// When the user was last active
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Counter selector for [`UserStats::increment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCounter {
    Posts,
    Comments,
    Questions,
    Answers,
}

impl StatCounter {
    /// Column name for the counter
    fn column(&self) -> &'static str {
        match self {
            StatCounter::Posts => "posts",
            StatCounter::Comments => "comments",
            StatCounter::Questions => "questions",
            StatCounter::Answers => "answers",
        }
    }
}

impl UserStats {
    /// Creates a zeroed stats row for a user
    ///
    /// Accepts any executor so registration can run it inside a transaction.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            INSERT INTO user_stats (user_id)
            VALUES (?)
            RETURNING user_id, posts, comments, questions, answers, connections,
                      events, last_active_at
            "#,
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(stats)
    }

    /// Finds the stats row belonging to a user
    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT user_id, posts, comments, questions, answers, connections,
                   events, last_active_at
            FROM user_stats
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(stats)
    }

    /// Increments one counter and touches the last-active timestamp
    ///
    /// The increment is a single UPDATE, atomic at the statement level only;
    /// concurrent requests can interleave with other statements, which is the
    /// documented behavior of the original system.
    pub async fn increment(
        pool: &SqlitePool,
        user_id: Uuid,
        counter: StatCounter,
    ) -> Result<bool, sqlx::Error> {
        // Column name comes from a closed enum, never from user input.
        let column = counter.column();
        let query = format!(
            "UPDATE user_stats SET {column} = {column} + 1, last_active_at = ? WHERE user_id = ?"
        );

        let result = sqlx::query(&query)
            .bind(Utc::now())
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
