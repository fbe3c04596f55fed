/// Question model and database operations
///
/// Questions carry a resolution flag and two counters (views, answers).
/// Views are bumped on every detail fetch with a single UPDATE; the same
/// statement returns the row so the handler sees the incremented count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Question row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    /// Unique question ID (UUID v4)
    pub id: Uuid,

    /// Asker
    pub user_id: Uuid,

    /// Question title
    pub title: String,

    /// Question body
    pub content: String,

    /// Category slug (free-form, defaults to "general")
    pub category: String,

    /// Whether the asker marked the question resolved
    pub is_resolved: bool,

    /// View counter, bumped on every detail fetch
    pub views: i64,

    /// Answer counter, bumped when an answer is created
    pub answer_count: i64,

    /// When the question was created
    pub created_at: DateTime<Utc>,

    /// When the question was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a question
#[derive(Debug, Clone)]
pub struct CreateQuestion {
    /// Asker
    pub user_id: Uuid,

    /// Question title
    pub title: String,

    /// Question body
    pub content: String,

    /// Category slug
    pub category: String,
}

/// Sort orders for question listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionSort {
    /// Newest first (default)
    #[default]
    Recent,

    /// Most viewed first
    Views,

    /// Most answered first
    Answers,
}

impl QuestionSort {
    /// Parses the query-string value; unknown values fall back to recent
    pub fn parse(value: &str) -> Self {
        match value {
            "views" => QuestionSort::Views,
            "answers" => QuestionSort::Answers,
            _ => QuestionSort::Recent,
        }
    }

    /// ORDER BY clause for the sort
    fn order_clause(&self) -> &'static str {
        match self {
            QuestionSort::Recent => "ORDER BY created_at DESC",
            QuestionSort::Views => "ORDER BY views DESC, created_at DESC",
            QuestionSort::Answers => "ORDER BY answer_count DESC, created_at DESC",
        }
    }
}

/// Filter for question listings
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    /// Restrict to one category
    pub category: Option<String>,

    /// Substring match over title and content
    pub search: Option<String>,

    /// Restrict to resolved / unresolved questions
    pub resolved: Option<bool>,

    /// Sort order
    pub sort: QuestionSort,

    /// Page size (clamped by the caller)
    pub limit: i64,

    /// Page offset
    pub offset: i64,
}

impl Question {
    /// Creates a new question
    pub async fn create(pool: &SqlitePool, data: CreateQuestion) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (id, user_id, title, content, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, title, content, category, is_resolved, views,
                      answer_count, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.content)
        .bind(data.category)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(question)
    }

    /// Finds a question by ID without touching the view counter
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, user_id, title, content, category, is_resolved, views,
                   answer_count, created_at, updated_at
            FROM questions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(question)
    }

    /// Fetches a question and bumps its view counter in one statement
    ///
    /// Returns the row with the incremented count, or None if absent.
    pub async fn find_and_view(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET views = views + 1
            WHERE id = ?
            RETURNING id, user_id, title, content, category, is_resolved, views,
                      answer_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(question)
    }

    /// Lists questions with filter composition
    pub async fn list(
        pool: &SqlitePool,
        filter: &QuestionFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, user_id, title, content, category, is_resolved, views, \
             answer_count, created_at, updated_at FROM questions",
        );

        let mut conditions = Vec::new();
        if filter.category.is_some() {
            conditions.push("category = ?");
        }
        if filter.search.is_some() {
            conditions.push("(title LIKE ? OR content LIKE ?)");
        }
        if filter.resolved.is_some() {
            conditions.push("is_resolved = ?");
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push(' ');
        query.push_str(filter.sort.order_clause());
        query.push_str(" LIMIT ? OFFSET ?");

        let mut q = sqlx::query_as::<_, Question>(&query);
        if let Some(ref category) = filter.category {
            q = q.bind(category);
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            q = q.bind(pattern.clone()).bind(pattern);
        }
        if let Some(resolved) = filter.resolved {
            q = q.bind(resolved);
        }

        let questions = q
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(pool)
            .await?;

        Ok(questions)
    }

    /// Marks a question resolved
    ///
    /// Idempotent; returns true if the question existed.
    pub async fn resolve(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET is_resolved = TRUE, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Bumps the answer counter after an answer is created
    pub async fn increment_answer_count(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET answer_count = answer_count + 1, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
