/// Community post model and database operations
///
/// Posts carry a JSON tag array, pin/urgent flags, and two counters (likes,
/// comments). Counters are incremented with single UPDATE statements; under
/// concurrent requests increments can interleave with reads, which matches
/// the original system and is documented rather than fixed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Community post row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunityPost {
    /// Unique post ID (UUID v4)
    pub id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,

    /// Category slug (free-form, defaults to "general")
    pub category: String,

    /// Tag list, stored as a JSON array
    pub tags: Json<Vec<String>>,

    /// Pinned posts sort first in every listing
    pub is_pinned: bool,

    /// Urgent flag, surfaced by the front end
    pub is_urgent: bool,

    /// Like counter
    pub likes: i64,

    /// Comment counter, bumped when a comment is created
    pub comment_count: i64,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// Author
    pub user_id: Uuid,

    /// Post title
    pub title: String,

    /// Post body
    pub content: String,

    /// Category slug
    pub category: String,

    /// Tag list
    pub tags: Vec<String>,

    /// Pin the post
    pub is_pinned: bool,

    /// Mark the post urgent
    pub is_urgent: bool,
}

/// Sort orders for post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    /// Newest first (default)
    #[default]
    Recent,

    /// Most liked first
    Popular,

    /// Most commented first
    Discussed,
}

impl PostSort {
    /// Parses the query-string value; unknown values fall back to recent
    pub fn parse(value: &str) -> Self {
        match value {
            "popular" => PostSort::Popular,
            "discussed" => PostSort::Discussed,
            _ => PostSort::Recent,
        }
    }

    /// ORDER BY clause for the sort; pinned posts always sort first
    fn order_clause(&self) -> &'static str {
        match self {
            PostSort::Recent => "ORDER BY is_pinned DESC, created_at DESC",
            PostSort::Popular => "ORDER BY is_pinned DESC, likes DESC, created_at DESC",
            PostSort::Discussed => "ORDER BY is_pinned DESC, comment_count DESC, created_at DESC",
        }
    }
}

/// Filter for post listings
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Restrict to one category
    pub category: Option<String>,

    /// Substring match over title and content
    pub search: Option<String>,

    /// Sort order
    pub sort: PostSort,

    /// Page size (clamped by the caller)
    pub limit: i64,

    /// Page offset
    pub offset: i64,
}

impl CommunityPost {
    /// Creates a new post
    pub async fn create(pool: &SqlitePool, data: CreatePost) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            INSERT INTO community_posts (id, user_id, title, content, category, tags,
                                         is_pinned, is_urgent, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, title, content, category, tags, is_pinned, is_urgent,
                      likes, comment_count, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.content)
        .bind(data.category)
        .bind(Json(data.tags))
        .bind(data.is_pinned)
        .bind(data.is_urgent)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, CommunityPost>(
            r#"
            SELECT id, user_id, title, content, category, tags, is_pinned, is_urgent,
                   likes, comment_count, created_at, updated_at
            FROM community_posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Lists posts with filter composition
    ///
    /// Category and search conditions are ANDed; search matches a substring
    /// of the title or content.
    pub async fn list(pool: &SqlitePool, filter: &PostFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = String::from(
            "SELECT id, user_id, title, content, category, tags, is_pinned, is_urgent, \
             likes, comment_count, created_at, updated_at FROM community_posts",
        );

        let mut conditions = Vec::new();
        if filter.category.is_some() {
            conditions.push("category = ?");
        }
        if filter.search.is_some() {
            conditions.push("(title LIKE ? OR content LIKE ?)");
        }
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push(' ');
        query.push_str(filter.sort.order_clause());
        query.push_str(" LIMIT ? OFFSET ?");

        let mut q = sqlx::query_as::<_, CommunityPost>(&query);
        if let Some(ref category) = filter.category {
            q = q.bind(category);
        }
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            q = q.bind(pattern.clone()).bind(pattern);
        }

        let posts = q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await?;

        Ok(posts)
    }

    /// Likes a post
    ///
    /// Single UPDATE, returns the new like count, or None if the post does
    /// not exist. Concurrent likes can lose updates relative to concurrent
    /// reads; see module docs.
    pub async fn like(pool: &SqlitePool, id: Uuid) -> Result<Option<i64>, sqlx::Error> {
        let likes: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE community_posts
            SET likes = likes + 1, updated_at = ?
            WHERE id = ?
            RETURNING likes
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(likes.map(|(n,)| n))
    }

    /// Bumps the comment counter after a comment is created
    pub async fn increment_comment_count(
        pool: &SqlitePool,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE community_posts
            SET comment_count = comment_count + 1, updated_at = ?
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
