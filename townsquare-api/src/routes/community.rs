/// Community endpoints: posts, likes, comments
///
/// # Endpoints
///
/// - `POST /v1/community/posts` - Create a post
/// - `GET  /v1/community/posts` - List posts (category/search/sort/pagination)
/// - `GET  /v1/community/posts/:id` - Post detail
/// - `POST /v1/community/posts/:id/like` - Like a post
/// - `POST /v1/community/posts/:id/comments` - Comment on a post
/// - `GET  /v1/community/posts/:id/comments` - List comments
///
/// All routes require the bearer token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope},
    routes::{clamp_page, PageQuery},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use townsquare_shared::{
    auth::middleware::AuthContext,
    models::{
        comment::{Comment, CreateComment},
        post::{CommunityPost, CreatePost, PostFilter, PostSort},
        stats::{StatCounter, UserStats},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create post request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Post title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Post body
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,

    /// Category slug (defaults to "general")
    pub category: Option<String>,

    /// Tag list
    pub tags: Option<Vec<String>>,

    /// Pin the post
    pub is_pinned: Option<bool>,

    /// Mark the post urgent
    pub is_urgent: Option<bool>,
}

/// Comment request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    /// Comment body
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// Restrict to one category
    pub category: Option<String>,

    /// Substring match over title and content
    pub search: Option<String>,

    /// Sort order: recent (default), popular, discussed
    pub sort: Option<String>,

    /// Page size
    pub limit: Option<i64>,

    /// Page offset
    pub offset: Option<i64>,
}

/// Like response
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    /// New like count
    pub likes: i64,
}

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<CommunityPost>>)> {
    req.validate()?;

    let post = CommunityPost::create(
        &state.db,
        CreatePost {
            user_id: auth.user_id,
            title: req.title,
            content: req.content,
            category: req.category.unwrap_or_else(|| "general".to_string()),
            tags: req.tags.unwrap_or_default(),
            is_pinned: req.is_pinned.unwrap_or(false),
            is_urgent: req.is_urgent.unwrap_or(false),
        },
    )
    .await?;

    UserStats::increment(&state.db, auth.user_id, StatCounter::Posts).await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(post))))
}

/// List posts with filter composition
pub async fn list_posts(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<Envelope<Vec<CommunityPost>>>> {
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let filter = PostFilter {
        category: query.category,
        search: query.search,
        sort: query.sort.as_deref().map(PostSort::parse).unwrap_or_default(),
        limit,
        offset,
    };

    let posts = CommunityPost::list(&state.db, &filter).await?;

    Ok(Json(Envelope::new(posts)))
}

/// Post detail
pub async fn get_post(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<CommunityPost>>> {
    let post = CommunityPost::find_by_id(&state.db, post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(Envelope::new(post)))
}

/// Like a post
///
/// Single UPDATE on the counter; see DESIGN notes on the documented
/// lost-update race under concurrent requests.
pub async fn like_post(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(post_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<LikeResponse>>> {
    let likes = CommunityPost::like(&state.db, post_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(Envelope::new(LikeResponse { likes })))
}

/// Comment on a post
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(post_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Comment>>)> {
    req.validate()?;

    // 404 before insert so a missing post never reads as a 500
    if CommunityPost::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            post_id,
            user_id: auth.user_id,
            content: req.content,
        },
    )
    .await?;

    CommunityPost::increment_comment_count(&state.db, post_id).await?;
    UserStats::increment(&state.db, auth.user_id, StatCounter::Comments).await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(comment))))
}

/// List comments on a post in chronological order
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(post_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Envelope<Vec<Comment>>>> {
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let comments = Comment::list_by_post(&state.db, post_id, limit, offset).await?;

    Ok(Json(Envelope::new(comments)))
}
