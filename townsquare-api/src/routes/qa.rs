/// Q&A endpoints: questions, answers, resolve and helpful flags
///
/// # Endpoints
///
/// - `POST /v1/qa/questions` - Ask a question
/// - `GET  /v1/qa/questions` - List questions (category/search/resolved/sort)
/// - `GET  /v1/qa/questions/:id` - Question detail (bumps the view count)
/// - `POST /v1/qa/questions/:id/resolve` - Mark own question resolved
/// - `POST /v1/qa/questions/:id/answers` - Answer a question
/// - `GET  /v1/qa/questions/:id/answers` - List answers
/// - `POST /v1/qa/answers/:id/helpful` - Flag an answer as helpful
///
/// Resolve and helpful are owner actions: only the author of the question
/// may use them, and helpful sticks once set.

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
use serde::Deserialize;
use townsquare_shared::{
    auth::middleware::AuthContext,
    models::{
        answer::{Answer, CreateAnswer},
        question::{CreateQuestion, Question, QuestionFilter, QuestionSort},
        stats::{StatCounter, UserStats},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Ask request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    /// Question title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Question body
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,

    /// Category slug (defaults to "general")
    pub category: Option<String>,
}

/// Answer request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    /// Answer body
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuestionsQuery {
    /// Restrict to one category
    pub category: Option<String>,

    /// Substring match over title and content
    pub search: Option<String>,

    /// Filter on the resolved flag
    pub resolved: Option<bool>,

    /// Sort order: recent (default), views, answers
    pub sort: Option<String>,

    /// Page size
    pub limit: Option<i64>,

    /// Page offset
    pub offset: Option<i64>,
}

/// Ask a question
pub async fn create_question(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateQuestionRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Question>>)> {
    req.validate()?;

    let question = Question::create(
        &state.db,
        CreateQuestion {
            user_id: auth.user_id,
            title: req.title,
            content: req.content,
            category: req.category.unwrap_or_else(|| "general".to_string()),
        },
    )
    .await?;

    UserStats::increment(&state.db, auth.user_id, StatCounter::Questions).await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(question))))
}

/// List questions with filter composition
pub async fn list_questions(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListQuestionsQuery>,
) -> ApiResult<Json<Envelope<Vec<Question>>>> {
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let filter = QuestionFilter {
        category: query.category,
        search: query.search,
        resolved: query.resolved,
        sort: query
            .sort
            .as_deref()
            .map(QuestionSort::parse)
            .unwrap_or_default(),
        limit,
        offset,
    };

    let questions = Question::list(&state.db, &filter).await?;

    Ok(Json(Envelope::new(questions)))
}

/// Question detail
///
/// Every fetch counts as a view, including repeat fetches by the author.
pub async fn get_question(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(question_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Question>>> {
    let question = Question::find_and_view(&state.db, question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(Envelope::new(question)))
}

/// Mark own question resolved
///
/// Idempotent: resolving an already-resolved question succeeds and leaves
/// it resolved.
pub async fn resolve_question(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(question_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Question>>> {
    let question = Question::find_by_id(&state.db, question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if question.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the question author can resolve it".to_string(),
        ));
    }

    Question::resolve(&state.db, question_id).await?;

    let question = Question::find_by_id(&state.db, question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(Envelope::new(question)))
}

/// Answer a question
pub async fn create_answer(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(question_id): Path<Uuid>,
    Json(req): Json<CreateAnswerRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Answer>>)> {
    req.validate()?;

    if Question::find_by_id(&state.db, question_id).await?.is_none() {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    let answer = Answer::create(
        &state.db,
        CreateAnswer {
            question_id,
            user_id: auth.user_id,
            content: req.content,
        },
    )
    .await?;

    Question::increment_answer_count(&state.db, question_id).await?;
    UserStats::increment(&state.db, auth.user_id, StatCounter::Answers).await?;

    Ok((StatusCode::CREATED, Json(Envelope::new(answer))))
}

/// List answers to a question in chronological order
pub async fn list_answers(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(question_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Envelope<Vec<Answer>>>> {
    let (limit, offset) = clamp_page(query.limit, query.offset);

    let answers = Answer::list_by_question(&state.db, question_id, limit, offset).await?;

    Ok(Json(Envelope::new(answers)))
}

/// Flag an answer as helpful
///
/// Only the author of the question the answer belongs to may flag it, and
/// the flag can only be set once.
pub async fn mark_answer_helpful(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(answer_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Answer>>> {
    let answer = Answer::find_by_id(&state.db, answer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

    let question = Question::find_by_id(&state.db, answer.question_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    if question.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the question author can mark an answer helpful".to_string(),
        ));
    }

    let flipped = Answer::mark_helpful(&state.db, answer_id).await?;
    if !flipped {
        return Err(ApiError::BadRequest(
            "Answer is already marked helpful".to_string(),
        ));
    }

    let answer = Answer::find_by_id(&state.db, answer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Answer not found".to_string()))?;

    Ok(Json(Envelope::new(answer)))
}
