/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use townsquare_api::{app::AppState, config::Config};
/// use townsquare_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = townsquare_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use townsquare_shared::auth::{jwt, middleware::AuthContext};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        // 500 responses carry the underlying detail only outside production
        crate::error::expose_internal_detail(!config.api.production);

        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register               # Public
///     │   ├── POST /login                  # Public
///     │   └── GET  /me                     # Bearer token
///     ├── /profile/                        # Bearer token
///     │   ├── GET  /
///     │   ├── PUT  /
///     │   └── GET  /:id
///     ├── /community/                      # Bearer token
///     │   ├── POST /posts
///     │   ├── GET  /posts
///     │   ├── GET  /posts/:id
///     │   ├── POST /posts/:id/like
///     │   ├── POST /posts/:id/comments
///     │   └── GET  /posts/:id/comments
///     └── /qa/                             # Bearer token
///         ├── POST /questions
///         ├── GET  /questions
///         ├── GET  /questions/:id
///         ├── POST /questions/:id/resolve
///         ├── POST /questions/:id/answers
///         ├── GET  /questions/:id/answers
///         └── POST /answers/:id/helpful
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes: register/login are public, /me requires the bearer token
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    jwt_auth_layer,
                )),
        );

    // Profile routes (require bearer token)
    let profile_routes = Router::new()
        .route("/", get(routes::profile::get_own_profile))
        .route("/", put(routes::profile::update_profile))
        .route("/:id", get(routes::profile::get_profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Community routes (require bearer token)
    let community_routes = Router::new()
        .route("/posts", post(routes::community::create_post))
        .route("/posts", get(routes::community::list_posts))
        .route("/posts/:id", get(routes::community::get_post))
        .route("/posts/:id/like", post(routes::community::like_post))
        .route("/posts/:id/comments", post(routes::community::create_comment))
        .route("/posts/:id/comments", get(routes::community::list_comments))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Q&A routes (require bearer token)
    let qa_routes = Router::new()
        .route("/questions", post(routes::qa::create_question))
        .route("/questions", get(routes::qa::list_questions))
        .route("/questions/:id", get(routes::qa::get_question))
        .route("/questions/:id/resolve", post(routes::qa::resolve_question))
        .route("/questions/:id/answers", post(routes::qa::create_answer))
        .route("/questions/:id/answers", get(routes::qa::list_answers))
        .route("/answers/:id/helpful", post(routes::qa::mark_answer_helpful))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/profile", profile_routes)
        .nest("/community", community_routes)
        .nest("/qa", qa_routes);

    // Configure CORS based on environment: a wildcard origin gets permissive
    // CORS in development; production always uses the strict origin list
    let is_wildcard = state.config.api.cors_origins.contains(&"*".to_string());
    let cors = if !state.config.api.production && is_wildcard {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter(|origin| origin.as_str() != "*")
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects an [`AuthContext`] into the request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::Unauthorized("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut()
        .insert(AuthContext::from_claims(claims.sub));

    Ok(next.run(req).await)
}
