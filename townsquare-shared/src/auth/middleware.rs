/// Authentication context for request handlers
///
/// The API server's auth layer validates the bearer token and inserts an
/// [`AuthContext`] into the request extensions. Handlers extract it directly
/// as an argument:
///
/// ```no_run
/// use townsquare_shared::auth::middleware::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authentication context added to request extensions after token validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (the token's subject)
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from a validated token subject
    pub fn from_claims(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Rejection returned when a handler requires auth but the auth layer
/// did not run (route wired without the middleware)
#[derive(Debug)]
pub struct MissingAuthContext;

impl IntoResponse for MissingAuthContext {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = MissingAuthContext;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(MissingAuthContext)
    }
}
