/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new account
/// - `POST /v1/auth/login` - Login with email or username
/// - `GET  /v1/auth/me` - Current user (bearer token required)
///
/// Registration is the one multi-statement unit of work in the system: the
/// user, profile, and stats rows are inserted in a single transaction, so a
/// failure in any insert leaves no partial account behind.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope, FieldError},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use townsquare_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{
        profile::Profile,
        stats::UserStats,
        user::{CreateUser, User},
    },
};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Username (3-30 characters: letters, digits, underscore)
    #[validate(custom(function = validate_username))]
    pub username: String,

    /// Password (strength checked separately)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Given name
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, max = 100, message = "Surname is required"))]
    pub surname: String,

    /// Nigerian mobile number, e.g. 08012345678
    #[validate(custom(function = validate_phone))]
    pub phone: String,

    /// Terms of service acceptance
    pub agree_terms: bool,
}

/// Login request
///
/// The identifier field accepts either the email address or the username.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or username
    #[validate(length(min = 1, message = "Identifier is required"))]
    pub identifier: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Denormalized user view returned by register, login, and /me
#[derive(Debug, Serialize)]
pub struct UserView {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Username
    pub username: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub surname: String,

    /// Phone number
    pub phone: String,

    /// Verification flag
    pub is_verified: bool,

    /// Online flag
    pub is_online: bool,

    /// Account creation time
    pub created_at: DateTime<Utc>,

    /// Profile row
    pub profile: Profile,

    /// Activity counters
    pub stats: UserStats,
}

impl UserView {
    /// Assembles the view from its three rows
    fn assemble(user: User, profile: Profile, stats: UserStats) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            surname: user.surname,
            phone: user.phone,
            is_verified: user.is_verified,
            is_online: user.is_online,
            created_at: user.created_at,
            profile,
            stats,
        }
    }
}

/// Auth response carrying a token and the user view
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token
    pub token: String,

    /// Denormalized user view
    pub user: UserView,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]{3,30}$").expect("username pattern is valid")
    });

    if re.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message =
            Some("Username must be 3-30 characters: letters, digits, underscore".into());
        Err(err)
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        // Nigerian mobile numbers: 070x, 080x, 081x, 090x, 091x + 7 digits
        Regex::new(r"^0[789][01][0-9]{8}$").expect("phone pattern is valid")
    });

    if re.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Invalid phone number format".into());
        Err(err)
    }
}

/// Loads the profile and stats rows and assembles the denormalized view
async fn load_user_view(state: &AppState, user: User) -> ApiResult<UserView> {
    let profile = Profile::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("User {} has no profile row", user.id)))?;

    let stats = UserStats::find_by_user(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("User {} has no stats row", user.id)))?;

    Ok(UserView::assemble(user, profile, stats))
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "a@b.com",
///   "username": "abc123",
///   "password": "Abc12345!",
///   "firstName": "A",
///   "surname": "B",
///   "phone": "08012345678",
///   "agreeTerms": true
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or the email/username is taken
/// - `500 Internal Server Error`: unexpected database failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<AuthResponse>>)> {
    req.validate()?;

    if !req.agree_terms {
        return Err(ApiError::Validation(vec![FieldError {
            field: "agree_terms".to_string(),
            message: "You must accept the terms of service".to_string(),
        }]));
    }

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::Validation(vec![FieldError {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    // Pre-check uniqueness for field-specific messages; the unique indexes
    // still back this up under concurrent registration.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already taken".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // Insert user + profile + stats atomically; dropping the transaction on
    // any error path rolls everything back.
    let mut tx = state.db.begin().await?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            email: req.email,
            username: req.username,
            password_hash,
            first_name: req.first_name,
            surname: req.surname,
            phone: req.phone,
            is_verified: true,
        },
    )
    .await?;

    let profile = Profile::create(&mut *tx, user.id).await?;
    let stats = UserStats::create(&mut *tx, user.id).await?;

    tx.commit().await?;

    tracing::info!(user_id = %user.id, "New account registered");

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(AuthResponse {
            token,
            user: UserView::assemble(user, profile, stats),
        })),
    ))
}

/// Login with email or username
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// { "identifier": "a@b.com", "password": "Abc12345!" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown identifier or wrong password
/// - `403 Forbidden`: account not verified (regardless of password)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Envelope<AuthResponse>>> {
    req.validate()?;

    let user = User::find_by_login(&state.db, &req.identifier)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_verified {
        return Err(ApiError::Forbidden("Account is not verified".to_string()));
    }

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    User::set_online(&state.db, user.id, true).await?;

    // Re-read so the view reflects the flipped online flag
    let user = User::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    let user = load_user_view(&state, user).await?;

    Ok(Json(Envelope::new(AuthResponse { token, user })))
}

/// Current user
///
/// # Endpoint
///
/// ```text
/// GET /v1/auth/me
/// Authorization: Bearer <jwt>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token
/// - `404 Not Found`: the account no longer exists
pub async fn me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Envelope<UserView>>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let view = load_user_view(&state, user).await?;

    Ok(Json(Envelope::new(view)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("abc123").is_ok());
        assert!(validate_username("a_b_c").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("way-too-long-username-over-thirty-chars").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("08012345678").is_ok());
        assert!(validate_phone("07012345678").is_ok());
        assert!(validate_phone("09112345678").is_ok());
        assert!(validate_phone("0601234567").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+2348012345678").is_err());
    }

    #[test]
    fn test_register_request_accepts_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{
                "email": "a@b.com",
                "username": "abc123",
                "password": "Abc12345!",
                "firstName": "A",
                "surname": "B",
                "phone": "08012345678",
                "agreeTerms": true
            }"#,
        )
        .expect("should deserialize");

        assert_eq!(req.first_name, "A");
        assert!(req.agree_terms);
        assert!(req.validate().is_ok());
    }
}
