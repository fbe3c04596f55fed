/// Profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/profile` - Own profile
/// - `PUT /v1/profile` - Partial update of own profile
/// - `GET /v1/profile/:id` - Another member's profile
///
/// All routes require the bearer token. The privacy blob is returned as
/// stored; enforcing it is a front-end concern in this system.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, Envelope},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use townsquare_shared::{
    auth::middleware::AuthContext,
    models::profile::{ContactPreferences, PrivacySettings, Profile, UpdateProfile},
};
use uuid::Uuid;
use validator::Validate;

/// Profile update request
///
/// All fields optional; only present fields are written.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New biography
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,

    /// New avatar URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    /// New location
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    /// Replacement skill list
    pub skills: Option<Vec<String>>,

    /// Replacement education list
    pub education: Option<Vec<String>>,

    /// Replacement privacy settings
    pub privacy: Option<PrivacySettings>,

    /// Replacement contact preferences
    pub contact_prefs: Option<ContactPreferences>,
}

/// Own profile
pub async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Envelope<Profile>>> {
    let profile = Profile::find_by_user(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(Envelope::new(profile)))
}

/// Partial update of own profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Envelope<Profile>>> {
    req.validate()?;

    let update = UpdateProfile {
        bio: req.bio,
        avatar_url: req.avatar_url,
        location: req.location,
        skills: req.skills,
        education: req.education,
        privacy: req.privacy,
        contact_prefs: req.contact_prefs,
    };

    let profile = Profile::update(&state.db, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(Envelope::new(profile)))
}

/// Another member's profile
pub async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Profile>>> {
    let profile = Profile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(Envelope::new(profile)))
}
