/// Profile model and database operations
///
/// Each user has exactly one profile row, created inside the registration
/// transaction. Free-form fields (skills, education) and the privacy /
/// contact-preference settings are JSON-blob columns, decoded through
/// `sqlx::types::Json` so they come back as real vectors and structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

/// Privacy settings blob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
    /// Whether the profile is visible to other members
    pub profile_visible: bool,

    /// Whether the email address is shown on the profile
    pub show_email: bool,

    /// Whether the phone number is shown on the profile
    pub show_phone: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visible: true,
            show_email: false,
            show_phone: false,
        }
    }
}

/// Contact preference blob
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPreferences {
    /// Product and account emails
    pub email_updates: bool,

    /// Weekly community digest
    pub community_digest: bool,

    /// Notify when a question receives an answer
    pub answer_notifications: bool,
}

impl Default for ContactPreferences {
    fn default() -> Self {
        Self {
            email_updates: true,
            community_digest: true,
            answer_notifications: true,
        }
    }
}

/// Profile row, 1:1 with a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    /// Owning user ID
    pub user_id: Uuid,

    /// Free-form biography
    pub bio: Option<String>,

    /// Avatar image URL
    pub avatar_url: Option<String>,

    /// Free-form location string
    pub location: Option<String>,

    /// Skill list, stored as a JSON array
    pub skills: Json<Vec<String>>,

    /// Education entries, stored as a JSON array
    pub education: Json<Vec<String>>,

    /// Privacy settings blob
    pub privacy: Json<PrivacySettings>,

    /// Contact preference blob
    pub contact_prefs: Json<ContactPreferences>,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for updating a profile
///
/// All fields are optional; only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    /// New biography
    pub bio: Option<String>,

    /// New avatar URL
    pub avatar_url: Option<String>,

    /// New location
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

impl Profile {
    /// Creates an empty profile for a user
    ///
    /// Accepts any executor so registration can run it inside a transaction.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, skills, education, privacy, contact_prefs,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING user_id, bio, avatar_url, location, skills, education,
                      privacy, contact_prefs, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(Json(Vec::<String>::new()))
        .bind(Json(Vec::<String>::new()))
        .bind(Json(PrivacySettings::default()))
        .bind(Json(ContactPreferences::default()))
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(profile)
    }

    /// Finds the profile belonging to a user
    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, bio, avatar_url, location, skills, education,
                   privacy, contact_prefs, created_at, updated_at
            FROM profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Updates a profile, writing only the fields present in `data`
    ///
    /// Returns the updated profile, or None if the user has no profile row.
    pub async fn update(
        pool: &SqlitePool,
        user_id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause from the present fields; binds follow the
        // same order as the placeholders.
        let mut query = String::from("UPDATE profiles SET updated_at = ?");

        if data.bio.is_some() {
            query.push_str(", bio = ?");
        }
        if data.avatar_url.is_some() {
            query.push_str(", avatar_url = ?");
        }
        if data.location.is_some() {
            query.push_str(", location = ?");
        }
        if data.skills.is_some() {
            query.push_str(", skills = ?");
        }
        if data.education.is_some() {
            query.push_str(", education = ?");
        }
        if data.privacy.is_some() {
            query.push_str(", privacy = ?");
        }
        if data.contact_prefs.is_some() {
            query.push_str(", contact_prefs = ?");
        }

        query.push_str(
            " WHERE user_id = ? RETURNING user_id, bio, avatar_url, location, skills, \
             education, privacy, contact_prefs, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Profile>(&query).bind(Utc::now());

        if let Some(bio) = data.bio {
            q = q.bind(bio);
        }
        if let Some(avatar_url) = data.avatar_url {
            q = q.bind(avatar_url);
        }
        if let Some(location) = data.location {
            q = q.bind(location);
        }
        if let Some(skills) = data.skills {
            q = q.bind(Json(skills));
        }
        if let Some(education) = data.education {
            q = q.bind(Json(education));
        }
        if let Some(privacy) = data.privacy {
            q = q.bind(Json(privacy));
        }
        if let Some(contact_prefs) = data.contact_prefs {
            q = q.bind(Json(contact_prefs));
        }

        let profile = q.bind(user_id).fetch_optional(pool).await?;

        Ok(profile)
    }
}
