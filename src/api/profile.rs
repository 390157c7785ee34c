use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::validation::{parse_id, ValidatedJson};
use crate::db::{Education, Experience, Profile, ProfileFields, ProfileRepository, SocialLinks};
use crate::error::{AppError, FieldError};
use crate::github::validate_username;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Status should contain a value"))]
    pub status: String,
    /// Comma-separated, e.g. `"rust, sql, axum"`.
    #[serde(default)]
    #[validate(custom(function = "has_skill", message = "Skills should contain a value"))]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileRequest {
    fn into_fields(self, user_id: String) -> ProfileFields {
        ProfileFields {
            user_id,
            skills: parse_skills(&self.skills),
            status: self.status,
            company: self.company,
            website: self.website,
            location: self.location,
            bio: self.bio,
            githubusername: self.githubusername,
            // github is kept out of the social links on purpose; it is the
            // top-level `githubusername`.
            social: SocialLinks {
                youtube: self.youtube,
                twitter: self.twitter,
                facebook: self.facebook,
                linkedin: self.linkedin,
                instagram: self.instagram,
            },
        }
    }
}

/// Split a free-text skills list on commas, trimming each entry and keeping
/// the submitted order.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_skill(raw: &str) -> Result<(), ValidationError> {
    if parse_skills(raw).is_empty() {
        return Err(ValidationError::new("no_skills"));
    }
    Ok(())
}

/// Dates arrive from HTML forms, where an untouched date input is `""`.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExperienceRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EducationRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "School is required"))]
    pub school: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Field of study is required"))]
    pub fieldofstudy: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

/// Checked when the entry is built, after the `validator` rules.
fn required_from(from: Option<NaiveDate>) -> Result<NaiveDate, AppError> {
    from.ok_or_else(|| AppError::field("from", "body", "From date is required"))
}

/// GET /api/profile
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, AppError> {
    Ok(Json(ProfileRepository::list_all(&state.db).await?))
}

/// POST /api/profile (requires auth)
pub async fn upsert_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<ProfileRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let fields = req.into_fields(user.id);

    let (profile, created) = ProfileRepository::upsert(&state.db, &fields).await?;

    let status = if created {
        tracing::info!("📝 Created profile {} for user {}", profile.id, fields.user_id);
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(profile)))
}

/// DELETE /api/profile (requires auth)
pub async fn delete_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    ProfileRepository::delete_with_user(&state.db, &user.id).await?;

    tracing::info!("🗑️ Deleted account {}", user.id);

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/profile/me (requires auth)
pub async fn current_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileRepository::get_by_user(&state.db, &user.id)
        .await?
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError {
                msg: "There is no profile for this user".to_string(),
                param: None,
                location: None,
            }])
        })?;

    Ok(Json(profile))
}

/// GET /api/profile/user/:user_id
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let user_id = parse_id("user_id", &user_id)?;

    let profile = ProfileRepository::get_by_user(&state.db, &user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// GET /api/profile/:profile_id
pub async fn profile_by_id(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile_id = parse_id("profile_id", &profile_id)?;

    let profile = ProfileRepository::get_by_id(&state.db, &profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

/// POST /api/profile/experience (requires auth)
pub async fn add_experience(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<ExperienceRequest>,
) -> Result<Json<Profile>, AppError> {
    let experience = Experience {
        id: Uuid::new_v4().to_string(),
        from: required_from(req.from)?,
        title: req.title,
        company: req.company,
        location: req.location,
        to: req.to,
        current: req.current,
        description: req.description,
    };

    let profile = ProfileRepository::modify(&state.db, &user.id, |profile| {
        profile.add_experience(experience);
        Ok(())
    })
    .await?;

    Ok(Json(profile))
}

/// DELETE /api/profile/experience/:experience_id (requires auth)
pub async fn remove_experience(
    State(state): State<AppState>,
    user: AuthUser,
    Path(experience_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let experience_id = parse_id("experience_id", &experience_id)?;

    let profile = ProfileRepository::modify(&state.db, &user.id, |profile| {
        profile.remove_experience(&experience_id);
        Ok(())
    })
    .await?;

    Ok(Json(profile))
}

/// POST /api/profile/education (requires auth)
pub async fn add_education(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<EducationRequest>,
) -> Result<Json<Profile>, AppError> {
    let education = Education {
        id: Uuid::new_v4().to_string(),
        from: required_from(req.from)?,
        school: req.school,
        degree: req.degree,
        fieldofstudy: req.fieldofstudy,
        to: req.to,
        current: req.current,
        description: req.description,
    };

    let profile = ProfileRepository::modify(&state.db, &user.id, |profile| {
        profile.add_education(education);
        Ok(())
    })
    .await?;

    Ok(Json(profile))
}

/// DELETE /api/profile/education/:education_id (requires auth)
pub async fn remove_education(
    State(state): State<AppState>,
    user: AuthUser,
    Path(education_id): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let education_id = parse_id("education_id", &education_id)?;

    let profile = ProfileRepository::modify(&state.db, &user.id, |profile| {
        profile.remove_education(&education_id);
        Ok(())
    })
    .await?;

    Ok(Json(profile))
}

/// GET /api/profile/github/:username
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let username = validate_username(&username)?;

    Ok(Json(state.github.recent_repos(username).await?))
}
