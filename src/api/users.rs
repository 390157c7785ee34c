use axum::{extract::State, Json};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::api::auth::{normalize_email, TokenResponse};
use crate::api::state::AppState;
use crate::api::validation::ValidatedJson;
use crate::crypto::{gravatar_url, hash_password};
use crate::db::UserRepository;
use crate::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email adres"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, max = 20, message = "Must be 6-20 characters"))]
    #[validate(custom(function = "contains_digit", message = "Should contain a number"))]
    pub password: String,
}

fn contains_digit(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("missing_digit"));
    }
    Ok(())
}

/// POST /api/user
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = normalize_email(&req.email);

    if UserRepository::get_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::field("email", "body", "E-mail adres is already in use"));
    }

    let password_hash = hash_password(&req.password)?;
    let avatar = gravatar_url(&email);

    let user = UserRepository::create(
        &state.db,
        req.name.trim(),
        &email,
        &password_hash,
        &avatar,
    ).await?;

    tracing::info!("👤 Registered user {}", user.id);

    Ok(Json(TokenResponse {
        token: state.keys.issue(&user.id)?,
    }))
}
