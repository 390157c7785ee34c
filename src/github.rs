use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;

/// Thin adapter over the GitHub REST API used for the repository showcase on
/// profiles.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GithubClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("devconnector/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.github_api_url.trim_end_matches('/').to_string(),
            client_id: config.github_client_id.clone(),
            client_secret: config.github_client_secret.clone(),
        })
    }

    /// The user's five most recently created repositories, passed through as
    /// GitHub returned them.
    pub async fn recent_repos(&self, username: &str) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/users/{}/repos", self.base_url, username);

        let mut request = self
            .http
            .get(&url)
            .query(&[("per_page", "5"), ("sort", "created"), ("direction", "desc")]);

        if let Some(client_id) = &self.client_id {
            request = request.basic_auth(client_id, self.client_secret.as_ref());
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            tracing::warn!("GitHub answered {} for user {}", response.status(), username);
            return Err(AppError::Upstream("No Github profile found".to_string()));
        }

        Ok(response.json().await?)
    }
}

/// GitHub logins: 1-39 characters, alphanumeric or single hyphens, not
/// starting or ending with a hyphen.
pub fn validate_username(username: &str) -> Result<&str, AppError> {
    let trimmed = username.trim();

    let well_formed = !trimmed.is_empty()
        && trimmed.len() <= 39
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !trimmed.starts_with('-')
        && !trimmed.ends_with('-')
        && !trimmed.contains("--");

    if !well_formed {
        return Err(AppError::field("username", "params", "Invalid Github username"));
    }

    Ok(trimmed)
}
