use chrono::NaiveDate;
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::api::auth::TokenResponse;
use crate::client::state::ApiFailure;
use crate::db::{Comment, Like, Post, Profile, User};
use crate::error::FieldError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {msg}")]
    Api {
        status: u16,
        msg: String,
        errors: Vec<FieldError>,
    },
}

impl ClientError {
    /// The payload carried by `*Error` actions.
    pub fn failure(&self) -> ApiFailure {
        match self {
            ClientError::Http(err) => ApiFailure {
                msg: err.to_string(),
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                errors: Vec::new(),
            },
            ClientError::Api { status, msg, errors } => ApiFailure {
                msg: msg.clone(),
                status: *status,
                errors: errors.clone(),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileForm {
    pub status: String,
    /// Comma-separated skills.
    pub skills: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceForm {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EducationForm {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Typed client for the REST API. Holds the bearer token once logged in.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn error_from(response: Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

        let msg = body
            .msg
            .or_else(|| body.errors.first().map(|e| e.msg.clone()))
            .or_else(|| (!text.is_empty() && !text.starts_with('{')).then(|| text.clone()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());

        ClientError::Api {
            status: status.as_u16(),
            msg,
            errors: body.errors,
        }
    }

    // Identity

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String, ClientError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let response: TokenResponse = self.send(self.request(Method::POST, "/api/user").json(&body)).await?;
        Ok(response.token)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let body = json!({ "email": email, "password": password });
        let response: TokenResponse = self.send(self.request(Method::POST, "/api/auth").json(&body)).await?;
        Ok(response.token)
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/api/auth")).await
    }

    // Posts

    pub async fn posts(&self) -> Result<Vec<Post>, ClientError> {
        self.send(self.request(Method::GET, "/api/post")).await
    }

    pub async fn post(&self, post_id: &str) -> Result<Post, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/post/{}", post_id))).await
    }

    pub async fn create_post(&self, text: &str) -> Result<Post, ClientError> {
        self.send(self.request(Method::POST, "/api/post").json(&json!({ "text": text }))).await
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/post/{}", post_id))).await
    }

    pub async fn like(&self, post_id: &str) -> Result<Vec<Like>, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/post/like/{}", post_id))).await
    }

    pub async fn unlike(&self, post_id: &str) -> Result<Vec<Like>, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/post/like/{}", post_id))).await
    }

    pub async fn add_comment(&self, post_id: &str, text: &str) -> Result<Vec<Comment>, ClientError> {
        let builder = self
            .request(Method::POST, &format!("/api/post/comment/{}", post_id))
            .json(&json!({ "text": text }));
        self.send(builder).await
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<Vec<Comment>, ClientError> {
        let path = format!("/api/post/comment/{}/{}", post_id, comment_id);
        self.send(self.request(Method::DELETE, &path)).await
    }

    // Profiles

    pub async fn current_profile(&self) -> Result<Profile, ClientError> {
        self.send(self.request(Method::GET, "/api/profile/me")).await
    }

    pub async fn profiles(&self) -> Result<Vec<Profile>, ClientError> {
        self.send(self.request(Method::GET, "/api/profile")).await
    }

    pub async fn profile_by_user(&self, user_id: &str) -> Result<Profile, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/profile/user/{}", user_id))).await
    }

    pub async fn github_repos(&self, username: &str) -> Result<Vec<serde_json::Value>, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/profile/github/{}", username))).await
    }

    pub async fn save_profile(&self, form: &ProfileForm) -> Result<Profile, ClientError> {
        self.send(self.request(Method::POST, "/api/profile").json(form)).await
    }

    pub async fn delete_account(&self) -> Result<(), ClientError> {
        self.send_empty(self.request(Method::DELETE, "/api/profile")).await
    }

    pub async fn add_experience(&self, form: &ExperienceForm) -> Result<Profile, ClientError> {
        self.send(self.request(Method::POST, "/api/profile/experience").json(form)).await
    }

    pub async fn delete_experience(&self, experience_id: &str) -> Result<Profile, ClientError> {
        let path = format!("/api/profile/experience/{}", experience_id);
        self.send(self.request(Method::DELETE, &path)).await
    }

    pub async fn add_education(&self, form: &EducationForm) -> Result<Profile, ClientError> {
        self.send(self.request(Method::POST, "/api/profile/education").json(form)).await
    }

    pub async fn delete_education(&self, education_id: &str) -> Result<Profile, ClientError> {
        let path = format!("/api/profile/education/{}", education_id);
        self.send(self.request(Method::DELETE, &path)).await
    }
}
