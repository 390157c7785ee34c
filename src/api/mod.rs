pub mod auth;
pub mod middleware;
pub mod post;
pub mod profile;
pub mod state;
pub mod users;
pub mod validation;

pub use middleware::AuthUser;
pub use state::AppState;

use axum::{
    Router,
    routing::{delete, get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    timeout::TimeoutLayer,
};
use std::time::Duration;
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    // Every method on these paths requires a token
    let protected = Router::new()
        .route("/api/profile/me", get(profile::current_profile))
        .route("/api/profile/experience", post(profile::add_experience))
        .route("/api/profile/experience/:experience_id", delete(profile::remove_experience))
        .route("/api/profile/education", post(profile::add_education))
        .route("/api/profile/education/:education_id", delete(profile::remove_education))
        .route("/api/post/like/:post_id", post(post::like_post).delete(post::unlike_post))
        .route("/api/post/comment/:post_id", post(post::add_comment))
        .route("/api/post/comment/:post_id/:comment_id", delete(post::delete_comment))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        // Health check
        .route("/api/health", get(health))

        // Identity; handlers taking AuthUser authenticate themselves
        .route("/api/user", post(users::register))
        .route("/api/auth", get(auth::me).post(auth::login))

        // Profiles
        .route(
            "/api/profile",
            get(profile::list_profiles)
                .post(profile::upsert_profile)
                .delete(profile::delete_profile),
        )
        .route("/api/profile/user/:user_id", get(profile::profile_by_user))
        .route("/api/profile/github/:username", get(profile::github_repos))
        .route("/api/profile/:profile_id", get(profile::profile_by_id))

        // Posts
        .route("/api/post", get(post::list_posts).post(post::create_post))
        .route("/api/post/:post_id", get(post::get_post).delete(post::delete_post))

        .merge(protected)
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
