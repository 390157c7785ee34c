use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AuthUser;
use crate::api::state::AppState;
use crate::api::validation::{parse_id, ValidatedJson};
use crate::db::{Comment, Like, Post, PostRepository, User, UserRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize, Validate)]
pub struct TextRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,
}

async fn load_author(state: &AppState, user_id: &str) -> Result<User, AppError> {
    UserRepository::get_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// POST /api/post (requires auth)
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<TextRequest>,
) -> Result<Json<Post>, AppError> {
    let author = load_author(&state, &user.id).await?;

    let post = PostRepository::create(
        &state.db,
        &author.id,
        &author.name,
        &author.avatar,
        &req.text,
    ).await?;

    tracing::debug!("Post {} created by {}", post.id, author.id);

    Ok(Json(post))
}

/// GET /api/post
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(PostRepository::list_all(&state.db).await?))
}

/// GET /api/post/:post_id
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let post_id = parse_id("post_id", &post_id)?;

    let post = PostRepository::get_by_id(&state.db, &post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// DELETE /api/post/:post_id (requires auth)
pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let post_id = parse_id("post_id", &post_id)?;

    let post = PostRepository::get_by_id(&state.db, &post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if !post.is_authored_by(&user.id) {
        tracing::warn!("User {} tried to delete post {} they do not own", user.id, post.id);
        return Err(AppError::Forbidden("User not authorized".to_string()));
    }

    PostRepository::delete(&state.db, &post.id).await?;

    Ok(Json(serde_json::json!({ "msg": "Post deleted" })))
}

/// POST /api/post/like/:post_id (requires auth)
pub async fn like_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Like>>, AppError> {
    let post_id = parse_id("post_id", &post_id)?;

    let post = PostRepository::modify(&state.db, &post_id, |post| post.add_like(&user.id)).await?;

    Ok(Json(post.likes))
}

/// DELETE /api/post/like/:post_id (requires auth)
pub async fn unlike_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Like>>, AppError> {
    let post_id = parse_id("post_id", &post_id)?;

    let post = PostRepository::modify(&state.db, &post_id, |post| {
        post.remove_like(&user.id);
        Ok(())
    })
    .await?;

    Ok(Json(post.likes))
}

/// POST /api/post/comment/:post_id (requires auth)
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<String>,
    ValidatedJson(req): ValidatedJson<TextRequest>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let post_id = parse_id("post_id", &post_id)?;

    // Looked up on every comment, unlike the snapshot taken for posts
    let author = load_author(&state, &user.id).await?;

    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        user: author.id,
        name: author.name,
        avatar: author.avatar,
        text: req.text,
        date: chrono::Utc::now().timestamp_millis(),
    };

    let post = PostRepository::modify(&state.db, &post_id, |post| {
        post.add_comment(comment);
        Ok(())
    })
    .await?;

    Ok(Json(post.comments))
}

/// DELETE /api/post/comment/:post_id/:comment_id (requires auth)
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let post_id = parse_id("post_id", &post_id)?;
    let comment_id = parse_id("comment_id", &comment_id)?;

    let post = PostRepository::modify(&state.db, &post_id, |post| {
        post.remove_comment(&comment_id, &user.id).map(|_| ())
    })
    .await?;

    Ok(Json(post.comments))
}
