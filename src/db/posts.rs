use sqlx::{types::Json, Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::Post;
use crate::error::AppError;

pub struct PostRepository;

impl PostRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: &str,
        name: &str,
        avatar: &str,
        text: &str,
    ) -> Result<Post, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp_millis();

        let post = sqlx::query_as::<_, Post>(
            r#"
INSERT INTO posts (id, user_id, name, avatar, text, created_at)
VALUES (?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(avatar)
        .bind(text)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Newest first; posts created in the same millisecond keep insertion order.
    pub async fn list_all(pool: &Pool<Sqlite>) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts ORDER BY created_at DESC, rowid DESC"
        )
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Apply `mutate` to the post and persist its likes and comments in one
    /// transaction. The revision bump runs before the read, so the write lock
    /// is held while `mutate` checks the current state (such as "not liked
    /// yet") and concurrent writers on the same post queue behind it.
    pub async fn modify<F>(
        pool: &Pool<Sqlite>,
        id: &str,
        mutate: F,
    ) -> Result<Post, AppError>
    where
        F: FnOnce(&mut Post) -> Result<(), AppError>,
    {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query("UPDATE posts SET version = version + 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if locked.rows_affected() == 0 {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        let mut post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        // An error here drops the transaction, which rolls the bump back
        mutate(&mut post)?;

        sqlx::query("UPDATE posts SET likes = ?, comments = ? WHERE id = ?")
            .bind(Json(&post.likes))
            .bind(Json(&post.comments))
            .bind(&post.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Post {} updated to revision {}", post.id, post.version);

        Ok(post)
    }
}
