use sqlx::{types::Json, Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::{Profile, SocialLinks};
use crate::error::AppError;

const SELECT_PROFILE: &str = r#"
SELECT p.*, u.name AS user_name, u.avatar AS user_avatar
FROM profiles p
LEFT JOIN users u ON u.id = p.user_id
"#;

/// Top-level profile fields submitted by the owner. `None` means the field
/// was not supplied and any stored value is kept.
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub user_id: String,
    pub status: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: SocialLinks,
}

pub struct ProfileRepository;

impl ProfileRepository {
    /// Create-or-replace keyed on the owning user, in a single statement.
    ///
    /// Returns the profile and whether it was newly created. An existing
    /// profile keeps its id, experience and education.
    pub async fn upsert(
        pool: &Pool<Sqlite>,
        fields: &ProfileFields,
    ) -> Result<(Profile, bool), AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp_millis();

        let stored_id: String = sqlx::query_scalar(
            r#"
INSERT INTO profiles (id, user_id, status, company, website, location, bio, githubusername, skills, social, created_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(user_id) DO UPDATE SET
    status = excluded.status,
    company = COALESCE(excluded.company, profiles.company),
    website = COALESCE(excluded.website, profiles.website),
    location = COALESCE(excluded.location, profiles.location),
    bio = COALESCE(excluded.bio, profiles.bio),
    githubusername = COALESCE(excluded.githubusername, profiles.githubusername),
    skills = excluded.skills,
    social = excluded.social,
    version = profiles.version + 1
RETURNING id
            "#,
        )
        .bind(&id)
        .bind(&fields.user_id)
        .bind(&fields.status)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.bio)
        .bind(&fields.githubusername)
        .bind(Json(&fields.skills))
        .bind(Json(&fields.social))
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        let profile = Self::get_by_id(pool, &stored_id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch upserted profile".to_string()))?;

        Ok((profile, stored_id == id))
    }

    pub async fn list_all(pool: &Pool<Sqlite>) -> Result<Vec<Profile>, AppError> {
        let profiles = sqlx::query_as::<_, Profile>(&format!(
            "{SELECT_PROFILE} ORDER BY p.created_at ASC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(profiles)
    }

    pub async fn get_by_user(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!("{SELECT_PROFILE} WHERE p.user_id = ?"))
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(profile)
    }

    pub async fn get_by_id(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>(&format!("{SELECT_PROFILE} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(profile)
    }

    /// Apply `mutate` to the user's profile and write the owned sequences back
    /// in one transaction, holding the write lock from before the read.
    pub async fn modify<F>(
        pool: &Pool<Sqlite>,
        user_id: &str,
        mutate: F,
    ) -> Result<Profile, AppError>
    where
        F: FnOnce(&mut Profile) -> Result<(), AppError>,
    {
        let mut tx = pool.begin().await?;

        let locked = sqlx::query("UPDATE profiles SET version = version + 1 WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if locked.rows_affected() == 0 {
            return Err(AppError::NotFound("There is no profile for this user".to_string()));
        }

        let mut profile = sqlx::query_as::<_, Profile>(&format!("{SELECT_PROFILE} WHERE p.user_id = ?"))
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        mutate(&mut profile)?;

        sqlx::query("UPDATE profiles SET experience = ?, education = ? WHERE id = ?")
            .bind(Json(&profile.experience))
            .bind(Json(&profile.education))
            .bind(&profile.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }

    /// Remove the user's profile and the user record together. Posts written
    /// by the user are left in place.
    pub async fn delete_with_user(pool: &Pool<Sqlite>, user_id: &str) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
