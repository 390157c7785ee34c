use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, types::Json, FromRow, Row};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: String,
    #[serde(rename = "date")]
    pub created_at: i64,
}

/// Owner reference on a profile, populated with the user's name and avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: NaiveDate,
    /// `None` means "present".
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Profile aggregate: the root exclusively owns its experience and education
/// entries, which are only changed through the methods below and persisted
/// together with the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: UserSummary,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub githubusername: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(rename = "date")]
    pub created_at: i64,
    #[serde(skip)]
    pub version: i64,
}

impl Profile {
    /// Newest entries go first.
    pub fn add_experience(&mut self, experience: Experience) {
        self.experience.insert(0, experience);
    }

    /// Drops the entry with `id`. An unknown id leaves the profile unchanged.
    pub fn remove_experience(&mut self, id: &str) {
        self.experience.retain(|e| e.id != id);
    }

    pub fn add_education(&mut self, education: Education) {
        self.education.insert(0, education);
    }

    pub fn remove_education(&mut self, id: &str) {
        self.education.retain(|e| e.id != id);
    }
}

impl<'r> FromRow<'r, SqliteRow> for Profile {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Json(skills) = row.try_get::<Json<Vec<String>>, _>("skills")?;
        let Json(social) = row.try_get::<Json<SocialLinks>, _>("social")?;
        let Json(experience) = row.try_get::<Json<Vec<Experience>>, _>("experience")?;
        let Json(education) = row.try_get::<Json<Vec<Education>>, _>("education")?;

        Ok(Profile {
            id: row.try_get("id")?,
            user: UserSummary {
                id: row.try_get("user_id")?,
                name: row.try_get("user_name")?,
                avatar: row.try_get("user_avatar")?,
            },
            status: row.try_get("status")?,
            company: row.try_get("company")?,
            website: row.try_get("website")?,
            location: row.try_get("location")?,
            bio: row.try_get("bio")?,
            githubusername: row.try_get("githubusername")?,
            skills,
            social,
            experience,
            education,
            created_at: row.try_get("created_at")?,
            version: row.try_get("version")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub name: String,
    pub avatar: String,
    pub text: String,
    pub date: i64,
}

/// Post aggregate owning its likes and comments.
///
/// `name` and `avatar` are a snapshot of the author taken when the post was
/// created; they are not refreshed when the user changes. Comments instead
/// carry the commenter's details as they were at comment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: String,
    pub name: String,
    pub avatar: String,
    pub text: String,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "date")]
    pub created_at: i64,
    #[serde(skip)]
    pub version: i64,
}

impl Post {
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.user == user_id
    }

    pub fn has_liked(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user == user_id)
    }

    /// At most one like per user.
    pub fn add_like(&mut self, user_id: &str) -> Result<(), AppError> {
        if self.has_liked(user_id) {
            return Err(AppError::Conflict("Post already liked".to_string()));
        }
        self.likes.push(Like {
            user: user_id.to_string(),
        });
        Ok(())
    }

    /// Idempotent: unliking a post the user never liked is not an error.
    pub fn remove_like(&mut self, user_id: &str) {
        self.likes.retain(|like| like.user != user_id);
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub fn remove_comment(&mut self, comment_id: &str, caller_id: &str) -> Result<Comment, AppError> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if self.comments[index].user != caller_id {
            return Err(AppError::Forbidden("User not authorized".to_string()));
        }

        Ok(self.comments.remove(index))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Post {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Json(likes) = row.try_get::<Json<Vec<Like>>, _>("likes")?;
        let Json(comments) = row.try_get::<Json<Vec<Comment>>, _>("comments")?;

        Ok(Post {
            id: row.try_get("id")?,
            user: row.try_get("user_id")?,
            name: row.try_get("name")?,
            avatar: row.try_get("avatar")?,
            text: row.try_get("text")?,
            likes,
            comments,
            created_at: row.try_get("created_at")?,
            version: row.try_get("version")?,
        })
    }
}
