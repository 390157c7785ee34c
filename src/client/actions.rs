//! Action creators: one per user-visible operation. Each performs its request
//! and returns the action to dispatch; failures become the slice's error
//! action instead of an `Err`.

use crate::client::api::{ApiClient, ClientError, EducationForm, ExperienceForm, ProfileForm};
use crate::client::state::{Action, AuthAction, PostAction, ProfileAction};

fn post_action<T>(result: Result<T, ClientError>, ok: impl FnOnce(T) -> PostAction) -> PostAction {
    match result {
        Ok(value) => ok(value),
        Err(err) => {
            tracing::debug!("post request failed: {}", err);
            PostAction::PostError(err.failure())
        }
    }
}

fn profile_action<T>(result: Result<T, ClientError>, ok: impl FnOnce(T) -> ProfileAction) -> ProfileAction {
    match result {
        Ok(value) => ok(value),
        Err(err) => {
            tracing::debug!("profile request failed: {}", err);
            ProfileAction::ProfileError(err.failure())
        }
    }
}

fn authenticated(api: &mut ApiClient, result: Result<String, ClientError>) -> AuthAction {
    match result {
        Ok(token) => {
            api.set_token(Some(token.clone()));
            AuthAction::Authenticated(token)
        }
        Err(err) => {
            api.set_token(None);
            AuthAction::AuthError(err.failure())
        }
    }
}

// Auth

pub async fn register(api: &mut ApiClient, name: &str, email: &str, password: &str) -> AuthAction {
    let result = api.register(name, email, password).await;
    authenticated(api, result)
}

pub async fn login(api: &mut ApiClient, email: &str, password: &str) -> AuthAction {
    let result = api.login(email, password).await;
    authenticated(api, result)
}

pub async fn load_user(api: &ApiClient) -> AuthAction {
    match api.current_user().await {
        Ok(user) => AuthAction::UserLoaded(user),
        Err(err) => AuthAction::AuthError(err.failure()),
    }
}

pub fn logout(api: &mut ApiClient) -> AuthAction {
    api.set_token(None);
    AuthAction::Logout
}

// Posts

pub async fn get_posts(api: &ApiClient) -> PostAction {
    post_action(api.posts().await, PostAction::GetPosts)
}

pub async fn get_post(api: &ApiClient, post_id: &str) -> PostAction {
    post_action(api.post(post_id).await, PostAction::GetPost)
}

pub async fn add_post(api: &ApiClient, text: &str) -> PostAction {
    post_action(api.create_post(text).await, PostAction::AddPost)
}

pub async fn delete_post(api: &ApiClient, post_id: &str) -> PostAction {
    post_action(api.delete_post(post_id).await, |_| PostAction::PostDeleted(post_id.to_string()))
}

pub async fn add_like(api: &ApiClient, post_id: &str) -> PostAction {
    post_action(api.like(post_id).await, |likes| PostAction::UpdateLikes {
        post_id: post_id.to_string(),
        likes,
    })
}

pub async fn remove_like(api: &ApiClient, post_id: &str) -> PostAction {
    post_action(api.unlike(post_id).await, |likes| PostAction::UpdateLikes {
        post_id: post_id.to_string(),
        likes,
    })
}

pub async fn add_comment(api: &ApiClient, post_id: &str, text: &str) -> PostAction {
    post_action(api.add_comment(post_id, text).await, PostAction::AddComment)
}

pub async fn delete_comment(api: &ApiClient, post_id: &str, comment_id: &str) -> PostAction {
    post_action(api.delete_comment(post_id, comment_id).await, PostAction::CommentDeleted)
}

// Profiles

pub async fn get_current_profile(api: &ApiClient) -> ProfileAction {
    profile_action(api.current_profile().await, ProfileAction::GetProfile)
}

/// Clears the open profile first, then loads the list.
pub async fn get_all_profiles(api: &ApiClient) -> Vec<ProfileAction> {
    vec![
        ProfileAction::ClearProfile,
        profile_action(api.profiles().await, ProfileAction::GetProfiles),
    ]
}

pub async fn get_profile_by_user(api: &ApiClient, user_id: &str) -> ProfileAction {
    profile_action(api.profile_by_user(user_id).await, ProfileAction::GetProfile)
}

pub async fn get_github_repos(api: &ApiClient, username: &str) -> ProfileAction {
    profile_action(api.github_repos(username).await, ProfileAction::GetRepos)
}

pub async fn create_profile(api: &ApiClient, form: &ProfileForm) -> ProfileAction {
    profile_action(api.save_profile(form).await, ProfileAction::GetProfile)
}

/// Deletes the caller's profile and account. Asking the user to confirm is
/// the view's job.
pub async fn delete_account(api: &mut ApiClient) -> Action {
    match api.delete_account().await {
        Ok(()) => {
            api.set_token(None);
            Action::AccountDeleted
        }
        Err(err) => ProfileAction::ProfileError(err.failure()).into(),
    }
}

pub async fn add_experience(api: &ApiClient, form: &ExperienceForm) -> ProfileAction {
    profile_action(api.add_experience(form).await, ProfileAction::UpdateProfile)
}

pub async fn delete_experience(api: &ApiClient, experience_id: &str) -> ProfileAction {
    profile_action(api.delete_experience(experience_id).await, ProfileAction::UpdateProfile)
}

pub async fn add_education(api: &ApiClient, form: &EducationForm) -> ProfileAction {
    profile_action(api.add_education(form).await, ProfileAction::UpdateProfile)
}

pub async fn delete_education(api: &ApiClient, education_id: &str) -> ProfileAction {
    profile_action(api.delete_education(education_id).await, ProfileAction::UpdateProfile)
}
