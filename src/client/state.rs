//! Client-side state and its reducers.
//!
//! Reducers are pure: they take the previous state and an action and return
//! the next state. Every action marks the slice as loaded.

use serde::{Deserialize, Serialize};

use crate::db::{Comment, Like, Post, Profile, User};
use crate::error::FieldError;

/// What a failed request leaves in the state for the view to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub msg: String,
    pub status: u16,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Register or login succeeded.
    Authenticated(String),
    UserLoaded(User),
    AuthError(ApiFailure),
    Logout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostAction {
    GetPosts(Vec<Post>),
    GetPost(Post),
    AddPost(Post),
    PostDeleted(String),
    UpdateLikes { post_id: String, likes: Vec<Like> },
    AddComment(Vec<Comment>),
    CommentDeleted(Vec<Comment>),
    PostError(ApiFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    GetProfile(Profile),
    UpdateProfile(Profile),
    GetProfiles(Vec<Profile>),
    GetRepos(Vec<serde_json::Value>),
    ClearProfile,
    ProfileError(ApiFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Post(PostAction),
    Profile(ProfileAction),
    /// The caller's profile and user are gone: clears auth and profile.
    AccountDeleted,
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<PostAction> for Action {
    fn from(action: PostAction) -> Self {
        Action::Post(action)
    }
}

impl From<ProfileAction> for Action {
    fn from(action: ProfileAction) -> Self {
        Action::Profile(action)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub user: Option<User>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            token: None,
            is_authenticated: false,
            loading: true,
            user: None,
        }
    }
}

pub fn auth_reducer(state: AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Authenticated(token) => AuthState {
            token: Some(token),
            is_authenticated: true,
            loading: false,
            ..state
        },
        AuthAction::UserLoaded(user) => AuthState {
            user: Some(user),
            is_authenticated: true,
            loading: false,
            ..state
        },
        AuthAction::AuthError(_) | AuthAction::Logout => AuthState {
            loading: false,
            ..AuthState::default()
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostState {
    pub post: Option<Post>,
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<ApiFailure>,
}

impl Default for PostState {
    fn default() -> Self {
        Self {
            post: None,
            posts: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

pub fn post_reducer(mut state: PostState, action: PostAction) -> PostState {
    state.loading = false;

    match action {
        PostAction::GetPosts(posts) => state.posts = posts,
        PostAction::GetPost(post) => state.post = Some(post),
        PostAction::AddPost(post) => state.posts.insert(0, post),
        PostAction::PostDeleted(post_id) => state.posts.retain(|p| p.id != post_id),
        PostAction::UpdateLikes { post_id, likes } => {
            for post in state.posts.iter_mut().chain(state.post.as_mut()) {
                if post.id == post_id {
                    post.likes = likes.clone();
                }
            }
        }
        PostAction::AddComment(comments) | PostAction::CommentDeleted(comments) => {
            if let Some(post) = state.post.as_mut() {
                post.comments = comments;
            }
        }
        PostAction::PostError(failure) => state.error = Some(failure),
    }

    state
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub profiles: Vec<Profile>,
    pub repos: Vec<serde_json::Value>,
    pub loading: bool,
    pub error: Option<ApiFailure>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            profile: None,
            profiles: Vec::new(),
            repos: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

pub fn profile_reducer(mut state: ProfileState, action: ProfileAction) -> ProfileState {
    state.loading = false;

    match action {
        ProfileAction::GetProfile(profile) | ProfileAction::UpdateProfile(profile) => {
            state.profile = Some(profile)
        }
        ProfileAction::GetProfiles(profiles) => state.profiles = profiles,
        ProfileAction::GetRepos(repos) => state.repos = repos,
        ProfileAction::ClearProfile => {
            state.profile = None;
            state.repos.clear();
        }
        ProfileAction::ProfileError(failure) => {
            state.error = Some(failure);
            state.profile = None;
        }
    }

    state
}

/// The whole client state tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub auth: AuthState,
    pub post: PostState,
    pub profile: ProfileState,
}

impl Store {
    pub fn dispatch(&mut self, action: impl Into<Action>) {
        match action.into() {
            Action::Auth(action) => {
                self.auth = auth_reducer(std::mem::take(&mut self.auth), action);
            }
            Action::Post(action) => {
                self.post = post_reducer(std::mem::take(&mut self.post), action);
            }
            Action::Profile(action) => {
                self.profile = profile_reducer(std::mem::take(&mut self.profile), action);
            }
            Action::AccountDeleted => {
                self.profile = profile_reducer(std::mem::take(&mut self.profile), ProfileAction::ClearProfile);
                self.auth = auth_reducer(std::mem::take(&mut self.auth), AuthAction::Logout);
            }
        }
    }
}
