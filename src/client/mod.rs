//! Typed client for the API plus the client-side state it feeds.
//!
//! [`actions`] call the API through [`ApiClient`] and turn each outcome into
//! an action; [`Store::dispatch`] folds actions into [`state`].

pub mod actions;
pub mod api;
pub mod state;

pub use api::{ApiClient, ClientError, EducationForm, ExperienceForm, ProfileForm};
pub use state::{Action, ApiFailure, AuthAction, PostAction, ProfileAction, Store};
