pub mod models;
pub mod users;
pub mod profiles;
pub mod posts;

pub use models::{Comment, Education, Experience, Like, Post, Profile, SocialLinks, User, UserSummary};
pub use users::UserRepository;
pub use profiles::{ProfileFields, ProfileRepository};
pub use posts::PostRepository;
