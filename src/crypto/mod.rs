pub mod gravatar;
pub mod password;
pub mod token;

pub use gravatar::gravatar_url;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};
