use md5::{Digest, Md5};

/// Gravatar URL for an e-mail address (200px, pg rating, mystery-man fallback).
pub fn gravatar_url(email: &str) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}
