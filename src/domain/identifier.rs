//! Content identifiers derived from email addresses.
//!
//! The avatar service keys registered images by the MD5 digest of the
//! trimmed, lowercased address, so the same normalization is applied here
//! before hashing. Display code keeps the address exactly as supplied.

use md5::{Digest, Md5};

/// Trim surrounding whitespace and lowercase the address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lowercase hex MD5 of the normalized address.
pub fn content_identifier(email: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(normalize_email(email).as_bytes());
    hex::encode(hasher.finalize())
}
