//! Cache key definitions.

use crate::config::ConfigSource;

/// Identifies one configured builder: the email as supplied plus the
/// configuration source it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GravatarKey {
    pub email: String,
    pub source: ConfigSource,
}

impl GravatarKey {
    pub fn new(email: &str, source: &ConfigSource) -> Self {
        Self {
            email: email.to_string(),
            source: source.clone(),
        }
    }
}
