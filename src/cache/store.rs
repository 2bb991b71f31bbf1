//! Memoization of configured builders.

use std::num::NonZeroUsize;
use std::sync::RwLock;

use lru::LruCache;
use metrics::counter;
use tracing::trace;

use crate::application::gravatar::Gravatar;
use crate::config::{CacheSettings, ConfigSource, GravatarSettings};
use crate::domain::error::GravatarError;

use super::keys::GravatarKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

pub(crate) const METRIC_CACHE_HIT: &str = "gravatar_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "gravatar_cache_miss_total";
pub(crate) const METRIC_CACHE_EVICT: &str = "gravatar_cache_evict_total";

/// Caller-owned table of configured builders keyed by email and configuration.
///
/// Lookups hand out clones, so changes made to a returned builder never leak
/// into later lookups. Failed configurations are not stored.
pub struct GravatarCache {
    entries: RwLock<LruCache<GravatarKey, Gravatar>>,
}

impl GravatarCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.capacity)
    }

    /// Return the cached builder for `(email, source)`, configuring it on a miss.
    pub fn get_or_configure(
        &self,
        settings: &GravatarSettings,
        email: &str,
        source: &ConfigSource,
    ) -> Result<Gravatar, GravatarError> {
        let key = GravatarKey::new(email, source);

        if let Some(cached) = rw_write(&self.entries, SOURCE, "get").get(&key).cloned() {
            counter!(METRIC_CACHE_HIT).increment(1);
            trace!(email = key.email.as_str(), "Gravatar cache hit");
            return Ok(cached);
        }

        counter!(METRIC_CACHE_MISS).increment(1);
        let gravatar = Gravatar::configure(settings, email, source)?;

        let evicted = rw_write(&self.entries, SOURCE, "put").push(key.clone(), gravatar.clone());
        // `push` also hands back the previous value when another caller raced us to the key.
        if evicted.is_some_and(|(evicted_key, _)| evicted_key != key) {
            counter!(METRIC_CACHE_EVICT).increment(1);
        }

        Ok(gravatar)
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }
}
