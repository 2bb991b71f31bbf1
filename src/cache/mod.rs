//! Builder cache.
//!
//! An explicit, caller-owned replacement for a process-wide instance table.
//! Size it through the `[cache]` settings section:
//!
//! ```toml
//! [cache]
//! capacity = 256
//! ```

mod keys;
mod lock;
mod store;

pub use keys::GravatarKey;
pub use store::GravatarCache;
pub(crate) use store::{METRIC_CACHE_EVICT, METRIC_CACHE_HIT, METRIC_CACHE_MISS};
