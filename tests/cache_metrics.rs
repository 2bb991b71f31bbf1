use std::collections::HashMap;
use std::num::NonZeroUsize;

use gravatar_view::{ConfigSource, GravatarCache, RawAvatarConfig, Settings};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

#[test]
fn cache_paths_emit_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let settings = Settings::default();
    let cache = GravatarCache::new(NonZeroUsize::new(1).expect("non-zero capacity"));
    let explicit = ConfigSource::Explicit(RawAvatarConfig {
        size: Some(32),
        ..Default::default()
    });

    metrics::with_local_recorder(&recorder, || {
        // miss, hit, miss + evict
        for source in [&ConfigSource::Default, &ConfigSource::Default, &explicit] {
            cache
                .get_or_configure(&settings.gravatar, "a@b.com", source)
                .expect("configured");
        }
        // miss without insertion
        cache
            .get_or_configure(&settings.gravatar, "a@b.com", &ConfigSource::group("nope"))
            .expect_err("unknown group");
    });

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    assert_eq!(counters.get("gravatar_cache_hit_total"), Some(&1));
    assert_eq!(counters.get("gravatar_cache_miss_total"), Some(&3));
    assert_eq!(counters.get("gravatar_cache_evict_total"), Some(&1));
    assert_eq!(cache.len(), 1);
}
