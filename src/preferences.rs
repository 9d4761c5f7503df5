//! Servo engine preferences built from the shell configuration.
//!
//! Builds a [`servo::Preferences`] struct:
//! - Thread pools sized to available CPU cores (clamped)
//! - HTTP cache and shader precaching from `[servo]`
//! - Web feature toggles from `[web]` (storage, geolocation, mixed content)
//!
//! Servo exposes no switch for scripting, media autoplay or mixed content,
//! so turning `javascript`, `media_autoplay` or `mixed_content` off is
//! reported and otherwise ignored. `network_enforce_tls_enabled` is left
//! alone: it would block every plain-http load, top-level pages included.

use tracing::{info, warn};

use crate::config::{ServoConfig, WebConfig};

/// Builds Servo `Preferences` for the current machine and configuration.
#[allow(clippy::field_reassign_with_default)]
pub fn build_servo_preferences(web: &WebConfig, engine: &ServoConfig) -> servo::Preferences {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(4);

    let mut prefs = servo::Preferences::default();

    // ── Performance Tuning ────────────────────────────────────────────────
    prefs.layout_threads = if engine.layout_threads > 0 {
        engine.layout_threads
    } else {
        cpus.min(8)
    };
    prefs.threadpools_async_runtime_workers_max = (cpus * 2).min(16);
    prefs.threadpools_image_cache_workers_max = cpus.min(8);
    prefs.threadpools_webrender_workers_max = (cpus / 2).clamp(2, 8);
    prefs.threadpools_resource_workers_max = cpus.min(8);
    prefs.network_http_cache_size = engine.cache_size;
    prefs.gfx_precache_shaders = engine.precache_shaders;

    if !engine.user_agent.is_empty() {
        prefs.user_agent = engine.user_agent.clone();
    }

    // ── Web features ──────────────────────────────────────────────────────
    prefs.dom_indexeddb_enabled = web.local_storage;
    prefs.dom_cookiestore_enabled = web.local_storage;
    prefs.dom_geolocation_enabled = web.geolocation;

    if !web.javascript {
        warn!("web.javascript = false is not supported by Servo, scripts stay enabled");
    }
    if !web.mixed_content {
        warn!("web.mixed_content = false is not supported by Servo, ignored");
    }
    if !web.media_autoplay {
        warn!("web.media_autoplay = false is not supported by Servo, ignored");
    }

    info!(
        cpus,
        layout_threads = prefs.layout_threads,
        cache_size = prefs.network_http_cache_size,
        local_storage = web.local_storage,
        geolocation = web.geolocation,
        mixed_content = web.mixed_content,
        "Servo preferences configured"
    );

    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> servo::Preferences {
        build_servo_preferences(&WebConfig::default(), &ServoConfig::default())
    }

    #[test]
    fn test_layout_threads_auto_is_bounded() {
        let prefs = defaults();
        assert!(prefs.layout_threads >= 1);
        assert!(prefs.layout_threads <= 8);
    }

    #[test]
    fn test_layout_threads_override() {
        let engine = ServoConfig {
            layout_threads: 3,
            ..ServoConfig::default()
        };
        let prefs = build_servo_preferences(&WebConfig::default(), &engine);
        assert_eq!(prefs.layout_threads, 3);
    }

    #[test]
    fn test_default_features_enabled() {
        let prefs = defaults();
        assert!(prefs.dom_indexeddb_enabled);
        assert!(prefs.dom_cookiestore_enabled);
        assert!(prefs.dom_geolocation_enabled);
    }

    #[test]
    fn test_features_can_be_disabled() {
        let web = WebConfig {
            local_storage: false,
            geolocation: false,
            mixed_content: false,
            ..WebConfig::default()
        };
        let prefs = build_servo_preferences(&web, &ServoConfig::default());
        assert!(!prefs.dom_indexeddb_enabled);
        assert!(!prefs.dom_cookiestore_enabled);
        assert!(!prefs.dom_geolocation_enabled);
    }

    #[test]
    fn test_mixed_content_leaves_tls_enforcement_alone() {
        let servo_default = servo::Preferences::default().network_enforce_tls_enabled;
        for mixed_content in [true, false] {
            let web = WebConfig {
                mixed_content,
                ..WebConfig::default()
            };
            let prefs = build_servo_preferences(&web, &ServoConfig::default());
            assert_eq!(prefs.network_enforce_tls_enabled, servo_default);
        }
    }

    #[test]
    fn test_custom_user_agent() {
        let engine = ServoConfig {
            user_agent: "webshell/0.1".to_string(),
            ..ServoConfig::default()
        };
        let prefs = build_servo_preferences(&WebConfig::default(), &engine);
        assert_eq!(prefs.user_agent, "webshell/0.1");
    }

    #[test]
    fn test_empty_user_agent_keeps_servo_default() {
        let prefs = defaults();
        assert_eq!(prefs.user_agent, servo::Preferences::default().user_agent);
    }

    #[test]
    fn test_cache_and_shaders() {
        let prefs = defaults();
        assert_eq!(prefs.network_http_cache_size, 50_000);
        assert!(prefs.gfx_precache_shaders);
    }

    #[test]
    fn test_webrender_workers_bounded() {
        let prefs = defaults();
        assert!(prefs.threadpools_webrender_workers_max >= 2);
        assert!(prefs.threadpools_webrender_workers_max <= 8);
    }
}
