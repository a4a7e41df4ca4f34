//! Cache policy configuration

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum number of cached documents
pub const DEFAULT_MAX_ENTRIES: usize = 50;
/// Default byte budget (50 MiB)
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 50 * 1024 * 1024;
/// Default time-to-live (1 hour)
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Cache policy
///
/// Treated as immutable by the store: change it by handing a new value to
/// `DocumentCache::set_config`. All limits are ignored while `enabled` is
/// false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Maximum number of entries (at least 1)
    pub max_entries: usize,
    /// Maximum sum of entry size estimates, in bytes
    pub max_total_bytes: u64,
    /// Maximum entry age
    #[serde(rename = "ttlSeconds", with = "duration_secs")]
    pub ttl: Duration,
    /// Whether the cache stores and serves anything at all
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            enabled: true,
        }
    }
}

impl CacheConfig {
    /// A config that turns caching off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_max_total_bytes(mut self, max_total_bytes: u64) -> Self {
        self.max_total_bytes = max_total_bytes;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Clamp out-of-range values (`max_entries = 0` becomes 1)
    pub fn normalized(mut self) -> Self {
        if self.max_entries == 0 {
            tracing::warn!("Cache max_entries must be positive, clamping to 1");
            self.max_entries = 1;
        }
        self
    }

    /// Load from environment variables, falling back to defaults per field
    ///
    /// - `SVG_CACHE_ENABLED` (`true`/`false`/`1`/`0`)
    /// - `SVG_CACHE_MAX_ENTRIES`
    /// - `SVG_CACHE_MAX_TOTAL_BYTES`
    /// - `SVG_CACHE_TTL_SECONDS` (may be fractional)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let enabled = parse_var(&lookup, "SVG_CACHE_ENABLED", |v| {
            match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Some(true),
                "0" | "false" | "no" | "off" => Some(false),
                _ => None,
            }
        })
        .unwrap_or(defaults.enabled);
        let max_entries = parse_var(&lookup, "SVG_CACHE_MAX_ENTRIES", |v| v.parse().ok())
            .unwrap_or(defaults.max_entries);
        let max_total_bytes = parse_var(&lookup, "SVG_CACHE_MAX_TOTAL_BYTES", |v| v.parse().ok())
            .unwrap_or(defaults.max_total_bytes);
        let ttl = parse_var(&lookup, "SVG_CACHE_TTL_SECONDS", |v| {
            v.parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        })
        .unwrap_or(defaults.ttl);

        Self {
            max_entries,
            max_total_bytes,
            ttl,
            enabled,
        }
        .normalized()
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(name)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        tracing::warn!(var = name, value = %raw, "Invalid cache setting, using default");
    }
    parsed
}

/// (De)serialize a `Duration` as fractional seconds
mod duration_secs {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = CacheConfig::default();
        assert_eq!(cfg.max_entries, 50);
        assert_eq!(cfg.max_total_bytes, 50 * 1024 * 1024);
        assert_eq!(cfg.ttl, Duration::from_secs(3600));
        assert!(cfg.enabled);
    }

    #[test]
    fn test_disabled_preset() {
        let cfg = CacheConfig::disabled();
        assert!(!cfg.enabled);
        assert_eq!(cfg.max_entries, DEFAULT_MAX_ENTRIES);
    }

    #[test]
    fn test_normalized_clamps_zero_entries() {
        let cfg = CacheConfig::default().with_max_entries(0).normalized();
        assert_eq!(cfg.max_entries, 1);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let cfg = CacheConfig::from_lookup(lookup_from(&[
            ("SVG_CACHE_ENABLED", "false"),
            ("SVG_CACHE_MAX_ENTRIES", "8"),
            ("SVG_CACHE_MAX_TOTAL_BYTES", "4096"),
            ("SVG_CACHE_TTL_SECONDS", "1.5"),
        ]));
        assert!(!cfg.enabled);
        assert_eq!(cfg.max_entries, 8);
        assert_eq!(cfg.max_total_bytes, 4096);
        assert_eq!(cfg.ttl, Duration::from_millis(1500));
    }

    #[test]
    fn test_from_lookup_invalid_falls_back() {
        let cfg = CacheConfig::from_lookup(lookup_from(&[
            ("SVG_CACHE_MAX_ENTRIES", "lots"),
            ("SVG_CACHE_TTL_SECONDS", "-3"),
            ("SVG_CACHE_ENABLED", "maybe"),
        ]));
        assert_eq!(cfg, CacheConfig::default());
    }

    #[test]
    fn test_from_lookup_zero_entries_clamped() {
        let cfg = CacheConfig::from_lookup(lookup_from(&[("SVG_CACHE_MAX_ENTRIES", "0")]));
        assert_eq!(cfg.max_entries, 1);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(CacheConfig::default().with_ttl(Duration::from_millis(2500)))
            .unwrap();
        assert_eq!(json["maxEntries"], 50);
        assert_eq!(json["ttlSeconds"], 2.5);
        assert_eq!(json["enabled"], true);

        let parsed: CacheConfig =
            serde_json::from_str(r#"{"maxEntries": 3, "ttlSeconds": 10}"#).unwrap();
        assert_eq!(parsed.max_entries, 3);
        assert_eq!(parsed.ttl, Duration::from_secs(10));
        assert_eq!(parsed.max_total_bytes, DEFAULT_MAX_TOTAL_BYTES);
    }
}
