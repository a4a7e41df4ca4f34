//! Cache statistics

use serde::Serialize;

/// Point-in-time snapshot of the cache
///
/// `item_count` and `total_bytes` describe the live entries. The counters are
/// cumulative since the cache was created; `clear` does not reset them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of live entries
    pub item_count: usize,
    /// Sum of live entry size estimates
    pub total_bytes: u64,
    /// Lookups that returned a document
    pub hits: u64,
    /// Lookups that returned nothing (including expired entries)
    pub misses: u64,
    /// Entries dropped by the count or byte cap
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit (0.0 to 1.0)
    ///
    /// Returns 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = CacheStats {
            item_count: 2,
            total_bytes: 1200,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["itemCount"], 2);
        assert_eq!(json["totalBytes"], 1200);
    }
}
