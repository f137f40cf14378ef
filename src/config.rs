//! Configuration Module
//!
//! Cache construction parameters. The cache is an explicitly constructed
//! object: the composition root builds a `CacheConfig` and hands it to
//! `ResponseCache::new`; there is no ambient global state.

/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default TTL in milliseconds for entries without an explicit TTL.
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Default fraction of the TTL after which an entry counts as stale.
///
/// With 0.8, the stale-while-revalidate window is the last 20% of an
/// entry's lifetime.
pub const DEFAULT_STALE_THRESHOLD: f64 = 0.8;

/// Cache configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in milliseconds for entries without an explicit TTL
    pub default_ttl_ms: u64,
    /// Fraction of the TTL after which an entry becomes stale, in `[0, 1]`
    pub stale_threshold: f64,
}

impl CacheConfig {
    /// Creates a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum entry count, clamped to a minimum of 1.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    /// Sets the default TTL in milliseconds.
    #[must_use]
    pub fn with_default_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.default_ttl_ms = ttl_ms;
        self
    }

    /// Sets the stale threshold fraction.
    ///
    /// Values outside `[0, 1]` are clamped; non-finite values fall back to
    /// the default.
    #[must_use]
    pub fn with_stale_threshold(mut self, threshold: f64) -> Self {
        self.stale_threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_STALE_THRESHOLD
        };
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl_ms: DEFAULT_TTL_MS,
            stale_threshold: DEFAULT_STALE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.default_ttl_ms, 60_000);
        assert_eq!(config.stale_threshold, 0.8);
    }

    #[test]
    fn test_config_builders() {
        let config = CacheConfig::new()
            .with_max_entries(10)
            .with_default_ttl_ms(5_000)
            .with_stale_threshold(0.5);

        assert_eq!(config.max_entries, 10);
        assert_eq!(config.default_ttl_ms, 5_000);
        assert_eq!(config.stale_threshold, 0.5);
    }

    #[test]
    fn test_max_entries_zero_clamped() {
        let config = CacheConfig::new().with_max_entries(0);
        assert_eq!(config.max_entries, 1);
    }

    #[test]
    fn test_stale_threshold_clamped() {
        assert_eq!(CacheConfig::new().with_stale_threshold(1.5).stale_threshold, 1.0);
        assert_eq!(CacheConfig::new().with_stale_threshold(-0.2).stale_threshold, 0.0);
    }

    #[test]
    fn test_stale_threshold_non_finite_falls_back() {
        let config = CacheConfig::new().with_stale_threshold(f64::NAN);
        assert_eq!(config.stale_threshold, DEFAULT_STALE_THRESHOLD);
    }
}
