//! `MapConfiguration`: the in-memory reference implementation of
//! [`elle_passes::passes::Configuration`] used by the driver and by tests.

use elle_passes::passes::{ConfigValue, Configuration};
use rustc_hash::FxHashMap;

/// A `Configuration` backed by a plain map, matching the teacher's
/// preference for `rustc-hash` over the std `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MapConfiguration {
    values: FxHashMap<String, ConfigValue>,
}

impl MapConfiguration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Inserts or overwrites a key's value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl Configuration for MapConfiguration {
    fn get(&self, key: &str) -> Option<ConfigValue> { self.values.get(key).cloned() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_inserted_values() {
        let config = MapConfiguration::new().with("theme", ConfigValue::Str("dark".to_string())).with("retries", ConfigValue::Number(3.0));
        assert_eq!(config.get("theme"), Some(ConfigValue::Str("dark".to_string())));
        assert_eq!(config.get("retries"), Some(ConfigValue::Number(3.0)));
        assert_eq!(config.get("missing"), None);
    }
}
