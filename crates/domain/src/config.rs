//! Engine configuration loaded from environment variables.

use common::Money;

/// Default order value ceiling: 10,000.00.
pub const DEFAULT_VALUE_CEILING_CENTS: i64 = 1_000_000;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

/// Engine configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `ORDER_VALUE_CEILING_CENTS` — highest allowed order total (default: `1000000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `"json"` or `"pretty"` (default: `"pretty"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub value_ceiling: Money,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Loads configuration from any key lookup. Unparseable values fall back
    /// to their defaults.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            value_ceiling: lookup("ORDER_VALUE_CEILING_CENTS")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|cents| *cents >= 0)
                .map(Money::from_cents)
                .unwrap_or(defaults.value_ceiling),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .and_then(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.log_format),
        }
    }

    /// Returns a copy with a different value ceiling.
    pub fn with_value_ceiling(mut self, ceiling: Money) -> Self {
        self.value_ceiling = ceiling;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_ceiling: Money::from_cents(DEFAULT_VALUE_CEILING_CENTS),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.value_ceiling, Money::from_units(10_000));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        assert_eq!(Config::from_source(source(&[])), Config::default());
    }

    #[test]
    fn test_reads_all_keys() {
        let config = Config::from_source(source(&[
            ("ORDER_VALUE_CEILING_CENTS", "50000"),
            ("RUST_LOG", "domain=debug"),
            ("LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(config.value_ceiling.cents(), 50_000);
        assert_eq!(config.log_level, "domain=debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_source(source(&[
            ("ORDER_VALUE_CEILING_CENTS", "lots"),
            ("LOG_FORMAT", "xml"),
        ]));

        assert_eq!(config.value_ceiling.cents(), DEFAULT_VALUE_CEILING_CENTS);
        assert_eq!(config.log_format, LogFormat::Pretty);

        let negative = Config::from_source(source(&[("ORDER_VALUE_CEILING_CENTS", "-5")]));
        assert_eq!(negative.value_ceiling.cents(), DEFAULT_VALUE_CEILING_CENTS);
    }
}
