//! Tunable parameters of an elastic table.

use serde::{Deserialize, Serialize};

use crate::error::{ElasticError, Result};

/// Upper bound on the number of slots inspected per sub-table.
pub const DEFAULT_PROBE_LIMIT: usize = 16;

/// A sub-table accepts new keys while it is strictly below this fill percentage.
pub const DEFAULT_MAX_FILL_PERCENT: usize = 90;

/// Requested capacities below this are clamped up to it.
pub const DEFAULT_MIN_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub probe_limit: usize,
    pub max_fill_percent: usize,
    pub min_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_limit: DEFAULT_PROBE_LIMIT,
            max_fill_percent: DEFAULT_MAX_FILL_PERCENT,
            min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

impl Config {
    /// Parses a YAML document such as
    ///
    /// ```yaml
    /// probe_limit: 8
    /// max_fill_percent: 75
    /// ```
    ///
    /// Omitted fields keep their defaults. The result is validated.
    pub fn from_yaml(doc: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(doc)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe_limit == 0 {
            return Err(ElasticError::InvalidConfig(
                "probe_limit must be at least 1".to_string(),
            ));
        }
        if self.max_fill_percent == 0 || self.max_fill_percent > 100 {
            return Err(ElasticError::InvalidConfig(format!(
                "max_fill_percent must be within 1..=100, got {}",
                self.max_fill_percent
            )));
        }
        if self.min_capacity == 0 {
            return Err(ElasticError::InvalidConfig(
                "min_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg: Config = Config::default();
        assert_eq!(cfg.probe_limit, 16);
        assert_eq!(cfg.max_fill_percent, 90);
        assert_eq!(cfg.min_capacity, 8);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_only_given_fields() {
        let cfg: Config = Config::from_yaml("probe_limit: 4\n").unwrap();
        assert_eq!(cfg.probe_limit, 4);
        assert_eq!(cfg.max_fill_percent, DEFAULT_MAX_FILL_PERCENT);
        assert_eq!(cfg.min_capacity, DEFAULT_MIN_CAPACITY);
    }

    #[test]
    fn yaml_rejects_invalid_values() {
        let err = Config::from_yaml("max_fill_percent: 120\n").unwrap_err();
        assert!(matches!(err, ElasticError::InvalidConfig(_)));

        let err = Config::from_yaml("probe_limit: 0\n").unwrap_err();
        assert!(matches!(err, ElasticError::InvalidConfig(_)));
    }

    #[test]
    fn yaml_rejects_malformed_document() {
        let err = Config::from_yaml("probe_limit: [1, 2\n").unwrap_err();
        assert!(matches!(err, ElasticError::Yaml(_)));
    }
}
