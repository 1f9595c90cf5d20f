//! Configuration for the extraction engine

use serde::{Deserialize, Serialize};

/// Thresholds applied to extracted candidates
///
/// Passed by value into every extraction call; the engine holds no mutable
/// settings, so concurrent callers with different thresholds cannot interfere
/// with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Minimum candidate length in bytes
    pub min_answer_length: usize,

    /// Maximum candidate length in bytes
    pub max_answer_length: usize,

    /// Minimum confidence for a candidate to survive filtering
    pub min_confidence: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_answer_length: 20,
            max_answer_length: 500,
            min_confidence: 0.3,
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_answer_length == 0 {
            return Err("min_answer_length must be greater than 0".to_string());
        }
        if self.max_answer_length < self.min_answer_length {
            return Err("max_answer_length cannot be below min_answer_length".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence {} out of range [0.0, 1.0]",
                self.min_confidence
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_min_length() {
        let mut config = ExtractorConfig::default();
        config.min_answer_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_length_bounds() {
        let mut config = ExtractorConfig::default();
        config.max_answer_length = config.min_answer_length - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_confidence_out_of_range() {
        let mut config = ExtractorConfig::default();
        config.min_confidence = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.min_answer_length, parsed.min_answer_length);
        assert_eq!(config.max_answer_length, parsed.max_answer_length);
        assert_eq!(config.min_confidence, parsed.min_confidence);
    }
}
