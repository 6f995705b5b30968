//! Configuration for the text extractor

use serde::{Deserialize, Serialize};

/// Configuration for the text extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Ingestion-time cap on extracted text (characters). Applied once,
    /// at extraction; read paths never re-truncate below this.
    pub max_text_chars: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_chars == 0 {
            return Err("max_text_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 50_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_text_chars, 50_000);
    }

    #[test]
    fn test_zero_cap_is_invalid() {
        let config = ExtractorConfig { max_text_chars: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ExtractorConfig::from_toml("max_text_chars = 1000").unwrap();
        assert_eq!(config.max_text_chars, 1000);
    }
}
