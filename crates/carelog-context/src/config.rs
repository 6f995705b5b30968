//! Configuration for the context assembler

use serde::{Deserialize, Serialize};

/// Truncation caps applied during context assembly
///
/// These bound the assembled block regardless of how many years of records
/// a patient accumulates. The overall cap is applied last and can cut a
/// line mid-way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Per-record cap on the Details line (characters)
    pub description_chars: usize,

    /// Per-document cap on included extracted text (characters).
    /// Independent of, and tighter than, the ingestion-time cap.
    pub document_text_chars: usize,

    /// Maximum number of documents included
    pub max_documents: usize,

    /// Hard ceiling on the entire assembled block (characters)
    pub max_context_chars: usize,
}

impl ContextConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.description_chars == 0 {
            return Err("description_chars must be greater than 0".to_string());
        }
        if self.document_text_chars == 0 {
            return Err("document_text_chars must be greater than 0".to_string());
        }
        if self.max_context_chars == 0 {
            return Err("max_context_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            description_chars: 500,
            document_text_chars: 2_000,
            max_documents: 5,
            max_context_chars: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ContextConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.description_chars, 500);
        assert_eq!(config.document_text_chars, 2_000);
        assert_eq!(config.max_documents, 5);
        assert_eq!(config.max_context_chars, 10_000);
    }

    #[test]
    fn test_zero_caps_are_invalid() {
        let mut config = ContextConfig::default();
        config.max_context_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = ContextConfig::from_toml(
            "description_chars = 100\n\
             document_text_chars = 200\n\
             max_documents = 3\n\
             max_context_chars = 1000",
        )
        .unwrap();
        assert_eq!(config.max_documents, 3);
        assert_eq!(config.max_context_chars, 1000);
    }
}
