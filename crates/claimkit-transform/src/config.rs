//! Configuration for the Transformer

use claimkit_domain::Confidence;
use serde::{Deserialize, Serialize};

/// Configuration for the Transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Provenance-quality score stamped on every document
    pub document_score: Confidence,

    /// Confidence stamped on every claim
    pub claim_confidence: Confidence,

    /// Language key under which text claims store their HTML
    pub text_language: String,
}

impl TransformConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.text_language.trim().is_empty() {
            return Err("text_language must not be empty".to_string());
        }
        if self.text_language.chars().any(char::is_whitespace) {
            return Err(format!("text_language '{}' must not contain whitespace", self.text_language));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            document_score: Confidence::HIGH,
            claim_confidence: Confidence::HIGH,
            text_language: "en".to_string(),
        }
    }
}
