//! Confidence scores for documents and claims

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence score in [0.0, 1.0]
///
/// Documents carry a coarse provenance-quality score and every claim carries
/// its own confidence. Importers mostly use the named levels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Low confidence (scraped or heuristically mapped data)
    pub const LOW: Confidence = Confidence(0.5);

    /// Medium confidence
    pub const MEDIUM: Confidence = Confidence(0.75);

    /// High confidence (authoritative source, exact mapping)
    pub const HIGH: Confidence = Confidence(1.0);

    /// Create a new confidence score
    ///
    /// # Errors
    /// Returns error if the score is not a finite value in [0, 1]
    pub fn new(score: f64) -> Result<Self, String> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(format!("Confidence {} is outside [0.0, 1.0]", score));
        }
        Ok(Self(score))
    }

    /// Get the raw score
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Parse a named level (`low`, `medium`, `high`) or a numeric score
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::LOW),
            "medium" => Some(Self::MEDIUM),
            "high" => Some(Self::HIGH),
            other => other.parse::<f64>().ok().and_then(|v| Self::new(v).ok()),
        }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::HIGH
    }
}

impl TryFrom<f64> for Confidence {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
