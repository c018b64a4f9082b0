//! Document module - the unit an importer produces per source record

use crate::{Claim, ClaimSet, Confidence, DomainError, Identifier, Walk};
use serde::{Deserialize, Serialize};

/// A document: a deterministically identified bundle of claims
///
/// The identifier derives from the record's natural key (namespace, source,
/// natural identifier), never from the claims themselves, so re-importing the
/// same record yields the same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub id: Identifier,

    /// Provenance-quality score
    pub score: Confidence,

    /// Top-level claims
    #[serde(default)]
    pub claims: ClaimSet,
}

impl Document {
    /// Create an empty document
    pub fn new(id: Identifier, score: Confidence) -> Self {
        Self {
            id,
            score,
            claims: ClaimSet::new(),
        }
    }

    /// Add a top-level claim
    pub fn add(&mut self, claim: Claim) -> Result<(), DomainError> {
        self.claims.add(claim)
    }

    /// Find a top-level claim
    pub fn get(&self, id: &Identifier) -> Option<&Claim> {
        self.claims.get(id)
    }

    /// Walk every claim, meta claims included
    pub fn walk(&self) -> Walk<'_> {
        self.claims.walk()
    }

    /// Number of claims, meta claims included
    pub fn claim_count(&self) -> usize {
        self.walk().count()
    }
}
