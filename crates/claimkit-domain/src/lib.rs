//! claimkit Domain Layer
//!
//! The document model every importer produces: deterministic identifiers,
//! properties bound through a mnemonic table, and typed, confidence-scored
//! claims grouped into documents.
//!
//! ## Key Concepts
//!
//! - **Identifier**: content-addressed from an ordered segment path, stable across runs
//! - **Property**: what a claim is about, named by a unique mnemonic
//! - **Claim**: one typed assertion, optionally qualified by meta claims
//! - **Document**: the claims derived from one source record
//!
//! This crate holds no I/O. The transformation from records to documents
//! lives in `claimkit-transform`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod confidence;
pub mod document;
pub mod error;
pub mod identifier;
pub mod property;
pub mod time;
pub mod unit;

// Re-exports for convenience
pub use claim::{Claim, ClaimKind, ClaimSet, ClaimValue, Walk};
pub use confidence::Confidence;
pub use document::Document;
pub use error::DomainError;
pub use identifier::{display_path, extend_path, Identifier, Segment};
pub use property::{CatalogEntry, MnemonicTable, Property};
pub use time::{TimePrecision, Timestamp};
pub use unit::AmountUnit;
