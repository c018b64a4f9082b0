//! Domain error types

use crate::Identifier;
use thiserror::Error;

/// Errors raised while assembling domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Two properties in one catalog share a mnemonic
    #[error("Duplicate mnemonic '{mnemonic}' (properties {first} and {second})")]
    DuplicateMnemonic {
        /// The shared mnemonic
        mnemonic: String,
        /// Property that claimed the mnemonic first
        first: Identifier,
        /// Property that collided with it
        second: Identifier,
    },

    /// Two properties in one catalog share an identifier
    #[error("Duplicate property identifier {0}")]
    DuplicateProperty(Identifier),

    /// A claim set already holds a claim with this identifier
    #[error("Duplicate claim identifier {0}")]
    DuplicateClaim(Identifier),

    /// Unit symbol outside the amount-unit vocabulary
    #[error("Unknown amount unit '{0}'")]
    UnknownUnit(String),
}
