//! Error types for the transformation engine

use crate::schema::{ValueHint, ValueKind};
use claimkit_domain::DomainError;
use thiserror::Error;

/// Which side of the contract an error comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Programmer or configuration mistake, independent of record data
    Schema,
    /// Depends on the values of a specific record
    Data,
}

/// Errors that can occur while transforming records into documents
///
/// `path` is always the dot-joined field path of the offending field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Failure of one record inside a batch
    #[error("Record {index}: {source}")]
    Record {
        /// Position of the record in the batch
        index: usize,
        /// What went wrong
        #[source]
        source: Box<TransformError>,
    },

    /// Domain invariant violated (duplicate mnemonic, duplicate claim)
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Field mnemonic is absent from the mnemonic table
    #[error("{path}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic {
        /// Field path
        path: String,
        /// Mnemonic that did not resolve
        mnemonic: String,
    },

    /// No field is marked as the document identity
    #[error("Document identity field not found")]
    DocumentIdNotFound,

    /// More than one field is marked as the document identity
    #[error("Multiple document identity fields: {first} and {second}")]
    MultipleDocumentIds {
        /// First marked field
        first: String,
        /// Second marked field
        second: String,
    },

    /// Document identity field holds no segments
    #[error("{path}: document identity is empty")]
    EmptyId {
        /// Field path
        path: String,
    },

    /// Document identity marker combined with a property binding
    #[error("{path}: document identity field cannot be bound to a property")]
    DocumentIdWithProperty {
        /// Field path
        path: String,
    },

    /// Document identity marker inside a value + meta composite
    #[error("{path}: document identity field must be on the record or an embedded record")]
    MisplacedDocumentId {
        /// Field path
        path: String,
    },

    /// Value marker combined with a property binding
    #[error("{path}: value field cannot be bound to a property")]
    ValueWithProperty {
        /// Field path
        path: String,
    },

    /// Value marker combined with a cardinality declaration
    #[error("{path}: value field cannot declare a cardinality")]
    ValueWithCardinality {
        /// Field path
        path: String,
    },

    /// Value marker combined with a default-fill declaration
    #[error("{path}: value field cannot declare a default")]
    ValueWithDefault {
        /// Field path
        path: String,
    },

    /// Value marker outside a value + meta composite
    #[error("{path}: value marker is only valid directly inside a bound composite")]
    MisplacedValueMarker {
        /// Field path
        path: String,
    },

    /// Composite declares more than one value field
    #[error("{path}: composite has more than one value field")]
    MultipleValueFields {
        /// Composite field path
        path: String,
    },

    /// Value-kind hint the value shape cannot honour
    #[error("{path}: hint '{hint}' conflicts with {shape} value")]
    ConflictingHint {
        /// Field path
        path: String,
        /// Declared hint
        hint: ValueHint,
        /// Shape of the value
        shape: &'static str,
    },

    /// Hint or unit on a field that does not declare its kind
    #[error("{path}: a type hint or unit requires a declared kind")]
    UndeclaredKind {
        /// Field path
        path: String,
    },

    /// Unit on a field whose values are not amounts
    #[error("{path}: unit is only valid on numeric fields, not {shape}")]
    MisplacedUnit {
        /// Field path
        path: String,
        /// Declared shape of the field
        shape: &'static str,
    },

    /// Value whose shape differs from the field's declared kind
    #[error("{path}: declared {kind} field holds a {shape} value")]
    KindMismatch {
        /// Field path
        path: String,
        /// Declared kind
        kind: ValueKind,
        /// Shape of the value
        shape: &'static str,
    },

    /// Value shape the engine cannot turn into a claim at this position
    #[error("{path}: unsupported field type {shape}")]
    UnsupportedFieldType {
        /// Field path
        path: String,
        /// Shape of the value
        shape: &'static str,
    },

    /// Record produced a different number of values than its schema declares
    #[error("{path}: schema declares {expected} fields, record produced {actual}")]
    FieldCountMismatch {
        /// Record or composite path
        path: String,
        /// Fields in the schema
        expected: usize,
        /// Values produced
        actual: usize,
    },

    /// Cardinality declaration could not be parsed or is out of range
    #[error("{path}: invalid cardinality '{text}': {reason}")]
    InvalidCardinality {
        /// Field path
        path: String,
        /// Declared text
        text: String,
        /// Why it was rejected
        reason: String,
    },

    /// Default-fill policy declared without a positive minimum
    #[error("{path}: default requires a minimum cardinality above zero")]
    DefaultWithoutMinimum {
        /// Field path
        path: String,
    },

    /// Fewer accepted values than the declared minimum and no default-fill policy
    #[error("{path} ({mnemonic}): expected at least {min} values, got {actual}")]
    CardinalityUnmet {
        /// Field path
        path: String,
        /// Bound mnemonic
        mnemonic: String,
        /// Declared minimum
        min: usize,
        /// Accepted values
        actual: usize,
    },

    /// More accepted values than the declared maximum
    #[error("{path} ({mnemonic}): expected at most {max} values, got {actual}")]
    CardinalityExceeded {
        /// Field path
        path: String,
        /// Bound mnemonic
        mnemonic: String,
        /// Declared maximum
        max: usize,
        /// Accepted values
        actual: usize,
    },

    /// Numeric field without a unit
    #[error("{path}: numeric value requires a unit")]
    MissingUnit {
        /// Field path
        path: String,
    },

    /// Unit outside the amount-unit vocabulary
    #[error("{path}: unknown unit '{unit}'")]
    UnknownUnit {
        /// Field path
        path: String,
        /// Declared unit
        unit: String,
    },

    /// NaN or infinite amount
    #[error("{path}: invalid numeric value {value}")]
    InvalidNumericValue {
        /// Field path
        path: String,
        /// Rendered value
        value: String,
    },
}

impl TransformError {
    /// Classify the error as a schema or a data error
    pub fn class(&self) -> ErrorClass {
        match self {
            TransformError::Record { source, .. } => source.class(),
            TransformError::EmptyId { .. }
            | TransformError::CardinalityUnmet { .. }
            | TransformError::CardinalityExceeded { .. }
            | TransformError::MissingUnit { .. }
            | TransformError::UnknownUnit { .. }
            | TransformError::InvalidNumericValue { .. } => ErrorClass::Data,
            _ => ErrorClass::Schema,
        }
    }

    /// Field path the error refers to, when it is field-scoped
    pub fn path(&self) -> Option<&str> {
        match self {
            TransformError::Record { source, .. } => source.path(),
            TransformError::Domain(_)
            | TransformError::DocumentIdNotFound
            | TransformError::MultipleDocumentIds { .. } => None,
            TransformError::UnknownMnemonic { path, .. }
            | TransformError::EmptyId { path }
            | TransformError::DocumentIdWithProperty { path }
            | TransformError::MisplacedDocumentId { path }
            | TransformError::ValueWithProperty { path }
            | TransformError::ValueWithCardinality { path }
            | TransformError::ValueWithDefault { path }
            | TransformError::MisplacedValueMarker { path }
            | TransformError::MultipleValueFields { path }
            | TransformError::ConflictingHint { path, .. }
            | TransformError::UndeclaredKind { path }
            | TransformError::MisplacedUnit { path, .. }
            | TransformError::KindMismatch { path, .. }
            | TransformError::UnsupportedFieldType { path, .. }
            | TransformError::FieldCountMismatch { path, .. }
            | TransformError::InvalidCardinality { path, .. }
            | TransformError::DefaultWithoutMinimum { path }
            | TransformError::CardinalityUnmet { path, .. }
            | TransformError::CardinalityExceeded { path, .. }
            | TransformError::MissingUnit { path }
            | TransformError::UnknownUnit { path, .. }
            | TransformError::InvalidNumericValue { path, .. } => Some(path),
        }
    }

    /// Strip the batch wrapper, if any
    pub fn root(&self) -> &TransformError {
        match self {
            TransformError::Record { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for transformation operations
pub type Result<T> = std::result::Result<T, TransformError>;
