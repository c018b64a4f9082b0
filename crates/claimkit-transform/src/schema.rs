//! Binding schemas: the declarative field table of a record type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mnemonic that explicitly suppresses processing of a field
pub const SKIP_MNEMONIC: &str = "-";

/// Value-kind hint disambiguating how a field's value becomes a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueHint {
    /// String is an opaque identifier
    Id,
    /// String is an IRI
    Iri,
    /// String is plain text rendered as HTML
    Html,
    /// String is already HTML
    RawHtml,
    /// `true` becomes a NoValue claim
    None,
    /// `true` becomes an UnknownValue claim
    Unknown,
}

impl ValueHint {
    /// Get the hint name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueHint::Id => "id",
            ValueHint::Iri => "iri",
            ValueHint::Html => "html",
            ValueHint::RawHtml => "rawhtml",
            ValueHint::None => "none",
            ValueHint::Unknown => "unknown",
        }
    }

    /// Parse a hint name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "id" => Some(ValueHint::Id),
            "iri" => Some(ValueHint::Iri),
            "html" => Some(ValueHint::Html),
            "rawhtml" => Some(ValueHint::RawHtml),
            "none" => Some(ValueHint::None),
            "unknown" => Some(ValueHint::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for ValueHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared shape of a field's values
///
/// Declaring the kind lets hint and unit mistakes surface when the schema is
/// resolved instead of when a record first carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Plain string
    String,
    /// Opaque identifier string
    Identifier,
    /// IRI string
    Iri,
    /// Plain text rendered as HTML
    Html,
    /// HTML sanitized as-is
    RawHtml,
    /// Presence flag
    Bool,
    /// Signed integer amount
    Int,
    /// Unsigned integer amount
    UInt,
    /// Floating-point amount
    Float,
    /// Point in time
    Time,
    /// Interval of time
    Interval,
    /// Reference to another document
    Relation,
}

impl ValueKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Identifier => "identifier",
            ValueKind::Iri => "iri",
            ValueKind::Html => "html",
            ValueKind::RawHtml => "rawhtml",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::UInt => "uint",
            ValueKind::Float => "float",
            ValueKind::Time => "time",
            ValueKind::Interval => "interval",
            ValueKind::Relation => "relation",
        }
    }

    /// Whether values of this kind become amounts and need a unit
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::UInt | ValueKind::Float)
    }

    /// Whether the hint can be honoured for values of this kind
    pub fn accepts(&self, hint: ValueHint) -> bool {
        match self {
            ValueKind::String => matches!(
                hint,
                ValueHint::Id | ValueHint::Iri | ValueHint::Html | ValueHint::RawHtml
            ),
            ValueKind::Identifier => hint == ValueHint::Id,
            ValueKind::Iri => hint == ValueHint::Iri,
            ValueKind::Html => hint == ValueHint::Html,
            ValueKind::RawHtml => hint == ValueHint::RawHtml,
            ValueKind::Bool => matches!(hint, ValueHint::None | ValueHint::Unknown),
            ValueKind::Int
            | ValueKind::UInt
            | ValueKind::Float
            | ValueKind::Time
            | ValueKind::Interval
            | ValueKind::Relation => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim synthesized for each missing value when a minimum is unmet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultFill {
    /// Fill with NoValue claims
    None,
    /// Fill with UnknownValue claims
    Unknown,
}

/// Accepted-value bounds of a bound field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    /// Minimum accepted values
    pub min: usize,
    /// Maximum accepted values; `None` is unbounded
    pub max: Option<usize>,
}

impl Cardinality {
    /// Parse `min..max`, `min..` or an exact `n`
    ///
    /// # Errors
    /// Returns the reason when the text is malformed, `max` is zero or
    /// negative, or `max` is below `min`
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let (min_text, max_text) = match text.split_once("..") {
            Some((min, max)) => (min.trim(), Some(max.trim())),
            None => (text, None),
        };

        let min = min_text
            .parse::<usize>()
            .map_err(|_| format!("minimum '{}' is not a non-negative integer", min_text))?;

        let max = match max_text {
            None => Some(min),
            Some("") => None,
            Some(max_text) => {
                let max = max_text
                    .parse::<i64>()
                    .map_err(|_| format!("maximum '{}' is not an integer", max_text))?;
                if max <= 0 {
                    return Err(format!("maximum {} must be positive", max));
                }
                Some(max as usize)
            }
        };

        if let Some(max) = max {
            if max == 0 {
                return Err("maximum must be positive".to_string());
            }
            if max < min {
                return Err(format!("maximum {} is below minimum {}", max, min));
            }
        }

        Ok(Self { min, max })
    }

    /// Whether `count` accepted values satisfy the bounds
    pub fn admits(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..", self.min),
        }
    }
}

/// Per-field options of a binding schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Field holds the document's natural-key segment path
    pub document_id: bool,

    /// Field supplies the primary claim of its composite
    pub value: bool,

    /// Bound mnemonic; `-` suppresses processing
    pub property: Option<String>,

    /// Declared value shape; required alongside a hint or a unit
    pub kind: Option<ValueKind>,

    /// Value-kind hint
    #[serde(rename = "type")]
    pub hint: Option<ValueHint>,

    /// Amount unit symbol for numeric fields
    pub unit: Option<String>,

    /// Cardinality text, `min..max`
    pub cardinality: Option<String>,

    /// Default-fill policy for an unmet minimum
    pub default: Option<DefaultFill>,
}

impl FieldOptions {
    /// Whether processing of the field is explicitly suppressed
    pub fn is_skipped(&self) -> bool {
        self.property.as_deref() == Some(SKIP_MNEMONIC)
    }

    /// Bound mnemonic, if any and not suppressed
    pub fn mnemonic(&self) -> Option<&str> {
        self.property.as_deref().filter(|m| *m != SKIP_MNEMONIC)
    }
}

/// One field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field name, used in error paths
    pub name: String,
    /// Binding options
    pub options: FieldOptions,
    /// Schema of the nested record for composite fields
    pub nested: Option<RecordSchema>,
}

impl FieldSchema {
    /// Create an unbound field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: FieldOptions::default(),
            nested: None,
        }
    }

    /// Mark as the document-identity field
    pub fn document_id(mut self) -> Self {
        self.options.document_id = true;
        self
    }

    /// Mark as the value field of its composite
    pub fn value(mut self) -> Self {
        self.options.value = true;
        self
    }

    /// Bind to a property mnemonic
    pub fn property(mut self, mnemonic: impl Into<String>) -> Self {
        self.options.property = Some(mnemonic.into());
        self
    }

    /// Suppress processing
    pub fn skip(mut self) -> Self {
        self.options.property = Some(SKIP_MNEMONIC.to_string());
        self
    }

    /// Declare the value shape
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.options.kind = Some(kind);
        self
    }

    /// Set the value-kind hint
    pub fn hint(mut self, hint: ValueHint) -> Self {
        self.options.hint = Some(hint);
        self
    }

    /// Set the amount unit
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.options.unit = Some(unit.into());
        self
    }

    /// Declare a cardinality, `min..max`
    pub fn cardinality(mut self, cardinality: impl Into<String>) -> Self {
        self.options.cardinality = Some(cardinality.into());
        self
    }

    /// Declare a default-fill policy
    pub fn default_fill(mut self, fill: DefaultFill) -> Self {
        self.options.default = Some(fill);
        self
    }

    /// Make this a composite field with the given nested schema
    pub fn nested(mut self, schema: RecordSchema) -> Self {
        self.nested = Some(schema);
        self
    }

    /// Replace all options at once
    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }
}

/// Ordered field table of a record type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSchema {
    /// Fields in declaration order
    pub fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a well-formed bounded range parses to exactly its bounds
        #[test]
        fn test_bounded_range(min in 0usize..50, extra in 0usize..50) {
            let max = (min + extra).max(1);
            let parsed = Cardinality::parse(&format!("{}..{}", min, max)).unwrap();
            prop_assert_eq!(parsed, Cardinality { min, max: Some(max) });
            prop_assert!(parsed.admits(min.max(1).min(max)));
        }

        /// Property: a maximum of zero or below is always rejected
        #[test]
        fn test_non_positive_max_rejected(min in 0usize..10, max in -20i64..=0) {
            let text = format!("{}..{}", min, max);
            prop_assert!(Cardinality::parse(&text).is_err());
        }
    }
}
