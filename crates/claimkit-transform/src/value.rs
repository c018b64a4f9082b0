//! Record values handed to the engine

use crate::schema::{Cardinality, RecordSchema, ValueKind};
use claimkit_domain::{Identifier, TimePrecision, Timestamp};

/// A point in time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeValue {
    /// Timestamp; zero means unset
    pub timestamp: Timestamp,
    /// Precision
    pub precision: TimePrecision,
}

impl TimeValue {
    /// Create a time value with second precision
    pub fn new(seconds: i64) -> Self {
        Self {
            timestamp: Timestamp(seconds),
            precision: TimePrecision::Second,
        }
    }

    /// Override the precision
    pub fn with_precision(mut self, precision: TimePrecision) -> Self {
        self.precision = precision;
        self
    }
}

/// An interval of time; a bound that is `None` or zero is unknown
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntervalValue {
    /// Lower bound
    pub lower: Option<Timestamp>,
    /// Upper bound
    pub upper: Option<Timestamp>,
    /// Precision of both bounds
    pub precision: TimePrecision,
}

impl IntervalValue {
    /// Create an interval with second precision
    pub fn new(lower: Option<i64>, upper: Option<i64>) -> Self {
        Self {
            lower: lower.map(Timestamp),
            upper: upper.map(Timestamp),
            precision: TimePrecision::Second,
        }
    }

    /// Known lower bound
    pub fn known_lower(&self) -> Option<Timestamp> {
        self.lower.filter(|t| !t.is_zero())
    }

    /// Known upper bound
    pub fn known_upper(&self) -> Option<Timestamp> {
        self.upper.filter(|t| !t.is_zero())
    }
}

/// One concrete value of a field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Reference to another document; `None` is an empty reference
    Relation(Option<Identifier>),
    /// Point in time
    Time(TimeValue),
    /// Interval of time
    Interval(IntervalValue),
    /// Opaque external identifier
    Identifier(String),
    /// IRI of an external resource
    Iri(String),
    /// Plain text to be HTML-escaped, linkified and sanitized
    Html(String),
    /// HTML to be sanitized as-is
    RawHtml(String),
    /// Plain string; value-kind hints may redirect it
    String(String),
    /// Presence flag
    Bool(bool),
    /// Signed integer amount
    Int(i64),
    /// Unsigned integer amount
    UInt(u64),
    /// Floating-point amount
    Float(f64),
    /// Nested record, positional to the field's nested schema
    Record(Vec<FieldValue>),
}

impl Value {
    /// Short name of the value shape for diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Relation(_) => "relation",
            Value::Time(_) => "time",
            Value::Interval(_) => "interval",
            Value::Identifier(_) => "identifier",
            Value::Iri(_) => "iri",
            Value::Html(_) => "html",
            Value::RawHtml(_) => "raw html",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Record(_) => "record",
        }
    }

    /// Scalar kind of the value; `None` for nested records
    pub fn kind(&self) -> Option<ValueKind> {
        let kind = match self {
            Value::Relation(_) => ValueKind::Relation,
            Value::Time(_) => ValueKind::Time,
            Value::Interval(_) => ValueKind::Interval,
            Value::Identifier(_) => ValueKind::Identifier,
            Value::Iri(_) => ValueKind::Iri,
            Value::Html(_) => ValueKind::Html,
            Value::RawHtml(_) => ValueKind::RawHtml,
            Value::String(_) => ValueKind::String,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Record(_) => return None,
        };
        Some(kind)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<TimeValue> for Value {
    fn from(t: TimeValue) -> Self {
        Value::Time(t)
    }
}

impl From<IntervalValue> for Value {
    fn from(i: IntervalValue) -> Self {
        Value::Interval(i)
    }
}

impl From<Identifier> for Value {
    fn from(id: Identifier) -> Self {
        Value::Relation(Some(id))
    }
}

/// The value of one field, carrying the field's arity
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Exactly the field's current value
    Single(Value),
    /// Zero or one value
    Optional(Option<Value>),
    /// Zero or more values
    Sequence(Vec<Value>),
}

impl FieldValue {
    /// Single value
    pub fn single(value: impl Into<Value>) -> Self {
        FieldValue::Single(value.into())
    }

    /// Optional value
    pub fn optional<V: Into<Value>>(value: Option<V>) -> Self {
        FieldValue::Optional(value.map(Into::into))
    }

    /// Sequence of values
    pub fn sequence<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FieldValue::Sequence(values.into_iter().map(Into::into).collect())
    }

    /// Nested record as a single value
    pub fn record(values: Vec<FieldValue>) -> Self {
        FieldValue::Single(Value::Record(values))
    }

    /// Default cardinality bounds for this arity
    pub fn default_bounds(&self) -> Cardinality {
        let max = match self {
            FieldValue::Sequence(_) => None,
            FieldValue::Single(_) | FieldValue::Optional(_) => Some(1),
        };
        Cardinality { min: 0, max }
    }

    /// The concrete values, in order
    pub fn values(&self) -> &[Value] {
        match self {
            FieldValue::Single(v) => std::slice::from_ref(v),
            FieldValue::Optional(Some(v)) => std::slice::from_ref(v),
            FieldValue::Optional(None) => &[],
            FieldValue::Sequence(vs) => vs,
        }
    }
}

/// A typed domain record the engine can turn into a document
///
/// `values()` is positional: the i-th value belongs to the i-th field of
/// `schema()`. Schemas are usually built once in a static and shared by every
/// record of the type.
pub trait Record {
    /// Binding schema of this record type
    fn schema(&self) -> &RecordSchema;

    /// Field values in schema order
    fn values(&self) -> Vec<FieldValue>;
}

impl<T: Record + ?Sized> Record for &T {
    fn schema(&self) -> &RecordSchema {
        (**self).schema()
    }

    fn values(&self) -> Vec<FieldValue> {
        (**self).values()
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn schema(&self) -> &RecordSchema {
        (**self).schema()
    }

    fn values(&self) -> Vec<FieldValue> {
        (**self).values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_known_bounds() {
        let interval = IntervalValue::new(Some(0), Some(10));
        assert_eq!(interval.known_lower(), None);
        assert_eq!(interval.known_upper(), Some(Timestamp(10)));
    }

    #[test]
    fn test_field_value_views() {
        assert_eq!(FieldValue::optional::<&str>(None).values().len(), 0);
        assert_eq!(FieldValue::single("a").values(), &[Value::from("a")]);
        assert_eq!(FieldValue::sequence(["a", "b"]).values().len(), 2);
        assert_eq!(FieldValue::sequence(Vec::<String>::new()).default_bounds(), Cardinality { min: 0, max: None });
        assert_eq!(FieldValue::single(true).default_bounds(), Cardinality { min: 0, max: Some(1) });
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(Value::from(2.5).kind(), Some(ValueKind::Float));
        assert_eq!(Value::Iri("https://acme.example".to_string()).kind(), Some(ValueKind::Iri));
        assert_eq!(Value::Record(Vec::new()).kind(), None);
    }
}
