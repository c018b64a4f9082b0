//! Binding schemas loaded from TOML, and JSON records decoded against them.
//!
//! A schema file lists fields in declaration order:
//!
//! ```toml
//! [[fields]]
//! name = "Key"
//! kind = "string"
//! arity = "sequence"
//! document_id = true
//!
//! [[fields]]
//! name = "Title"
//! kind = "record"
//! property = "TITLE"
//!
//!   [[fields.fields]]
//!   name = "Text"
//!   kind = "string"
//!   value = true
//! ```
//!
//! `kind` is the value shape; binding options (`property`, `type`, `unit`,
//! `cardinality`, `default`, `document_id`, `value`) sit next to it.

use crate::error::{CliError, Result};
use claimkit_domain::{Identifier, TimePrecision};
use claimkit_transform::{
    FieldOptions, FieldSchema, FieldValue, IntervalValue, Record, RecordSchema, TimeValue, Value, ValueKind,
};
use serde::Deserialize;
use serde_json::{Map, Value as Json};

/// Value shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Plain string; the `type` hint may redirect it
    String,
    /// Opaque identifier string
    Id,
    /// IRI string
    Iri,
    /// Plain text rendered as HTML
    Html,
    /// HTML
    RawHtml,
    /// Boolean
    Bool,
    /// Signed integer
    Int,
    /// Unsigned integer
    UInt,
    /// Floating-point number
    Float,
    /// Seconds since the epoch, or `{ timestamp, precision }`
    Time,
    /// `{ lower, upper, precision }`
    Interval,
    /// Identifier string, or the target's natural-key segments
    Relation,
    /// Nested record described by `fields`
    Record,
}

impl FieldKind {
    /// Kind declared to the engine; `None` for nested records
    pub fn value_kind(self) -> Option<ValueKind> {
        let kind = match self {
            FieldKind::String => ValueKind::String,
            FieldKind::Id => ValueKind::Identifier,
            FieldKind::Iri => ValueKind::Iri,
            FieldKind::Html => ValueKind::Html,
            FieldKind::RawHtml => ValueKind::RawHtml,
            FieldKind::Bool => ValueKind::Bool,
            FieldKind::Int => ValueKind::Int,
            FieldKind::UInt => ValueKind::UInt,
            FieldKind::Float => ValueKind::Float,
            FieldKind::Time => ValueKind::Time,
            FieldKind::Interval => ValueKind::Interval,
            FieldKind::Relation => ValueKind::Relation,
            FieldKind::Record => return None,
        };
        Some(kind)
    }
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    /// Exactly one value
    #[default]
    Single,
    /// Zero or one value
    Optional,
    /// Zero or more values
    Sequence,
}

/// One field of a schema file
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    /// Field name; also the record's JSON key
    pub name: String,

    /// Value shape
    pub kind: FieldKind,

    /// Arity
    #[serde(default)]
    pub arity: Arity,

    /// Binding options
    #[serde(flatten)]
    pub options: FieldOptions,

    /// Inner fields of a `record` field
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
struct SchemaDef {
    fields: Vec<FieldDef>,
}

/// A binding schema read from a file, with its field definitions
#[derive(Debug, Clone)]
pub struct SchemaFile {
    fields: Vec<FieldDef>,
    schema: RecordSchema,
}

impl SchemaFile {
    /// Parse a schema file
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let def: SchemaDef = toml::from_str(toml_str)?;
        let schema = build_schema(&def.fields, "")?;
        Ok(Self {
            fields: def.fields,
            schema,
        })
    }

    /// The record schema handed to the engine
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Decode a JSON array of record objects
    pub fn decode_records(&self, json: &str) -> Result<Vec<JsonRecord<'_>>> {
        let items: Vec<Json> = serde_json::from_str(json)?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let object = item
                    .as_object()
                    .ok_or_else(|| CliError::InvalidInput(format!("record {} is not an object", index)))?;
                let values = decode_fields(&self.fields, object, "")
                    .map_err(|e| CliError::InvalidInput(format!("record {}: {}", index, e)))?;
                Ok(JsonRecord {
                    schema: &self.schema,
                    values,
                })
            })
            .collect()
    }
}

/// A record decoded from JSON, sharing its file's schema
#[derive(Debug, Clone)]
pub struct JsonRecord<'s> {
    schema: &'s RecordSchema,
    values: Vec<FieldValue>,
}

impl Record for JsonRecord<'_> {
    fn schema(&self) -> &RecordSchema {
        self.schema
    }

    fn values(&self) -> Vec<FieldValue> {
        self.values.clone()
    }
}

fn build_schema(fields: &[FieldDef], prefix: &str) -> Result<RecordSchema> {
    let mut schema = RecordSchema::new();
    for def in fields {
        let path = join_path(prefix, &def.name);
        let mut options = def.options.clone();
        options.kind = def.kind.value_kind();
        let mut field = FieldSchema::new(&def.name).with_options(options);
        match (def.kind, def.fields.is_empty()) {
            (FieldKind::Record, true) => {
                return Err(CliError::Schema(format!("{}: record field without fields", path)));
            }
            (FieldKind::Record, false) => field = field.nested(build_schema(&def.fields, &path)?),
            (_, false) => {
                return Err(CliError::Schema(format!("{}: only record fields may declare fields", path)));
            }
            (_, true) => {}
        }
        schema = schema.field(field);
    }
    Ok(schema)
}

fn decode_fields(fields: &[FieldDef], object: &Map<String, Json>, prefix: &str) -> std::result::Result<Vec<FieldValue>, String> {
    fields
        .iter()
        .map(|def| {
            let path = join_path(prefix, &def.name);
            decode_field(def, object.get(&def.name).filter(|v| !v.is_null()), &path)
        })
        .collect()
}

fn decode_field(def: &FieldDef, json: Option<&Json>, path: &str) -> std::result::Result<FieldValue, String> {
    match (def.arity, json) {
        (Arity::Single, None) => Err(format!("{}: missing value", path)),
        (Arity::Single, Some(json)) => decode_value(def, json, path).map(FieldValue::Single),
        (Arity::Optional, None) => Ok(FieldValue::Optional(None)),
        (Arity::Optional, Some(json)) => decode_value(def, json, path).map(|v| FieldValue::Optional(Some(v))),
        (Arity::Sequence, None) => Ok(FieldValue::Sequence(Vec::new())),
        (Arity::Sequence, Some(Json::Array(items))) => items
            .iter()
            .map(|item| decode_value(def, item, path))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(FieldValue::Sequence),
        (Arity::Sequence, Some(_)) => Err(format!("{}: expected an array", path)),
    }
}

fn decode_value(def: &FieldDef, json: &Json, path: &str) -> std::result::Result<Value, String> {
    let mismatch = || format!("{}: expected {:?}, found {}", path, def.kind, json);
    let string = || json.as_str().map(str::to_string).ok_or_else(mismatch);

    let value = match def.kind {
        FieldKind::String => Value::String(string()?),
        FieldKind::Id => Value::Identifier(string()?),
        FieldKind::Iri => Value::Iri(string()?),
        FieldKind::Html => Value::Html(string()?),
        FieldKind::RawHtml => Value::RawHtml(string()?),
        FieldKind::Bool => Value::Bool(json.as_bool().ok_or_else(mismatch)?),
        FieldKind::Int => Value::Int(json.as_i64().ok_or_else(mismatch)?),
        FieldKind::UInt => Value::UInt(json.as_u64().ok_or_else(mismatch)?),
        // JSON has no NaN or infinity; accept their spellings as strings.
        FieldKind::Float => Value::Float(match json {
            Json::String(s) => s.parse::<f64>().map_err(|_| mismatch())?,
            _ => json.as_f64().ok_or_else(mismatch)?,
        }),
        FieldKind::Time => Value::Time(decode_time(json).ok_or_else(mismatch)?),
        FieldKind::Interval => Value::Interval(decode_interval(json).ok_or_else(mismatch)?),
        FieldKind::Relation => Value::Relation(decode_relation(json).ok_or_else(mismatch)?),
        FieldKind::Record => {
            let object = json.as_object().ok_or_else(mismatch)?;
            Value::Record(decode_fields(&def.fields, object, path)?)
        }
    };
    Ok(value)
}

fn decode_precision(json: &Map<String, Json>) -> Option<TimePrecision> {
    match json.get("precision") {
        None | Some(Json::Null) => Some(TimePrecision::default()),
        Some(p) => p.as_str().and_then(TimePrecision::parse),
    }
}

fn decode_time(json: &Json) -> Option<TimeValue> {
    match json {
        Json::Number(n) => n.as_i64().map(TimeValue::new),
        Json::Object(o) => {
            let seconds = o.get("timestamp")?.as_i64()?;
            Some(TimeValue::new(seconds).with_precision(decode_precision(o)?))
        }
        _ => None,
    }
}

fn decode_interval(json: &Json) -> Option<IntervalValue> {
    let o = json.as_object()?;
    let bound = |key: &str| match o.get(key) {
        None | Some(Json::Null) => Some(None),
        Some(v) => v.as_i64().map(Some),
    };
    let mut interval = IntervalValue::new(bound("lower")?, bound("upper")?);
    interval.precision = decode_precision(o)?;
    Some(interval)
}

/// `""` is an empty reference; an array names the target by its natural key
fn decode_relation(json: &Json) -> Option<Option<Identifier>> {
    match json {
        Json::String(s) if s.is_empty() => Some(None),
        Json::String(s) => Identifier::from_string(s).ok().map(Some),
        Json::Array(items) => {
            let segments = items
                .iter()
                .map(|s| s.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()?;
            Some(Some(Identifier::generate(segments)))
        }
        _ => None,
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
