//! Core Transformer implementation

use crate::config::TransformConfig;
use crate::error::{Result, TransformError};
use crate::resolver::{resolve, BoundField, Composite, FieldRole, ResolvedSchema, ValueField};
use crate::schema::{Cardinality, DefaultFill, ValueHint};
use crate::text::{HtmlPolicy, TextSafety};
use crate::value::{FieldValue, Record, Value};
use claimkit_domain::{
    display_path, extend_path, AmountUnit, Claim, ClaimSet, ClaimValue, Document, Identifier,
    MnemonicTable, Segment,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, trace, warn};

/// Transform records with the default configuration
///
/// All-or-nothing: the first failing record aborts the call.
pub fn transform<R: Record>(mnemonics: &MnemonicTable, records: &[R]) -> Result<Vec<Document>> {
    Transformer::new(mnemonics, TransformConfig::default()).transform(records)
}

/// The Transformer turns typed records into documents of claims
pub struct Transformer<'m> {
    mnemonics: &'m MnemonicTable,
    config: TransformConfig,
    text: Box<dyn TextSafety>,
}

impl<'m> Transformer<'m> {
    /// Create a new Transformer using the default HTML policy
    pub fn new(mnemonics: &'m MnemonicTable, config: TransformConfig) -> Self {
        Self {
            mnemonics,
            config,
            text: Box::new(HtmlPolicy::new()),
        }
    }

    /// Replace the text-safety collaborator
    pub fn with_text_safety(mut self, text: impl TextSafety + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    /// The active configuration
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform a batch of records, one document per record, in order
    ///
    /// Records may use different schemas; each record's schema is resolved
    /// before its values are read.
    ///
    /// # Errors
    /// The first failing record aborts the call; the error is wrapped in
    /// [`TransformError::Record`] with the record's position.
    pub fn transform<R: Record>(&self, records: &[R]) -> Result<Vec<Document>> {
        let mut documents = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let document = self.transform_one(record).map_err(|e| TransformError::Record {
                index,
                source: Box::new(e),
            })?;
            documents.push(document);
        }

        info!("Transformed {} records", documents.len());
        Ok(documents)
    }

    /// Transform a single record
    pub fn transform_one<R: Record + ?Sized>(&self, record: &R) -> Result<Document> {
        let schema = resolve(record.schema(), self.mnemonics)?;
        self.build(&schema, record.values())
    }

    fn build(&self, schema: &ResolvedSchema, values: Vec<FieldValue>) -> Result<Document> {
        let segments = find_document_id(schema, &values, "")?.ok_or(TransformError::DocumentIdNotFound)?;
        let path: Vec<Segment> = segments.into_iter().map(Segment::from).collect();

        let mut document = Document::new(Identifier::generate(path.iter().cloned()), self.config.document_score);
        let mut ctx = Context::new(path);

        let tallies = self.walk(schema, &values, "", &mut ctx, &mut document.claims)?;
        self.enforce(&tallies, &mut ctx, &mut document.claims)?;

        debug!(
            "Document {}: {} claims ({} top-level)",
            document.id,
            document.claim_count(),
            document.claims.len()
        );
        Ok(document)
    }

    /// Visit fields in declaration order, flattening embedded records,
    /// adding claims to `out` and returning a tally per bound field
    fn walk<'s>(
        &self,
        schema: &'s ResolvedSchema,
        values: &[FieldValue],
        path: &str,
        ctx: &mut Context,
        out: &mut ClaimSet,
    ) -> Result<Vec<Tally<'s>>> {
        check_field_count(schema, values, path)?;

        let mut tallies = Vec::new();
        for (field, value) in schema.fields.iter().zip(values) {
            match &field.role {
                FieldRole::Skipped | FieldRole::DocumentId | FieldRole::Value(_) => {}
                FieldRole::Embedded(inner) => {
                    if let Some(inner_values) = embedded_values(value, &field.path)? {
                        tallies.extend(self.walk(inner, inner_values, &field.path, ctx, out)?);
                    }
                }
                FieldRole::Bound(bound) => {
                    let accepted = self.bind(&field.path, bound, value, ctx, out)?;
                    tallies.push(Tally {
                        path: &field.path,
                        bound,
                        accepted,
                        default_bounds: value.default_bounds(),
                    });
                }
            }
        }
        Ok(tallies)
    }

    /// Build the claims of one bound field, returning how many were accepted
    fn bind(
        &self,
        path: &str,
        bound: &BoundField,
        value: &FieldValue,
        ctx: &mut Context,
        out: &mut ClaimSet,
    ) -> Result<usize> {
        let mut accepted = 0;
        for v in value.values() {
            let claim = match &bound.composite {
                Some(composite) => self.composite_claim(path, bound, composite, v, ctx)?,
                None => self
                    .dispatch(path, &bound.value, v)?
                    .map(|payload| self.new_claim(ctx, bound, payload)),
            };
            if let Some(claim) = claim {
                out.add(claim)?;
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Build a claim for a value + meta composite
    ///
    /// The meta claims live in their own context keyed by the claim's id
    /// path, so they never collide with the parent's indices.
    fn composite_claim(
        &self,
        path: &str,
        bound: &BoundField,
        composite: &Composite,
        value: &Value,
        ctx: &mut Context,
    ) -> Result<Option<Claim>> {
        let Value::Record(inner_values) = value else {
            return Err(TransformError::UnsupportedFieldType {
                path: path.to_string(),
                shape: value.shape(),
            });
        };
        check_field_count(&composite.fields, inner_values, path)?;

        let index = ctx.peek(&bound.mnemonic);
        let mut meta_ctx = ctx.child(&bound.mnemonic, index);
        let mut meta = ClaimSet::new();
        let tallies = self.walk(&composite.fields, inner_values, path, &mut meta_ctx, &mut meta)?;

        let payload = match composite.value_index {
            Some(i) => {
                let field = &composite.fields.fields[i];
                match &field.role {
                    FieldRole::Value(value_field) => {
                        self.value_payload(&field.path, value_field, &inner_values[i])?
                    }
                    _ => None,
                }
            }
            None => None,
        };

        if payload.is_none() && meta.is_empty() {
            return Ok(None);
        }

        self.enforce(&tallies, &mut meta_ctx, &mut meta)?;

        // NoValue stands in for a missing headline value that still has qualifiers.
        let payload = payload.unwrap_or(ClaimValue::NoValue);
        Ok(Some(self.new_claim(ctx, bound, payload).with_meta(meta)))
    }

    fn value_payload(&self, path: &str, field: &ValueField, value: &FieldValue) -> Result<Option<ClaimValue>> {
        match value {
            FieldValue::Single(v) | FieldValue::Optional(Some(v)) => {
                self.dispatch(path, field, v)
            }
            FieldValue::Optional(None) => Ok(None),
            FieldValue::Sequence(_) => Err(TransformError::UnsupportedFieldType {
                path: path.to_string(),
                shape: "sequence",
            }),
        }
    }

    /// Turn one concrete value into a claim payload; `None` means the value is empty
    ///
    /// Hints and units were checked against the declared kind when the schema
    /// was resolved, so only the value's shape is checked here.
    fn dispatch(&self, path: &str, field: &ValueField, value: &Value) -> Result<Option<ClaimValue>> {
        if let Some(kind) = field.kind.filter(|k| value.kind() != Some(*k)) {
            return Err(TransformError::KindMismatch {
                path: path.to_string(),
                kind,
                shape: value.shape(),
            });
        }

        let payload = match value {
            Value::Relation(target) => target.map(|to| ClaimValue::Relation { to }),
            Value::Time(time) => (!time.timestamp.is_zero()).then(|| ClaimValue::Time {
                timestamp: time.timestamp,
                precision: time.precision,
            }),
            Value::Interval(interval) => match (interval.known_lower(), interval.known_upper()) {
                (None, None) => None,
                (Some(lower), Some(upper)) => Some(ClaimValue::TimeRange {
                    lower,
                    upper,
                    precision: interval.precision,
                }),
                _ => {
                    warn!("{}: interval with one unknown bound recorded as unknown value", path);
                    Some(ClaimValue::UnknownValue)
                }
            },
            Value::Identifier(s) => non_empty(s).map(|v| ClaimValue::Identifier { value: v.to_string() }),
            Value::Iri(s) => non_empty(s).map(|v| ClaimValue::Reference { iri: v.to_string() }),
            Value::Html(s) => non_empty(s).map(|v| self.html_claim(v)),
            Value::RawHtml(s) => non_empty(s).map(|v| self.text_claim(self.text.sanitize(v))),
            Value::String(s) => non_empty(s).map(|v| match field.hint {
                Some(ValueHint::Id) => ClaimValue::Identifier { value: v.to_string() },
                Some(ValueHint::Iri) => ClaimValue::Reference { iri: v.to_string() },
                Some(ValueHint::Html) => self.html_claim(v),
                Some(ValueHint::RawHtml) => self.text_claim(self.text.sanitize(v)),
                _ => ClaimValue::String { value: v.to_string() },
            }),
            Value::Bool(flag) => {
                // TODO: map `true` to an "asserted present" kind once ClaimKind has one.
                let present = match field.hint {
                    Some(ValueHint::Unknown) => ClaimValue::UnknownValue,
                    _ => ClaimValue::NoValue,
                };
                flag.then_some(present)
            }
            Value::Int(n) => Some(amount(path, field.unit, *n as f64)?),
            Value::UInt(n) => Some(amount(path, field.unit, *n as f64)?),
            Value::Float(n) => Some(amount(path, field.unit, *n)?),
            Value::Record(_) => {
                return Err(TransformError::UnsupportedFieldType {
                    path: path.to_string(),
                    shape: value.shape(),
                })
            }
        };
        Ok(payload)
    }

    fn html_claim(&self, text: &str) -> ClaimValue {
        self.text_claim(self.text.sanitize(&self.text.escape(text)))
    }

    fn text_claim(&self, html: String) -> ClaimValue {
        ClaimValue::Text {
            html: BTreeMap::from([(self.config.text_language.clone(), html)]),
        }
    }

    fn new_claim(&self, ctx: &mut Context, bound: &BoundField, payload: ClaimValue) -> Claim {
        let id = ctx.allocate(&bound.mnemonic);
        Claim::new(id, bound.property, self.config.claim_confidence, payload)
    }

    /// Check every tally against its cardinality, default-filling shortfalls
    fn enforce(&self, tallies: &[Tally<'_>], ctx: &mut Context, out: &mut ClaimSet) -> Result<()> {
        for tally in tallies {
            let bounds = tally.bound.cardinality.unwrap_or(tally.default_bounds);
            if bounds.admits(tally.accepted) {
                continue;
            }

            if let Some(max) = bounds.max.filter(|max| tally.accepted > *max) {
                return Err(TransformError::CardinalityExceeded {
                    path: tally.path.to_string(),
                    mnemonic: tally.bound.mnemonic.clone(),
                    max,
                    actual: tally.accepted,
                });
            }

            let min = bounds.min;

            let Some(fill) = tally.bound.default_fill else {
                return Err(TransformError::CardinalityUnmet {
                    path: tally.path.to_string(),
                    mnemonic: tally.bound.mnemonic.clone(),
                    min,
                    actual: tally.accepted,
                });
            };

            for _ in tally.accepted..min {
                let payload = match fill {
                    DefaultFill::None => ClaimValue::NoValue,
                    DefaultFill::Unknown => ClaimValue::UnknownValue,
                };
                let claim = self.new_claim(ctx, tally.bound, payload);
                trace!(
                    "{}: default-filled {} claim {} under {}",
                    tally.path,
                    claim.kind(),
                    claim.id,
                    display_path(&ctx.path)
                );
                out.add(claim)?;
            }
        }
        Ok(())
    }
}

/// Accepted-value count of one bound field within one context
struct Tally<'s> {
    path: &'s str,
    bound: &'s BoundField,
    accepted: usize,
    default_bounds: Cardinality,
}

/// Scratch state of one nesting context: its id path and per-mnemonic counters
///
/// Every mnemonic shares one counter per context, whichever field contributes
/// the claim, so indices are assigned without gaps or collisions.
struct Context {
    path: Vec<Segment>,
    counters: HashMap<String, usize>,
}

impl Context {
    fn new(path: Vec<Segment>) -> Self {
        Self {
            path,
            counters: HashMap::new(),
        }
    }

    /// Next index for the mnemonic, without reserving it
    fn peek(&self, mnemonic: &str) -> usize {
        self.counters.get(mnemonic).copied().unwrap_or(0)
    }

    /// Reserve the next index for the mnemonic and return the claim id
    fn allocate(&mut self, mnemonic: &str) -> Identifier {
        let counter = self.counters.entry(mnemonic.to_string()).or_insert(0);
        let index = *counter;
        *counter += 1;
        Identifier::generate(extend_path(&self.path, [Segment::from(mnemonic), Segment::from(index)]))
    }

    /// Fresh context for the meta claims of the claim at `mnemonic/index`
    fn child(&self, mnemonic: &str, index: usize) -> Context {
        Context::new(extend_path(&self.path, [Segment::from(mnemonic), Segment::from(index)]))
    }
}

fn amount(path: &str, unit: Option<AmountUnit>, value: f64) -> Result<ClaimValue> {
    let unit = unit.ok_or_else(|| TransformError::MissingUnit { path: path.to_string() })?;
    if !value.is_finite() {
        return Err(TransformError::InvalidNumericValue {
            path: path.to_string(),
            value: value.to_string(),
        });
    }
    Ok(ClaimValue::Amount { amount: value, unit })
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn check_field_count(schema: &ResolvedSchema, values: &[FieldValue], path: &str) -> Result<()> {
    if schema.fields.len() != values.len() {
        return Err(TransformError::FieldCountMismatch {
            path: if path.is_empty() { "<record>".to_string() } else { path.to_string() },
            expected: schema.fields.len(),
            actual: values.len(),
        });
    }
    Ok(())
}

/// Values of an embedded record, or `None` when an optional one is absent
fn embedded_values<'v>(value: &'v FieldValue, path: &str) -> Result<Option<&'v [FieldValue]>> {
    match value {
        FieldValue::Single(Value::Record(inner)) | FieldValue::Optional(Some(Value::Record(inner))) => {
            Ok(Some(inner))
        }
        FieldValue::Optional(None) => Ok(None),
        FieldValue::Single(other) | FieldValue::Optional(Some(other)) => {
            Err(TransformError::UnsupportedFieldType {
                path: path.to_string(),
                shape: other.shape(),
            })
        }
        FieldValue::Sequence(_) => Err(TransformError::UnsupportedFieldType {
            path: path.to_string(),
            shape: "sequence",
        }),
    }
}

/// Locate the document-identity segments, searching embedded records
fn find_document_id(schema: &ResolvedSchema, values: &[FieldValue], path: &str) -> Result<Option<Vec<String>>> {
    check_field_count(schema, values, path)?;

    for (field, value) in schema.fields.iter().zip(values) {
        match &field.role {
            FieldRole::DocumentId => return document_segments(value, &field.path).map(Some),
            FieldRole::Embedded(inner) => {
                if let Some(inner_values) = embedded_values(value, &field.path)? {
                    if let Some(segments) = find_document_id(inner, inner_values, &field.path)? {
                        return Ok(Some(segments));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

fn document_segments(value: &FieldValue, path: &str) -> Result<Vec<String>> {
    let FieldValue::Sequence(items) = value else {
        return Err(TransformError::UnsupportedFieldType {
            path: path.to_string(),
            shape: match value {
                FieldValue::Single(v) | FieldValue::Optional(Some(v)) => v.shape(),
                _ => "optional",
            },
        });
    };

    let segments = items
        .iter()
        .map(|item| match item {
            Value::String(s) | Value::Identifier(s) => Ok(s.clone()),
            other => Err(TransformError::UnsupportedFieldType {
                path: path.to_string(),
                shape: other.shape(),
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    if segments.is_empty() {
        return Err(TransformError::EmptyId { path: path.to_string() });
    }
    Ok(segments)
}
