//! Binding schema resolution
//!
//! Turns a [`RecordSchema`] plus a mnemonic table into a [`ResolvedSchema`]:
//! every bound field gets its property identifier and parsed cardinality, and
//! every schema rule that does not depend on record data is checked once.

use crate::error::{Result, TransformError};
use crate::schema::{Cardinality, DefaultFill, FieldOptions, FieldSchema, RecordSchema, ValueHint, ValueKind};
use claimkit_domain::{AmountUnit, Identifier, MnemonicTable};

/// A schema whose bindings have been checked and resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    /// Fields in declaration order, positional to the record's values
    pub fields: Vec<ResolvedField>,
}

/// One resolved field
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// Dot-joined field path
    pub path: String,
    /// What the engine does with the field
    pub role: FieldRole,
}

/// How the engine treats a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRole {
    /// Never visited
    Skipped,
    /// Holds the document's natural-key segments
    DocumentId,
    /// Record without a binding whose fields are flattened into the parent
    Embedded(ResolvedSchema),
    /// Primary value of the enclosing composite
    Value(ValueField),
    /// Field bound to a property
    Bound(BoundField),
}

/// How the values of a scalar field become claim payloads
///
/// A hint or unit is only present when the kind is declared, and both have
/// been checked against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueField {
    /// Declared value shape
    pub kind: Option<ValueKind>,
    /// Value-kind hint
    pub hint: Option<ValueHint>,
    /// Amount unit, present for numeric kinds
    pub unit: Option<AmountUnit>,
}

/// A field bound to a property
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    /// Bound mnemonic
    pub mnemonic: String,
    /// Resolved property
    pub property: Identifier,
    /// Declared cardinality; arity defaults apply when absent
    pub cardinality: Option<Cardinality>,
    /// Default-fill policy
    pub default_fill: Option<DefaultFill>,
    /// Value rules; empty for composites
    pub value: ValueField,
    /// Inner fields when the field is a value + meta composite
    pub composite: Option<Composite>,
}

/// Inner structure of a value + meta composite
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// Position of the value field, if the composite has one
    pub value_index: Option<usize>,
    /// Inner fields; everything but the value field becomes meta claims
    pub fields: ResolvedSchema,
}

/// Where in the record a field sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The record itself or a record embedded in it
    Record,
    /// Directly inside a bound composite
    Composite,
    /// A record embedded inside a bound composite
    Meta,
}

/// Resolve a record schema against a mnemonic table
///
/// # Errors
/// Fails on the first unknown mnemonic or schema rule violation, in field
/// declaration order, and when the record has zero or several
/// document-identity fields.
pub fn resolve(schema: &RecordSchema, mnemonics: &MnemonicTable) -> Result<ResolvedSchema> {
    let mut document_ids = Vec::new();
    let resolved = resolve_fields(schema, "", Scope::Record, mnemonics, &mut document_ids)?;

    match document_ids.len() {
        0 => Err(TransformError::DocumentIdNotFound),
        1 => Ok(resolved),
        _ => Err(TransformError::MultipleDocumentIds {
            first: document_ids[0].clone(),
            second: document_ids[1].clone(),
        }),
    }
}

fn resolve_fields(
    schema: &RecordSchema,
    prefix: &str,
    scope: Scope,
    mnemonics: &MnemonicTable,
    document_ids: &mut Vec<String>,
) -> Result<ResolvedSchema> {
    let mut fields = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        let path = join_path(prefix, &field.name);
        let role = resolve_field(field, &path, scope, mnemonics, document_ids)?;
        fields.push(ResolvedField { path, role });
    }
    Ok(ResolvedSchema { fields })
}

fn resolve_field(
    field: &FieldSchema,
    path: &str,
    scope: Scope,
    mnemonics: &MnemonicTable,
    document_ids: &mut Vec<String>,
) -> Result<FieldRole> {
    let options = &field.options;

    if options.is_skipped() {
        return Ok(FieldRole::Skipped);
    }

    if field.nested.is_some() {
        check_record_options(options, path)?;
    }

    if options.document_id {
        if scope != Scope::Record {
            return Err(TransformError::MisplacedDocumentId { path: path.to_string() });
        }
        if options.property.is_some() {
            return Err(TransformError::DocumentIdWithProperty { path: path.to_string() });
        }
        document_ids.push(path.to_string());
        return Ok(FieldRole::DocumentId);
    }

    if options.value {
        if scope != Scope::Composite {
            return Err(TransformError::MisplacedValueMarker { path: path.to_string() });
        }
        if options.property.is_some() {
            return Err(TransformError::ValueWithProperty { path: path.to_string() });
        }
        if options.cardinality.is_some() {
            return Err(TransformError::ValueWithCardinality { path: path.to_string() });
        }
        if options.default.is_some() {
            return Err(TransformError::ValueWithDefault { path: path.to_string() });
        }
        if field.nested.is_some() {
            return Err(TransformError::UnsupportedFieldType {
                path: path.to_string(),
                shape: "record",
            });
        }
        return Ok(FieldRole::Value(value_field(options, path)?));
    }

    let Some(mnemonic) = options.mnemonic() else {
        return Ok(match &field.nested {
            Some(nested) => {
                let inner_scope = if scope == Scope::Record { Scope::Record } else { Scope::Meta };
                FieldRole::Embedded(resolve_fields(nested, path, inner_scope, mnemonics, document_ids)?)
            }
            None => FieldRole::Skipped,
        });
    };

    let property = mnemonics.get(mnemonic).ok_or_else(|| TransformError::UnknownMnemonic {
        path: path.to_string(),
        mnemonic: mnemonic.to_string(),
    })?;

    let cardinality = options
        .cardinality
        .as_deref()
        .map(|text| {
            Cardinality::parse(text).map_err(|reason| TransformError::InvalidCardinality {
                path: path.to_string(),
                text: text.to_string(),
                reason,
            })
        })
        .transpose()?;

    if options.default.is_some() && cardinality.map_or(0, |c| c.min) == 0 {
        return Err(TransformError::DefaultWithoutMinimum { path: path.to_string() });
    }

    let (value, composite) = match &field.nested {
        Some(nested) => {
            let fields = resolve_fields(nested, path, Scope::Composite, mnemonics, document_ids)?;
            let mut value_positions = fields
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| matches!(f.role, FieldRole::Value(_)))
                .map(|(i, _)| i);
            let value_index = value_positions.next();
            if value_positions.next().is_some() {
                return Err(TransformError::MultipleValueFields { path: path.to_string() });
            }
            (ValueField::default(), Some(Composite { value_index, fields }))
        }
        None => (value_field(options, path)?, None),
    };

    Ok(FieldRole::Bound(BoundField {
        mnemonic: mnemonic.to_string(),
        property,
        cardinality,
        default_fill: options.default,
        value,
        composite,
    }))
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Check a scalar field's kind, hint and unit against each other
fn value_field(options: &FieldOptions, path: &str) -> Result<ValueField> {
    let Some(kind) = options.kind else {
        if options.hint.is_some() || options.unit.is_some() {
            return Err(TransformError::UndeclaredKind { path: path.to_string() });
        }
        return Ok(ValueField::default());
    };

    if let Some(hint) = options.hint.filter(|h| !kind.accepts(*h)) {
        return Err(TransformError::ConflictingHint {
            path: path.to_string(),
            hint,
            shape: kind.as_str(),
        });
    }

    let unit = match (kind.is_numeric(), options.unit.as_deref()) {
        (true, None) => return Err(TransformError::MissingUnit { path: path.to_string() }),
        (true, Some(symbol)) => Some(AmountUnit::parse(symbol).ok_or_else(|| TransformError::UnknownUnit {
            path: path.to_string(),
            unit: symbol.to_string(),
        })?),
        (false, Some(_)) => {
            return Err(TransformError::MisplacedUnit {
                path: path.to_string(),
                shape: kind.as_str(),
            })
        }
        (false, None) => None,
    };

    Ok(ValueField {
        kind: Some(kind),
        hint: options.hint,
        unit,
    })
}

/// Nested records carry no scalar options
fn check_record_options(options: &FieldOptions, path: &str) -> Result<()> {
    if let Some(kind) = options.kind {
        return Err(TransformError::KindMismatch {
            path: path.to_string(),
            kind,
            shape: "record",
        });
    }
    if let Some(hint) = options.hint {
        return Err(TransformError::ConflictingHint {
            path: path.to_string(),
            hint,
            shape: "record",
        });
    }
    if options.unit.is_some() {
        return Err(TransformError::MisplacedUnit {
            path: path.to_string(),
            shape: "record",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use claimkit_domain::Property;

    fn table() -> MnemonicTable {
        let props = vec![
            Property::core("NAME", "name"),
            Property::core("TITLE", "title"),
            Property::core("NOTE", "note"),
        ];
        MnemonicTable::from_properties(&props).unwrap()
    }

    fn with_id(schema: RecordSchema) -> RecordSchema {
        RecordSchema::new()
            .field(FieldSchema::new("Id").document_id())
            .field(FieldSchema::new("Body").nested(schema))
    }

    fn body(resolved: &ResolvedSchema) -> &ResolvedSchema {
        match &resolved.fields[1].role {
            FieldRole::Embedded(body) => body,
            other => panic!("expected embedded body, got {:?}", other),
        }
    }

    #[test]
    fn test_resolves_bindings() {
        let schema = with_id(
            RecordSchema::new()
                .field(FieldSchema::new("Name").property("NAME"))
                .field(FieldSchema::new("Internal").skip())
                .field(FieldSchema::new("Unbound")),
        );
        let resolved = resolve(&schema, &table()).unwrap();
        assert_eq!(resolved.fields[0].role, FieldRole::DocumentId);

        let body = body(&resolved);
        let FieldRole::Bound(name) = &body.fields[0].role else {
            panic!("expected bound name");
        };
        assert_eq!(body.fields[0].path, "Body.Name");
        assert_eq!(name.mnemonic, "NAME");
        assert_eq!(name.property, Identifier::core_property("NAME"));
        assert_eq!(name.value, ValueField::default());
        assert_eq!(body.fields[1].role, FieldRole::Skipped);
        assert_eq!(body.fields[2].role, FieldRole::Skipped);
    }

    #[test]
    fn test_unknown_mnemonic() {
        let schema = with_id(RecordSchema::new().field(FieldSchema::new("Color").property("COLOR")));
        assert_eq!(
            resolve(&schema, &table()),
            Err(TransformError::UnknownMnemonic {
                path: "Body.Color".to_string(),
                mnemonic: "COLOR".to_string(),
            })
        );
    }

    #[test]
    fn test_document_id_count() {
        let none = RecordSchema::new().field(FieldSchema::new("Name").property("NAME"));
        assert_eq!(resolve(&none, &table()), Err(TransformError::DocumentIdNotFound));

        let two = with_id(RecordSchema::new().field(FieldSchema::new("Other").document_id()));
        assert_eq!(
            resolve(&two, &table()),
            Err(TransformError::MultipleDocumentIds {
                first: "Id".to_string(),
                second: "Body.Other".to_string(),
            })
        );
    }

    #[test]
    fn test_value_marker_rules() {
        let composite = |value: FieldSchema| {
            with_id(RecordSchema::new().field(
                FieldSchema::new("Title")
                    .property("TITLE")
                    .nested(RecordSchema::new().field(value)),
            ))
        };

        let cases = [
            (
                FieldSchema::new("Value").value().property("NAME"),
                TransformError::ValueWithProperty { path: "Body.Title.Value".to_string() },
            ),
            (
                FieldSchema::new("Value").value().cardinality("1.."),
                TransformError::ValueWithCardinality { path: "Body.Title.Value".to_string() },
            ),
            (
                FieldSchema::new("Value").value().default_fill(DefaultFill::None),
                TransformError::ValueWithDefault { path: "Body.Title.Value".to_string() },
            ),
        ];
        for (field, expected) in cases {
            assert_eq!(resolve(&composite(field), &table()), Err(expected));
        }
    }

    #[test]
    fn test_value_marker_outside_composite() {
        let schema = with_id(RecordSchema::new().field(FieldSchema::new("Loose").value()));
        assert_eq!(
            resolve(&schema, &table()),
            Err(TransformError::MisplacedValueMarker { path: "Body.Loose".to_string() })
        );
    }

    #[test]
    fn test_multiple_value_fields() {
        let schema = with_id(RecordSchema::new().field(
            FieldSchema::new("Title").property("TITLE").nested(
                RecordSchema::new()
                    .field(FieldSchema::new("A").value())
                    .field(FieldSchema::new("B").value()),
            ),
        ));
        assert_eq!(
            resolve(&schema, &table()),
            Err(TransformError::MultipleValueFields { path: "Body.Title".to_string() })
        );
    }

    #[test]
    fn test_composite_value_index() {
        let schema = with_id(RecordSchema::new().field(
            FieldSchema::new("Title").property("TITLE").nested(
                RecordSchema::new()
                    .field(FieldSchema::new("Note").property("NOTE"))
                    .field(FieldSchema::new("Value").value()),
            ),
        ));
        let resolved = resolve(&schema, &table()).unwrap();
        let FieldRole::Bound(title) = &body(&resolved).fields[0].role else {
            panic!("expected bound title");
        };
        assert_eq!(title.composite.as_ref().unwrap().value_index, Some(1));
    }

    #[test]
    fn test_cardinality_rules() {
        let bad = with_id(RecordSchema::new().field(FieldSchema::new("Name").property("NAME").cardinality("0..0")));
        assert!(matches!(
            resolve(&bad, &table()),
            Err(TransformError::InvalidCardinality { .. })
        ));

        let no_min = with_id(RecordSchema::new().field(
            FieldSchema::new("Name").property("NAME").cardinality("0..").default_fill(DefaultFill::None),
        ));
        assert_eq!(
            resolve(&no_min, &table()),
            Err(TransformError::DefaultWithoutMinimum { path: "Body.Name".to_string() })
        );

        let undeclared = with_id(RecordSchema::new().field(
            FieldSchema::new("Name").property("NAME").default_fill(DefaultFill::Unknown),
        ));
        assert!(matches!(
            resolve(&undeclared, &table()),
            Err(TransformError::DefaultWithoutMinimum { .. })
        ));
    }

    #[test]
    fn test_document_id_misuse() {
        let bound = RecordSchema::new().field(FieldSchema::new("Id").document_id().property("NAME"));
        assert_eq!(
            resolve(&bound, &table()),
            Err(TransformError::DocumentIdWithProperty { path: "Id".to_string() })
        );

        let nested = with_id(RecordSchema::new().field(
            FieldSchema::new("Title")
                .property("TITLE")
                .nested(RecordSchema::new().field(FieldSchema::new("Key").document_id())),
        ));
        assert_eq!(
            resolve(&nested, &table()),
            Err(TransformError::MisplacedDocumentId { path: "Body.Title.Key".to_string() })
        );
    }

    #[test]
    fn test_kind_checks_hint_and_unit() {
        let field = |f: FieldSchema| with_id(RecordSchema::new().field(f.property("NAME")));

        let resolved = resolve(&field(FieldSchema::new("Mass").kind(ValueKind::Float).unit("kg")), &table()).unwrap();
        let FieldRole::Bound(mass) = &body(&resolved).fields[0].role else {
            panic!("expected bound mass");
        };
        assert_eq!(mass.value.unit, Some(AmountUnit::Kilogram));

        let cases = [
            (
                FieldSchema::new("Flag").kind(ValueKind::Bool).hint(ValueHint::Iri),
                TransformError::ConflictingHint {
                    path: "Body.Flag".to_string(),
                    hint: ValueHint::Iri,
                    shape: "bool",
                },
            ),
            (
                FieldSchema::new("Code").hint(ValueHint::Id),
                TransformError::UndeclaredKind { path: "Body.Code".to_string() },
            ),
            (
                FieldSchema::new("Mass").unit("kg"),
                TransformError::UndeclaredKind { path: "Body.Mass".to_string() },
            ),
            (
                FieldSchema::new("Mass").kind(ValueKind::Int),
                TransformError::MissingUnit { path: "Body.Mass".to_string() },
            ),
            (
                FieldSchema::new("Mass").kind(ValueKind::UInt).unit("stone"),
                TransformError::UnknownUnit {
                    path: "Body.Mass".to_string(),
                    unit: "stone".to_string(),
                },
            ),
            (
                FieldSchema::new("Born").kind(ValueKind::Time).unit("kg"),
                TransformError::MisplacedUnit {
                    path: "Body.Born".to_string(),
                    shape: "time",
                },
            ),
        ];
        for (f, expected) in cases {
            assert_eq!(resolve(&field(f), &table()), Err(expected));
        }
    }

    #[test]
    fn test_composite_rejects_scalar_options() {
        let composite = |title: FieldSchema| {
            with_id(RecordSchema::new().field(
                title
                    .property("TITLE")
                    .nested(RecordSchema::new().field(FieldSchema::new("Text").value())),
            ))
        };

        assert_eq!(
            resolve(&composite(FieldSchema::new("Title").hint(ValueHint::Unknown)), &table()),
            Err(TransformError::ConflictingHint {
                path: "Body.Title".to_string(),
                hint: ValueHint::Unknown,
                shape: "record",
            })
        );
        assert_eq!(
            resolve(&composite(FieldSchema::new("Title").unit("kg")), &table()),
            Err(TransformError::MisplacedUnit {
                path: "Body.Title".to_string(),
                shape: "record",
            })
        );
        assert_eq!(
            resolve(&composite(FieldSchema::new("Title").kind(ValueKind::String)), &table()),
            Err(TransformError::KindMismatch {
                path: "Body.Title".to_string(),
                kind: ValueKind::String,
                shape: "record",
            })
        );
    }

    #[test]
    fn test_value_field_kind_checked() {
        let schema = with_id(RecordSchema::new().field(
            FieldSchema::new("Title").property("TITLE").nested(
                RecordSchema::new().field(FieldSchema::new("Text").value().kind(ValueKind::Html).hint(ValueHint::Id)),
            ),
        ));
        assert_eq!(
            resolve(&schema, &table()),
            Err(TransformError::ConflictingHint {
                path: "Body.Title.Text".to_string(),
                hint: ValueHint::Id,
                shape: "html",
            })
        );
    }
}
