//! Integration tests for claimkit-transform
//!
//! These tests drive the public API the way an importer does: a record type
//! with a static binding schema, a catalog-built mnemonic table and a batch.

use claimkit_domain::{
    AmountUnit, CatalogEntry, ClaimKind, ClaimValue, Identifier, MnemonicTable, Property, TimePrecision,
};
use claimkit_transform::{
    resolve, DefaultFill, ErrorClass, FieldSchema, FieldValue, IntervalValue, Record, RecordSchema, TimeValue,
    TransformConfig, TransformError, Transformer, Value, ValueHint, ValueKind,
};
use std::sync::LazyLock;

static PRODUCT_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new()
        .field(FieldSchema::new("Key").document_id())
        .field(FieldSchema::new("Name").property("NAME"))
        .field(FieldSchema::new("Sku").property("SKU").kind(ValueKind::String).hint(ValueHint::Id))
        .field(
            FieldSchema::new("Description")
                .property("DESCRIPTION")
                .kind(ValueKind::String)
                .hint(ValueHint::Html),
        )
        .field(FieldSchema::new("Homepage").property("HOMEPAGE").kind(ValueKind::String).hint(ValueHint::Iri))
        .field(FieldSchema::new("Mass").property("MASS").kind(ValueKind::Float).unit("kg"))
        .field(FieldSchema::new("Released").property("RELEASED"))
        .field(FieldSchema::new("Sold").property("SOLD"))
        .field(FieldSchema::new("Maker").property("MAKER"))
        .field(
            FieldSchema::new("Titles")
                .property("TITLE")
                .cardinality("1..")
                .default_fill(DefaultFill::None)
                .nested(
                    RecordSchema::new()
                        .field(FieldSchema::new("Text").value())
                        .field(FieldSchema::new("Language").property("LANGUAGE")),
                ),
        )
        .field(FieldSchema::new("Discontinued").property("DISCONTINUED"))
        .field(FieldSchema::new("RawPayload").skip())
});

struct Product {
    sku: String,
    name: String,
    description: String,
    homepage: Option<String>,
    mass: Option<f64>,
    released: i64,
    sold: (Option<i64>, Option<i64>),
    maker: Option<Identifier>,
    titles: Vec<(String, String)>,
    discontinued: bool,
}

impl Record for Product {
    fn schema(&self) -> &RecordSchema {
        &PRODUCT_SCHEMA
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::sequence(["catalog", "acme", self.sku.as_str()]),
            FieldValue::single(self.name.as_str()),
            FieldValue::single(self.sku.as_str()),
            FieldValue::single(self.description.as_str()),
            FieldValue::optional(self.homepage.clone()),
            FieldValue::optional(self.mass),
            FieldValue::single(TimeValue::new(self.released).with_precision(TimePrecision::Day)),
            FieldValue::single(IntervalValue::new(self.sold.0, self.sold.1)),
            FieldValue::optional(self.maker),
            FieldValue::Sequence(
                self.titles
                    .iter()
                    .map(|(text, language)| {
                        Value::Record(vec![FieldValue::single(text.as_str()), FieldValue::single(language.as_str())])
                    })
                    .collect(),
            ),
            FieldValue::single(self.discontinued),
            FieldValue::single("ignored"),
        ]
    }
}

fn mnemonics() -> MnemonicTable {
    let catalog = r#"[
        {"mnemonic": "NAME", "name": "name"},
        {"mnemonic": "SKU", "name": "stock keeping unit"},
        {"mnemonic": "DESCRIPTION", "name": "description"},
        {"mnemonic": "HOMEPAGE", "name": "homepage"},
        {"mnemonic": "MASS", "name": "mass"},
        {"mnemonic": "RELEASED", "name": "release date"},
        {"mnemonic": "SOLD", "name": "sales period"},
        {"mnemonic": "MAKER", "name": "manufacturer"},
        {"mnemonic": "TITLE", "name": "title"},
        {"mnemonic": "LANGUAGE", "name": "language"},
        {"mnemonic": "DISCONTINUED", "name": "discontinued", "description": "no longer produced"}
    ]"#;
    let entries: Vec<CatalogEntry> = serde_json::from_str(catalog).unwrap();
    let properties: Vec<Property> = entries.into_iter().map(Property::from).collect();
    MnemonicTable::from_properties(&properties).unwrap()
}

fn widget() -> Product {
    Product {
        sku: "W-1".to_string(),
        name: "Widget".to_string(),
        description: "Small <and> useful.\nSee https://acme.example/w-1".to_string(),
        homepage: Some("https://acme.example".to_string()),
        mass: Some(0.25),
        released: 1_577_836_800,
        sold: (Some(1_577_836_800), Some(1_609_459_200)),
        maker: Some(Identifier::generate(["catalog", "acme", "company"])),
        titles: vec![
            ("Widget".to_string(), "en".to_string()),
            ("Dings".to_string(), "de".to_string()),
        ],
        discontinued: false,
    }
}

#[test]
fn test_full_product_document() {
    let mnemonics = mnemonics();
    let docs = Transformer::new(&mnemonics, TransformConfig::default())
        .transform(&[widget()])
        .unwrap();

    assert_eq!(docs.len(), 1);
    let doc = &docs[0];
    assert_eq!(doc.id, Identifier::generate(["catalog", "acme", "W-1"]));

    let count = |kind| doc.claims.by_kind(kind).len();
    assert_eq!(count(ClaimKind::String), 3);
    assert_eq!(count(ClaimKind::Identifier), 1);
    assert_eq!(count(ClaimKind::Text), 1);
    assert_eq!(count(ClaimKind::Reference), 1);
    assert_eq!(count(ClaimKind::Amount), 1);
    assert_eq!(count(ClaimKind::Time), 1);
    assert_eq!(count(ClaimKind::TimeRange), 1);
    assert_eq!(count(ClaimKind::Relation), 1);
    assert_eq!(count(ClaimKind::NoValue), 0);
    assert_eq!(doc.claim_count(), 12);

    assert!(matches!(
        doc.claims.by_kind(ClaimKind::Amount)[0].value,
        ClaimValue::Amount { unit: AmountUnit::Kilogram, .. }
    ));
    assert!(doc.walk().all(|c| mnemonics.contains_property(&c.property)));
}

#[test]
fn test_title_meta_claims() {
    let mnemonics = mnemonics();
    let doc = Transformer::new(&mnemonics, TransformConfig::default())
        .transform_one(&widget())
        .unwrap();

    let title_property = Identifier::core_property("TITLE");
    let titles: Vec<_> = doc.claims.by_property(&title_property).collect();
    assert_eq!(titles.len(), 2);

    let language = titles[1].meta.by_kind(ClaimKind::String);
    assert_eq!(language.len(), 1);
    assert_eq!(
        language[0].id,
        Identifier::generate(["catalog", "acme", "W-1", "TITLE", "1", "LANGUAGE", "0"])
    );
}

#[test]
fn test_sparse_product_uses_defaults() {
    let mnemonics = mnemonics();
    let sparse = Product {
        description: String::new(),
        homepage: None,
        mass: None,
        released: 0,
        sold: (None, None),
        maker: None,
        titles: Vec::new(),
        ..widget()
    };
    let doc = Transformer::new(&mnemonics, TransformConfig::default())
        .transform_one(&sparse)
        .unwrap();

    // Name, Sku and the default-filled title.
    assert_eq!(doc.claim_count(), 3);
    let filled = doc.claims.by_kind(ClaimKind::NoValue);
    assert_eq!(filled.len(), 1);
    assert_eq!(filled[0].id, Identifier::generate(["catalog", "acme", "W-1", "TITLE", "0"]));
}

#[test]
fn test_repeated_imports_are_idempotent() {
    let mnemonics = mnemonics();
    let transformer = Transformer::new(&mnemonics, TransformConfig::default());
    let first = transformer.transform(&[widget(), widget()]).unwrap();
    let second = transformer.transform(&[widget()]).unwrap();

    assert_eq!(first[0], second[0]);
    assert_eq!(first[0], first[1]);
}

#[test]
fn test_document_serializes_to_json() {
    let mnemonics = mnemonics();
    let doc = Transformer::new(&mnemonics, TransformConfig::default())
        .transform_one(&widget())
        .unwrap();

    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["id"], doc.id.to_string());
    assert_eq!(json["claims"]["string"].as_array().unwrap().len(), 3);
    assert!(json["claims"].get("noValue").is_none());

    let back: claimkit_domain::Document = serde_json::from_value(json).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn test_unknown_mnemonic_is_schema_error() {
    let mut mnemonics = MnemonicTable::new();
    mnemonics.insert("NAME", Identifier::core_property("NAME")).unwrap();

    let err = resolve(&PRODUCT_SCHEMA, &mnemonics).unwrap_err();
    assert_eq!(
        err,
        TransformError::UnknownMnemonic {
            path: "Sku".to_string(),
            mnemonic: "SKU".to_string(),
        }
    );
    assert_eq!(err.class(), ErrorClass::Schema);
}

#[test]
fn test_batch_aborts_on_first_failure() {
    let mnemonics = mnemonics();
    let broken = Product {
        mass: Some(f64::INFINITY),
        ..widget()
    };
    let err = Transformer::new(&mnemonics, TransformConfig::default())
        .transform(&[widget(), broken, widget()])
        .unwrap_err();

    assert!(matches!(err, TransformError::Record { index: 1, .. }));
    assert_eq!(err.path(), Some("Mass"));
    assert_eq!(err.class(), ErrorClass::Data);
}
