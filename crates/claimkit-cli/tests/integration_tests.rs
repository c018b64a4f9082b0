//! Integration tests for claimkit-cli
//!
//! These tests write catalog, schema and record files to a temporary
//! directory and run them through the library and the `claimkit` binary.

use claimkit_cli::cli::TransformArgs;
use claimkit_cli::commands::transform_files;
use claimkit_cli::CliError;
use claimkit_domain::{ClaimKind, Identifier};
use claimkit_transform::{TransformError, ValueHint};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"mnemonic": "NAME", "name": "name"},
    {"mnemonic": "MASS", "name": "mass"},
    {"mnemonic": "TITLE", "name": "title"},
    {"mnemonic": "NOTE", "name": "note"}
]"#;

const SCHEMA: &str = r#"
[[fields]]
name = "Key"
kind = "string"
arity = "sequence"
document_id = true

[[fields]]
name = "Name"
kind = "string"
property = "NAME"

[[fields]]
name = "Mass"
kind = "float"
arity = "optional"
property = "MASS"
unit = "kg"

[[fields]]
name = "Title"
kind = "record"
arity = "optional"
property = "TITLE"
cardinality = "1..1"
default = "unknown"

  [[fields.fields]]
  name = "Text"
  kind = "string"
  value = true

  [[fields.fields]]
  name = "Note"
  kind = "string"
  arity = "optional"
  property = "NOTE"
"#;

const RECORDS: &str = r#"[
    {"Key": ["shop", "1"], "Name": "Widget", "Mass": 0.5,
     "Title": {"Text": "Main Title", "Note": "Important"}},
    {"Key": ["shop", "2"], "Name": "Gadget"}
]"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(records: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
        fs::write(dir.path().join("schema.toml"), SCHEMA).unwrap();
        fs::write(dir.path().join("records.json"), records).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn args(&self) -> TransformArgs {
        TransformArgs {
            catalog: self.path("catalog.json"),
            schema: self.path("schema.toml"),
            records: self.path("records.json"),
            config: None,
            pretty: false,
        }
    }
}

#[test]
fn test_transform_files() {
    let workspace = Workspace::new(RECORDS);
    let docs = transform_files(&workspace.args()).unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, Identifier::generate(["shop", "1"]));
    assert_eq!(docs[0].claim_count(), 4);

    let title_property = Identifier::core_property("TITLE");
    let title = docs[0].claims.by_property(&title_property).next().unwrap();
    assert_eq!(
        title.meta.by_kind(ClaimKind::String)[0].id,
        Identifier::generate(["shop", "1", "TITLE", "0", "NOTE", "0"])
    );

    // The missing title is default-filled.
    assert_eq!(docs[1].claim_count(), 2);
    assert_eq!(docs[1].claims.by_kind(ClaimKind::UnknownValue).len(), 1);
}

#[test]
fn test_transform_with_config() {
    let workspace = Workspace::new(RECORDS);
    fs::write(workspace.path("config.toml"), "claim_confidence = 0.5\n").unwrap();
    let args = TransformArgs {
        config: Some(workspace.path("config.toml")),
        ..workspace.args()
    };
    let docs = transform_files(&args).unwrap();
    assert!(docs[0].walk().all(|c| c.confidence.value() == 0.5));
}

#[test]
fn test_transform_reports_record_error() {
    let workspace = Workspace::new(r#"[{"Key": ["shop", "1"], "Name": "A"}, {"Key": [], "Name": "B"}]"#);
    let err = transform_files(&workspace.args()).unwrap_err();

    let CliError::Transform(err) = err else {
        panic!("expected a transform error, got {:?}", err);
    };
    assert!(matches!(err, TransformError::Record { index: 1, .. }));
    assert_eq!(err.root(), &TransformError::EmptyId { path: "Key".to_string() });
}

#[test]
fn test_schema_error_without_field_values() {
    let workspace = Workspace::new(r#"[{"Key": ["shop", "1"], "Name": "A"}]"#);
    let schema = format!(
        "{}\n[[fields]]\nname = \"Flag\"\nkind = \"bool\"\narity = \"optional\"\nproperty = \"NOTE\"\ntype = \"iri\"\n",
        SCHEMA
    );
    fs::write(workspace.path("schema.toml"), schema).unwrap();

    let CliError::Transform(err) = transform_files(&workspace.args()).unwrap_err() else {
        panic!("expected a transform error");
    };
    assert_eq!(
        err.root(),
        &TransformError::ConflictingHint {
            path: "Flag".to_string(),
            hint: ValueHint::Iri,
            shape: "bool",
        }
    );
}

#[test]
fn test_binary_writes_documents() {
    let workspace = Workspace::new(RECORDS);
    let output = Command::new(env!("CARGO_BIN_EXE_claimkit"))
        .arg("transform")
        .arg("--catalog")
        .arg(workspace.path("catalog.json"))
        .arg("--schema")
        .arg(workspace.path("schema.toml"))
        .arg("--records")
        .arg(workspace.path("records.json"))
        .arg("--no-color")
        .output()
        .unwrap();

    assert!(output.status.success());
    let docs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs.as_array().unwrap().len(), 2);
    assert_eq!(docs[0]["claims"]["amount"][0]["unit"], "kg");
}

#[test]
fn test_binary_fails_on_bad_record() {
    let workspace = Workspace::new(r#"[{"Key": ["shop", "1"], "Name": "A", "Mass": "inf"}]"#);
    let output = Command::new(env!("CARGO_BIN_EXE_claimkit"))
        .arg("transform")
        .arg("--catalog")
        .arg(workspace.path("catalog.json"))
        .arg("-s")
        .arg(workspace.path("schema.toml"))
        .arg("-r")
        .arg(workspace.path("records.json"))
        .arg("--no-color")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Mass: invalid numeric value"));
}

#[test]
fn test_binary_lists_catalog() {
    let workspace = Workspace::new(RECORDS);
    let output = Command::new(env!("CARGO_BIN_EXE_claimkit"))
        .arg("catalog")
        .arg(workspace.path("catalog.json"))
        .arg("--format")
        .arg("quiet")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().unwrap();
    assert_eq!(first, format!("MASS  {}", Identifier::core_property("MASS")));
}
