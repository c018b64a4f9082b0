//! Catalog command implementation.

use super::read_file;
use crate::cli::CatalogArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use claimkit_domain::{CatalogEntry, MnemonicTable, Property};
use std::path::Path;
use tracing::info;

/// Load a JSON property catalog and build its mnemonic table.
pub fn load_catalog(path: &Path) -> Result<(Vec<Property>, MnemonicTable)> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(&read_file(path)?)?;
    if entries.is_empty() {
        return Err(CliError::InvalidInput(format!("{} holds no properties", path.display())));
    }

    let properties: Vec<Property> = entries.into_iter().map(Property::from).collect();
    let table = MnemonicTable::from_properties(&properties)?;
    info!("Loaded {} properties from {}", table.len(), path.display());
    Ok((properties, table))
}

/// Execute the catalog command.
pub fn execute_catalog(args: CatalogArgs, formatter: &Formatter) -> Result<()> {
    let (properties, table) = load_catalog(&args.path)?;
    println!("{}", formatter.format_catalog(args.format, &properties, &table)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimkit_domain::{DomainError, Identifier};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn catalog_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_load_catalog() {
        let id = Identifier::generate(["custom", "color"]);
        let file = catalog_file(&format!(
            r#"[{{"mnemonic": "NAME", "name": "name"}}, {{"mnemonic": "COLOR", "name": "color", "id": "{}"}}]"#,
            id
        ));
        let (properties, table) = load_catalog(file.path()).unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(table.get("NAME"), Some(Identifier::core_property("NAME")));
        assert_eq!(table.get("COLOR"), Some(id));
    }

    #[test]
    fn test_duplicate_mnemonic_rejected() {
        let file = catalog_file(r#"[{"mnemonic": "NAME", "name": "a"}, {"mnemonic": "NAME", "name": "b"}]"#);
        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Domain(DomainError::DuplicateMnemonic { .. })));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let file = catalog_file("[]");
        assert!(matches!(load_catalog(file.path()), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().starts_with("Cannot read /nonexistent/catalog.json"));
    }
}
