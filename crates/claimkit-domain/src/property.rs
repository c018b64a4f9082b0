//! Properties and the mnemonic table used to bind record fields to them

use crate::{DomainError, Identifier};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A property that claims are made about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property identifier
    pub id: Identifier,

    /// Short unique code, e.g. `NAME` or `TITLE`
    pub mnemonic: String,

    /// Human-readable name
    pub name: String,

    /// Longer description
    #[serde(default)]
    pub description: String,
}

impl Property {
    /// Create a core property whose identifier is derived from its mnemonic
    pub fn core(mnemonic: impl Into<String>, name: impl Into<String>) -> Self {
        let mnemonic = mnemonic.into();
        Self {
            id: Identifier::core_property(&mnemonic),
            mnemonic,
            name: name.into(),
            description: String::new(),
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Catalog entry as stored in property catalog files
///
/// `id` may be omitted, in which case the core property identifier for the
/// mnemonic is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Optional explicit identifier
    #[serde(default)]
    pub id: Option<Identifier>,
    /// Mnemonic
    pub mnemonic: String,
    /// Name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
}

impl From<CatalogEntry> for Property {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            id: entry
                .id
                .unwrap_or_else(|| Identifier::core_property(&entry.mnemonic)),
            mnemonic: entry.mnemonic,
            name: entry.name,
            description: entry.description,
        }
    }
}

/// One-to-one mapping `mnemonic → property identifier`
///
/// Built once from a property catalog and shared read-only across
/// transformations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MnemonicTable {
    by_mnemonic: HashMap<String, Identifier>,
    properties: HashSet<Identifier>,
}

impl MnemonicTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a property catalog
    ///
    /// # Errors
    /// Fails if two properties share a mnemonic or an identifier
    pub fn from_properties<'a, I>(properties: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = &'a Property>,
    {
        let mut table = Self::new();
        for property in properties {
            table.insert(&property.mnemonic, property.id)?;
        }
        Ok(table)
    }

    /// Add a single binding
    pub fn insert(&mut self, mnemonic: &str, id: Identifier) -> Result<(), DomainError> {
        if let Some(first) = self.by_mnemonic.get(mnemonic) {
            return Err(DomainError::DuplicateMnemonic {
                mnemonic: mnemonic.to_string(),
                first: *first,
                second: id,
            });
        }
        if self.properties.contains(&id) {
            return Err(DomainError::DuplicateProperty(id));
        }
        self.by_mnemonic.insert(mnemonic.to_string(), id);
        self.properties.insert(id);
        Ok(())
    }

    /// Resolve a mnemonic
    pub fn get(&self, mnemonic: &str) -> Option<Identifier> {
        self.by_mnemonic.get(mnemonic).copied()
    }

    /// Whether a property identifier is part of this table
    pub fn contains_property(&self, id: &Identifier) -> bool {
        self.properties.contains(id)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.by_mnemonic.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.by_mnemonic.is_empty()
    }

    /// Iterate bindings sorted by mnemonic
    pub fn iter(&self) -> impl Iterator<Item = (&str, Identifier)> {
        let mut entries: Vec<_> = self
            .by_mnemonic
            .iter()
            .map(|(m, id)| (m.as_str(), *id))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}
