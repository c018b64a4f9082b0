//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use claimkit_domain::{Document, MnemonicTable, Property};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format a property catalog.
    pub fn format_catalog(&self, format: CliFormat, properties: &[Property], table: &MnemonicTable) -> Result<String> {
        match format {
            CliFormat::Json => {
                let rows: Vec<serde_json::Value> = properties
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "mnemonic": p.mnemonic,
                            "id": p.id.to_string(),
                            "name": p.name,
                            "description": p.description,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            CliFormat::Table => Ok(self.format_catalog_table(properties)),
            CliFormat::Quiet => Ok(table
                .iter()
                .map(|(mnemonic, id)| format!("{}  {}", mnemonic, id))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format properties as a table.
    fn format_catalog_table(&self, properties: &[Property]) -> String {
        if properties.is_empty() {
            return self.colorize("No properties found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Mnemonic", "ID", "Name", "Description"]);
        for property in properties {
            builder.push_record([
                property.mnemonic.as_str(),
                &property.id.to_string(),
                property.name.as_str(),
                property.description.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format documents as JSON.
    pub fn format_documents(&self, documents: &[Document], pretty: bool) -> Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(documents)?)
        } else {
            Ok(serde_json::to_string(documents)?)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
