//! Transform command implementation.

use super::read_file;
use crate::cli::TransformArgs;
use crate::commands::load_catalog;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::schema_file::SchemaFile;
use claimkit_domain::Document;
use claimkit_transform::{TransformConfig, Transformer};
use std::path::Path;
use tracing::info;

/// Load the transform configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<TransformConfig> {
    match path {
        Some(path) => TransformConfig::from_toml(&read_file(path)?).map_err(CliError::Config),
        None => Ok(TransformConfig::default()),
    }
}

/// Run the engine over the files named by the arguments.
pub fn transform_files(args: &TransformArgs) -> Result<Vec<Document>> {
    let (_, mnemonics) = load_catalog(&args.catalog)?;
    let config = load_config(args.config.as_deref())?;
    let schema = SchemaFile::from_toml(&read_file(&args.schema)?)?;
    let records = schema.decode_records(&read_file(&args.records)?)?;
    info!("Decoded {} records from {}", records.len(), args.records.display());

    let documents = Transformer::new(&mnemonics, config).transform(&records)?;
    Ok(documents)
}

/// Execute the transform command.
pub fn execute_transform(args: TransformArgs, formatter: &Formatter) -> Result<()> {
    let documents = transform_files(&args)?;
    println!("{}", formatter.format_documents(&documents, args.pretty)?);
    eprintln!("{}", formatter.success(&format!("Transformed {} record(s)", documents.len())));
    Ok(())
}
