//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// claimkit - Turn typed records into documents of deterministic claims.
#[derive(Debug, Parser)]
#[command(name = "claimkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a property catalog and list its mnemonics
    Catalog(CatalogArgs),

    /// Transform JSON records into documents
    Transform(TransformArgs),
}

/// Arguments for the catalog command.
#[derive(Debug, Parser)]
pub struct CatalogArgs {
    /// JSON property catalog
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: CliFormat,
}

/// Arguments for the transform command.
#[derive(Debug, Parser)]
pub struct TransformArgs {
    /// JSON property catalog
    #[arg(long, env = "CLAIMKIT_CATALOG")]
    pub catalog: PathBuf,

    /// TOML binding schema describing the records
    #[arg(short, long)]
    pub schema: PathBuf,

    /// JSON array of records
    #[arg(short, long)]
    pub records: PathBuf,

    /// TOML transform configuration
    #[arg(short, long, env = "CLAIMKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print the documents
    #[arg(long)]
    pub pretty: bool,
}
