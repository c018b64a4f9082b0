//! claimkit CLI library.
//!
//! This library provides the core functionality for the `claimkit` command-line
//! interface: loading property catalogs, binding schemas and records from
//! files, running the transformer, and formatting output.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod schema_file;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use schema_file::{Arity, FieldDef, FieldKind, JsonRecord, SchemaFile};
