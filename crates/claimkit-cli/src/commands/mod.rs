//! Command implementations.

pub mod catalog;
pub mod transform;

pub use self::catalog::{execute_catalog, load_catalog};
pub use self::transform::{execute_transform, load_config, transform_files};

use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;

/// Read a whole input file, naming it on failure.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
