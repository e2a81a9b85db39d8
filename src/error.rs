//! Error taxonomy for dataset loading and pipeline execution.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Required input table '{table}' not found at {}", path.display())]
    MissingInput { table: String, path: PathBuf },

    #[error("Schema error in table '{table}', column '{column}': {reason}")]
    Schema {
        table: String,
        column: String,
        reason: String,
    },

    #[error("CSV error in table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
