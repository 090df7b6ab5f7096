use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::model::TableType;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("table {index} was not found among {available} table(s)")]
    TableNotFound { index: usize, available: usize },

    #[error("cannot standardize a table of type {0}")]
    UnsupportedTableType(TableType),
}
