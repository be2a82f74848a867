//! Test cases: records, the sources they are read from, and request
//! preparation.

pub mod discover;
pub mod prepare;
pub mod record;
pub mod source;

pub use discover::{discover_case_files, CaseFiles};
pub use prepare::prepare_request;
pub use record::CaseRecord;
pub use source::{open_case_source, CaseFile, CaseSource, FileKind, RecordList};

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading case sources or preparing requests.
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("{} does not contain a sequence of records", .0.display())]
    NotASequence(PathBuf),

    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("unsupported case file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("no reader available for {0} case files")]
    NoReader(FileKind),

    #[error("row {row} is out of range ({len} records)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("path does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("unsupported HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("unknown data type '{0}', expected json, form or file")]
    UnknownDataType(String),

    #[error("invalid '{column}' column: {reason}")]
    InvalidData { column: &'static str, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
