//! Case sources: where case records come from and where results go.
//!
//! A case file is a sequence of flat records: a JSON array of objects or a
//! YAML sequence of mappings. String cells holding valid JSON are parsed, so a
//! spreadsheet-style `"{\"id\": 1}"` cell arrives as an object. Rows whose
//! cells are all empty are skipped.

use super::{CaseError, CaseRecord};
use crate::config::write_yaml;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Format of a case file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Excel,
    Json,
    Yaml,
}

impl FileKind {
    /// Determines the file kind from the path's extension (case-insensitive).
    ///
    /// # Returns
    ///
    /// `Err(CaseError::UnsupportedFileType)` for any extension other than
    /// `.xlsx`, `.xls`, `.json`, `.yaml` and `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, CaseError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xls" => Ok(FileKind::Excel),
            "json" => Ok(FileKind::Json),
            "yaml" | "yml" => Ok(FileKind::Yaml),
            _ => Err(CaseError::UnsupportedFileType(path.to_path_buf())),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Excel => write!(f, "Excel"),
            FileKind::Json => write!(f, "JSON"),
            FileKind::Yaml => write!(f, "YAML"),
        }
    }
}

/// A sequence of case records with a place to record outcomes.
pub trait CaseSource {
    /// Name shown in reports.
    fn name(&self) -> &str;

    /// Records in source order, empty rows already removed.
    fn records(&self) -> &[CaseRecord];

    /// Stores `value` in `column` of the record at `row` (0-based index into
    /// [`records`](CaseSource::records)) and persists the change.
    fn write_result(&mut self, row: usize, column: &str, value: &str) -> Result<(), CaseError>;
}

/// Opens a case file, choosing the reader by extension.
pub fn open_case_source(path: &Path) -> Result<Box<dyn CaseSource>, CaseError> {
    match FileKind::from_path(path)? {
        FileKind::Excel => Err(CaseError::NoReader(FileKind::Excel)),
        FileKind::Json | FileKind::Yaml => Ok(Box::new(CaseFile::open(path)?)),
    }
}

/// Case records backed by a JSON or YAML file.
#[derive(Debug, Clone)]
pub struct CaseFile {
    path: PathBuf,
    name: String,
    kind: FileKind,
    rows: Vec<Value>,
    positions: Vec<usize>,
    records: Vec<CaseRecord>,
}

impl CaseFile {
    /// Reads and parses a JSON or YAML case file.
    pub fn open(path: &Path) -> Result<Self, CaseError> {
        let kind = FileKind::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document: Value = match kind {
            FileKind::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            FileKind::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            FileKind::Excel => return Err(CaseError::NoReader(kind)),
        }
        .map_err(|reason| CaseError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;

        let rows = match document {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            _ => return Err(CaseError::NotASequence(path.to_path_buf())),
        };

        let (positions, records) = parse_rows(&rows)?;
        debug!(path = %path.display(), records = records.len(), "opened case file");

        Ok(Self {
            path: path.to_path_buf(),
            name: path.display().to_string(),
            kind,
            rows,
            positions,
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    fn save(&self) -> Result<(), CaseError> {
        match self.kind {
            FileKind::Json => {
                let content = serde_json::to_string_pretty(&self.rows).map_err(|e| {
                    CaseError::Parse {
                        path: self.path.clone(),
                        reason: e.to_string(),
                    }
                })?;
                fs::write(&self.path, content).map_err(|source| CaseError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
            FileKind::Yaml => Ok(write_yaml(&self.path, &self.rows)?),
            FileKind::Excel => Err(CaseError::NoReader(self.kind)),
        }
    }
}

impl CaseSource for CaseFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    fn write_result(&mut self, row: usize, column: &str, value: &str) -> Result<(), CaseError> {
        let position = *self.positions.get(row).ok_or(CaseError::RowOutOfRange {
            row,
            len: self.records.len(),
        })?;

        if let Some(Value::Object(cells)) = self.rows.get_mut(position) {
            cells.insert(column.to_string(), Value::String(value.to_string()));
        }
        self.save()
    }
}

/// Case records held in memory. Results are kept alongside the records.
#[derive(Debug, Clone, Default)]
pub struct RecordList {
    name: String,
    records: Vec<CaseRecord>,
    results: Vec<Map<String, Value>>,
}

impl RecordList {
    pub fn new(name: impl Into<String>, records: Vec<CaseRecord>) -> Self {
        let results = vec![Map::new(); records.len()];
        Self {
            name: name.into(),
            records,
            results,
        }
    }

    /// Builds a list from raw rows, applying the same cell handling as files.
    pub fn from_rows(name: impl Into<String>, rows: &[Value]) -> Result<Self, CaseError> {
        let (_, records) = parse_rows(rows)?;
        Ok(Self::new(name, records))
    }

    /// Value written to `column` of `row`, if any.
    pub fn result(&self, row: usize, column: &str) -> Option<&str> {
        self.results.get(row)?.get(column)?.as_str()
    }
}

impl CaseSource for RecordList {
    fn name(&self) -> &str {
        &self.name
    }

    fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    fn write_result(&mut self, row: usize, column: &str, value: &str) -> Result<(), CaseError> {
        let len = self.records.len();
        let cells = self
            .results
            .get_mut(row)
            .ok_or(CaseError::RowOutOfRange { row, len })?;
        cells.insert(column.to_string(), Value::String(value.to_string()));
        Ok(())
    }
}

/// Turns raw rows into records, returning each record's row position.
fn parse_rows(rows: &[Value]) -> Result<(Vec<usize>, Vec<CaseRecord>), CaseError> {
    let mut positions = Vec::new();
    let mut records = Vec::new();

    for (position, row) in rows.iter().enumerate() {
        let Value::Object(cells) = row else {
            return Err(CaseError::InvalidRecord {
                row: position,
                reason: "expected a mapping of column names to cells".to_string(),
            });
        };

        if cells.values().all(is_empty_cell) {
            debug!(row = position, "skipping empty row");
            continue;
        }

        let parsed: Map<String, Value> = cells
            .iter()
            .map(|(column, cell)| (column.clone(), parse_cell(cell)))
            .collect();

        let record = serde_json::from_value(Value::Object(parsed)).map_err(|e| {
            CaseError::InvalidRecord {
                row: position,
                reason: e.to_string(),
            }
        })?;

        positions.push(position);
        records.push(record);
    }

    Ok((positions, records))
}

fn is_empty_cell(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Parses string cells that hold valid JSON; anything else is kept as is.
pub(crate) fn parse_cell(cell: &Value) -> Value {
    match cell {
        Value::String(text) => {
            serde_json::from_str(text.trim()).unwrap_or_else(|_| cell.clone())
        }
        _ => cell.clone(),
    }
}
