// Roster record loading.
//
// Reads raw player records from a CSV export or a JSON dump. The file
// extension picks the format. Rows that cannot be deserialized at all are
// skipped with a warning; everything else is handed to the core parser,
// which is lenient about cell contents.

use capsheet_core::record::RawPlayerRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("unsupported roster format for {path}: expected .csv or .json")]
    UnsupportedFormat { path: String },
}

// ---------------------------------------------------------------------------
// Source format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
}

impl RecordFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(RecordFormat::Csv),
            "json" => Some(RecordFormat::Json),
            _ => None,
        }
    }
}

/// A JSON dump is either a bare array of records or an object with a
/// `players` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<serde_json::Value>),
    Wrapped { players: Vec<serde_json::Value> },
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

pub fn load_records_from_csv_reader<R: Read>(rdr: R) -> Result<Vec<RawPlayerRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(rdr);
    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<RawPlayerRecord>().enumerate() {
        match result {
            Ok(raw) => records.push(raw),
            Err(e) => {
                warn!("skipping malformed roster row {}: {}", row + 1, e);
            }
        }
    }
    Ok(records)
}

pub fn load_records_from_json_reader<R: Read>(
    rdr: R,
) -> Result<Vec<RawPlayerRecord>, serde_json::Error> {
    let document: JsonDocument = serde_json::from_reader(rdr)?;
    let values = match document {
        JsonDocument::List(values) => values,
        JsonDocument::Wrapped { players } => players,
    };

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawPlayerRecord>(value) {
            Ok(raw) => records.push(raw),
            Err(e) => {
                warn!("skipping malformed roster entry {}: {}", index, e);
            }
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load raw roster records from `path`, choosing CSV or JSON by extension.
pub fn load_records(path: &Path) -> Result<Vec<RawPlayerRecord>, RecordError> {
    let path_str = path.display().to_string();
    let format = RecordFormat::from_path(path).ok_or_else(|| RecordError::UnsupportedFormat {
        path: path_str.clone(),
    })?;

    let file = std::fs::File::open(path).map_err(|e| RecordError::Io {
        path: path_str.clone(),
        source: e,
    })?;

    let records = match format {
        RecordFormat::Csv => load_records_from_csv_reader(file).map_err(|e| RecordError::Csv {
            path: path_str.clone(),
            source: e,
        })?,
        RecordFormat::Json => {
            load_records_from_json_reader(std::io::BufReader::new(file)).map_err(|e| {
                RecordError::Json {
                    path: path_str.clone(),
                    source: e,
                }
            })?
        }
    };

    if records.is_empty() {
        warn!("roster file {} produced zero records", path_str);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
