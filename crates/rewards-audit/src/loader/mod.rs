//! JSON dataset loading.
//!
//! A file is first parsed as one JSON document (an array of records or a
//! single record). When that fails, the content is treated as
//! newline-delimited JSON: each line is parsed on its own, lines that fail
//! are skipped and reported, and the rest become records.
//!
//! Parse failures are part of the audit, not errors: they are returned in
//! the [`LoadOutcome`] so the report can show them.

mod flatten;

pub use flatten::{SEPARATOR, flatten_record};

use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::types::LineError;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A loaded dataset together with what went wrong while parsing it.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    /// Why the whole-document parse failed, if it did.
    pub document_error: Option<String>,
    /// Lines skipped during the newline-delimited fallback.
    pub line_errors: Vec<LineError>,
}

/// Report-facing summary of a [`LoadOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadNotes {
    pub dataset: String,
    pub source: String,
    pub records: usize,
    pub columns: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_errors: Vec<LineError>,
}

impl LoadOutcome {
    pub fn notes(&self, source: impl Into<String>) -> LoadNotes {
        LoadNotes {
            dataset: self.dataset.name().to_string(),
            source: source.into(),
            records: self.dataset.len(),
            columns: self.dataset.columns().len(),
            document_error: self.document_error.clone(),
            line_errors: self.line_errors.clone(),
        }
    }
}

impl LoadNotes {
    /// True when nothing usable was loaded.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Loads JSON datasets with a newline-delimited fallback.
pub struct JsonLoader;

impl JsonLoader {
    /// Read and parse a dataset file.
    ///
    /// Only I/O failures are errors; malformed JSON is reported in the outcome.
    pub fn load(path: &Path, name: &str) -> Result<LoadOutcome> {
        info!("Loading {} from {}", name, path.display());
        let content =
            fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
        Self::parse(&content, &path.display().to_string(), name)
    }

    /// Parse dataset content. `source` is only used in messages.
    pub fn parse(content: &str, source: &str, name: &str) -> Result<LoadOutcome> {
        let (values, document_error, line_errors) = match serde_json::from_str::<Value>(content) {
            Ok(Value::Array(items)) => (items, None, Vec::new()),
            Ok(single) => (vec![single], None, Vec::new()),
            Err(e) => {
                warn!("Couldn't load {} as a single JSON object: {}", source, e);
                let (values, line_errors) = Self::parse_lines(content, source);
                (values, Some(e.to_string()), line_errors)
            }
        };

        let dataset = Dataset::from_values(name, values)?;
        if dataset.is_empty() {
            warn!("No valid JSON data found in {}", source);
        } else {
            debug!("{}: loaded {} records from {}", name, dataset.len(), source);
        }

        Ok(LoadOutcome {
            dataset,
            document_error,
            line_errors,
        })
    }

    /// Parse each line as its own JSON value.
    ///
    /// A blank line is not valid JSON and is reported like any other bad line.
    fn parse_lines(content: &str, source: &str) -> (Vec<Value>, Vec<LineError>) {
        let mut values = Vec::new();
        let mut errors = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            match serde_json::from_str::<Value>(line) {
                Ok(value) => values.push(value),
                Err(e) => {
                    let line_no = idx + 1;
                    warn!("Error parsing line {} in {}: {}", line_no, source, e);
                    errors.push(LineError {
                        line: line_no,
                        message: e.to_string(),
                    });
                }
            }
        }

        (values, errors)
    }
}
