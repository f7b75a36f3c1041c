//! The audit report.
//!
//! [`AuditReport`] gathers the load notes and every check's section. Its
//! `Display` output is the human-readable report printed by the CLI; its
//! `Serialize` output backs `--json`.
//!
//! # Example
//!
//! ```rust,ignore
//! let report = Audit::builder().build()?.run()?;
//! println!("{report}");
//! println!("{}", report.to_json_pretty()?);
//! ```

use crate::error::Result;
use crate::loader::LoadNotes;
use crate::quality::{
    CategoryReport, DuplicateReport, FormatReport, MissingValueReport, OutlierReport,
    ReferenceReport, TypeSummaryReport,
};
use chrono::Local;
use serde::Serialize;
use std::fmt;

/// Final line of a successful run.
pub const COMPLETION_MESSAGE: &str = "Data quality checks completed successfully!";

/// Everything an audit run found, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub loads: Vec<LoadNotes>,
    pub missing_values: Vec<MissingValueReport>,
    pub duplicates: Vec<DuplicateReport>,
    pub data_types: Vec<TypeSummaryReport>,
    pub references: ReferenceReport,
    pub outliers: Vec<OutlierReport>,
    /// Empty when the format column does not exist.
    pub formats: Vec<FormatReport>,
    pub categories: Vec<CategoryReport>,
}

impl AuditReport {
    /// Start a report stamped with the current local time.
    pub(crate) fn new(loads: Vec<LoadNotes>, references: ReferenceReport) -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            loads,
            missing_values: Vec::new(),
            duplicates: Vec::new(),
            data_types: Vec::new(),
            references,
            outliers: Vec::new(),
            formats: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total lines skipped across all newline-delimited loads.
    pub fn skipped_lines(&self) -> usize {
        self.loads.iter().map(|l| l.line_errors.len()).sum()
    }
}

impl fmt::Display for LoadNotes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::new();
        if let Some(error) = &self.document_error {
            lines.push(format!(
                "Couldn't load {} as a single JSON object: {}",
                self.source, error
            ));
        }
        for error in &self.line_errors {
            lines.push(format!(
                "Error parsing line {} in {}: {}",
                error.line, self.source, error.message
            ));
        }
        if self.is_empty() {
            lines.push(format!("Warning: No valid JSON data found in {}", self.source));
        }
        f.write_str(&lines.join("\n"))
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for notes in &self.loads {
            let text = notes.to_string();
            if !text.is_empty() {
                writeln!(f, "{text}")?;
            }
        }

        for section in &self.missing_values {
            write!(f, "\n{section}\n")?;
        }
        for section in &self.duplicates {
            write!(f, "\n{section}\n")?;
        }
        for section in &self.data_types {
            write!(f, "\n{section}\n")?;
        }
        write!(f, "\n{}\n", self.references)?;
        for section in &self.outliers {
            write!(f, "\n{section}\n")?;
        }
        for section in &self.formats {
            write!(f, "\n{section}\n")?;
        }
        for section in &self.categories {
            write!(f, "\n{section}\n")?;
        }

        write!(f, "\n{COMPLETION_MESSAGE}")
    }
}
