//! Categorical consistency check.
//!
//! Lists the distinct values of a column so inconsistent spellings and
//! casing stand out to a reader.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::text_values;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Shown in place of a missing value.
pub const MISSING_SENTINEL: &str = "<missing>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub dataset: String,
    pub column: String,
    /// Distinct values in order of first appearance; `None` is missing.
    pub values: Vec<Option<String>>,
}

/// Collects the distinct values of one column.
pub struct CategoryCheck;

impl CategoryCheck {
    pub fn run(dataset: &Dataset, column: &str) -> Result<CategoryReport> {
        let mut seen = HashSet::new();
        let values = text_values(dataset.series(column)?)?
            .into_iter()
            .filter(|v| seen.insert(v.clone()))
            .collect();

        Ok(CategoryReport {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
            values,
        })
    }
}

impl fmt::Display for CategoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Unique values in '{}' of {}:",
            self.column, self.dataset
        )?;
        let rendered: Vec<&str> = self
            .values
            .iter()
            .map(|v| v.as_deref().unwrap_or(MISSING_SENTINEL))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}
