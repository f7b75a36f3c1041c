//! Missing-value check.

use crate::dataset::Dataset;
use crate::error::Result;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Null count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCount {
    pub column: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingValueReport {
    pub dataset: String,
    pub records: usize,
    pub columns: Vec<ColumnCount>,
    /// Sum of the per-column counts.
    pub total: usize,
}

/// Counts absent or null cells per column.
pub struct MissingValueCheck;

impl MissingValueCheck {
    pub fn run(dataset: &Dataset) -> Result<MissingValueReport> {
        let mut columns = Vec::with_capacity(dataset.columns().len());
        for name in dataset.column_names() {
            let count = dataset.series(name)?.null_count();
            debug!("{}.{}: {} missing", dataset.name(), name, count);
            columns.push(ColumnCount {
                column: name.to_string(),
                count,
            });
        }

        let total = columns.iter().map(|c| c.count).sum();
        Ok(MissingValueReport {
            dataset: dataset.name().to_string(),
            records: dataset.len(),
            columns,
            total,
        })
    }
}

impl fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checking for missing values in {}:", self.dataset)?;
        let width = self.columns.iter().map(|c| c.column.len()).max().unwrap_or(0);
        for column in &self.columns {
            writeln!(f, "{:<width$}  {:>6}", column.column, column.count)?;
        }
        write!(f, "Total missing values in {}: {}", self.dataset, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn brands() -> Dataset {
        Dataset::from_values(
            "Brands",
            vec![
                json!({"barcode": "1", "category": "Baking", "topBrand": false}),
                json!({"barcode": "2", "category": null}),
                json!({"barcode": "3"}),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_counts_null_and_absent() {
        let report = MissingValueCheck::run(&brands()).unwrap();
        let counts: Vec<(&str, usize)> = report
            .columns
            .iter()
            .map(|c| (c.column.as_str(), c.count))
            .collect();
        assert_eq!(counts, vec![("barcode", 0), ("category", 2), ("topBrand", 2)]);
        assert_eq!(report.total, 4);
    }

    #[test]
    fn test_counts_bounded_by_records_and_total_is_sum() {
        let report = MissingValueCheck::run(&brands()).unwrap();
        assert!(report.columns.iter().all(|c| c.count <= report.records));
        assert_eq!(
            report.total,
            report.columns.iter().map(|c| c.count).sum::<usize>()
        );
    }

    #[test]
    fn test_display() {
        let text = MissingValueCheck::run(&brands()).unwrap().to_string();
        assert!(text.starts_with("Checking for missing values in Brands:"));
        assert!(text.ends_with("Total missing values in Brands: 4"));
    }

    #[test]
    fn test_empty_dataset() {
        let report = MissingValueCheck::run(&Dataset::empty("Users")).unwrap();
        assert!(report.columns.is_empty());
        assert_eq!(report.total, 0);
    }
}
