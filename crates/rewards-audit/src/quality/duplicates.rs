//! Duplicate-record check.
//!
//! Composite cells are already canonical JSON text in the frame, so two
//! records with equal item lists compare equal here. Scalars of different
//! JSON types never compare equal, even when they print the same.

use crate::dataset::Dataset;
use crate::error::Result;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    pub dataset: String,
    pub records: usize,
    /// Records equal to an earlier record across all columns.
    pub duplicates: usize,
}

/// Counts records that repeat an earlier record exactly.
pub struct DuplicateCheck;

impl DuplicateCheck {
    pub fn run(dataset: &Dataset) -> Result<DuplicateReport> {
        let duplicates = if dataset.columns().is_empty() {
            0
        } else {
            let df = dataset.comparison_frame()?;
            if df.width() == 0 {
                // Only all-null columns: every row equals the first.
                dataset.len().saturating_sub(1)
            } else {
                df.height()
                    - df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
                        .height()
            }
        };

        Ok(DuplicateReport {
            dataset: dataset.name().to_string(),
            records: dataset.len(),
            duplicates,
        })
    }
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicate records found in {}: {}",
            self.dataset, self.duplicates
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn users(values: Vec<Value>) -> Dataset {
        Dataset::from_values("Users", values).unwrap()
    }

    #[test]
    fn test_counts_repeats() {
        let dataset = users(vec![
            json!({"_id": {"$oid": "u1"}, "state": "WI"}),
            json!({"_id": {"$oid": "u1"}, "state": "WI"}),
            json!({"_id": {"$oid": "u2"}, "state": "WI"}),
            json!({"_id": {"$oid": "u1"}, "state": "WI"}),
        ]);
        assert_eq!(DuplicateCheck::run(&dataset).unwrap().duplicates, 2);
    }

    #[test]
    fn test_composite_cells_compare_by_value() {
        let dataset = users(vec![
            json!({"items": [{"barcode": "1"}], "userId": "u1"}),
            json!({"items": [{"barcode": "1"}], "userId": "u1"}),
            json!({"items": [{"barcode": "2"}], "userId": "u1"}),
        ]);
        assert_eq!(DuplicateCheck::run(&dataset).unwrap().duplicates, 1);
    }

    #[test]
    fn test_order_independent() {
        let rows = vec![
            json!({"a": 1, "b": "x"}),
            json!({"a": 2, "b": "y"}),
            json!({"a": 1, "b": "x"}),
            json!({"a": 3}),
            json!({"a": 3}),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = DuplicateCheck::run(&users(rows)).unwrap().duplicates;
        let backward = DuplicateCheck::run(&users(reversed)).unwrap().duplicates;
        assert_eq!(forward, 2);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_mixed_scalars_keep_their_type() {
        let dataset = users(vec![
            json!({"code": 1, "active": true}),
            json!({"code": "1", "active": "true"}),
            json!({"code": 1, "active": true}),
        ]);
        assert_eq!(DuplicateCheck::run(&dataset).unwrap().duplicates, 1);
    }

    #[test]
    fn test_all_null_columns_make_rows_equal() {
        let dataset = users(vec![
            json!({"state": null}),
            json!({"state": null}),
            json!({"state": null}),
        ]);
        assert_eq!(DuplicateCheck::run(&dataset).unwrap().duplicates, 2);

        let with_values = users(vec![
            json!({"state": null, "_id": "u1"}),
            json!({"state": null, "_id": "u2"}),
        ]);
        assert_eq!(DuplicateCheck::run(&with_values).unwrap().duplicates, 0);
    }

    #[test]
    fn test_empty_dataset_has_no_duplicates() {
        let report = DuplicateCheck::run(&Dataset::empty("Brands")).unwrap();
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.to_string(), "Duplicate records found in Brands: 0");
    }
}
