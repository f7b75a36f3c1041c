//! Outlier detection with Tukey fences.
//!
//! Each requested column is coerced to numbers in place. Values outside
//! `[Q1 - k*IQR, Q3 + k*IQR]` are outliers, with quartiles interpolated
//! linearly between ranks. Columns are treated independently.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utils::{coerce_numeric, quantile_sorted};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Quartiles and the fence built from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TukeyFences {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl TukeyFences {
    /// Fences for sorted values with multiplier `k`. `None` when empty.
    pub fn from_sorted(sorted: &[f64], k: f64) -> Option<Self> {
        let q1 = quantile_sorted(sorted, 0.25)?;
        let q3 = quantile_sorted(sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        })
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutlierOutcome {
    /// Nothing in the column could be read as a number.
    NoNumericData,
    Detected {
        valid_values: usize,
        fences: TukeyFences,
        outliers: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutliers {
    pub column: String,
    #[serde(flatten)]
    pub outcome: OutlierOutcome,
}

impl ColumnOutliers {
    pub fn outlier_count(&self) -> Option<usize> {
        match self.outcome {
            OutlierOutcome::Detected { outliers, .. } => Some(outliers),
            OutlierOutcome::NoNumericData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    pub dataset: String,
    pub columns: Vec<ColumnOutliers>,
}

/// Flags values outside the Tukey fences of their column.
pub struct OutlierCheck;

impl OutlierCheck {
    /// Inspect `columns` of `dataset`, skipping those it does not have.
    ///
    /// Each inspected frame column is replaced by its numeric coercion.
    pub fn run(dataset: &mut Dataset, columns: &[String], k: f64) -> Result<OutlierReport> {
        let mut results = Vec::new();

        for column in columns {
            if !dataset.has_column(column) {
                debug!("{}: no column '{}', skipping", dataset.name(), column);
                continue;
            }

            let coerced = coerce_numeric(dataset.series(column)?)?;
            let outcome = Self::detect(&coerced, k);
            dataset.replace_column(column, coerced.into_series())?;

            if let OutlierOutcome::Detected {
                fences, outliers, ..
            } = &outcome
            {
                debug!(
                    "{}.{}: fences [{:.2}, {:.2}], {} outliers",
                    dataset.name(),
                    column,
                    fences.lower,
                    fences.upper,
                    outliers
                );
            }

            results.push(ColumnOutliers {
                column: column.clone(),
                outcome,
            });
        }

        Ok(OutlierReport {
            dataset: dataset.name().to_string(),
            columns: results,
        })
    }

    fn detect(values: &Float64Chunked, k: f64) -> OutlierOutcome {
        let mut sorted: Vec<f64> = values.into_iter().flatten().collect();
        sorted.sort_by(f64::total_cmp);

        match TukeyFences::from_sorted(&sorted, k) {
            None => OutlierOutcome::NoNumericData,
            Some(fences) => OutlierOutcome::Detected {
                valid_values: sorted.len(),
                outliers: sorted.iter().filter(|v| fences.is_outlier(**v)).count(),
                fences,
            },
        }
    }
}

impl fmt::Display for OutlierReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Outlier detection in {}:", self.dataset)?;
        for column in &self.columns {
            match column.outlier_count() {
                Some(count) => write!(f, "\n{}: {} outliers detected", column.column, count)?,
                None => write!(f, "\n{}: No valid numeric data found.", column.column)?,
            }
        }
        Ok(())
    }
}
