//! In-memory tabular datasets.
//!
//! A [`Dataset`] keeps two views of the same rows:
//!
//! - the flattened records, with list and object cells preserved, used by
//!   checks that need exact JSON values (references, line-item extraction);
//! - a polars [`DataFrame`] used by the column-oriented checks.
//!
//! Frame columns are typed from what the records hold. Uniform booleans,
//! integers, floats and strings get their native dtype. Composite or mixed
//! columns become text, with non-string cells rendered as canonical JSON so
//! equal values compare equal.

use crate::error::{AuditError, Result, ResultExt};
use crate::loader::flatten_record;
use crate::types::{ColumnInfo, ColumnKind, Record};
use crate::utils::{cell_key, cell_text};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A named table of flattened records.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    records: Vec<Record>,
    columns: Vec<ColumnInfo>,
    frame: DataFrame,
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Build a dataset from already flattened records.
    pub fn from_records(name: impl Into<String>, records: Vec<Record>) -> Result<Self> {
        let name = name.into();
        let columns = collect_columns(&records);
        let frame =
            build_frame(&records, &columns).context(format!("Building table for {name}"))?;

        debug!(
            "{}: {} records, {} columns",
            name,
            records.len(),
            columns.len()
        );

        Ok(Self {
            name,
            records,
            columns,
            frame,
        })
    }

    /// Build a dataset from raw JSON values, flattening each object.
    ///
    /// Values that are not objects cannot become rows and are skipped.
    pub fn from_values(name: impl Into<String>, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        let mut skipped = 0usize;
        let records: Vec<Record> = values
            .iter()
            .filter_map(|value| match value {
                Value::Object(object) => Some(flatten_record(object)),
                _ => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            warn!("{}: skipped {} non-object JSON values", name, skipped);
        }

        Self::from_records(name, records)
    }

    /// A dataset with no rows and no columns.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            columns: Vec::new(),
            frame: DataFrame::empty(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Columns in order of first appearance.
    ///
    /// The kind describes the source records, even after a check has coerced
    /// the frame column.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Borrow a frame column as a series.
    pub fn series(&self, column: &str) -> Result<&Series> {
        if !self.has_column(column) {
            return Err(AuditError::column_not_found(&self.name, column));
        }
        Ok(self.frame.column(column)?.as_materialized_series())
    }

    /// Replace a frame column with a series of the same length.
    pub fn replace_column(&mut self, column: &str, series: Series) -> Result<()> {
        if !self.has_column(column) {
            return Err(AuditError::column_not_found(&self.name, column));
        }
        self.frame
            .replace(column, series)
            .context(format!("Replacing column '{column}' in {}", self.name))?;
        Ok(())
    }

    /// Frame used to compare whole rows.
    ///
    /// Columns with no value at all are left out, since they never tell two
    /// rows apart. Mixed columns are keyed by JSON value, so the number `1`
    /// and the string `"1"` differ here even though they print the same.
    pub fn comparison_frame(&self) -> Result<DataFrame> {
        let mut frame_columns = Vec::with_capacity(self.columns.len());
        for info in &self.columns {
            let series = match info.kind {
                ColumnKind::Empty => continue,
                ColumnKind::Mixed => {
                    let keys: Vec<Option<String>> = self
                        .records
                        .iter()
                        .map(|r| r.get(&info.name).and_then(cell_key))
                        .collect();
                    Series::new(info.name.as_str().into(), keys)
                }
                _ => self.series(&info.name)?.clone(),
            };
            frame_columns.push(series.into_column());
        }

        if frame_columns.is_empty() {
            return Ok(DataFrame::empty());
        }
        DataFrame::new(frame_columns)
            .context(format!("Building comparison table for {}", self.name))
    }

    /// Explode a list column into a new dataset with one row per list element.
    ///
    /// Records whose cell is null, absent, an empty list or not a list
    /// contribute one empty row, so they still show up as a line item whose
    /// fields are all missing. Elements that are not objects are skipped.
    pub fn explode(&self, column: &str, name: impl Into<String>) -> Result<Dataset> {
        if !self.has_column(column) {
            return Err(AuditError::column_not_found(&self.name, column));
        }

        let mut values = Vec::new();
        let mut without_list = 0usize;
        for record in &self.records {
            match record.get(column) {
                Some(Value::Array(items)) if !items.is_empty() => {
                    values.extend(items.iter().cloned())
                }
                _ => {
                    values.push(Value::Object(Record::new()));
                    without_list += 1;
                }
            }
        }

        debug!(
            "{}: exploded '{}' into {} elements ({} records without a list)",
            self.name,
            column,
            values.len(),
            without_list
        );

        Self::from_values(name, values)
    }
}

/// Column names in order of first appearance, with their merged kinds.
fn collect_columns(records: &[Record]) -> Vec<ColumnInfo> {
    let mut columns: Vec<ColumnInfo> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        for (name, value) in record {
            let kind = ColumnKind::of(value);
            match index.get(name) {
                Some(&i) => columns[i].kind = columns[i].kind.merge(kind),
                None => {
                    index.insert(name.clone(), columns.len());
                    columns.push(ColumnInfo {
                        name: name.clone(),
                        kind,
                    });
                }
            }
        }
    }

    columns
}

fn build_frame(records: &[Record], columns: &[ColumnInfo]) -> PolarsResult<DataFrame> {
    if columns.is_empty() {
        return Ok(DataFrame::empty());
    }

    let mut frame_columns = Vec::with_capacity(columns.len());
    for info in columns {
        let cells = records
            .iter()
            .map(|record| record.get(&info.name).filter(|v| !v.is_null()));
        let name: PlSmallStr = info.name.as_str().into();

        let series = match info.kind {
            ColumnKind::Boolean => {
                let values: Vec<Option<bool>> = cells.map(|c| c.and_then(Value::as_bool)).collect();
                Series::new(name, values)
            }
            ColumnKind::Integer => {
                let values: Vec<Option<i64>> = cells.map(|c| c.and_then(Value::as_i64)).collect();
                Series::new(name, values)
            }
            ColumnKind::Float => {
                let values: Vec<Option<f64>> = cells.map(|c| c.and_then(Value::as_f64)).collect();
                Series::new(name, values)
            }
            ColumnKind::Empty => Series::full_null(name, records.len(), &DataType::Null),
            ColumnKind::Text | ColumnKind::Composite | ColumnKind::Mixed => {
                let values: Vec<Option<String>> = cells.map(|c| c.and_then(cell_text)).collect();
                Series::new(name, values)
            }
        };
        frame_columns.push(series.into_column());
    }

    DataFrame::new(frame_columns)
}
