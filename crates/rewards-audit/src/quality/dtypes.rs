//! Column type summary.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::ColumnKind;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnType {
    pub column: String,
    /// What the source records hold.
    pub kind: ColumnKind,
    /// Dtype of the frame column.
    pub dtype: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummaryReport {
    pub dataset: String,
    pub columns: Vec<ColumnType>,
}

/// Reports the observed type of every column.
pub struct TypeSummaryCheck;

impl TypeSummaryCheck {
    pub fn run(dataset: &Dataset) -> Result<TypeSummaryReport> {
        let mut columns = Vec::with_capacity(dataset.columns().len());
        for info in dataset.columns() {
            let series = dataset.series(&info.name)?;
            columns.push(ColumnType {
                column: info.name.clone(),
                kind: info.kind,
                dtype: format!("{:?}", series.dtype()),
            });
        }

        Ok(TypeSummaryReport {
            dataset: dataset.name().to_string(),
            columns,
        })
    }
}

impl fmt::Display for TypeSummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Data types in {}:", self.dataset)?;
        let width = self.columns.iter().map(|c| c.column.len()).max().unwrap_or(0);
        for column in &self.columns {
            write!(
                f,
                "\n{:<width$}  {:<10} ({})",
                column.column,
                column.kind.to_string(),
                column.dtype
            )?;
        }
        Ok(())
    }
}
