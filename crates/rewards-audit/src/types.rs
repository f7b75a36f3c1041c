use serde::{Deserialize, Serialize};
use std::fmt;

/// A flattened record: dotted column name to cell value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// What a column holds, as observed over its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every cell is null or absent.
    Empty,
    Boolean,
    Integer,
    Float,
    Text,
    /// At least one list or object cell.
    Composite,
    /// Scalars of more than one kind.
    Mixed,
}

impl ColumnKind {
    /// Kind of a single non-null JSON value.
    pub fn of(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Empty,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() => Self::Integer,
            Value::Number(_) => Self::Float,
            Value::String(_) => Self::Text,
            Value::Array(_) | Value::Object(_) => Self::Composite,
        }
    }

    /// Combine the kind seen so far with the kind of the next cell.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Empty, b) => b,
            (a, Self::Empty) => a,
            (Self::Composite, _) | (_, Self::Composite) => Self::Composite,
            (Self::Integer, Self::Float) | (Self::Float, Self::Integer) => Self::Float,
            _ => Self::Mixed,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Composite => "composite",
            Self::Mixed => "mixed",
        };
        f.write_str(name)
    }
}

/// Name and observed kind of one dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
}

/// A line of a newline-delimited file that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_values() {
        assert_eq!(ColumnKind::of(&json!(true)), ColumnKind::Boolean);
        assert_eq!(ColumnKind::of(&json!(3)), ColumnKind::Integer);
        assert_eq!(ColumnKind::of(&json!(3.5)), ColumnKind::Float);
        assert_eq!(ColumnKind::of(&json!("x")), ColumnKind::Text);
        assert_eq!(ColumnKind::of(&json!([1])), ColumnKind::Composite);
        assert_eq!(ColumnKind::of(&json!(null)), ColumnKind::Empty);
    }

    #[test]
    fn test_merge() {
        assert_eq!(ColumnKind::Empty.merge(ColumnKind::Text), ColumnKind::Text);
        assert_eq!(ColumnKind::Integer.merge(ColumnKind::Float), ColumnKind::Float);
        assert_eq!(ColumnKind::Text.merge(ColumnKind::Integer), ColumnKind::Mixed);
        assert_eq!(ColumnKind::Text.merge(ColumnKind::Composite), ColumnKind::Composite);
        assert_eq!(ColumnKind::Boolean.merge(ColumnKind::Boolean), ColumnKind::Boolean);
    }
}
