//! Shared utilities for the audit checks.
//!
//! Numeric coercion, text projection and quantiles live here so every check
//! treats "absent", "not a number" and "text" the same way.

use polars::prelude::*;
use serde_json::Value;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Coercion Utilities
// =============================================================================

/// Parse text as a number, ignoring surrounding whitespace.
///
/// Returns `None` for anything that is not a plain decimal or scientific
/// literal, and for NaN.
pub fn parse_numeric_text(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Coerce a series to `Float64`, turning anything non-numeric into null.
///
/// Numbers pass through, booleans become 1/0, text is parsed with
/// [`parse_numeric_text`]. Composite text and other dtypes become null.
pub fn coerce_numeric(series: &Series) -> PolarsResult<Float64Chunked> {
    let name = series.name().clone();
    let dtype = series.dtype();

    let coerced = if is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean | DataType::Null)
    {
        let cast = series.cast(&DataType::Float64)?;
        cast.f64()?.apply(|v| v.filter(|x| !x.is_nan()))
    } else if matches!(dtype, DataType::String) {
        series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_numeric_text))
            .collect::<Float64Chunked>()
    } else {
        Float64Chunked::full_null(name.clone(), series.len())
    };

    Ok(coerced.with_name(name))
}

/// Project a series to optional text, one entry per row.
///
/// Nulls stay `None`; every other value uses polars' string cast.
pub fn text_values(series: &Series) -> PolarsResult<Vec<Option<String>>> {
    match series.dtype() {
        DataType::Null => Ok(vec![None; series.len()]),
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()),
        _ => {
            let cast = series.cast(&DataType::String)?;
            Ok(cast
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect())
        }
    }
}

// =============================================================================
// JSON Cell Utilities
// =============================================================================

/// Text form of a JSON cell as it appears in the tabular view.
///
/// Strings are kept verbatim, null is `None`, and everything else is its
/// canonical JSON text.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Exact-match key for a JSON cell.
///
/// Unlike [`cell_text`], the string `"1"` and the number `1` get different keys.
pub fn cell_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Quantile of already sorted values, interpolating linearly between ranks.
///
/// The quantile sits at position `q * (n - 1)`; this is the usual default
/// of spreadsheet and dataframe tools. Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_text() {
        assert_eq!(parse_numeric_text(" 26.00 "), Some(26.0));
        assert_eq!(parse_numeric_text("1e3"), Some(1000.0));
        assert_eq!(parse_numeric_text("-4"), Some(-4.0));
        assert_eq!(parse_numeric_text("abc"), None);
        assert_eq!(parse_numeric_text(""), None);
        assert_eq!(parse_numeric_text("NaN"), None);
    }

    #[test]
    fn test_coerce_numeric_from_strings() {
        let series = Series::new("totalSpent".into(), &[Some("1.5"), None, Some("x"), Some("3")]);
        let coerced = coerce_numeric(&series).unwrap();
        assert_eq!(coerced.name().as_str(), "totalSpent");
        let values: Vec<Option<f64>> = coerced.into_iter().collect();
        assert_eq!(values, vec![Some(1.5), None, None, Some(3.0)]);
    }

    #[test]
    fn test_coerce_numeric_from_integers_and_bools() {
        let ints = Series::new("n".into(), &[1i64, 2, 3]);
        let values: Vec<Option<f64>> = coerce_numeric(&ints).unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);

        let bools = Series::new("b".into(), &[true, false]);
        let values: Vec<Option<f64>> = coerce_numeric(&bools).unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_coerce_numeric_frame_column() {
        let df = df!("pointsEarned" => &[Some("500.0"), Some(" 5 "), None]).unwrap();
        let column = df.column("pointsEarned").unwrap().as_materialized_series();
        let coerced = coerce_numeric(column).unwrap();
        assert_eq!(coerced.null_count(), 1);
        assert_eq!(coerced.sum(), Some(505.0));
    }

    #[test]
    fn test_text_values() {
        let series = Series::new("state".into(), &[Some("WI"), None]);
        assert_eq!(
            text_values(&series).unwrap(),
            vec![Some("WI".to_string()), None]
        );

        let ints = Series::new("n".into(), &[Some(7i64), None]);
        assert_eq!(text_values(&ints).unwrap(), vec![Some("7".to_string()), None]);
    }

    #[test]
    fn test_cell_text_and_key() {
        assert_eq!(cell_text(&json!("u1")), Some("u1".to_string()));
        assert_eq!(cell_text(&json!(null)), None);
        assert_eq!(cell_text(&json!([1, 2])), Some("[1,2]".to_string()));

        assert_ne!(cell_key(&json!("1")), cell_key(&json!(1)));
        assert_eq!(cell_key(&json!("u1")), cell_key(&json!("u1")));
    }

    #[test]
    fn test_quantile_sorted() {
        let values = [1.0, 2.0, 3.0, 4.0, 100.0];
        assert_eq!(quantile_sorted(&values, 0.25), Some(2.0));
        assert_eq!(quantile_sorted(&values, 0.75), Some(4.0));
        assert_eq!(quantile_sorted(&values, 0.5), Some(3.0));

        let even = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&even, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(quantile_sorted(&[9.0], 0.75), Some(9.0));
    }
}
