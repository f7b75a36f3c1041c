//! Regex format check.

use crate::dataset::Dataset;
use crate::error::{AuditError, Result};
use crate::utils::text_values;
use regex::Regex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatReport {
    pub dataset: String,
    pub column: String,
    /// Human name of the format, e.g. "email".
    pub label: String,
    pub records: usize,
    /// Values that do not match, nulls included.
    pub invalid: usize,
}

/// Counts values that do not match a pattern.
pub struct FormatCheck;

impl FormatCheck {
    pub fn run(dataset: &Dataset, column: &str, pattern: &str, label: &str) -> Result<FormatReport> {
        let re = Regex::new(pattern).map_err(|e| AuditError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let values = text_values(dataset.series(column)?)?;
        let invalid = values
            .iter()
            .filter(|v| !v.as_deref().is_some_and(|s| re.is_match(s)))
            .count();

        Ok(FormatReport {
            dataset: dataset.name().to_string(),
            column: column.to_string(),
            label: label.to_string(),
            records: values.len(),
            invalid,
        })
    }
}

impl fmt::Display for FormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Checking for invalid {} formats in {}:",
            self.label, self.dataset
        )?;
        write!(f, "{} invalid {} entries found.", self.invalid, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EMAIL_PATTERN;
    use serde_json::json;

    fn users() -> Dataset {
        Dataset::from_values(
            "Users",
            vec![
                json!({"email": "jane.doe@example.com"}),
                json!({"email": "no-at-sign.example.com"}),
                json!({"email": "x@y.c"}),
                json!({"email": null}),
                json!({"email": "first_last-2@mail.co.uk"}),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_email_format() {
        let report = FormatCheck::run(&users(), "email", DEFAULT_EMAIL_PATTERN, "email").unwrap();
        assert_eq!(report.records, 5);
        assert_eq!(report.invalid, 3);
        assert_eq!(
            report.to_string(),
            "Checking for invalid email formats in Users:\n3 invalid email entries found."
        );
    }

    #[test]
    fn test_well_formed_never_flagged() {
        let dataset =
            Dataset::from_values("Users", vec![json!({"email": "name@domain.tld"})]).unwrap();
        let report = FormatCheck::run(&dataset, "email", DEFAULT_EMAIL_PATTERN, "email").unwrap();
        assert_eq!(report.invalid, 0);
    }

    #[test]
    fn test_missing_column() {
        let err = FormatCheck::run(&users(), "phone", r"^\d+$", "phone").unwrap_err();
        assert!(err.is_missing_column());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FormatCheck::run(&users(), "email", "([", "email").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATTERN");
    }
}
