//! Configuration for the data-quality audit.
//!
//! The defaults reproduce the fixed audit over `brands.json`, `receipts.json`
//! and `users.json`. Every knob can be overridden through
//! [`AuditConfig::builder()`] or deserialized from JSON.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default pattern for the email format check.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[\w\.-]+@[\w\.-]+\.\w{2,}$";

/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Configuration for an audit run.
///
/// Use [`AuditConfig::builder()`] to override individual settings.
///
/// # Example
///
/// ```rust,ignore
/// use rewards_audit::config::AuditConfig;
///
/// let config = AuditConfig::builder()
///     .data_dir("exports/2021-03")
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Directory holding the three dataset files.
    /// Default: current directory
    pub data_dir: PathBuf,

    /// Brands file name, relative to `data_dir`.
    pub brands_file: String,

    /// Receipts file name, relative to `data_dir`.
    pub receipts_file: String,

    /// Users file name, relative to `data_dir`.
    pub users_file: String,

    /// Receipt column holding the list of line items.
    pub items_column: String,

    /// Candidate identifier columns in the users dataset, tried in order.
    pub user_id_columns: Vec<String>,

    /// Receipt columns inspected for outliers.
    pub receipt_numeric_columns: Vec<String>,

    /// Line-item columns inspected for outliers.
    pub item_numeric_columns: Vec<String>,

    /// Users column checked against `email_pattern`.
    pub email_column: String,

    /// Regular expression an email must match.
    pub email_pattern: String,

    /// Users column listed by the categorical check.
    pub user_category_column: String,

    /// Receipts column listed by the categorical check.
    pub receipt_category_column: String,

    /// Fence multiplier `k` in `[Q1 - k*IQR, Q3 + k*IQR]`.
    /// Default: 1.5
    pub iqr_multiplier: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            brands_file: "brands.json".to_string(),
            receipts_file: "receipts.json".to_string(),
            users_file: "users.json".to_string(),
            items_column: "rewardsReceiptItemList".to_string(),
            user_id_columns: strings(&["_id.$oid", "_id"]),
            receipt_numeric_columns: strings(&["totalSpent", "bonusPointsEarned", "pointsEarned"]),
            item_numeric_columns: strings(&["finalPrice", "itemPrice", "quantityPurchased"]),
            email_column: "email".to_string(),
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            user_category_column: "state".to_string(),
            receipt_category_column: "rewardsReceiptStatus".to_string(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

impl AuditConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AuditConfigBuilder {
        AuditConfigBuilder::default()
    }

    pub fn brands_path(&self) -> PathBuf {
        self.data_dir.join(&self.brands_file)
    }

    pub fn receipts_path(&self) -> PathBuf {
        self.data_dir.join(&self.receipts_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(self.iqr_multiplier));
        }

        for (field, value) in [
            ("brands_file", &self.brands_file),
            ("receipts_file", &self.receipts_file),
            ("users_file", &self.users_file),
            ("items_column", &self.items_column),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyField(field.to_string()));
            }
        }

        if self.user_id_columns.is_empty() {
            return Err(ConfigValidationError::EmptyField(
                "user_id_columns".to_string(),
            ));
        }

        if let Err(e) = Regex::new(&self.email_pattern) {
            return Err(ConfigValidationError::InvalidPattern {
                pattern: self.email_pattern.clone(),
                reason: e.to_string(),
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be a finite, non-negative number)")]
    InvalidMultiplier(f64),

    #[error("Configuration field '{0}' must not be empty")]
    EmptyField(String),

    #[error("Invalid email pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl From<ConfigValidationError> for crate::error::AuditError {
    fn from(e: ConfigValidationError) -> Self {
        crate::error::AuditError::InvalidConfig(e.to_string())
    }
}

/// Builder for [`AuditConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AuditConfigBuilder {
    data_dir: Option<PathBuf>,
    brands_file: Option<String>,
    receipts_file: Option<String>,
    users_file: Option<String>,
    items_column: Option<String>,
    receipt_numeric_columns: Option<Vec<String>>,
    item_numeric_columns: Option<Vec<String>>,
    email_pattern: Option<String>,
    iqr_multiplier: Option<f64>,
}

impl AuditConfigBuilder {
    /// Set the directory holding the dataset files.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn brands_file(mut self, name: impl Into<String>) -> Self {
        self.brands_file = Some(name.into());
        self
    }

    pub fn receipts_file(mut self, name: impl Into<String>) -> Self {
        self.receipts_file = Some(name.into());
        self
    }

    pub fn users_file(mut self, name: impl Into<String>) -> Self {
        self.users_file = Some(name.into());
        self
    }

    /// Set the receipt column holding line items.
    pub fn items_column(mut self, column: impl Into<String>) -> Self {
        self.items_column = Some(column.into());
        self
    }

    /// Replace the receipt columns inspected for outliers.
    pub fn receipt_numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receipt_numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the line-item columns inspected for outliers.
    pub fn item_numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_numeric_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the regular expression used by the email format check.
    pub fn email_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.email_pattern = Some(pattern.into());
        self
    }

    /// Set the Tukey fence multiplier.
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AuditConfig` or an error if validation fails.
    pub fn build(self) -> Result<AuditConfig, ConfigValidationError> {
        let defaults = AuditConfig::default();
        let config = AuditConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            brands_file: self.brands_file.unwrap_or(defaults.brands_file),
            receipts_file: self.receipts_file.unwrap_or(defaults.receipts_file),
            users_file: self.users_file.unwrap_or(defaults.users_file),
            items_column: self.items_column.unwrap_or(defaults.items_column),
            receipt_numeric_columns: self
                .receipt_numeric_columns
                .unwrap_or(defaults.receipt_numeric_columns),
            item_numeric_columns: self
                .item_numeric_columns
                .unwrap_or(defaults.item_numeric_columns),
            email_pattern: self.email_pattern.unwrap_or(defaults.email_pattern),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuditConfig::default();
        assert_eq!(config.iqr_multiplier, 1.5);
        assert_eq!(config.brands_path(), PathBuf::from("./brands.json"));
        assert_eq!(config.user_id_columns, vec!["_id.$oid", "_id"]);
        assert_eq!(
            config.receipt_numeric_columns,
            vec!["totalSpent", "bonusPointsEarned", "pointsEarned"]
        );
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AuditConfig::builder()
            .data_dir("/data")
            .users_file("accounts.json")
            .iqr_multiplier(3.0)
            .item_numeric_columns(["finalPrice"])
            .build()
            .unwrap();

        assert_eq!(config.users_path(), PathBuf::from("/data/accounts.json"));
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.item_numeric_columns, vec!["finalPrice"]);
        assert_eq!(config.receipts_file, "receipts.json");
    }

    #[test]
    fn test_validation_negative_multiplier() {
        let result = AuditConfig::builder().iqr_multiplier(-1.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidMultiplier(_)
        ));
    }

    #[test]
    fn test_validation_nan_multiplier() {
        let result = AuditConfig::builder().iqr_multiplier(f64::NAN).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_bad_pattern() {
        let result = AuditConfig::builder().email_pattern("([a-z").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn test_validation_empty_file_name() {
        let result = AuditConfig::builder().brands_file("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyField(field) if field == "brands_file"
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{ "data_dir": "exports", "iqr_multiplier": 2.0 }"#;
        let config: AuditConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("exports"));
        assert_eq!(config.iqr_multiplier, 2.0);
        assert_eq!(config.email_column, "email");
        assert!(config.validate().is_ok());
    }
}
