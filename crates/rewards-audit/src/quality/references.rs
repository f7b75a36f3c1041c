//! Referential integrity between receipts, users and brands.
//!
//! Two relations are checked:
//!
//! - every receipt's user reference must name an existing user id;
//! - every receipt line item's barcode must name an existing brand barcode.
//!
//! References compare by exact JSON value. A null or absent reference never
//! matches. A receipt with no line items counts as one line item without a
//! barcode.

use crate::dataset::Dataset;
use crate::error::{AuditError, Result};
use crate::types::Record;
use crate::utils::cell_key;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Column names the reference check reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceColumns {
    /// Receipt column referencing a user.
    pub user_ref: String,
    /// User id columns, tried in order.
    pub user_ids: Vec<String>,
    /// Receipt column holding line items.
    pub items: String,
    /// Barcode column, on both line items and brands.
    pub barcode: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            user_ref: "userId".to_string(),
            user_ids: vec!["_id.$oid".to_string(), "_id".to_string()],
            items: "rewardsReceiptItemList".to_string(),
            barcode: "barcode".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceReport {
    /// Columns available on the users dataset.
    pub users_columns: Vec<String>,
    /// The users column the receipts were matched against.
    pub user_id_column: String,
    pub receipts: usize,
    pub invalid_user_refs: usize,
    pub line_items: usize,
    pub invalid_barcode_refs: usize,
}

/// Validates foreign-key style references across the three datasets.
pub struct ReferenceCheck;

impl ReferenceCheck {
    pub fn run(
        receipts: &Dataset,
        users: &Dataset,
        brands: &Dataset,
        columns: &ReferenceColumns,
    ) -> Result<ReferenceReport> {
        let user_id_column = columns
            .user_ids
            .iter()
            .find(|c| users.has_column(c))
            .ok_or_else(|| AuditError::column_not_found(users.name(), columns.user_ids.join("' or '")))?;
        if !receipts.has_column(&columns.user_ref) {
            return Err(AuditError::column_not_found(receipts.name(), &columns.user_ref));
        }
        if !brands.has_column(&columns.barcode) {
            return Err(AuditError::column_not_found(brands.name(), &columns.barcode));
        }

        let user_ids = key_set(users.records(), user_id_column);
        let invalid_user_refs = count_dangling(receipts.records(), &columns.user_ref, &user_ids);
        debug!(
            "{} of {} receipts reference an unknown user",
            invalid_user_refs,
            receipts.len()
        );

        let items = receipts.explode(&columns.items, "Receipt Items")?;
        let barcodes = key_set(brands.records(), &columns.barcode);
        let invalid_barcode_refs = count_dangling(items.records(), &columns.barcode, &barcodes);
        debug!(
            "{} of {} line items reference an unknown barcode",
            invalid_barcode_refs,
            items.len()
        );

        Ok(ReferenceReport {
            users_columns: users.column_names().iter().map(|c| c.to_string()).collect(),
            user_id_column: user_id_column.clone(),
            receipts: receipts.len(),
            invalid_user_refs,
            line_items: items.len(),
            invalid_barcode_refs,
        })
    }
}

fn key_set(records: &[Record], column: &str) -> HashSet<String> {
    records
        .iter()
        .filter_map(|r| r.get(column))
        .filter_map(cell_key)
        .collect()
}

fn count_dangling(records: &[Record], column: &str, targets: &HashSet<String>) -> usize {
    records
        .iter()
        .filter(|r| match r.get(column).and_then(cell_key) {
            Some(key) => !targets.contains(&key),
            None => true,
        })
        .count()
}

impl fmt::Display for ReferenceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checking foreign key references...")?;
        writeln!(
            f,
            "Available columns in users: [{}]",
            self.users_columns.join(", ")
        )?;
        writeln!(
            f,
            "Invalid user references in receipts: {}",
            self.invalid_user_refs
        )?;
        write!(
            f,
            "Invalid barcode references in receipt items: {}",
            self.invalid_barcode_refs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn dataset(name: &str, values: Vec<Value>) -> Dataset {
        Dataset::from_values(name, values).unwrap()
    }

    fn brands() -> Dataset {
        dataset(
            "Brands",
            vec![json!({"barcode": "111"}), json!({"barcode": "222"})],
        )
    }

    fn users() -> Dataset {
        dataset(
            "Users",
            vec![json!({"_id": {"$oid": "u1"}}), json!({"_id": {"$oid": "u2"}})],
        )
    }

    #[test]
    fn test_unknown_user_counted_once() {
        let receipts = dataset(
            "Receipts",
            vec![
                json!({"userId": "u1", "rewardsReceiptItemList": [{"barcode": "111"}]}),
                json!({"userId": "u3", "rewardsReceiptItemList": [
                    {"barcode": "111"}, {"barcode": "222"}, {"barcode": "111"}
                ]}),
            ],
        );

        let report =
            ReferenceCheck::run(&receipts, &users(), &brands(), &ReferenceColumns::default())
                .unwrap();
        assert_eq!(report.invalid_user_refs, 1);
        assert_eq!(report.line_items, 4);
        assert_eq!(report.invalid_barcode_refs, 0);
        assert_eq!(report.user_id_column, "_id.$oid");
    }

    #[test]
    fn test_unknown_and_missing_barcodes() {
        let receipts = dataset(
            "Receipts",
            vec![
                json!({"userId": "u1", "rewardsReceiptItemList": [
                    {"barcode": "999"}, {"description": "no barcode"}, {"barcode": "222"}
                ]}),
                json!({"userId": "u2"}),
            ],
        );

        let report =
            ReferenceCheck::run(&receipts, &users(), &brands(), &ReferenceColumns::default())
                .unwrap();
        // The receipt without items adds one empty, invalid line item
        assert_eq!(report.line_items, 4);
        assert_eq!(report.invalid_barcode_refs, 3);
        assert_eq!(report.invalid_user_refs, 0);
    }

    #[test]
    fn test_receipts_without_items_count_as_invalid() {
        let brands = dataset("Brands", vec![json!({"barcode": "111"})]);
        let receipts = dataset(
            "Receipts",
            vec![
                json!({"userId": "u1", "rewardsReceiptItemList": [{"barcode": "111"}]}),
                json!({"userId": "u1"}),
                json!({"userId": "u2", "rewardsReceiptItemList": []}),
            ],
        );

        let report =
            ReferenceCheck::run(&receipts, &users(), &brands, &ReferenceColumns::default())
                .unwrap();
        assert_eq!(report.line_items, 3);
        assert_eq!(report.invalid_barcode_refs, 2);
    }

    #[test]
    fn test_flat_id_fallback() {
        let users = dataset("Users", vec![json!({"_id": "u1"})]);
        let receipts = dataset(
            "Receipts",
            vec![json!({"userId": "u1", "rewardsReceiptItemList": []})],
        );

        let report =
            ReferenceCheck::run(&receipts, &users, &brands(), &ReferenceColumns::default())
                .unwrap();
        assert_eq!(report.user_id_column, "_id");
        assert_eq!(report.invalid_user_refs, 0);
    }

    #[test]
    fn test_null_reference_is_invalid() {
        let receipts = dataset(
            "Receipts",
            vec![
                json!({"userId": null, "rewardsReceiptItemList": []}),
                json!({"userId": "u2", "rewardsReceiptItemList": []}),
            ],
        );
        let report =
            ReferenceCheck::run(&receipts, &users(), &brands(), &ReferenceColumns::default())
                .unwrap();
        assert_eq!(report.invalid_user_refs, 1);
    }

    #[test]
    fn test_missing_user_ref_column_is_error() {
        let receipts = dataset("Receipts", vec![json!({"rewardsReceiptItemList": []})]);
        let err = ReferenceCheck::run(&receipts, &users(), &brands(), &ReferenceColumns::default())
            .unwrap_err();
        assert!(err.is_missing_column());
    }
}
