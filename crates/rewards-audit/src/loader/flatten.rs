//! Record flattening.
//!
//! Nested objects are projected into dotted column names, so
//! `{"cpg": {"$ref": "Cogs"}}` becomes the column `cpg.$ref`. Lists are kept
//! whole as composite cells. An empty nested object contributes no column.

use crate::types::Record;
use serde_json::{Map, Value};

/// Separator between the segments of a flattened column name.
pub const SEPARATOR: char = '.';

/// Flatten one JSON object into a single-level record.
pub fn flatten_record(object: &Map<String, Value>) -> Record {
    let mut out = Record::new();
    flatten_into(None, object, &mut out);
    out
}

fn flatten_into(prefix: Option<&str>, object: &Map<String, Value>, out: &mut Record) {
    for (key, value) in object {
        let column = match prefix {
            Some(prefix) => format!("{prefix}{SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(Some(&column), nested, out),
            other => {
                out.insert(column, other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_flatten_nested_objects() {
        let record = flatten_record(&object(json!({
            "_id": {"$oid": "601ac115be37ce2ead437551"},
            "barcode": "511111019862",
            "cpg": {"$id": {"$oid": "601ac114be37ce2ead437550"}, "$ref": "Cogs"},
        })));

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["_id.$oid", "barcode", "cpg.$id.$oid", "cpg.$ref"]);
        assert_eq!(record["cpg.$ref"], json!("Cogs"));
    }

    #[test]
    fn test_lists_stay_composite() {
        let record = flatten_record(&object(json!({
            "rewardsReceiptItemList": [{"barcode": "1"}, {"barcode": "2"}],
        })));
        assert_eq!(
            record["rewardsReceiptItemList"],
            json!([{"barcode": "1"}, {"barcode": "2"}])
        );
    }

    #[test]
    fn test_null_kept_and_empty_object_dropped() {
        let record = flatten_record(&object(json!({
            "lastLogin": null,
            "meta": {},
        })));
        assert_eq!(record.len(), 1);
        assert_eq!(record["lastLogin"], Value::Null);
    }
}
