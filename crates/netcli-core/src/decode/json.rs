//! Helpers for the table/row JSON convention.
//!
//! Devices nest each homogeneous record list inside a named wrapper object:
//! `{"TABLE_x": {"ROW_x": [ {...}, {...} ]}}`. A one-row table may carry a
//! bare object instead of an array, and scalar fields arrive as strings or
//! numbers depending on the software release.

use crate::dialect::CommandFamily;
use crate::error::DecodeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a whole payload into `T`.
///
/// An empty payload decodes to `T::default()` (every table absent).
pub fn decode_document<T>(family: CommandFamily, payload: &str) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Default,
{
    if payload.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(payload).map_err(|e| {
        let err = DecodeError::new(family, e.to_string());
        match byte_offset(payload, e.line(), e.column()) {
            Some(offset) => err.at(offset),
            None => err,
        }
    })
}

/// Translate serde_json's 1-based line/column into a byte offset.
fn byte_offset(payload: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }

    let line_start: usize = payload
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();

    Some((line_start + column.saturating_sub(1)).min(payload.len()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// `deserialize_with` for `ROW_*` members: array, single object or null.
pub fn rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(rows)) => rows,
        Some(OneOrMany::One(row)) => vec![row],
        None => Vec::new(),
    })
}

/// `deserialize_with` for `TABLE_*` and other wrapper objects: null reads
/// as an absent table.
pub fn table<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `deserialize_with` for scalar fields: strings pass through, numbers and
/// booleans are rendered, null becomes empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Doc {
        #[serde(rename = "TABLE_item", default, deserialize_with = "table")]
        table: ItemTable,
    }

    #[derive(Debug, Default, Deserialize)]
    struct ItemTable {
        #[serde(rename = "ROW_item", default, deserialize_with = "rows")]
        rows: Vec<Item>,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Item {
        #[serde(default, deserialize_with = "lenient_string")]
        value: String,
    }

    #[test]
    fn test_rows_array() {
        let doc: Doc = decode_document(
            CommandFamily::Environment,
            r#"{"TABLE_item":{"ROW_item":[{"value":"a"},{"value":"b"}]}}"#,
        )
        .unwrap();
        assert_eq!(doc.table.rows.len(), 2);
        assert_eq!(doc.table.rows[1].value, "b");
    }

    #[test]
    fn test_rows_single_object() {
        let doc: Doc = decode_document(
            CommandFamily::Environment,
            r#"{"TABLE_item":{"ROW_item":{"value":"only"}}}"#,
        )
        .unwrap();
        assert_eq!(doc.table.rows, vec![Item { value: "only".into() }]);
    }

    #[test]
    fn test_rows_empty_null_and_absent() {
        for payload in [
            r#"{"TABLE_item":{"ROW_item":[]}}"#,
            r#"{"TABLE_item":{"ROW_item":null}}"#,
            r#"{"TABLE_item":null}"#,
            r#"{"TABLE_item":{}}"#,
            r#"{}"#,
            "",
            "  \n ",
        ] {
            let doc: Doc = decode_document(CommandFamily::Environment, payload).unwrap();
            assert!(doc.table.rows.is_empty(), "payload {:?}", payload);
        }
    }

    #[test]
    fn test_lenient_string_numbers() {
        let doc: Doc = decode_document(
            CommandFamily::Environment,
            r#"{"TABLE_item":{"ROW_item":[{"value":45},{"value":null},{"value":true}]}}"#,
        )
        .unwrap();
        let values: Vec<&str> = doc.table.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["45", "", "true"]);
    }

    #[test]
    fn test_malformed_reports_offset() {
        let payload = "{\n  \"TABLE_item\": oops\n}";
        let err = decode_document::<Doc>(CommandFamily::Environment, payload).unwrap_err();
        assert_eq!(err.family, CommandFamily::Environment);
        let offset = err.offset.expect("offset");
        assert!(offset < payload.len());
        // fault is on the second line
        assert_eq!(payload[..offset].matches('\n').count(), 1);
    }

    #[test]
    fn test_byte_offset() {
        assert_eq!(byte_offset("abc\ndef", 2, 2), Some(5));
        assert_eq!(byte_offset("abc", 1, 1), Some(0));
        assert_eq!(byte_offset("abc", 0, 0), None);
        assert_eq!(byte_offset("abc", 1, 99), Some(3));
    }
}
