//! JSON and JSONL formatting, normalization and validation
//!
//! The editor buffer holds plain text; everything here parses on demand
//! and leaves the input untouched on parse failure, surfacing the parser
//! message instead. JSONL documents live in the buffer as blank-line
//! separated pretty blocks and are collapsed back to one minified value
//! per line on save.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

/// Indentation unit used for all pretty output.
pub const INDENT: &str = "    ";

/// Serialize a value with 4-space indentation.
pub fn to_pretty(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .expect("serializing a Value to memory cannot fail");
    String::from_utf8(buf).expect("serde_json output is UTF-8")
}

/// Serialize a value to a single minified line.
pub fn to_minified(value: &Value) -> String {
    value.to_string()
}

/// Recursively sort object keys, preserving array order.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn try_format(content: &str, sort: bool) -> String {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => {
            let value = if sort { sort_keys(value) } else { value };
            to_pretty(&value)
        }
        Err(_) => content.to_string(),
    }
}

/// Pretty-print a JSON document, keeping author key order.
/// Returns the input unchanged when it does not parse.
pub fn format_json(content: &str) -> String {
    try_format(content, false)
}

/// Pretty-print a JSON document with recursively sorted keys.
/// Returns the input unchanged when it does not parse.
pub fn normalize_json(content: &str) -> String {
    try_format(content, true)
}

/// Format each line of a JSONL document into its own pretty string.
/// Blank lines are skipped; unparseable lines pass through stripped.
pub fn format_jsonl_records(content: &str, sort: bool) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let stripped = line.trim();
            if stripped.is_empty() {
                return None;
            }
            Some(match serde_json::from_str::<Value>(stripped) {
                Ok(value) => {
                    let value = if sort { sort_keys(value) } else { value };
                    to_pretty(&value)
                }
                Err(_) => stripped.to_string(),
            })
        })
        .collect()
}

/// Split blank-line delimited content into blocks of joined lines.
pub fn split_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Expand one-record-per-line JSONL into blank-line separated pretty blocks.
pub fn jsonl_to_pretty(content: &str) -> String {
    content
        .lines()
        .filter_map(|line| {
            let stripped = line.trim();
            if stripped.is_empty() {
                return None;
            }
            Some(match serde_json::from_str::<Value>(stripped) {
                Ok(value) => to_pretty(&value),
                Err(_) => stripped.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collapse pretty blocks back to one minified JSON value per line.
/// A block that fails to parse is saved whitespace-collapsed, never dropped.
pub fn pretty_to_jsonl(content: &str) -> String {
    split_blocks(content)
        .iter()
        .map(|block| match serde_json::from_str::<Value>(block) {
            Ok(value) => to_minified(&value),
            Err(_) => block.split_whitespace().collect::<Vec<_>>().join(" "),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate a full JSON document. The error carries the parser position.
pub fn check_json(content: &str) -> Result<(), String> {
    match serde_json::from_str::<Value>(content) {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("JSON error: {e}")),
    }
}

/// Validate blank-line separated JSONL blocks, reporting the first failing
/// record's 1-based index.
pub fn check_jsonl(content: &str) -> Result<(), String> {
    for (i, block) in split_blocks(content).iter().enumerate() {
        if let Err(e) = serde_json::from_str::<Value>(block) {
            return Err(format!("JSONL error: record {}: {e}", i + 1));
        }
    }
    Ok(())
}

/// Map each buffer line to its 1-based JSONL record number.
///
/// The first line of each block carries the record number; continuation
/// and blank separator lines carry 0.
pub fn record_numbers(lines: &[String]) -> Vec<usize> {
    let mut result = vec![0; lines.len()];
    let mut record = 0;
    let mut in_block = false;
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            in_block = false;
        } else if !in_block {
            record += 1;
            result[i] = record;
            in_block = true;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_preserves_key_order() {
        let formatted = format_json(r#"{"b":1,"a":2}"#);
        assert_eq!(formatted, "{\n    \"b\": 1,\n    \"a\": 2\n}");
    }

    #[test]
    fn test_normalize_sorts_nested_keys() {
        let left = normalize_json(r#"{"b":{"y":1,"x":2},"a":3}"#);
        let right = normalize_json(r#"{"a":3,"b":{"x":2,"y":1}}"#);
        assert_eq!(left, right);
        assert!(left.starts_with("{\n    \"a\": 3"));
    }

    #[test]
    fn test_format_passthrough_on_parse_failure() {
        let broken = "{not json";
        assert_eq!(format_json(broken), broken);
        assert_eq!(normalize_json(broken), broken);
    }

    #[test]
    fn test_format_round_trip() {
        let input = r#"{"a": [1, 2, {"b": null}], "c": true}"#;
        let formatted = format_json(input);
        let reparsed: Value = serde_json::from_str(&formatted).unwrap();
        let original: Value = serde_json::from_str(input).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_check_json_reports_line() {
        let err = check_json("{\n\"a\": ,\n}").unwrap_err();
        assert!(err.starts_with("JSON error:"));
        assert!(err.contains("line 2"), "missing position: {err}");
    }

    #[test]
    fn test_check_jsonl_reports_record_index() {
        let content = "{\n    \"a\": 1\n}\n\n{broken}";
        let err = check_jsonl(content).unwrap_err();
        assert!(err.contains("record 2"), "wrong record: {err}");
        assert!(check_jsonl("{\n    \"a\": 1\n}").is_ok());
    }

    #[test]
    fn test_jsonl_round_trip() {
        let raw = "{\"b\":2,\"a\":1}\n{\"c\":3}";
        let pretty = jsonl_to_pretty(raw);
        assert!(pretty.contains("\n\n"));
        assert_eq!(pretty_to_jsonl(&pretty), raw);
    }

    #[test]
    fn test_pretty_to_jsonl_keeps_broken_blocks() {
        let content = "{\n    \"a\": 1\n}\n\nnot   json\nhere";
        assert_eq!(pretty_to_jsonl(content), "{\"a\":1}\nnot json here");
    }

    #[test]
    fn test_split_blocks() {
        let blocks = split_blocks("a\nb\n\n\nc\n");
        assert_eq!(blocks, vec!["a\nb".to_string(), "c".to_string()]);
        assert!(split_blocks("\n\n").is_empty());
    }

    #[test]
    fn test_record_numbers() {
        let lines: Vec<String> = ["{", "}", "", "{", "}", "", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(record_numbers(&lines), vec![1, 0, 0, 2, 0, 0, 0]);
    }
}
