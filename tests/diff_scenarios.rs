//! End-to-end diff scenarios and alignment invariants

use jive::diff::{compute, DiffResult, DiffTag};
use jive::json;
use proptest::prelude::*;
use serde_json::Value;

fn assert_aligned(result: &DiffResult) {
    assert_eq!(result.left_lines.len(), result.right_lines.len());
    assert_eq!(result.left_tags.len(), result.len());
    assert_eq!(result.right_tags.len(), result.len());
}

#[test]
fn test_value_change_in_nested_document() {
    let left = r#"{"user": {"name": "ann", "age": 41}, "tags": ["x"]}"#;
    let right = r#"{"user": {"name": "ann", "age": 42}, "tags": ["x"]}"#;
    let result = compute(left, right, true, false);
    assert_aligned(&result);
    assert_eq!(result.hunks.len(), 1);
    let hunk = result.hunks[0];
    assert!(result.left_lines[hunk.left_start..hunk.left_start + hunk.left_count]
        .iter()
        .any(|l| l.contains("41")));
    assert!(result.right_lines[hunk.right_start..hunk.right_start + hunk.right_count]
        .iter()
        .any(|l| l.contains("42")));
}

#[test]
fn test_key_order_is_noise_when_normalized() {
    let left = r#"{"z": 1, "a": {"y": 2, "b": 3}}"#;
    let right = r#"{"a": {"b": 3, "y": 2}, "z": 1}"#;
    assert!(compute(left, right, true, false).hunks.is_empty());
    assert!(!compute(left, right, false, false).hunks.is_empty());
}

#[test]
fn test_invalid_input_still_diffs_by_line() {
    // Unparseable input passes through formatting untouched.
    let result = compute("not json at all", "not json AT ALL", true, false);
    assert_aligned(&result);
    assert_eq!(result.hunks.len(), 1);
    assert_eq!(result.left_lines, vec!["not json at all"]);
}

#[test]
fn test_large_array_change_stays_local() {
    let entry = |i: usize, v: usize| format!(r#"{{"id": {i}, "v": {v}}}"#);
    let left: Vec<String> = (0..50).map(|i| entry(i, i)).collect();
    let mut right = left.clone();
    right[20] = entry(20, 999);
    let left_doc = format!("[{}]", left.join(","));
    let right_doc = format!("[{}]", right.join(","));

    let result = compute(&left_doc, &right_doc, true, false);
    assert_aligned(&result);
    assert_eq!(result.hunks.len(), 1);
    let changed = result
        .left_tags
        .iter()
        .filter(|&&t| t != DiffTag::Equal)
        .count();
    // One line changed inside one entry; the other 49 entries match as
    // whole segments.
    assert_eq!(changed, 1);
}

#[test]
fn test_jsonl_insert_and_delete_records() {
    let left = "{\"id\": 1}\n{\"id\": 2}\n{\"id\": 3}";
    let right = "{\"id\": 1}\n{\"id\": 3}\n{\"id\": 4}";
    let result = compute(left, right, true, true);
    assert_aligned(&result);

    let has_delete = result.left_tags.iter().any(|&t| t == DiffTag::Delete);
    let has_insert = result.right_tags.iter().any(|&t| t == DiffTag::Insert);
    assert!(has_delete);
    assert!(has_insert);
    // Deleted rows face empty right rows, inserted rows empty left rows.
    for i in 0..result.len() {
        if result.left_tags[i] == DiffTag::Delete {
            assert_eq!(result.right_lines[i], "");
        }
        if result.right_tags[i] == DiffTag::Insert {
            assert_eq!(result.left_lines[i], "");
        }
    }
}

// -- Property tests --------------------------------------------------------

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            proptest::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    // Both sides of the diff always have the same number of rows.
    #[test]
    fn prop_diff_is_aligned(left in json_value(), right in json_value()) {
        for normalize in [true, false] {
            let result = compute(&left.to_string(), &right.to_string(), normalize, false);
            prop_assert_eq!(result.left_lines.len(), result.right_lines.len());
            prop_assert_eq!(result.left_tags.len(), result.len());
            prop_assert_eq!(result.right_tags.len(), result.len());
        }
    }

    // A document diffed against itself is all equal rows.
    #[test]
    fn prop_self_diff_is_empty(doc in json_value()) {
        let result = compute(&doc.to_string(), &doc.to_string(), true, false);
        prop_assert!(result.hunks.is_empty());
        prop_assert!(result.left_tags.iter().all(|&t| t == DiffTag::Equal));
    }

    // Dropping the alignment padding recovers each formatted input
    // exactly. Pretty-printed JSON never produces a blank line, so the
    // blank rows are all padding.
    #[test]
    fn prop_padding_strips_back_to_inputs(left in json_value(), right in json_value()) {
        let left_doc = left.to_string();
        let right_doc = right.to_string();
        let result = compute(&left_doc, &right_doc, true, false);

        let left_kept: Vec<&String> =
            result.left_lines.iter().filter(|l| !l.is_empty()).collect();
        let left_expect = json::normalize_json(&left_doc);
        prop_assert_eq!(left_kept, left_expect.split('\n').collect::<Vec<_>>());

        let right_kept: Vec<&String> =
            result.right_lines.iter().filter(|l| !l.is_empty()).collect();
        let right_expect = json::normalize_json(&right_doc);
        prop_assert_eq!(right_kept, right_expect.split('\n').collect::<Vec<_>>());
    }

    // Every changed row in a JSON diff is covered by a hunk.
    #[test]
    fn prop_hunks_cover_changed_rows(left in json_value(), right in json_value()) {
        let result = compute(&left.to_string(), &right.to_string(), true, false);
        for (i, &tag) in result.left_tags.iter().enumerate() {
            if tag != DiffTag::Equal {
                prop_assert!(result
                    .hunks
                    .iter()
                    .any(|h| i >= h.left_start && i < h.left_start + h.left_count));
            }
        }
    }

    // JSONL diffs stay aligned and recover each record stream.
    #[test]
    fn prop_jsonl_diff_is_aligned(
        left in proptest::collection::vec(json_value(), 1..5),
        right in proptest::collection::vec(json_value(), 1..5),
    ) {
        let to_doc = |records: &[Value]| {
            records
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        };
        let left_doc = to_doc(&left);
        let right_doc = to_doc(&right);
        let result = compute(&left_doc, &right_doc, true, true);
        prop_assert_eq!(result.left_lines.len(), result.right_lines.len());

        let left_kept: Vec<&String> =
            result.left_lines.iter().filter(|l| !l.is_empty()).collect();
        let left_expect = json::format_jsonl_records(&left_doc, true).join("\n");
        prop_assert_eq!(left_kept, left_expect.split('\n').collect::<Vec<_>>());
    }
}
