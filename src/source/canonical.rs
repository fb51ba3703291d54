//! Canonical JSON layout: `[[key, [label, [[location, qualified_name], ...]]], ...]`.

use serde_json::Value;

use super::{RawOccurrence, RawRecord, optional_string, required_string, split_entry, top_level_entries};
use crate::error::MalformedIndex;

pub(super) fn parse(text: &str) -> Result<Vec<RawRecord>, MalformedIndex> {
    let root: Value = serde_json::from_str(text).map_err(|e| MalformedIndex::Syntax(e.to_string()))?;

    top_level_entries(&root)?
        .iter()
        .enumerate()
        .map(|(position, entry)| parse_entry(position, entry))
        .collect()
}

fn parse_entry(position: usize, entry: &Value) -> Result<RawRecord, MalformedIndex> {
    let (key, payload) = split_entry(position, entry)?;

    let payload = payload
        .as_array()
        .filter(|p| p.len() == 2)
        .ok_or_else(|| MalformedIndex::arity(position, "payload must be a [label, occurrences] pair"))?;

    let display_label = optional_string(&payload[0])
        .map_err(|_| MalformedIndex::arity(position, "label must be a string"))?;

    let occurrences = match &payload[1] {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(|item| parse_occurrence(position, item))
            .collect::<Result<_, _>>()?,
        _ => return Err(MalformedIndex::arity(position, "occurrences must be an array")),
    };

    Ok(RawRecord {
        key,
        display_label,
        occurrences,
    })
}

fn parse_occurrence(position: usize, item: &Value) -> Result<RawOccurrence, MalformedIndex> {
    let pair = item
        .as_array()
        .filter(|p| p.len() == 2)
        .ok_or_else(|| MalformedIndex::arity(position, "occurrence must be a [location, qualified_name] pair"))?;

    Ok(RawOccurrence {
        location: required_string(&pair[0], position, "location")?,
        qualified_name: required_string(&pair[1], position, "qualified name")?,
        parent_frame: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries_in_order() {
        let text = r#"[
            ["face", ["face", [["a02182#af6ed8", "OpenMesh::Concepts::KernelT::face"]]]],
            ["faces", ["faces", [
                ["a02618#aba295", "OpenMesh::PolyConnectivity::faces"],
                ["a02718#a9c068", "OpenMesh::SmartVertexHandle::faces"]
            ]]]
        ]"#;

        let records = parse(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key.as_deref(), Some("face"));
        assert_eq!(records[1].display_label.as_deref(), Some("faces"));
        assert_eq!(records[1].occurrences.len(), 2);
        assert_eq!(records[1].occurrences[1].location, "a02718#a9c068");
        assert!(!records[1].occurrences[0].parent_frame);
    }

    #[test]
    fn test_missing_key_is_not_a_shape_error() {
        let records = parse(r#"[[null, ["face", [["a#b", "X::face"]]]]]"#).unwrap();
        assert_eq!(records[0].key, None);

        let records = parse(r#"[["", ["face", [["a#b", "X::face"]]]]]"#).unwrap();
        assert_eq!(records[0].key, None);
    }

    #[test]
    fn test_null_occurrences_become_empty() {
        let records = parse(r#"[["face", ["face", null]]]"#).unwrap();
        assert!(records[0].occurrences.is_empty());
    }

    #[test]
    fn test_arity_violations() {
        let cases = [
            r#"[["face"]]"#,
            r#"[["face", ["face", [], "extra"]]]"#,
            r#"[["face", ["face", [["only-location"]]]]]"#,
            r#"[["face", ["face", [["a#b", 7]]]]]"#,
            r#"[[42, ["face", [["a#b", "X"]]]]]"#,
            r#"["face"]"#,
        ];

        for case in cases {
            let err = parse(case).unwrap_err();
            assert!(
                matches!(err, MalformedIndex::Arity { position: 0, .. }),
                "expected arity error for {case}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse("not json"), Err(MalformedIndex::Syntax(_))));
        assert!(matches!(parse(r#"{"face": []}"#), Err(MalformedIndex::Syntax(_))));
    }
}
