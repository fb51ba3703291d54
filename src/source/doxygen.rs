//! Doxygen `searchData` scripts.
//!
//! ```text
//! var searchData=
//! [
//!   ['face_2515',['face',['../a02182.html#af6ed88...',1,'OpenMesh::Concepts::KernelT::face(FaceHandle _h)'],...]],
//!   ...
//! ];
//! ```
//!
//! The array literal uses single-quoted strings, so it is read as JSON5.
//! Occurrences follow the label inside the payload array instead of sitting
//! in a nested list.

use serde_json::Value;

use super::entities::decode_entities;
use super::{RawOccurrence, RawRecord, optional_string, required_string, split_entry, top_level_entries};
use crate::error::MalformedIndex;

pub(super) fn parse(text: &str, decode: bool) -> Result<Vec<RawRecord>, MalformedIndex> {
    let literal = strip_assignment(text);
    let root: Value = serde_json5::from_str(literal).map_err(|e| MalformedIndex::Syntax(e.to_string()))?;

    top_level_entries(&root)?
        .iter()
        .enumerate()
        .map(|(position, entry)| parse_entry(position, entry, decode))
        .collect()
}

/// Reduce `var searchData = [...];` to the array literal.
fn strip_assignment(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("var ")
        && let Some((_, value)) = rest.split_once('=')
    {
        body = value.trim();
    }

    body.strip_suffix(';').unwrap_or(body).trim_end()
}

fn parse_entry(position: usize, entry: &Value, decode: bool) -> Result<RawRecord, MalformedIndex> {
    let (key, payload) = split_entry(position, entry)?;

    let payload = payload
        .as_array()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| MalformedIndex::arity(position, "payload must be [label, occurrence...]"))?;

    let display_label = optional_string(&payload[0])
        .map_err(|_| MalformedIndex::arity(position, "label must be a string"))?
        .map(|label| unescape(label, decode));

    let occurrences = payload[1..]
        .iter()
        .map(|item| parse_occurrence(position, item, decode))
        .collect::<Result<_, _>>()?;

    Ok(RawRecord {
        key,
        display_label,
        occurrences,
    })
}

fn parse_occurrence(position: usize, item: &Value, decode: bool) -> Result<RawOccurrence, MalformedIndex> {
    let triple = item
        .as_array()
        .filter(|t| t.len() == 3)
        .ok_or_else(|| MalformedIndex::arity(position, "occurrence must be [location, flag, scope]"))?;

    let parent_frame = match &triple[1] {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => return Err(MalformedIndex::arity(position, "occurrence flag must be a number")),
    };

    Ok(RawOccurrence {
        location: required_string(&triple[0], position, "location")?,
        qualified_name: unescape(required_string(&triple[2], position, "scope")?, decode),
        parent_frame,
    })
}

fn unescape(text: String, decode: bool) -> String {
    if decode {
        decode_entities(&text).into_owned()
    } else {
        text
    }
}
