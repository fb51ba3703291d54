//! Readers that turn a static index definition into raw records.
//!
//! Two layouts are understood:
//! - canonical JSON: `[[key, [label, [[location, qualified_name], ...]]], ...]`
//! - Doxygen `searchData` scripts: `var searchData=[[key, [label, [loc, flag, scope], ...]], ...];`
//!
//! Readers only check shape. Key presence, occurrence presence and key
//! uniqueness are enforced by [`IndexTable::load`](crate::IndexTable::load).

mod canonical;
mod doxygen;
mod entities;

pub use entities::decode_entities;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, IndexResult, MalformedIndex};

/// One entry as read from a definition, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub key: Option<String>,
    pub display_label: Option<String>,
    pub occurrences: Vec<RawOccurrence>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOccurrence {
    pub location: String,
    pub qualified_name: String,
    pub parent_frame: bool,
}

impl RawRecord {
    pub fn new(key: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            display_label: Some(display_label.into()),
            occurrences: Vec::new(),
        }
    }

    pub fn occurrence(mut self, location: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        self.occurrences.push(RawOccurrence {
            location: location.into(),
            qualified_name: qualified_name.into(),
            parent_frame: false,
        });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Pick by file extension, then by content
    #[default]
    Auto,
    /// JSON array of `[key, [label, [[location, qualified_name], ...]]]`
    Canonical,
    /// Doxygen `search/*.js` script
    Doxygen,
}

impl SourceFormat {
    /// Settle `Auto` using the file name and the text itself.
    pub fn detect(self, path: Option<&Path>, text: &str) -> SourceFormat {
        if self != SourceFormat::Auto {
            return self;
        }

        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("js"));

        match by_extension {
            Some(true) => SourceFormat::Doxygen,
            _ if text.trim_start().starts_with("var ") => SourceFormat::Doxygen,
            _ => SourceFormat::Canonical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    pub format: SourceFormat,
    /// Decode HTML entities in labels and qualified names (Doxygen input only).
    pub decode_entities: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            format: SourceFormat::Auto,
            decode_entities: true,
        }
    }
}

/// Parse definition text into raw records.
pub fn parse_str(text: &str, format: SourceFormat, decode: bool) -> Result<Vec<RawRecord>, MalformedIndex> {
    match format.detect(None, text) {
        SourceFormat::Doxygen => doxygen::parse(text, decode),
        _ => canonical::parse(text),
    }
}

/// Read and parse one definition file.
pub fn read_path(path: &Path, options: &SourceOptions) -> IndexResult<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = options.format.detect(Some(path), &text);
    tracing::info!(target: "source", "reading {} as {format:?}", path.display());

    parse_str(&text, format, options.decode_entities).map_err(|source| IndexError::MalformedFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Shards of one category in a Doxygen `search/` directory, in shard order.
///
/// Doxygen splits each category into `<category>_<n>.js` files; `n` is
/// compared numerically so `functions_10.js` sorts after `functions_9.js`.
pub fn category_shards(dir: &Path, category: &str) -> IndexResult<Vec<PathBuf>> {
    let pattern = dir.join(format!("{category}_*.js"));
    let pattern_str = pattern.to_string_lossy();

    let mut shards: Vec<(u64, PathBuf)> = glob::glob(&pattern_str)?
        .flatten()
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let shard = path
                .file_stem()?
                .to_str()?
                .strip_prefix(category)?
                .strip_prefix('_')?
                .parse::<u64>()
                .ok()?;
            Some((shard, path))
        })
        .collect();

    if shards.is_empty() {
        return Err(IndexError::NoShards {
            dir: dir.to_path_buf(),
            category: category.to_string(),
        });
    }

    shards.sort_by_key(|(shard, _)| *shard);
    Ok(shards.into_iter().map(|(_, path)| path).collect())
}

// Shared field helpers for both readers.

/// `null` and `""` mean absent; anything else that is not a string is a shape error.
fn optional_string(value: &Value) -> Result<Option<String>, ()> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(()),
    }
}

fn required_string(value: &Value, position: usize, what: &str) -> Result<String, MalformedIndex> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MalformedIndex::arity(position, format!("{what} must be a string")))
}

fn top_level_entries(root: &Value) -> Result<&Vec<Value>, MalformedIndex> {
    root.as_array()
        .ok_or_else(|| MalformedIndex::Syntax("top level must be an array of entries".to_string()))
}

/// Split an entry into its key and payload, checking the outer pair arity.
fn split_entry(position: usize, entry: &Value) -> Result<(Option<String>, &Value), MalformedIndex> {
    let pair = entry
        .as_array()
        .ok_or_else(|| MalformedIndex::arity(position, "entry must be a [key, payload] pair"))?;
    if pair.len() != 2 {
        return Err(MalformedIndex::arity(
            position,
            format!("entry must have 2 elements, found {}", pair.len()),
        ));
    }

    let key = optional_string(&pair[0])
        .map_err(|_| MalformedIndex::arity(position, "key must be a string"))?;
    Ok((key, &pair[1]))
}
