//! Error types for loading symbol index tables.
//!
//! A failed lookup is not an error: `IndexTable::lookup` returns `None`.
//! Everything here is fatal to a load.

use std::path::PathBuf;
use thiserror::Error;

/// Structural problems in an index definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedIndex {
    #[error("entry {position} has no key")]
    MissingKey { position: usize },

    #[error("entry {position} ('{key}') has no display label")]
    MissingLabel { position: usize, key: String },

    #[error("entry {position} ('{key}') has no occurrences")]
    NoOccurrences { position: usize, key: String },

    #[error("duplicate key '{key}' at entries {first} and {second}")]
    DuplicateKey {
        key: String,
        first: usize,
        second: usize,
    },

    #[error("entry {position}: {detail}")]
    Arity { position: usize, detail: String },

    #[error("syntax error: {0}")]
    Syntax(String),
}

impl MalformedIndex {
    pub fn arity(position: usize, detail: impl Into<String>) -> Self {
        Self::Arity {
            position,
            detail: detail.into(),
        }
    }

    /// Entry position this error points at. For a duplicate key, the later entry.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::MissingKey { position }
            | Self::MissingLabel { position, .. }
            | Self::NoOccurrences { position, .. }
            | Self::Arity { position, .. } => Some(*position),
            Self::DuplicateKey { second, .. } => Some(*second),
            Self::Syntax(_) => None,
        }
    }

    /// Shift every position back by `offset`, making it relative to the
    /// file that starts at that entry.
    pub fn rebase(self, offset: usize) -> Self {
        match self {
            Self::MissingKey { position } => Self::MissingKey {
                position: position.saturating_sub(offset),
            },
            Self::MissingLabel { position, key } => Self::MissingLabel {
                position: position.saturating_sub(offset),
                key,
            },
            Self::NoOccurrences { position, key } => Self::NoOccurrences {
                position: position.saturating_sub(offset),
                key,
            },
            Self::DuplicateKey { key, first, second } => Self::DuplicateKey {
                key,
                first: first.saturating_sub(offset),
                second: second.saturating_sub(offset),
            },
            Self::Arity { position, detail } => Self::Arity {
                position: position.saturating_sub(offset),
                detail,
            },
            Self::Syntax(message) => Self::Syntax(message),
        }
    }
}

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Malformed index: {0}")]
    Malformed(#[from] MalformedIndex),

    #[error("Malformed index in {path}: {source}")]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: MalformedIndex,
    },

    #[error("duplicate key '{key}': entry {first} of {first_path} and entry {second} of {second_path}")]
    DuplicateAcrossFiles {
        key: String,
        first_path: PathBuf,
        first: usize,
        second_path: PathBuf,
        second: usize,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid shard pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("No '{category}' shards found in {dir}")]
    NoShards { dir: PathBuf, category: String },
}

impl IndexError {
    /// Whether the input was read but is structurally invalid.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::MalformedFile { .. } | Self::DuplicateAcrossFiles { .. }
        )
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
