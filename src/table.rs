//! Immutable symbol index table.
//!
//! Built once from raw records, then only read. Lookup is an exact key match
//! through a hash map into the ordered entry list; keys are never
//! normalized, split or prefix-matched here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{IndexError, IndexResult, MalformedIndex};
use crate::source::{self, RawRecord, SourceOptions};
use crate::types::{IndexEntry, Occurrence};

#[derive(Debug, Clone, Default)]
pub struct IndexTable {
    entries: Vec<IndexEntry>,
    by_key: HashMap<Box<str>, usize>,
    by_label: HashMap<Box<str>, Vec<usize>>,
}

impl IndexTable {
    /// Build a table from records in authored order.
    ///
    /// All-or-nothing: the first missing key, missing label, empty
    /// occurrence list or duplicate key rejects the whole input.
    pub fn load<I>(records: I) -> Result<Self, MalformedIndex>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let records = records.into_iter();
        let mut entries = Vec::with_capacity(records.size_hint().0);
        let mut by_key: HashMap<Box<str>, usize> = HashMap::with_capacity(entries.capacity());
        let mut by_label: HashMap<Box<str>, Vec<usize>> = HashMap::new();

        for (position, record) in records.enumerate() {
            let key: Box<str> = record
                .key
                .ok_or(MalformedIndex::MissingKey { position })?
                .into();

            let display_label: Box<str> = record
                .display_label
                .ok_or_else(|| MalformedIndex::MissingLabel {
                    position,
                    key: key.to_string(),
                })?
                .into();

            if record.occurrences.is_empty() {
                return Err(MalformedIndex::NoOccurrences {
                    position,
                    key: key.to_string(),
                });
            }

            if let Some(&first) = by_key.get(&key) {
                tracing::warn!(target: "table", "duplicate key '{key}' at entries {first} and {position}");
                return Err(MalformedIndex::DuplicateKey {
                    key: key.to_string(),
                    first,
                    second: position,
                });
            }

            let occurrences = record
                .occurrences
                .into_iter()
                .map(|raw| Occurrence::new(raw.location, raw.qualified_name).with_parent_frame(raw.parent_frame))
                .collect();

            by_key.insert(key.clone(), position);
            by_label.entry(display_label.clone()).or_default().push(position);
            entries.push(IndexEntry {
                key,
                display_label,
                occurrences,
            });
        }

        tracing::debug!(target: "table", "loaded {} entries", entries.len());

        Ok(Self {
            entries,
            by_key,
            by_label,
        })
    }

    /// Parse definition text and build a table from it.
    pub fn from_str(text: &str, options: &SourceOptions) -> Result<Self, MalformedIndex> {
        Self::load(source::parse_str(text, options.format, options.decode_entities)?)
    }

    /// Load a single definition file.
    pub fn from_path(path: impl AsRef<Path>, options: &SourceOptions) -> IndexResult<Self> {
        Self::from_paths([path.as_ref()], options)
    }

    /// Load several definition files into one table, in argument order.
    ///
    /// Keys must be unique across every file, not just within each.
    pub fn from_paths<P>(paths: impl IntoIterator<Item = P>, options: &SourceOptions) -> IndexResult<Self>
    where
        P: AsRef<Path>,
    {
        let mut records = Vec::new();
        let mut origins: Vec<(usize, PathBuf)> = Vec::new();

        for path in paths {
            let path = path.as_ref();
            origins.push((records.len(), path.to_path_buf()));
            records.extend(source::read_path(path, options)?);
        }

        Self::load(records).map_err(|err| locate_error(err, &origins))
    }

    /// Load every `<category>_<n>.js` shard of a Doxygen `search/` directory.
    pub fn from_category(dir: impl AsRef<Path>, category: &str, options: &SourceOptions) -> IndexResult<Self> {
        let shards = source::category_shards(dir.as_ref(), category)?;
        tracing::debug!(target: "table", "{} '{category}' shards in {}", shards.len(), dir.as_ref().display());
        Self::from_paths(&shards, options)
    }

    /// Occurrences recorded for `key`, in authored order.
    ///
    /// `None` means the key is not in the table; that is an ordinary outcome.
    pub fn lookup(&self, key: &str) -> Option<&[Occurrence]> {
        self.entry(key).map(IndexEntry::occurrences)
    }

    /// The full entry for `key`.
    pub fn entry(&self, key: &str) -> Option<&IndexEntry> {
        self.by_key.get(key).map(|&position| &self.entries[position])
    }

    /// Entries whose display label equals `label` exactly, in authored order.
    pub fn find_by_label<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a IndexEntry> + 'a {
        self.by_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&position| &self.entries[position])
    }

    /// All keys in authored order.
    ///
    /// The iterator is lazy and `Clone`; calling `keys()` again starts over.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.entries.iter(),
        }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of occurrences across all entries.
    pub fn occurrence_count(&self) -> usize {
        self.entries.iter().map(|e| e.occurrences.len()).sum()
    }
}

/// Attach the file a load error came from, with positions relative to
/// that file. `origins` holds the first entry index of each file.
fn locate_error(err: MalformedIndex, origins: &[(usize, PathBuf)]) -> IndexError {
    let file_of = |position: usize| origins.iter().rev().find(|(start, _)| *start <= position);

    if let MalformedIndex::DuplicateKey { key, first, second } = &err
        && let (Some((first_start, first_path)), Some((second_start, second_path))) =
            (file_of(*first), file_of(*second))
        && first_start != second_start
    {
        return IndexError::DuplicateAcrossFiles {
            key: key.clone(),
            first_path: first_path.clone(),
            first: first - first_start,
            second_path: second_path.clone(),
            second: second - second_start,
        };
    }

    match err.position().and_then(file_of) {
        Some((start, path)) => IndexError::MalformedFile {
            path: path.clone(),
            source: err.rebase(*start),
        },
        None => IndexError::Malformed(err),
    }
}

/// Iterator over table keys, see [`IndexTable::keys`].
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: std::slice::Iter<'a, IndexEntry>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(IndexEntry::key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl DoubleEndedIterator for Keys<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(IndexEntry::key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceFormat;
    use std::sync::Arc;

    fn face_and_faces() -> Vec<RawRecord> {
        vec![
            RawRecord::new("face", "face").occurrence("a02182#af6ed8", "OpenMesh::Concepts::KernelT::face"),
            RawRecord::new("faces", "faces").occurrence("a02618#aba295", "OpenMesh::PolyConnectivity::faces"),
        ]
    }

    fn face_handle() -> RawRecord {
        RawRecord::new("face_handle", "face_handle")
            .occurrence("a02618#a321fa", "OpenMesh::PolyConnectivity::face_handle(HalfedgeHandle _heh) const")
            .occurrence("a02618#af8429", "OpenMesh::PolyConnectivity::face_handle(unsigned int _i) const")
            .occurrence("a02182#a66c6c", "OpenMesh::Concepts::KernelT::face_handle(HalfedgeHandle _heh) const")
            .occurrence("a02182#a41745", "OpenMesh::Concepts::KernelT::face_handle(unsigned int _i) const")
            .occurrence("a02618#a90a98", "OpenMesh::PolyConnectivity::face_handle(SmartHalfedgeHandle _heh) const")
    }

    #[test]
    fn test_exact_match_not_prefix() {
        let table = IndexTable::load(face_and_faces()).unwrap();

        let face = table.lookup("face").unwrap();
        assert_eq!(face.len(), 1);
        assert_eq!(face[0].location.as_str(), "a02182#af6ed8");
        assert_eq!(&*face[0].qualified_name, "OpenMesh::Concepts::KernelT::face");

        assert!(table.lookup("fac").is_none());
        assert!(table.lookup("Face").is_none());
        assert!(table.lookup("faces_begin").is_none());
    }

    #[test]
    fn test_multiple_occurrences_in_authored_order() {
        let record = face_handle();
        let expected: Vec<_> = record.occurrences.iter().map(|o| o.location.clone()).collect();

        let table = IndexTable::load(vec![record]).unwrap();
        let found = table.lookup("face_handle").unwrap();

        assert_eq!(found.len(), 5);
        let locations: Vec<_> = found.iter().map(|o| o.location.as_str().to_string()).collect();
        assert_eq!(locations, expected);
    }

    #[test]
    fn test_round_trip_every_key() {
        let mut records = face_and_faces();
        records.push(face_handle());
        let table = IndexTable::load(records.clone()).unwrap();

        for record in &records {
            let key = record.key.as_deref().unwrap();
            let found = table.lookup(key).unwrap();
            assert_eq!(found.len(), record.occurrences.len());
            for (occ, raw) in found.iter().zip(&record.occurrences) {
                assert_eq!(occ.location.as_str(), raw.location);
                assert_eq!(&*occ.qualified_name, raw.qualified_name);
            }
        }
        assert_eq!(table.occurrence_count(), 7);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let records = vec![
            RawRecord::new("face", "face").occurrence("a#1", "A::face"),
            RawRecord::new("edge", "edge").occurrence("a#2", "A::edge"),
            RawRecord::new("face", "face").occurrence("a#3", "B::face"),
        ];

        let err = IndexTable::load(records).unwrap_err();
        assert_eq!(
            err,
            MalformedIndex::DuplicateKey {
                key: "face".to_string(),
                first: 0,
                second: 2,
            }
        );
    }

    #[test]
    fn test_empty_occurrences_rejected() {
        let mut records = face_and_faces();
        records.push(RawRecord::new("face_handle", "face_handle"));
        let err = IndexTable::load(records).unwrap_err();
        assert_eq!(
            err,
            MalformedIndex::NoOccurrences {
                position: 2,
                key: "face_handle".to_string()
            }
        );
    }

    #[test]
    fn test_missing_key_and_label_rejected() {
        let mut no_key = RawRecord::new("x", "face").occurrence("a#1", "A::face");
        no_key.key = None;
        let err = IndexTable::load(vec![face_handle(), no_key]).unwrap_err();
        assert_eq!(err, MalformedIndex::MissingKey { position: 1 });

        let mut no_label = RawRecord::new("face", "x").occurrence("a#1", "A::face");
        no_label.display_label = None;
        let err = IndexTable::load(vec![no_label]).unwrap_err();
        assert!(matches!(err, MalformedIndex::MissingLabel { position: 0, .. }));
    }

    #[test]
    fn test_keys_in_order_and_restartable() {
        let mut records = face_and_faces();
        records.push(face_handle());
        let table = IndexTable::load(records).unwrap();

        let first: Vec<_> = table.keys().collect();
        let second: Vec<_> = table.keys().collect();
        assert_eq!(first, vec!["face", "faces", "face_handle"]);
        assert_eq!(first, second);

        let keys = table.keys();
        assert_eq!(keys.len(), 3);
        let cloned: Vec<_> = keys.clone().collect();
        assert_eq!(cloned, keys.collect::<Vec<_>>());
    }

    #[test]
    fn test_find_by_label() {
        let records = vec![
            RawRecord::new("fe_2524", "FE").occurrence("a#1", "OpenMesh::Subdivider::Uniform::CompositeT::FE"),
            RawRecord::new("fe_5fbegin_2525", "fe_begin").occurrence("a#2", "OpenMesh::PolyConnectivity"),
            RawRecord::new("fe_2999", "FE").occurrence("a#3", "Other::FE"),
        ];
        let table = IndexTable::load(records).unwrap();

        let keys: Vec<_> = table.find_by_label("FE").map(IndexEntry::key).collect();
        assert_eq!(keys, vec!["fe_2524", "fe_2999"]);
        assert_eq!(table.find_by_label("fe").count(), 0);
    }

    #[test]
    fn test_empty_table() {
        let table = IndexTable::load(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.keys().count(), 0);
        assert!(table.lookup("face").is_none());
    }

    #[test]
    fn test_concurrent_readers() {
        let mut records = face_and_faces();
        records.push(face_handle());
        let table = Arc::new(IndexTable::load(records).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    let keys: Vec<String> = table.keys().map(str::to_string).collect();
                    let counts: Vec<usize> = keys.iter().map(|k| table.lookup(k).map_or(0, <[_]>::len)).collect();
                    (keys, counts, table.lookup("missing").is_none())
                })
            })
            .collect();

        for handle in handles {
            let (keys, counts, missing) = handle.join().unwrap();
            assert_eq!(keys, vec!["face", "faces", "face_handle"]);
            assert_eq!(counts, vec![1, 1, 5]);
            assert!(missing);
        }
    }

    #[test]
    fn test_from_str_canonical() {
        let table = IndexTable::from_str(
            r#"[["face", ["face", [["a02182#af6ed8", "OpenMesh::Concepts::KernelT::face"]]]]]"#,
            &SourceOptions {
                format: SourceFormat::Canonical,
                ..SourceOptions::default()
            },
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entry("face").unwrap().display_label(), "face");
    }

    #[test]
    fn test_from_str_honours_entity_option() {
        let text = "var searchData=[['fvc_2594',['FVc',['../a03678.html#a1',1,'CompositeT::FVc(Coeff &amp;_coeff)']]]];";

        let decoded = IndexTable::from_str(text, &SourceOptions::default()).unwrap();
        assert_eq!(
            &*decoded.lookup("fvc_2594").unwrap()[0].qualified_name,
            "CompositeT::FVc(Coeff &_coeff)"
        );

        let raw = SourceOptions {
            decode_entities: false,
            ..SourceOptions::default()
        };
        let table = IndexTable::from_str(text, &raw).unwrap();
        assert_eq!(
            &*table.lookup("fvc_2594").unwrap()[0].qualified_name,
            "CompositeT::FVc(Coeff &amp;_coeff)"
        );
    }

    #[test]
    fn test_locate_error_is_file_relative() {
        let origins = vec![(0, PathBuf::from("a.json")), (2, PathBuf::from("b.json"))];

        let err = locate_error(
            MalformedIndex::NoOccurrences {
                position: 3,
                key: "edge".to_string(),
            },
            &origins,
        );
        match err {
            IndexError::MalformedFile { path, source } => {
                assert_eq!(path, PathBuf::from("b.json"));
                assert_eq!(source.position(), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = locate_error(
            MalformedIndex::DuplicateKey {
                key: "face".to_string(),
                first: 0,
                second: 2,
            },
            &origins,
        );
        assert!(matches!(
            err,
            IndexError::DuplicateAcrossFiles { first: 0, second: 0, .. }
        ));

        let err = locate_error(MalformedIndex::Syntax("eof".to_string()), &origins);
        assert!(matches!(err, IndexError::Malformed(MalformedIndex::Syntax(_))));
    }
}
