use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a documentation page, optionally with an in-page anchor.
///
/// The text is kept exactly as authored (`../a02182.html#af6ed88e...`).
/// Helpers split it on the first `#` but never rewrite the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRef(Box<str>);

impl LocationRef {
    pub fn new(raw: impl Into<Box<str>>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Page part of the reference (everything before `#`).
    pub fn page(&self) -> &str {
        match self.0.split_once('#') {
            Some((page, _)) => page,
            None => &self.0,
        }
    }

    /// Anchor part of the reference, if present and non-empty.
    pub fn anchor(&self) -> Option<&str> {
        self.0
            .split_once('#')
            .map(|(_, anchor)| anchor)
            .filter(|anchor| !anchor.is_empty())
    }

    /// Join this reference onto a documentation base URL.
    ///
    /// Doxygen writes references relative to its `search/` directory, so
    /// leading `../` and `./` segments are dropped before joining. Without a
    /// base the raw reference is returned.
    pub fn resolve(&self, base_url: Option<&str>) -> String {
        let Some(base) = base_url.filter(|b| !b.is_empty()) else {
            return self.0.to_string();
        };

        let mut relative = self.as_str();
        loop {
            if let Some(rest) = relative.strip_prefix("../") {
                relative = rest;
            } else if let Some(rest) = relative.strip_prefix("./") {
                relative = rest;
            } else {
                break;
            }
        }

        format!("{}/{relative}", base.trim_end_matches('/'))
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One documented place where a symbol appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub location: LocationRef,
    /// Owner scope, plus a signature fragment for overloads.
    pub qualified_name: Box<str>,
    /// Link should open in the parent frame (Doxygen's target flag).
    #[serde(default)]
    pub parent_frame: bool,
}

impl Occurrence {
    pub fn new(location: impl Into<Box<str>>, qualified_name: impl Into<Box<str>>) -> Self {
        Self {
            location: LocationRef::new(location),
            qualified_name: qualified_name.into(),
            parent_frame: false,
        }
    }

    pub fn with_parent_frame(mut self, parent_frame: bool) -> Self {
        self.parent_frame = parent_frame;
        self
    }
}

/// A key, its display label and every occurrence recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub key: Box<str>,
    pub display_label: Box<str>,
    pub occurrences: Vec<Occurrence>,
}

impl IndexEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_label(&self) -> &str {
        &self.display_label
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parts() {
        let loc = LocationRef::new("../a02182.html#af6ed88eb49522f26148cd9e484678d41");
        assert_eq!(loc.page(), "../a02182.html");
        assert_eq!(loc.anchor(), Some("af6ed88eb49522f26148cd9e484678d41"));

        let bare = LocationRef::new("../a02618.html");
        assert_eq!(bare.page(), "../a02618.html");
        assert_eq!(bare.anchor(), None);

        let empty_anchor = LocationRef::new("page.html#");
        assert_eq!(empty_anchor.anchor(), None);
    }

    #[test]
    fn test_location_resolve() {
        let loc = LocationRef::new("../a02182.html#af6ed8");
        assert_eq!(loc.resolve(None), "../a02182.html#af6ed8");
        assert_eq!(loc.resolve(Some("")), "../a02182.html#af6ed8");
        assert_eq!(
            loc.resolve(Some("https://docs.example.org/openmesh/")),
            "https://docs.example.org/openmesh/a02182.html#af6ed8"
        );

        let nested = LocationRef::new("./../../a1.html");
        assert_eq!(nested.resolve(Some("/srv/docs")), "/srv/docs/a1.html");
    }

    #[test]
    fn test_occurrence_serde_defaults_parent_frame() {
        let occ: Occurrence = serde_json::from_str(
            r#"{"location":"../a.html#x","qualified_name":"OpenMesh::PolyConnectivity"}"#,
        )
        .unwrap();
        assert!(!occ.parent_frame);
        assert_eq!(occ.location.as_str(), "../a.html#x");
    }
}
