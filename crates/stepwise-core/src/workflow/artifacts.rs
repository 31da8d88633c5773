//! Artifact accumulation for a single validation run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Requirement sentinel meaning "every validation produced so far".
pub const ALL_VALIDATIONS: &str = "all_validations";

/// Requirement sentinel meaning "every document produced so far".
pub const ALL_DOCUMENTS: &str = "all_documents";

/// The set of artifact names produced so far in a run.
///
/// Grows monotonically while steps are walked in order. The only way to
/// shrink it is [`ArtifactSet::clear`], which starts a new run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSet {
    names: BTreeSet<String>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an artifact. Returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Reset for a new run.
    pub fn clear(&mut self) {
        self.names.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for ArtifactSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent_and_sorted() {
        let mut set = ArtifactSet::new();
        assert!(set.insert("prd.md"));
        assert!(set.insert("architecture.md"));
        assert!(!set.insert("prd.md"));

        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["architecture.md", "prd.md"]);
    }

    #[test]
    fn test_serializes_as_array() {
        let set: ArtifactSet = ["b.md", "a.md"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a.md","b.md"]"#);
    }
}
