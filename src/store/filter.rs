//! Filter view over the entry list

use serde::{Deserialize, Serialize};

use super::FileEntry;

/// Which entries of a snapshot are visible under the current filter term.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visible {
    /// Empty filter: every entry, in store order
    #[default]
    All,
    /// Indices into the entry list, ascending
    Matching(Vec<usize>),
}

impl Visible {
    /// Number of visible entries out of `total`
    #[must_use]
    pub fn len(&self, total: usize) -> usize {
        match self {
            Self::All => total,
            Self::Matching(indices) => indices.len(),
        }
    }

    /// Map a visible row to its index in the entry list
    #[must_use]
    pub fn entry_index(&self, row: usize, total: usize) -> Option<usize> {
        match self {
            Self::All => (row < total).then_some(row),
            Self::Matching(indices) => indices.get(row).copied(),
        }
    }
}

/// Compute the visible subset for a filter term.
///
/// Matching is a case-insensitive substring test on the original name.
/// An empty term short-circuits to [`Visible::All`].
#[must_use]
pub fn visible(entries: &[FileEntry], term: &str) -> Visible {
    if term.is_empty() {
        return Visible::All;
    }

    let needle = term.to_lowercase();
    let indices = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.original_name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect();

    Visible::Matching(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_entry;

    #[test]
    fn test_empty_term_is_identity() {
        let entries = vec![test_entry(1, "a.jpg"), test_entry(2, "b.jpg")];
        assert_eq!(visible(&entries, ""), Visible::All);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let entries = vec![
            test_entry(1, "Beach.JPG"),
            test_entry(2, "forest.png"),
            test_entry(3, "BEACH_2.mov"),
        ];
        assert_eq!(visible(&entries, "beach"), Visible::Matching(vec![0, 2]));
    }

    #[test]
    fn test_entry_index_maps_rows() {
        let matching = Visible::Matching(vec![1, 4]);
        assert_eq!(matching.entry_index(1, 5), Some(4));
        assert_eq!(matching.entry_index(2, 5), None);
        assert_eq!(Visible::All.entry_index(2, 3), Some(2));
        assert_eq!(Visible::All.entry_index(3, 3), None);
        assert_eq!(matching.len(5), 2);
    }
}
