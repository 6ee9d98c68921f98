//! Tag toggle policy
//!
//! A tag toggled over a multi-entry selection is removed from every entry
//! when all of them carry it, and otherwise added to those that lack it.
//! [`TagState`] is the three-way membership the UI renders.

mod catalog;

pub use catalog::{Catalog, CatalogError};

use crate::store::{EntryId, FileEntry};

/// Membership of one tag across a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    /// No selected entry has the tag (or nothing is selected)
    None,
    /// Every selected entry has the tag
    All,
    /// Some but not all selected entries have the tag
    Some,
}

impl TagState {
    /// Compute the membership of `tag` over a set of entries.
    pub fn of<'a, I>(entries: I, tag: &str) -> Self
    where
        I: IntoIterator<Item = &'a FileEntry>,
    {
        let mut total = 0usize;
        let mut with_tag = 0usize;

        for entry in entries {
            total += 1;
            if entry.has_tag(tag) {
                with_tag += 1;
            }
        }

        match (total, with_tag) {
            (0, _) | (_, 0) => Self::None,
            (t, w) if t == w => Self::All,
            _ => Self::Some,
        }
    }

    /// Checkbox-style marker
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::None => "[ ]",
            Self::All => "[x]",
            Self::Some => "[~]",
        }
    }
}

/// Apply the toggle to the entries whose id is in `ids`.
///
/// Ids that do not name an entry are ignored.
pub fn toggle(entries: &mut [FileEntry], ids: &[EntryId], tag: &str) {
    let state = TagState::of(entries.iter().filter(|e| ids.contains(&e.id)), tag);
    let selected = entries.iter_mut().filter(|e| ids.contains(&e.id));

    if state == TagState::All {
        for entry in selected {
            entry.tags.retain(|t| t != tag);
        }
    } else {
        for entry in selected {
            if !entry.has_tag(tag) {
                entry.tags.push(tag.to_string());
            }
        }
    }
}
