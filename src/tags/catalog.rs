//! Tag catalog: tag id to localized description

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN: &str = include_str!("../../assets/tags.toml");
const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read tag catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid tag catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Static mapping of tag ids to descriptions per language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tags: BTreeMap<String, BTreeMap<String, String>>,
}

impl Catalog {
    /// Catalog compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the embedded table is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(BUILTIN)
    }

    /// Parse a catalog from TOML text
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` on invalid TOML or an unexpected shape.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(text)?)
    }

    /// Load the user catalog at `path` if it exists, else the builtin one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(path)?;
                Self::parse(&text)
            }
            _ => Self::builtin(),
        }
    }

    /// Description of a tag, falling back to English then the raw id.
    #[must_use]
    pub fn describe<'a>(&'a self, id: &'a str, language: &str) -> &'a str {
        let Some(descriptions) = self.tags.get(id) else {
            return id;
        };

        descriptions
            .get(language)
            .or_else(|| descriptions.get(FALLBACK_LANGUAGE))
            .map_or(id, String::as_str)
    }

    /// All tag ids, sorted
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.tags.keys().map(String::as_str)
    }

    /// Ids whose id or description contains `term`, case-insensitive.
    #[must_use]
    pub fn search(&self, term: &str, language: &str) -> Vec<&str> {
        let needle = term.to_lowercase();
        self.ids()
            .filter(|id| {
                needle.is_empty()
                    || id.to_lowercase().contains(&needle)
                    || self.describe(id, language).to_lowercase().contains(&needle)
            })
            .collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.tags.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
