//! Schema name translations.
//!
//! Schemas usually name themselves with a key like `t:names.image_banner`, resolved
//! against the `names` table of the theme's schema locale file.

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;
use crate::naming::humanize;

/// Prefix of a translated schema name.
pub const NAMES_KEY_PREFIX: &str = "t:names.";

static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

/// Remove `/* ... */` comments. Locale files ship with a license banner that plain
/// JSON parsers reject.
pub fn strip_block_comments(content: &str) -> String {
    BLOCK_COMMENT.replace_all(content, "").into_owned()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationTable {
    names: HashMap<String, String>,
}

impl TranslationTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(&strip_block_comments(content))?;

        let names = value
            .get("names")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(key, v)| v.as_str().map(|s| (key.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { names })
    }

    /// Read the table from disk. A missing or malformed file gives an empty table.
    pub fn load(path: &Path) -> Self {
        let loaded = fs::read_to_string(path)
            .map_err(crate::error::ThemeError::from)
            .and_then(|content| Self::from_json_str(&content));

        match loaded {
            Ok(table) => {
                debug!("Loaded {} name translations from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                warn!("Error loading translations from {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a declared schema name. Plain names pass through unchanged; a
    /// `t:names.` key falls back to the humanized key when the table has no entry.
    pub fn resolve(&self, declared: &str) -> String {
        match declared.strip_prefix(NAMES_KEY_PREFIX) {
            Some(key) => self
                .names
                .get(key)
                .filter(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| humanize(key)),
            None => declared.to_string(),
        }
    }

    /// Display name for a template: its resolved schema name, or its humanized
    /// template name when the schema has none.
    pub fn display_name(&self, schema_name: Option<&str>, template_name: &str) -> String {
        match schema_name.filter(|n| !n.is_empty()) {
            Some(name) => self.resolve(name),
            None => humanize(template_name),
        }
    }
}

/// Process-scoped translation table.
///
/// The file is read on first access and the result (possibly the empty fallback) is
/// reused for the life of the handle. There is no invalidation; a new process re-reads
/// the file.
#[derive(Debug)]
pub struct SharedTranslations {
    path: PathBuf,
    table: OnceCell<TranslationTable>,
}

impl SharedTranslations {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    /// Handle with a table already in place, never touching disk.
    pub fn preloaded(table: TranslationTable) -> Self {
        Self {
            path: PathBuf::new(),
            table: OnceCell::with_value(table),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn get(&self) -> &TranslationTable {
        self.table.get_or_init(|| TranslationTable::load(&self.path))
    }
}
