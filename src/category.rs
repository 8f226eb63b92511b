//! Translation categories and miss tracking.

use std::collections::BTreeMap;

use crate::escape::{
    escape_newlines,
    unescape_newlines,
};

/// Returned by [`Category::t`] when no key is given.
pub const INVALID_KEY_TEXT: &str = "ERROR";

/// A single translated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Translated text with real newlines.
    text: String,
}

impl TranslationEntry {
    /// Wraps already unescaped text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Translated text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A named group of translations, e.g. one UI screen.
///
/// Keys are stored with newlines escaped (see [`escape_newlines`]), values
/// with newlines restored.
#[derive(Debug, Clone, Default)]
pub struct Category {
    /// Section name in the language file.
    name: String,
    /// Confirmed translations by normalized key.
    entries: BTreeMap<String, TranslationEntry>,
    /// Normalized key -> text to write for it on the next save.
    missed: BTreeMap<String, String>,
}

impl Category {
    /// Creates an empty category.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: BTreeMap::new(), missed: BTreeMap::new() }
    }

    /// Section name in the language file.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Translates `key`.
    ///
    /// A key containing newlines matches the entry whose file key has them
    /// escaped as `\n`.
    ///
    /// # Arguments
    /// * `key` - Lookup key; an empty key is invalid
    /// * `default` - Text to return and record when `key` is not translated
    ///
    /// # Returns
    /// - The translation, when `key` has one
    /// - Otherwise `default`, or `key` unchanged when there is no default.
    ///   The miss is recorded in [`Category::missed`] under the escaped key,
    ///   overwriting an earlier miss of the same key.
    /// - [`INVALID_KEY_TEXT`] for an empty key, without recording anything
    ///
    /// Leading and trailing whitespace of a default survives a save and
    /// reload; see [`crate::ini`] for how such values are quoted.
    pub fn t(&mut self, key: &str, default: Option<&str>) -> String {
        if key.is_empty() {
            return INVALID_KEY_TEXT.to_string();
        }

        let normalized = escape_newlines(key);
        if let Some(entry) = self.entries.get(&normalized) {
            return entry.text.clone();
        }

        let recorded = default.map_or_else(|| normalized.clone(), str::to_string);
        self.missed.insert(normalized, recorded);
        default.unwrap_or(key).to_string()
    }

    /// Merges `source` into the confirmed entries.
    ///
    /// Keys that already exist keep their current text. `\n` escapes in
    /// values become real newlines.
    ///
    /// # Arguments
    /// * `source` - Normalized key and escaped value pairs, e.g. a file section
    pub fn set_map<K, V>(&mut self, source: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        for (key, value) in source {
            self.entries
                .entry(key.into())
                .or_insert_with(|| TranslationEntry::new(unescape_newlines(value.as_ref())));
        }
    }

    /// Keys looked up without a translation since the last clear.
    #[must_use]
    pub const fn missed(&self) -> &BTreeMap<String, String> {
        &self.missed
    }

    /// Forgets all misses. Called after they have been saved.
    pub fn clear_missed(&mut self) {
        self.missed.clear();
    }

    /// Confirmed translations keyed by normalized key.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, TranslationEntry> {
        &self.entries
    }

    /// Whether `key` has a confirmed translation. Does not record a miss.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&escape_newlines(key))
    }

    /// Number of confirmed translations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no confirmed translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
