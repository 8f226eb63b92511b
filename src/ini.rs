//! Ordered section file (`.ini`) reading and writing.
//!
//! Comments, blank lines and unrecognized lines are kept as they were so a
//! load/save cycle does not destroy hand edits.
//!
//! # Line format
//!
//! Entries are written as `key = value`. Anything [`IniFile::parse`] would
//! read back differently is quoted:
//!
//! - Keys that are empty, start with `[`, `;`, `#` or `"`, contain `=` or
//!   have surrounding whitespace are written as `"key"`, with `\` and `"`
//!   escaped by a backslash.
//! - Values with surrounding whitespace, or that are themselves wrapped in
//!   `"`, get one more pair of `"`. One outer pair is always removed on read.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Byte order mark some editors put at the start of the file.
const UTF8_BOM: &str = "\u{feff}";

/// Errors from reading a section file.
#[derive(Error, Debug)]
pub enum IniError {
    /// The file could not be read.
    #[error("Failed to access section file: {0}")]
    Io(#[from] std::io::Error),

    /// The content is not UTF-8. `line` is 1-based.
    #[error("Section file is not valid UTF-8 (line {line})")]
    InvalidUtf8 {
        /// Line holding the first invalid byte.
        line: usize,
    },

    /// A line opens a section header but is neither a header nor an entry.
    #[error("Unterminated section header on line {line}: '{text}'")]
    UnterminatedSection {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },
}

/// A single line inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// A `key = value` pair, stored unquoted.
    Entry {
        /// Key as looked up by callers.
        key: String,
        /// Value as returned by [`Section::get`].
        value: String,
    },
    /// Comment, blank or otherwise unparsed line, written back verbatim.
    Raw(String),
}

/// A named, ordered list of `key = value` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Header name; empty for the anonymous leading section.
    name: String,
    /// Lines in file order.
    lines: Vec<Line>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), lines: Vec::new() }
    }

    /// Header name; empty for the anonymous section.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any line has `key`.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Value of the last line with `key`.
    ///
    /// Unquoted values in the file are trimmed; a value written by
    /// [`Section::set`] comes back exactly, surrounding whitespace included.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Replaces the value of `key` in place, or appends a new line.
    ///
    /// # Arguments
    /// * `key` - Entry key, quoted on output when needed
    /// * `value` - Entry value, quoted on output when needed
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let existing = self.lines.iter_mut().rev().find_map(|line| match line {
            Line::Entry { key: k, value } if *k == key => Some(value),
            _ => None,
        });
        if let Some(slot) = existing {
            *slot = value;
            return;
        }
        self.lines.push(Line::Entry { key, value });
    }

    /// Keys in file order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, .. } => Some(key.as_str()),
            Line::Raw(_) => None,
        })
    }

    /// Key/value pairs as a map. The last of duplicate keys wins.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Entry { key, value } => Some((key.clone(), value.clone())),
                Line::Raw(_) => None,
            })
            .collect()
    }
}

/// Whether `name` can be written as a `[name]` header and read back.
#[must_use]
pub fn is_valid_section_name(name: &str) -> bool {
    !name.is_empty() && !name.contains([']', '\n', '\r']) && name.trim() == name
}

/// A parsed section file.
///
/// The first section is always the anonymous one (empty name) holding any
/// lines that precede the first header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniFile {
    /// Sections in file order, anonymous section first.
    sections: Vec<Section>,
}

impl Default for IniFile {
    fn default() -> Self {
        Self { sections: vec![Section::new("")] }
    }
}

impl IniFile {
    /// Creates a file holding only the empty anonymous section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses section file text.
    ///
    /// A line is a header only when its first `]` is its last character, so
    /// `[Debug] Start = x` is an entry with key `[Debug] Start`.
    ///
    /// # Errors
    /// - A line starting with `[` that is neither a header nor an entry
    pub fn parse(content: &str) -> Result<Self, IniError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let mut ini = Self::new();

        for (index, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();

            if let Some(name) = parse_header(trimmed) {
                ini.sections.push(Section::new(name.trim()));
                continue;
            }

            let line = if trimmed.is_empty() || trimmed.starts_with([';', '#']) {
                Line::Raw(raw.to_string())
            } else if let Some((key, value)) = parse_entry(trimmed) {
                Line::Entry { key, value }
            } else if trimmed.starts_with('[') {
                return Err(IniError::UnterminatedSection {
                    line: index + 1,
                    text: trimmed.to_string(),
                });
            } else {
                Line::Raw(raw.to_string())
            };

            if let Some(section) = ini.sections.last_mut() {
                section.lines.push(line);
            }
        }

        Ok(ini)
    }

    /// Parses raw file bytes.
    ///
    /// # Errors
    /// - Invalid UTF-8
    /// - See [`IniFile::parse`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IniError> {
        let content = std::str::from_utf8(bytes).map_err(|e| {
            let line = bytes.iter().take(e.valid_up_to()).filter(|&&b| b == b'\n').count() + 1;
            IniError::InvalidUtf8 { line }
        })?;
        Self::parse(content)
    }

    /// Reads a file from disk. A missing file yields an empty [`IniFile`].
    ///
    /// # Errors
    /// - Read errors other than "not found"
    /// - See [`IniFile::from_bytes`]
    pub fn load(path: &Path) -> Result<Self, IniError> {
        match std::fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Section file not found, starting empty: {:?}", path);
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the file, creating parent directories as needed.
    ///
    /// # Errors
    /// - Directory creation or write errors
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string())
    }

    /// All sections, anonymous section first.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section called `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// First section called `name`, appended empty if there is none.
    #[allow(clippy::indexing_slicing)] // position() の結果か push 直後の末尾なので範囲内
    pub fn get_or_create_section(&mut self, name: &str) -> &mut Section {
        let index =
            self.sections.iter().position(|section| section.name == name).unwrap_or_else(|| {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            });
        &mut self.sections[index]
    }
}

impl fmt::Display for IniFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            if !section.name.is_empty() {
                writeln!(f, "[{}]", section.name)?;
            }
            for line in &section.lines {
                match line {
                    Line::Entry { key, value } => {
                        writeln!(f, "{} = {}", encode_key(key), encode_value(value))?;
                    }
                    Line::Raw(text) => writeln!(f, "{text}")?,
                }
            }
        }
        Ok(())
    }
}

/// Header name of a `[name]` line whose only `]` is the last character.
fn parse_header(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix('[')?;
    let (name, rest) = inner.split_once(']')?;
    rest.is_empty().then_some(name)
}

/// Splits an entry line into its decoded key and value.
fn parse_entry(trimmed: &str) -> Option<(String, String)> {
    let (key, rest) = if let Some(quoted) = trimmed.strip_prefix('"') {
        let (key, after) = parse_quoted_key(quoted)?;
        (key, after.trim_start().strip_prefix('=')?)
    } else {
        let (key, rest) = trimmed.split_once('=')?;
        (key.trim_end().to_string(), rest)
    };
    Some((key, decode_value(rest.trim()).to_string()))
}

/// Reads a quoted key up to its closing `"`, returning the key and the
/// text after the quote.
fn parse_quoted_key(text: &str) -> Option<(String, &str)> {
    let mut key = String::new();
    let mut chars = text.char_indices();
    while let Some((position, c)) = chars.next() {
        match c {
            '\\' => key.push(chars.next()?.1),
            '"' => return Some((key, text.get(position + 1..)?)),
            _ => key.push(c),
        }
    }
    None
}

/// Whether a bare `key` would be misread by [`IniFile::parse`].
fn needs_quoted_key(key: &str) -> bool {
    key.is_empty()
        || key.starts_with(['[', ';', '#', '"'])
        || key.contains('=')
        || key.trim() != key
}

/// Key as written to the file.
fn encode_key(key: &str) -> String {
    if !needs_quoted_key(key) {
        return key.to_string();
    }
    let mut quoted = String::with_capacity(key.len() + 2);
    quoted.push('"');
    for c in key.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Whether `value` is wrapped in a pair of `"`.
fn is_quoted_value(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('"') && value.ends_with('"')
}

/// Value as written to the file.
fn encode_value(value: &str) -> String {
    if value.trim() != value || is_quoted_value(value) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Value with one outer pair of `"` removed.
fn decode_value(value: &str) -> &str {
    if is_quoted_value(value) {
        value.get(1..value.len() - 1).unwrap_or(value)
    } else {
        value
    }
}
