//! Owner of all translation categories for one application.
//!
//! # Load/save protocol
//!
//! Loading replaces every category with the sections of one language file.
//! Saving is additive: keys missed at runtime are appended to the canonical
//! file without touching values a translator already wrote, while confirmed
//! in-memory entries are written back as they are.

use std::collections::BTreeMap;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::category::Category;
use crate::config::{
    ConfigManager,
    I18nSettings,
};
use crate::escape::escape_newlines;
use crate::ini::{
    IniError,
    IniFile,
    Section,
    is_valid_section_name,
};
use crate::locator::{
    DirectoryLocator,
    ResourceLocator,
};

/// Errors from loading or saving a language file.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No language file at the resolved path.
    #[error("Translation file not found: {path}")]
    NotFound {
        /// Resource path that was looked up.
        path: String,
    },

    /// The file exists but could not be read or parsed.
    #[error("Failed to read translation file '{path}': {source}")]
    Read {
        /// Resource path that was read.
        path: String,
        /// Underlying read or parse error.
        source: IniError,
    },

    /// The canonical file could not be written.
    #[error("Failed to write translation file {path:?}: {source}")]
    Write {
        /// File system path that was written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Translation categories of the current language.
#[derive(Debug)]
pub struct Repository {
    /// Language directory, extension and fallback settings.
    settings: I18nSettings,
    /// Source of language files for loading.
    locator: Box<dyn ResourceLocator>,
    /// Directory the canonical translation files are saved under.
    save_root: PathBuf,
    /// Categories by name.
    categories: BTreeMap<String, Category>,
    /// Language of the last successful load.
    language_id: Option<String>,
}

impl Repository {
    /// Creates an empty repository.
    ///
    /// # Arguments
    /// * `settings` - Language directory and file naming
    /// * `locator` - Where language files are loaded from
    /// * `save_root` - Directory canonical files are saved under
    #[must_use]
    pub fn new(
        settings: I18nSettings,
        locator: impl ResourceLocator + 'static,
        save_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            locator: Box::new(locator),
            save_root: save_root.into(),
            categories: BTreeMap::new(),
            language_id: None,
        }
    }

    /// Reads and saves translation files under `root`.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>, settings: I18nSettings) -> Self {
        let root = root.into();
        Self::new(settings, DirectoryLocator::new(root.clone()), root)
    }

    /// Repository over the manager's project root, or the current directory.
    #[must_use]
    pub fn from_config(config: &ConfigManager) -> Self {
        let root = config.project_root().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self::open(root, config.get_settings().clone())
    }

    /// Settings the repository was created with.
    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    /// Language of the last successful load.
    #[must_use]
    pub fn language_id(&self) -> Option<&str> {
        self.language_id.as_deref()
    }

    /// The category called `name`, created empty if it does not exist yet.
    ///
    /// A category that is not loaded misses every key until a load fills it.
    pub fn category(&mut self, name: &str) -> &mut Category {
        self.categories.entry(name.to_string()).or_insert_with(|| Category::new(name))
    }

    /// The category called `name`, without creating it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Whether a category called `name` exists.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Category names in sorted order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Drops every category.
    pub fn clear(&mut self) {
        self.categories.clear();
    }

    /// Resource path of `language_id`, e.g. `lang/en_US.ini`.
    #[must_use]
    pub fn ini_path(&self, language_id: &str) -> String {
        self.settings.ini_path(language_id)
    }

    /// Whether the locator has a regular file at the canonical path.
    #[must_use]
    pub fn ini_exists(&self, language_id: &str) -> bool {
        self.locator
            .file_info(&self.ini_path(language_id))
            .is_some_and(|info| info.exists && !info.is_directory)
    }

    /// Replaces all categories with the sections of a language file.
    ///
    /// The anonymous leading section is ignored. Sections with the same name
    /// merge, the first value of a key winning.
    ///
    /// # Arguments
    /// * `language_id` - Language to load, e.g. `en_US`
    /// * `override_path` - Directory prefix to load from instead of the
    ///   canonical path; the file is `<override_path><language_id>.<extension>`.
    ///   `None` or an empty prefix uses [`Repository::ini_path`].
    ///
    /// # Returns
    /// - `Ok(())`: categories replaced
    /// - `Err(RepositoryError)`: nothing changed
    ///
    /// # Errors
    /// - The file does not exist
    /// - The file cannot be read or parsed
    pub fn load_ini(
        &mut self,
        language_id: &str,
        override_path: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let path = match override_path.filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => format!("{prefix}{language_id}.{}", self.settings.extension),
            None => self.ini_path(language_id),
        };
        tracing::debug!(language_id, path = %path, "Loading translations");

        let ini = self.read_ini(&path).inspect_err(|e| {
            tracing::warn!("Failed to load language {}: {}", language_id, e);
        })?;

        self.clear();
        for section in ini.sections().iter().filter(|section| !section.name().is_empty()) {
            self.categories
                .entry(section.name().to_string())
                .or_insert_with(|| Category::new(section.name()))
                .set_map(section.to_map());
        }
        self.language_id = Some(language_id.to_string());

        tracing::debug!(language_id, categories = self.categories.len(), "Translations loaded");
        Ok(())
    }

    /// Loads `language_id`, or the default language when that fails.
    ///
    /// Uses the configured override path.
    ///
    /// # Returns
    /// The language that was actually loaded.
    ///
    /// # Errors
    /// - Neither language could be loaded; the error is the last attempt's
    pub fn load_with_fallback(&mut self, language_id: &str) -> Result<String, RepositoryError> {
        let override_path = self.settings.override_path.clone();

        match self.load_ini(language_id, override_path.as_deref()) {
            Ok(()) => Ok(language_id.to_string()),
            Err(e) if language_id == self.settings.default_language => Err(e),
            Err(_) => {
                let fallback = self.settings.default_language.clone();
                tracing::info!("Falling back to default language {}", fallback);
                self.load_ini(&fallback, override_path.as_deref())?;
                Ok(fallback)
            }
        }
    }

    /// Writes missed keys and confirmed entries to the canonical file,
    /// keeping everything else already in it.
    ///
    /// Missed keys are only added where the file has no value yet; confirmed
    /// entries always replace the file's value. The canonical path is used
    /// even when the language was loaded from an override path.
    ///
    /// Categories whose name cannot be a section header (empty, or
    /// containing `]` or a line break) are skipped with a warning and keep
    /// their missed keys.
    ///
    /// # Arguments
    /// * `language_id` - Language whose canonical file is updated
    ///
    /// # Returns
    /// - `Ok(())`: file written, missed keys of written categories cleared
    /// - `Err(RepositoryError)`: nothing written, missed keys kept
    ///
    /// # Errors
    /// - The existing file cannot be read or parsed
    /// - The file cannot be written
    pub fn save_ini(&mut self, language_id: &str) -> Result<(), RepositoryError> {
        let relative = self.ini_path(language_id);
        let path = self.save_root.join(&relative);
        tracing::debug!(language_id, path = ?path, "Saving translations");

        let mut ini = IniFile::load(&path)
            .map_err(|source| RepositoryError::Read { path: relative, source })?;

        for (name, category) in &self.categories {
            if is_valid_section_name(name) {
                write_section(ini.get_or_create_section(name), category);
            } else {
                tracing::warn!(category = %name, "Category name cannot be saved as a section");
            }
        }

        ini.save(&path).map_err(|source| RepositoryError::Write { path: path.clone(), source })?;

        for (_, category) in
            self.categories.iter_mut().filter(|(name, _)| is_valid_section_name(name))
        {
            category.clear_missed();
        }
        tracing::debug!(language_id, "Translations saved");
        Ok(())
    }

    /// Languages with a translation file in the language directory.
    ///
    /// Empty when the directory cannot be listed.
    #[must_use]
    pub fn available_languages(&self) -> Vec<String> {
        let lang_dir = self.settings.lang_dir.trim_end_matches('/');
        match self.locator.list(lang_dir) {
            Ok(names) => names
                .iter()
                .filter_map(|name| self.settings.language_from_file_name(name))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                tracing::debug!("Cannot list {}: {}", lang_dir, e);
                Vec::new()
            }
        }
    }

    /// Directory the canonical files are written under.
    #[must_use]
    pub fn save_root(&self) -> &Path {
        &self.save_root
    }

    /// Reads and parses a language file through the locator.
    fn read_ini(&self, path: &str) -> Result<IniFile, RepositoryError> {
        let bytes = self.locator.read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                RepositoryError::NotFound { path: path.to_string() }
            } else {
                RepositoryError::Read { path: path.to_string(), source: e.into() }
            }
        })?;
        IniFile::from_bytes(&bytes)
            .map_err(|source| RepositoryError::Read { path: path.to_string(), source })
    }
}

/// Adds `category`'s missed keys where `section` has none, then writes
/// every confirmed entry.
fn write_section(section: &mut Section, category: &Category) {
    for (key, text) in category.missed() {
        if !section.exists(key) {
            section.set(key.as_str(), escape_newlines(text));
        }
    }

    for (key, entry) in category.entries() {
        section.set(key.as_str(), escape_newlines(entry.text()));
    }
}
