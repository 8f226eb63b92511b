//! ini-i18n
//!
//! Runtime translation lookup grouped into categories, backed by one `.ini`
//! file per language. Keys requested without a translation are collected and
//! can be appended to the language file without touching existing entries.
//!
//! ```no_run
//! use ini_i18n::{
//!     I18nSettings,
//!     Repository,
//! };
//!
//! let mut repo = Repository::open(".", I18nSettings::default());
//! if repo.load_ini("en_US", None).is_err() {
//!     // Continue untranslated; every lookup falls back to its default.
//! }
//! let title = repo.category("Main").t("Title", Some("My Application"));
//! # let _ = title;
//! repo.save_ini("en_US")?;
//! # Ok::<(), ini_i18n::RepositoryError>(())
//! ```

/// Translation categories
pub mod category;
/// Settings
pub mod config;
/// Newline escaping
pub mod escape;
/// Section file format
pub mod ini;
/// Resource lookup
pub mod locator;
/// Language repository
pub mod repository;

/// Test helpers
mod test_utils;

pub use category::{
    Category,
    TranslationEntry,
};
pub use config::{
    ConfigManager,
    I18nSettings,
};
pub use locator::{
    DirectoryLocator,
    OverlayLocator,
    ResourceLocator,
};
pub use repository::{
    Repository,
    RepositoryError,
};
