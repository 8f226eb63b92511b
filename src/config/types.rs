//! Settings types and validation.

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// 設定値1件の検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., `langDir`)
    pub field_path: String,
    /// What is wrong and how to fix it
    pub message: String,
}

impl ValidationError {
    /// 検証エラーを作成
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込み・検証エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 1件以上の設定値が不正
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// 設定ファイルの読み込みに失敗
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// 設定ファイルの JSON が不正
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号付きの複数行に整形
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Translation file settings, read from `.i18n.json` in camelCase.
///
/// Missing fields take their default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Directory holding one translation file per language.
    pub lang_dir: String,

    /// Translation file extension, without the dot.
    pub extension: String,

    /// Language loaded when the requested one is unavailable.
    pub default_language: String,

    /// Prefix for loading reference languages from elsewhere.
    /// Saves never go here.
    pub override_path: Option<String>,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            lang_dir: "lang".to_string(),
            extension: "ini".to_string(),
            default_language: "en_US".to_string(),
            override_path: None,
        }
    }
}

impl I18nSettings {
    /// Checks every field and reports all problems at once.
    ///
    /// # Errors
    /// - Required field is empty
    /// - Extension starts with a dot
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.lang_dir.is_empty() {
            errors.push(ValidationError::new(
                "langDir",
                "The directory cannot be empty. Example: \"lang\"",
            ));
        }

        if self.extension.is_empty() {
            errors.push(ValidationError::new(
                "extension",
                "The extension cannot be empty. Example: \"ini\"",
            ));
        } else if self.extension.starts_with('.') {
            errors.push(ValidationError::new(
                "extension",
                format!("Remove the leading dot: \"{}\"", self.extension.trim_start_matches('.')),
            ));
        }

        if self.default_language.is_empty() {
            errors.push(ValidationError::new(
                "defaultLanguage",
                "The language cannot be empty. Example: \"en_US\"",
            ));
        }

        if let Some(path) = &self.override_path
            && path.is_empty()
        {
            errors.push(ValidationError::new(
                "overridePath",
                "The path cannot be empty. Please specify a directory prefix, or remove this field",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Resource path of a language's translation file, e.g. `lang/en_US.ini`.
    #[must_use]
    pub fn ini_path(&self, language_id: &str) -> String {
        format!("{}/{language_id}.{}", self.lang_dir.trim_end_matches('/'), self.extension)
    }

    /// Language id for a file name in [`I18nSettings::lang_dir`], if it has
    /// the translation extension.
    #[must_use]
    pub fn language_from_file_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.extension.as_str())
            .and_then(|stem| stem.strip_suffix('.'))
            .filter(|stem| !stem.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = I18nSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLanguage": "ja_JP", "overridePath": "/opt/ref/"}"#;

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.lang_dir, eq("lang"));
        assert_that!(settings.default_language, eq("ja_JP"));
        assert_that!(settings.override_path, some(eq("/opt/ref/")));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: I18nSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings, eq(&I18nSettings::default()));
    }

    #[rstest]
    fn validate_invalid_lang_dir_empty() {
        let settings = I18nSettings { lang_dir: String::new(), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("langDir")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_extension_with_dot() {
        let settings = I18nSettings { extension: ".ini".to_string(), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("extension")),
                field!(ValidationError.message, contains_substring("leading dot"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_override_path_empty() {
        let settings =
            I18nSettings { override_path: Some(String::new()), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("overridePath"))])
        );
    }

    #[rstest]
    fn validate_collects_every_error() {
        let settings = I18nSettings {
            lang_dir: String::new(),
            extension: String::new(),
            default_language: String::new(),
            override_path: None,
        };

        let error_message =
            ConfigError::ValidationErrors(settings.validate().unwrap_err()).to_string();

        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. langDir"));
        assert_that!(error_message, contains_substring("2. extension"));
        assert_that!(error_message, contains_substring("3. defaultLanguage"));
    }

    #[rstest]
    #[case::default_dir("lang", "en_US", "lang/en_US.ini")]
    #[case::trailing_slash("assets/lang/", "de_DE", "assets/lang/de_DE.ini")]
    fn ini_path_joins_dir_and_extension(
        #[case] lang_dir: &str,
        #[case] language_id: &str,
        #[case] expected: &str,
    ) {
        let settings = I18nSettings { lang_dir: lang_dir.to_string(), ..I18nSettings::default() };

        assert_that!(settings.ini_path(language_id), eq(expected));
    }

    #[rstest]
    #[case::ini("en_US.ini", Some("en_US"))]
    #[case::other_extension("README.md", None)]
    #[case::no_stem(".ini", None)]
    #[case::no_dot("fooini", None)]
    fn language_from_file_name_strips_extension(
        #[case] file_name: &str,
        #[case] expected: Option<&str>,
    ) {
        let settings = I18nSettings::default();

        assert_eq!(settings.language_from_file_name(file_name), expected);
    }
}
