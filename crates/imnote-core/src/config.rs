//! User settings
//!
//! Stored as TOML, by default at `<config dir>/imnote/config.toml`. Every
//! field has a default, so a partial file (or none at all) is valid.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use imnote_bibtex::BibTeXEntryType;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::template::KeyPrecedence;

/// Settings for one user's vault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Style name under the CSL styles repository, without `.csl`
    pub csl_style: String,
    /// Folder for new notes; empty means the active document's folder
    pub custom_folder: String,
    /// Template for new note names
    pub file_name: String,
    /// Stamp records with today's date as the access date
    pub show_accessed: bool,
    pub key_precedence: KeyPrecedence,
    /// BibTeX type to template path in the vault
    pub templates: BTreeMap<String, String>,
    pub processor: ProcessorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csl_style: "apa-6th-edition".to_string(),
            custom_folder: String::new(),
            file_name: "Untitled".to_string(),
            show_accessed: false,
            key_precedence: KeyPrecedence::default(),
            templates: BTreeMap::new(),
            processor: ProcessorConfig::default(),
        }
    }
}

/// The external citeproc executable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            command: "citeproc".to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No template type named '{0}'")]
    UnknownTemplateType(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl Settings {
    /// Default settings location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("imnote").join("config.toml"))
    }

    /// Load and validate settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from the default location, or defaults when no file exists
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("No settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check template types and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.csl_style.trim().is_empty() {
            return Err(ConfigError::MissingField("csl_style"));
        }

        if self.processor.command.trim().is_empty() {
            return Err(ConfigError::MissingField("processor.command"));
        }

        for kind in self.templates.keys() {
            if !is_template_type(kind) {
                return Err(ConfigError::UnknownTemplateType(kind.clone()));
            }
        }

        Ok(())
    }

    /// Template path configured for a BibTeX type, if any
    pub fn template_for(&self, entry_type: &str) -> Option<&str> {
        self.templates
            .get(&entry_type.to_lowercase())
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }
}

/// Whether `kind` is one of the BibTeX types a template can be assigned to
pub fn is_template_type(kind: &str) -> bool {
    BibTeXEntryType::template_types()
        .iter()
        .any(|t| t.as_str() == kind.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.csl_style, "apa-6th-edition");
        assert_eq!(settings.file_name, "Untitled");
        assert_eq!(settings.key_precedence, KeyPrecedence::ComputedFirst);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file() {
        let settings = Settings::from_toml(
            r#"
            csl_style = "ieee"
            key_precedence = "raw-first"

            [templates]
            article = "Templates/Article.md"
            "#,
        )
        .unwrap();

        assert_eq!(settings.csl_style, "ieee");
        assert_eq!(settings.key_precedence, KeyPrecedence::RawFirst);
        assert_eq!(settings.template_for("Article"), Some("Templates/Article.md"));
        assert_eq!(settings.template_for("book"), None);
        assert_eq!(settings.processor.command, "citeproc");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings
            .templates
            .insert("book".to_string(), "Templates/Book.md".to_string());
        settings.processor.args = vec!["--format".to_string(), "html".to_string()];

        let parsed = Settings::from_toml(&settings.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_unknown_template_type() {
        let mut settings = Settings::default();
        settings
            .templates
            .insert("online".to_string(), "x.md".to_string());
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::UnknownTemplateType(t)) if t == "online"
        ));
    }

    #[test]
    fn test_empty_style_is_rejected() {
        let settings = Settings {
            csl_style: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField("csl_style"))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/imnote.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
