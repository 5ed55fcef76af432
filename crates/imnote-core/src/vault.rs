//! The note collection that templates are read from and notes written to
//!
//! Paths are vault-relative, `/`-separated strings; the empty string is the
//! vault root.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::Settings;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Could not open the folder at '{0}'")]
    InvalidFolder(String),

    #[error("Path leaves the vault: {0}")]
    OutsideVault(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Storage the generator works against
pub trait Vault {
    fn read_file(&self, path: &str) -> Result<String, VaultError>;

    /// Create a new file; fails when something already exists at `path`
    fn create_file(&self, path: &str, contents: &str) -> Result<(), VaultError>;

    /// Names of the direct children of a folder
    fn list_children(&self, folder: &str) -> Result<Vec<String>, VaultError>;

    fn is_folder(&self, path: &str) -> bool;

    /// Folder of the document the user is working in, if any
    fn active_folder(&self) -> Option<String>;
}

/// Join a vault folder and a child name
pub fn join(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// Folder new notes go into
///
/// A configured custom folder must exist; otherwise the active document's
/// folder is used, falling back to the vault root.
pub fn target_folder<V: Vault + ?Sized>(vault: &V, settings: &Settings) -> Result<String, VaultError> {
    let custom = settings.custom_folder.trim_matches('/');
    if !custom.is_empty() {
        return if vault.is_folder(custom) {
            Ok(custom.to_string())
        } else {
            Err(VaultError::InvalidFolder(custom.to_string()))
        };
    }

    Ok(vault.active_folder().unwrap_or_default())
}

/// A vault backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
    active: Option<String>,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: None,
        }
    }

    /// Set the vault-relative path of the active document
    pub fn with_active(mut self, path: impl Into<String>) -> Self {
        self.active = Some(path.into());
        self
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, VaultError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(VaultError::OutsideVault(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(path: &str, source: io::Error) -> VaultError {
    match source.kind() {
        io::ErrorKind::NotFound => VaultError::NotFound(path.to_string()),
        io::ErrorKind::AlreadyExists => VaultError::AlreadyExists(path.to_string()),
        _ => VaultError::Io {
            path: path.to_string(),
            source,
        },
    }
}

impl Vault for FsVault {
    fn read_file(&self, path: &str) -> Result<String, VaultError> {
        fs::read_to_string(self.resolve(path)?).map_err(|e| io_error(path, e))
    }

    fn create_file(&self, path: &str, contents: &str) -> Result<(), VaultError> {
        let full = self.resolve(path)?;
        debug!(path, "Creating note");

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .map_err(|e| io_error(path, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| io_error(path, e))
    }

    fn list_children(&self, folder: &str) -> Result<Vec<String>, VaultError> {
        let dir = self.resolve(folder)?;
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| io_error(folder, e))? {
            let entry = entry.map_err(|e| io_error(folder, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn is_folder(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn active_folder(&self) -> Option<String> {
        let active = self.active.as_deref()?;
        let parent = Path::new(active).parent()?;
        Some(parent.to_string_lossy().into_owned())
    }
}
