//! Persistence
//!
//! File helpers shared by the JSON document stores. Writes go to a sibling
//! temporary file first and are renamed into place.

use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Storage read/write failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem error.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Document could not be encoded or decoded as JSON.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Document could not be decoded as YAML.
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Read a whole text document, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] for any failure other than a missing file.
pub fn read_text(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Replace a text document, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the directory, temporary file or rename fails.
pub fn write_text(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let staging = staging_path(path);

    fs::write(&staging, contents)?;
    fs::rename(&staging, path)?;

    Ok(())
}

/// Read and decode a JSON document, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns a [`PersistenceError`] if the file cannot be read or decoded.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    read_text(path)?
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(PersistenceError::from)
}

/// Encode and write a JSON document.
///
/// # Errors
///
/// Returns a [`PersistenceError`] if encoding or writing fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let text = serde_json::to_string_pretty(value)?;

    write_text(path, &text)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");

    path.with_file_name(name)
}
