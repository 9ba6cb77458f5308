//! Shared file reading: byte validation and format dispatch.

use crate::error::TableError;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Toml,
    Json,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(TableError::UnsupportedFormat {
                path: display_path(path),
            }),
        }
    }
}

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// Resolve `raw` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>, TableError> {
    fs::read(path).map_err(|source| TableError::ReadFile {
        path: display_path(path),
        source,
    })
}

/// Read a UTF-8 text file, rejecting NUL bytes and invalid UTF-8.
pub fn read_text(path: &Path) -> Result<String, TableError> {
    let bytes = read_bytes(path)?;
    validate_text_bytes(&display_path(path), bytes)
}

pub(crate) fn validate_text_bytes(origin: &str, bytes: Vec<u8>) -> Result<String, TableError> {
    if bytes.contains(&0) {
        return Err(TableError::Corrupt(format!("{origin}: contains NUL byte(s)")));
    }
    String::from_utf8(bytes).map_err(|_| {
        TableError::Corrupt(format!("{origin}: contains non-UTF-8 byte sequence(s)"))
    })
}

pub(crate) fn parse_json<T: DeserializeOwned>(origin: &str, text: &str) -> Result<T, TableError> {
    serde_json::from_str(text).map_err(|source| TableError::ParseJson {
        path: origin.to_string(),
        source,
    })
}

pub(crate) fn parse_toml<T: DeserializeOwned>(origin: &str, text: &str) -> Result<T, TableError> {
    toml::from_str(text).map_err(|source| TableError::ParseToml {
        path: origin.to_string(),
        source,
    })
}

/// Parse `text` as TOML or JSON depending on `format`.
pub(crate) fn parse_document<T: DeserializeOwned>(
    origin: &str,
    format: TableFormat,
    text: &str,
) -> Result<T, TableError> {
    match format {
        TableFormat::Toml => parse_toml(origin, text),
        TableFormat::Json => parse_json(origin, text),
    }
}
