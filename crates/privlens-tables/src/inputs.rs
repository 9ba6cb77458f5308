//! Reading upstream producer outputs: permission lists and classifier results.

use crate::error::TableError;
use crate::read::{display_path, parse_json, read_text};
use privlens_kernel::{ClassifierOutput, Permission};
use std::path::Path;

/// Parse a permission list.
///
/// Accepts a JSON array of strings, or plain text with one permission per
/// line (blank lines and `#` comments skipped). Order and duplicates are kept;
/// the mapper does not care about either.
pub fn parse_permission_list(origin: &str, text: &str) -> Result<Vec<Permission>, TableError> {
    if text.trim_start().starts_with('[') {
        let ids: Vec<String> = parse_json(origin, text)?;
        return Ok(ids.into_iter().map(Permission::from).collect());
    }
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Permission::from)
        .collect())
}

pub fn read_permission_list(path: &Path) -> Result<Vec<Permission>, TableError> {
    let text = read_text(path)?;
    parse_permission_list(&display_path(path), &text)
}

pub fn read_classifier_output(path: &Path) -> Result<ClassifierOutput, TableError> {
    let text = read_text(path)?;
    parse_json(&display_path(path), &text)
}
