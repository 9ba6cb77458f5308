//! Permission → label table loading.
//!
//! A table document is TOML or JSON:
//!
//! ```toml
//! schema = 1
//! tableKind = "privlens.permission_labels.v1"
//!
//! [permissions]
//! "android.permission.CAMERA" = ["CAMERA"]
//! ```
//!
//! Several sources may be loaded together; rows for the same permission merge
//! by label union.

use crate::error::TableError;
use crate::read::{TableFormat, display_path, parse_document, read_text};
use privlens_kernel::{Label, Permission, PermissionLabelIndex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const TABLE_SCHEMA: u32 = 1;
pub const PERMISSION_TABLE_KIND: &str = "privlens.permission_labels.v1";
pub const BUILTIN_PERMISSION_TABLE_ORIGIN: &str = "builtin:permission_labels.toml";

const BUILTIN_PERMISSION_TABLE: &str = include_str!("../tables/permission_labels.toml");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PermissionTableDocument {
    schema: u32,
    table_kind: String,
    #[serde(default)]
    permissions: BTreeMap<String, Vec<String>>,
}

/// The merged index plus the origins it was built from, in load order.
#[derive(Debug, Clone)]
pub struct LoadedPermissionTable {
    pub index: PermissionLabelIndex,
    pub sources: Vec<String>,
}

type Rows = Vec<(Permission, Vec<Label>)>;

fn parse_rows(origin: &str, format: TableFormat, text: &str) -> Result<Rows, TableError> {
    let document: PermissionTableDocument = parse_document(origin, format, text)?;
    if document.schema != TABLE_SCHEMA {
        return Err(TableError::Contract {
            path: origin.to_string(),
            message: format!(
                "permission table schema must be {TABLE_SCHEMA}, got {}",
                document.schema
            ),
        });
    }
    if document.table_kind != PERMISSION_TABLE_KIND {
        return Err(TableError::Contract {
            path: origin.to_string(),
            message: format!(
                "permission table kind mismatch: expected {PERMISSION_TABLE_KIND:?}, got {:?}",
                document.table_kind
            ),
        });
    }
    let rows: Rows = document
        .permissions
        .into_iter()
        .map(|(permission, labels)| {
            (
                Permission::from(permission),
                labels.into_iter().map(Label::from).collect(),
            )
        })
        .collect();
    if !rows.is_empty() {
        // Validate each source on its own so errors name the offending file.
        PermissionLabelIndex::from_entries(rows.iter().cloned()).map_err(|source| {
            TableError::Table {
                path: origin.to_string(),
                source,
            }
        })?;
    }
    Ok(rows)
}

/// Parse one table document held in memory.
pub fn parse_permission_table(
    origin: &str,
    format: TableFormat,
    text: &str,
) -> Result<LoadedPermissionTable, TableError> {
    let rows = parse_rows(origin, format, text)?;
    let index = PermissionLabelIndex::from_entries(rows).map_err(|source| TableError::Table {
        path: origin.to_string(),
        source,
    })?;
    Ok(LoadedPermissionTable {
        index,
        sources: vec![origin.to_string()],
    })
}

/// Load and merge permission tables from files.
///
/// Fails when `paths` is empty or when every source is empty: a run with no
/// mapping at all must not quietly report every permission as unknown.
pub fn load_permission_sources<P: AsRef<Path>>(
    paths: &[P],
) -> Result<LoadedPermissionTable, TableError> {
    if paths.is_empty() {
        return Err(TableError::NoPermissionSources);
    }
    let mut rows: Rows = Vec::new();
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let origin = display_path(path);
        let format = TableFormat::from_path(path)?;
        let text = read_text(path)?;
        let source_rows = parse_rows(&origin, format, &text)?;
        if source_rows.is_empty() {
            tracing::warn!(source = %origin, "permission table source has no entries");
        }
        tracing::info!(source = %origin, entries = source_rows.len(), "loaded permission table");
        rows.extend(source_rows);
        sources.push(origin);
    }
    let index = PermissionLabelIndex::from_entries(rows).map_err(|source| TableError::Table {
        path: sources.join(", "),
        source,
    })?;
    Ok(LoadedPermissionTable { index, sources })
}

/// The table bundled with this crate.
pub fn builtin_permission_table() -> Result<LoadedPermissionTable, TableError> {
    parse_permission_table(
        BUILTIN_PERMISSION_TABLE_ORIGIN,
        TableFormat::Toml,
        BUILTIN_PERMISSION_TABLE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str, ext: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "privlens-perm-{prefix}-{}-{unique}.{ext}",
            std::process::id()
        ))
    }

    #[test]
    fn builtin_table_parses_and_maps_core_permissions() {
        let loaded = builtin_permission_table().expect("builtin table should load");
        let labels = loaded
            .index
            .labels_for("android.permission.ACCESS_FINE_LOCATION")
            .expect("fine location should be mapped");
        assert!(labels.contains("LOC"));
        assert_eq!(loaded.sources, vec![BUILTIN_PERMISSION_TABLE_ORIGIN.to_string()]);
    }

    #[test]
    fn json_and_toml_sources_merge_by_label_union() {
        let toml_path = temp_path("merge", "toml");
        let json_path = temp_path("merge", "json");
        fs::write(
            &toml_path,
            "schema = 1\ntableKind = \"privlens.permission_labels.v1\"\n\n[permissions]\n\"android.permission.READ_SMS\" = [\"SMS\"]\n",
        )
        .expect("toml fixture should write");
        fs::write(
            &json_path,
            r#"{"schema":1,"tableKind":"privlens.permission_labels.v1","permissions":{"android.permission.READ_SMS":["MESSAGES"],"android.permission.CAMERA":["CAMERA"]}}"#,
        )
        .expect("json fixture should write");

        let loaded = load_permission_sources(&[&toml_path, &json_path])
            .expect("sources should merge");
        let labels: Vec<&str> = loaded
            .index
            .labels_for("android.permission.READ_SMS")
            .expect("READ_SMS should be mapped")
            .iter()
            .map(Label::as_str)
            .collect();
        assert_eq!(labels, vec!["MESSAGES", "SMS"]);
        assert_eq!(loaded.index.len(), 2);
        assert_eq!(loaded.sources.len(), 2);

        let _ = fs::remove_file(toml_path);
        let _ = fs::remove_file(json_path);
    }

    #[test]
    fn no_sources_fails_loudly() {
        let paths: [&Path; 0] = [];
        assert!(matches!(
            load_permission_sources(&paths),
            Err(TableError::NoPermissionSources)
        ));
    }

    #[test]
    fn missing_file_fails_loudly() {
        let path = temp_path("absent", "toml");
        assert!(matches!(
            load_permission_sources(&[&path]),
            Err(TableError::ReadFile { .. })
        ));
    }

    #[test]
    fn all_empty_sources_fail_loudly() {
        let path = temp_path("empty", "toml");
        fs::write(
            &path,
            "schema = 1\ntableKind = \"privlens.permission_labels.v1\"\n[permissions]\n",
        )
        .expect("fixture should write");
        let err = load_permission_sources(&[&path]).expect_err("empty table must fail");
        assert!(matches!(
            err,
            TableError::Table {
                source: privlens_kernel::KernelError::EmptyPermissionTable,
                ..
            }
        ));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn wrong_table_kind_is_rejected() {
        let err = parse_permission_table(
            "inline",
            TableFormat::Toml,
            "schema = 1\ntableKind = \"privlens.label_templates.v1\"\n",
        )
        .expect_err("kind mismatch must fail");
        match err {
            TableError::Contract { message, .. } => assert!(message.contains("kind mismatch")),
            other => panic!("expected contract error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_schema_is_rejected() {
        let err = parse_permission_table(
            "inline",
            TableFormat::Json,
            r#"{"schema":2,"tableKind":"privlens.permission_labels.v1"}"#,
        )
        .expect_err("schema mismatch must fail");
        assert!(matches!(err, TableError::Contract { .. }));
    }
}
