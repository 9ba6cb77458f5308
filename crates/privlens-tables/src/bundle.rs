//! The pair of tables a run needs, plus an audit of how they line up.

use crate::error::TableError;
use crate::permission_table::{
    LoadedPermissionTable, builtin_permission_table, load_permission_sources,
};
use crate::template_table::{LoadedTemplateTable, builtin_template_table, load_template_table};
use privlens_kernel::{Label, PermissionLabelIndex, TemplateTable};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const TABLE_AUDIT_KIND: &str = "privlens.table_audit.v1";

/// Immutable tables shared by every reconciliation in the process.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub permissions: LoadedPermissionTable,
    pub templates: LoadedTemplateTable,
}

impl LoadedTables {
    pub fn index(&self) -> &PermissionLabelIndex {
        &self.permissions.index
    }

    pub fn template_table(&self) -> &TemplateTable {
        &self.templates.table
    }
}

/// Load the permission side alone: the given sources, or the bundled table
/// when none are configured.
pub fn load_permission_table(
    permission_paths: &[PathBuf],
) -> Result<LoadedPermissionTable, TableError> {
    if permission_paths.is_empty() {
        builtin_permission_table()
    } else {
        load_permission_sources(permission_paths)
    }
}

/// Load the given sources, falling back to the bundled tables for whichever
/// side has no source configured.
pub fn load_tables(
    permission_paths: &[PathBuf],
    template_path: Option<&Path>,
) -> Result<LoadedTables, TableError> {
    let permissions = load_permission_table(permission_paths)?;
    let templates = match template_path {
        Some(path) => load_template_table(path)?,
        None => builtin_template_table()?,
    };
    Ok(LoadedTables {
        permissions,
        templates,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAudit {
    pub audit_kind: String,
    pub permission_sources: Vec<String>,
    pub template_source: String,
    pub mapping_digest: String,
    pub template_digest: String,
    pub permission_count: usize,
    pub label_universe: Vec<Label>,
    /// Labels a permission can imply that will render with the fallback sentence.
    pub labels_without_template: Vec<Label>,
    /// Templates no permission maps to; only reachable through declared labels.
    pub templates_without_permission: Vec<Label>,
}

pub fn audit_tables(tables: &LoadedTables) -> TableAudit {
    let universe = tables.index().label_universe();
    let templated: BTreeSet<Label> = tables.template_table().labels().cloned().collect();
    TableAudit {
        audit_kind: TABLE_AUDIT_KIND.to_string(),
        permission_sources: tables.permissions.sources.clone(),
        template_source: tables.templates.source.clone(),
        mapping_digest: tables.index().digest(),
        template_digest: tables.template_table().digest(),
        permission_count: tables.index().len(),
        labels_without_template: universe.difference(&templated).cloned().collect(),
        templates_without_permission: templated.difference(&universe).cloned().collect(),
        label_universe: universe.into_iter().collect(),
    }
}
