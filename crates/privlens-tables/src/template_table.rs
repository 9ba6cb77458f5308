//! Label → review sentence template loading.

use crate::error::TableError;
use crate::permission_table::TABLE_SCHEMA;
use crate::read::{TableFormat, display_path, parse_document, read_text};
use privlens_kernel::{Label, TemplateTable};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const TEMPLATE_TABLE_KIND: &str = "privlens.label_templates.v1";
pub const BUILTIN_TEMPLATE_TABLE_ORIGIN: &str = "builtin:label_templates.toml";

const BUILTIN_TEMPLATE_TABLE: &str = include_str!("../tables/label_templates.toml");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateTableDocument {
    schema: u32,
    table_kind: String,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct LoadedTemplateTable {
    pub table: TemplateTable,
    pub source: String,
}

pub fn parse_template_table(
    origin: &str,
    format: TableFormat,
    text: &str,
) -> Result<LoadedTemplateTable, TableError> {
    let document: TemplateTableDocument = parse_document(origin, format, text)?;
    if document.schema != TABLE_SCHEMA {
        return Err(TableError::Contract {
            path: origin.to_string(),
            message: format!(
                "template table schema must be {TABLE_SCHEMA}, got {}",
                document.schema
            ),
        });
    }
    if document.table_kind != TEMPLATE_TABLE_KIND {
        return Err(TableError::Contract {
            path: origin.to_string(),
            message: format!(
                "template table kind mismatch: expected {TEMPLATE_TABLE_KIND:?}, got {:?}",
                document.table_kind
            ),
        });
    }
    let table = TemplateTable::from_entries(
        document
            .labels
            .into_iter()
            .map(|(label, sentence)| (Label::from(label), sentence)),
    )
    .map_err(|source| TableError::Table {
        path: origin.to_string(),
        source,
    })?;
    Ok(LoadedTemplateTable {
        table,
        source: origin.to_string(),
    })
}

pub fn load_template_table(path: &Path) -> Result<LoadedTemplateTable, TableError> {
    let origin = display_path(path);
    let format = TableFormat::from_path(path)?;
    let text = read_text(path)?;
    let loaded = parse_template_table(&origin, format, &text)?;
    tracing::info!(source = %origin, entries = loaded.table.len(), "loaded label templates");
    Ok(loaded)
}

pub fn builtin_template_table() -> Result<LoadedTemplateTable, TableError> {
    parse_template_table(
        BUILTIN_TEMPLATE_TABLE_ORIGIN,
        TableFormat::Toml,
        BUILTIN_TEMPLATE_TABLE,
    )
}
