//! privlens-tables: everything that touches the filesystem.
//!
//! Loads the permission→label table and the label→sentence templates from
//! TOML or JSON (bundled defaults when none are given), reads the run config
//! and the upstream producer outputs, and stores review records write-once.
//! All semantics live in `privlens-kernel`; this crate only validates and
//! hands over immutable values.

pub mod bundle;
pub mod config;
pub mod error;
pub mod inputs;
pub mod permission_table;
pub mod read;
pub mod review_store;
pub mod template_table;

pub use bundle::{
    LoadedTables, TABLE_AUDIT_KIND, TableAudit, audit_tables, load_permission_table, load_tables,
};
pub use config::{CONFIG_SCHEMA, DEFAULT_CONFIG_PATH, RunConfig};
pub use error::TableError;
pub use inputs::{parse_permission_list, read_classifier_output, read_permission_list};
pub use permission_table::{
    BUILTIN_PERMISSION_TABLE_ORIGIN, LoadedPermissionTable, PERMISSION_TABLE_KIND, TABLE_SCHEMA,
    builtin_permission_table, load_permission_sources, parse_permission_table,
};
pub use read::{TableFormat, display_path};
pub use review_store::{StoreOutcome, load_review_records, store_review_records_once};
pub use template_table::{
    BUILTIN_TEMPLATE_TABLE_ORIGIN, LoadedTemplateTable, TEMPLATE_TABLE_KIND,
    builtin_template_table, load_template_table, parse_template_table,
};
