use privlens_kernel::{ClassifierOutput, Permission, ReviewRecord};
use privlens_tables::{
    LoadedPermissionTable, LoadedTables, RunConfig, StoreOutcome, load_permission_table,
    load_tables, read_classifier_output, read_permission_list, store_review_records_once,
};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr subscriber. `--log-level` wins over `RUST_LOG`.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Print `error: {context}: {err}` and exit with the input-failure status.
pub fn exit_input_error(context: &str, err: impl Display) -> ! {
    eprintln!("error: {context}: {err}");
    std::process::exit(2);
}

pub fn load_config_or_exit(config: Option<&str>) -> RunConfig {
    RunConfig::discover(config.map(Path::new))
        .unwrap_or_else(|err| exit_input_error("failed to load config", err))
}

/// Flag sources override config sources; with neither, the bundled table is used.
fn permission_table_paths(config: &RunConfig, mapping: &[String]) -> Vec<PathBuf> {
    if mapping.is_empty() {
        config.permission_table_paths()
    } else {
        mapping.iter().map(PathBuf::from).collect()
    }
}

pub fn load_permission_table_or_exit(
    config: &RunConfig,
    mapping: &[String],
) -> LoadedPermissionTable {
    load_permission_table(&permission_table_paths(config, mapping))
        .unwrap_or_else(|err| exit_input_error("failed to load permission table", err))
}

pub fn load_tables_or_exit(
    config: &RunConfig,
    mapping: &[String],
    templates: Option<&str>,
) -> LoadedTables {
    let paths = permission_table_paths(config, mapping);
    let template_path = templates
        .map(PathBuf::from)
        .or_else(|| config.template_table_path());
    let tables = load_tables(&paths, template_path.as_deref())
        .unwrap_or_else(|err| exit_input_error("failed to load tables", err));
    tracing::debug!(
        permission_sources = ?tables.permissions.sources,
        template_source = %tables.templates.source,
        "tables ready"
    );
    tables
}

pub fn read_permissions_or_exit(path: &str) -> Vec<Permission> {
    read_permission_list(Path::new(path))
        .unwrap_or_else(|err| exit_input_error("failed to read permission list", err))
}

pub fn read_classifier_or_exit(path: &str) -> ClassifierOutput {
    read_classifier_output(Path::new(path))
        .unwrap_or_else(|err| exit_input_error("failed to read classifier output", err))
}

pub fn store_records_or_exit(path: &str, records: &[ReviewRecord]) -> StoreOutcome {
    store_review_records_once(Path::new(path), records)
        .unwrap_or_else(|err| exit_input_error("failed to store review records", err))
}

pub fn render_json_or_exit<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|err| exit_input_error("failed to render JSON", err))
}

pub fn join_or_none<T: Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
