//! Run configuration.
//!
//! An optional TOML file names the table sources and review defaults.
//! Relative table paths resolve against the config file's directory. Command
//! line flags override anything set here.
//!
//! ```toml
//! schema = 1
//!
//! [tables]
//! permissionLabels = ["tables/permission_labels.toml"]
//! labelTemplates = "tables/label_templates.toml"
//!
//! [review]
//! evidenceCap = 2
//! failureSentinel = "predict_fail"
//! ```

use crate::error::TableError;
use crate::read::{display_path, parse_toml, read_text, resolve_path};
use privlens_kernel::{DEFAULT_EVIDENCE_CAP, DEFAULT_FAILURE_SENTINEL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA: u32 = 1;
pub const DEFAULT_CONFIG_PATH: &str = ".privlens/config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TablesConfig {
    #[serde(default)]
    pub permission_labels: Vec<String>,
    #[serde(default)]
    pub label_templates: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewConfig {
    #[serde(default)]
    pub evidence_cap: Option<usize>,
    #[serde(default)]
    pub failure_sentinel: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunConfig {
    pub schema: u32,
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schema: CONFIG_SCHEMA,
            tables: TablesConfig::default(),
            review: ReviewConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    pub fn parse(origin: &str, text: &str, base_dir: &Path) -> Result<Self, TableError> {
        let mut config: RunConfig = parse_toml(origin, text)?;
        if config.schema != CONFIG_SCHEMA {
            return Err(TableError::Contract {
                path: origin.to_string(),
                message: format!(
                    "config schema must be {CONFIG_SCHEMA}, got {}",
                    config.schema
                ),
            });
        }
        if config
            .review
            .failure_sentinel
            .as_deref()
            .is_some_and(|sentinel| sentinel.trim().is_empty())
        {
            return Err(TableError::Contract {
                path: origin.to_string(),
                message: "review.failureSentinel must not be blank".to_string(),
            });
        }
        config.base_dir = base_dir.to_path_buf();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let text = read_text(path)?;
        let base_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let config = Self::parse(&display_path(path), &text, base_dir)?;
        tracing::info!(config = %path.display(), "loaded run config");
        Ok(config)
    }

    /// Load `explicit` if given, else the default path if it exists, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, TableError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load(default_path);
        }
        Ok(Self::default())
    }

    pub fn permission_table_paths(&self) -> Vec<PathBuf> {
        self.tables
            .permission_labels
            .iter()
            .map(|raw| resolve_path(&self.base_dir, raw))
            .collect()
    }

    pub fn template_table_path(&self) -> Option<PathBuf> {
        self.tables
            .label_templates
            .as_deref()
            .map(|raw| resolve_path(&self.base_dir, raw))
    }

    pub fn evidence_cap(&self) -> usize {
        self.review.evidence_cap.unwrap_or(DEFAULT_EVIDENCE_CAP)
    }

    pub fn failure_sentinel(&self) -> &str {
        self.review
            .failure_sentinel
            .as_deref()
            .unwrap_or(DEFAULT_FAILURE_SENTINEL)
    }
}
