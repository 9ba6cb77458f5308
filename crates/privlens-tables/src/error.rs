//! Errors from table, config and input loading.

use privlens_kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported table format for {path}: expected .toml or .json")]
    UnsupportedFormat { path: String },

    #[error("corrupted input: {0}")]
    Corrupt(String),

    #[error("{path}: {message}")]
    Contract { path: String, message: String },

    #[error("{path}: {source}")]
    Table {
        path: String,
        #[source]
        source: KernelError,
    },

    #[error("review store is locked by another writer: {lock_path}")]
    LockBusy { lock_path: String },

    #[error("no permission table sources given")]
    NoPermissionSources,
}
