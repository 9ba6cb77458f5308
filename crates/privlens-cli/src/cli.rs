use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "privlens",
    about = "privlens: reconcile privacy-policy labels against the permissions an app requests",
    version
)]
pub struct Cli {
    /// Log filter (e.g. `debug`, `privlens_tables=info`); defaults to RUST_LOG, then warn
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile declared policy labels against permission-implied labels
    Reconcile {
        /// Permission list (JSON array, or one permission per line)
        #[arg(long)]
        permissions: String,

        /// Classifier result document (predLabels, predPolarity, probsMulti, failed)
        #[arg(long, conflicts_with = "declared")]
        classifier: Option<String>,

        /// Declared labels given directly instead of a classifier document
        #[arg(long, value_name = "LABEL", num_args = 1..)]
        declared: Vec<String>,

        /// Permission→label table source (repeatable; merged by label union)
        #[arg(long)]
        mapping: Vec<String>,

        /// Label→sentence template table
        #[arg(long)]
        templates: Option<String>,

        /// Run config (default: .privlens/config.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Maximum evidence permissions per review record
        #[arg(long)]
        evidence_cap: Option<usize>,

        /// Store review records write-once at this path
        #[arg(long)]
        store: Option<String>,

        /// Exit 1 when any permission-implied label is missing from the policy
        #[arg(long)]
        fail_on_missing: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map a permission list to the labels it implies
    Map {
        /// Permission list (JSON array, or one permission per line)
        #[arg(long)]
        permissions: String,

        /// Permission→label table source (repeatable; merged by label union)
        #[arg(long)]
        mapping: Vec<String>,

        /// Run config (default: .privlens/config.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Audit the loaded tables for template gaps
    TablesCheck {
        /// Permission→label table source (repeatable; merged by label union)
        #[arg(long)]
        mapping: Vec<String>,

        /// Label→sentence template table
        #[arg(long)]
        templates: Option<String>,

        /// Run config (default: .privlens/config.toml when present)
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
