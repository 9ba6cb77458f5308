//! privlens CLI: the `privlens` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Reconcile {
            permissions,
            classifier,
            declared,
            mapping,
            templates,
            config,
            evidence_cap,
            store,
            fail_on_missing,
            json,
        } => commands::reconcile::run(commands::reconcile::Args {
            permissions,
            classifier,
            declared,
            mapping,
            templates,
            config,
            evidence_cap,
            store,
            fail_on_missing,
            json,
        }),

        Commands::Map {
            permissions,
            mapping,
            config,
            json,
        } => commands::map::run(permissions, mapping, config, json),

        Commands::TablesCheck {
            mapping,
            templates,
            config,
            json,
        } => commands::tables_check::run(mapping, templates, config, json),
    }
}
