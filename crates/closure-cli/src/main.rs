//! Closure CLI: the `closure` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging_or_exit(&cli.log_level);

    match cli.command {
        Commands::Find {
            edges,
            subject,
            object,
            view,
            config,
            caching,
            json,
        } => commands::find::run(commands::find::Args {
            edges,
            subject,
            object,
            view,
            config,
            caching,
            json,
        }),

        Commands::Stats {
            edges,
            config,
            dump,
            json,
        } => commands::stats::run(edges, config, dump, json),

        Commands::Check {
            edges,
            config,
            json,
        } => commands::check::run(edges, config, json),
    }
}
