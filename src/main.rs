#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! pylacus: query a Lacus web-capture instance from the CLI.

mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, OutputCtx, write_error};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let default_filter = if cli.debug {
        "lacus_client=debug,pylacus=debug"
    } else {
        "lacus_client=warn,pylacus=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = OutputCtx::new(cli.output, cli.json, cli.no_header);

    if let Err(err) = commands::run(&cli, &ctx) {
        write_error(&ErrorOutput::from_lacus_error(&err), ctx.format);
        std::process::exit(err.exit_code());
    }
}
