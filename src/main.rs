//! unitag - read and write audio tags through one set of keys.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use unitag::cli;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("unitag=info".parse()?))
        .init();

    cli::run_command(&args)
}
