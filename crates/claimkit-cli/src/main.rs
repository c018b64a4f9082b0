//! claimkit CLI - transform records into documents of claims.

use anyhow::Context;
use clap::Parser;
use claimkit_cli::commands;
use claimkit_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing (log to stderr, stdout carries the documents)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let formatter = Formatter::new(!cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        eprintln!("{}", formatter.error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

fn run(cli: Cli, formatter: &Formatter) -> anyhow::Result<()> {
    match cli.command {
        Command::Catalog(args) => {
            let path = args.path.display().to_string();
            commands::execute_catalog(args, formatter).with_context(|| format!("catalog {}", path))?
        }
        Command::Transform(args) => {
            let records = args.records.display().to_string();
            commands::execute_transform(args, formatter).with_context(|| format!("transforming {}", records))?
        }
    }
    Ok(())
}
