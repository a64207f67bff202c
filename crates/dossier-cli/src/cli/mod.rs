//! CLI argument parsing and command execution.

pub mod args;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use colored::Colorize;
use dossier_lookup::InfoGatherer;
use tracing_subscriber::FmtSubscriber;

use crate::render;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut builder = InfoGatherer::builder(&cli.url);
    if let Some(output_dir) = &cli.output_dir {
        builder = builder.output_root(output_dir);
    }
    let mut gatherer = builder
        .build()
        .with_context(|| format!("cannot prepare the report store for {}", cli.url))?;

    if gatherer.cached() {
        println!(
            "{} using cached report in {}",
            "cache hit:".green().bold(),
            gatherer.directory().display()
        );
    }

    let document = gatherer
        .run()
        .await
        .with_context(|| format!("gathering failed for {}", cli.url))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    let report_path = render::write_report(&document, gatherer.directory())
        .context("writing the HTML report failed")?;
    println!(
        "{} {}",
        "report written:".green().bold(),
        report_path.display()
    );

    if !cli.no_open {
        open::that(&report_path)
            .with_context(|| format!("cannot open {}", report_path.display()))?;
    }

    Ok(())
}
