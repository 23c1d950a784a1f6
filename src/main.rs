//! Sitescope main entry point
//!
//! This is the command-line interface for the Sitescope link scraper.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use sitescope::config::{load_config_with_hash, Config};
use sitescope::output::write_tree;
use sitescope::Scraper;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sitescope: a polite single-page link scraper
///
/// Sitescope fetches one page and lists the links on it that stay on the
/// same site and that the site's robots.txt allows, together with the pages
/// the site declares in its sitemaps.
#[derive(Parser, Debug)]
#[command(name = "sitescope")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-page link scraper", long_about = None)]
struct Cli {
    /// URL of the page to scrape
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let Some(url) = cli.url.as_deref() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_configuration(cli.config.as_ref())?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let scraper = Scraper::from_config(&config.scraper, cancel.clone())
        .context("Failed to build HTTP client")?;

    // The scrape is polled first so an interrupted crawl delay still prints
    // the root page. Any other in-flight request is abandoned.
    let result = tokio::select! {
        biased;
        result = scraper.scrape(url) => result,
        _ = cancel.cancelled() => {
            tracing::warn!("Interrupted, exiting");
            return Ok(());
        }
    };

    match result {
        Ok(report) => {
            if report.cancelled {
                tracing::info!("Scrape interrupted");
            }
            let mut stdout = std::io::stdout().lock();
            write_tree(&report.page, &mut stdout)?;
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitescope=info,warn"),
            1 => EnvFilter::new("sitescope=debug,info"),
            2 => EnvFilter::new("sitescope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Cancels the scrape on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            cancel.cancel();
        }
    });
}
