//! Sitemap-SEO main entry point
//!
//! This is the command-line interface for the Sitemap-SEO auditor.

use clap::Parser;
use sitemap_seo::config::{load_config, require_root_url, validate, Config};
use sitemap_seo::crawler::run_crawl;
use sitemap_seo::output::{print_statistics, write_csv, CrawlStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitemap-SEO: a bounded-concurrency sitemap auditor
///
/// Sitemap-SEO expands a sitemap tree into its page URLs, visits every page
/// with a fixed number of requests in flight, and writes the title, first
/// heading, meta description and status code of each page to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "sitemap-seo")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-concurrency sitemap SEO auditor", long_about = None)]
struct Cli {
    /// Root sitemap URL (overrides `root-url` in the config file)
    #[arg(value_name = "ROOT_URL")]
    root_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of page requests in flight
    #[arg(short = 'n', long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Path of the CSV file to write
    #[arg(short, long, value_name = "CSV")]
    output: Option<PathBuf>,

    /// Apply the concurrency limit to sitemap expansion too
    #[arg(long)]
    gate_expansion: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_seo=info,warn"),
            1 => EnvFilter::new("sitemap_seo=debug,info"),
            2 => EnvFilter::new("sitemap_seo=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(root_url) = &cli.root_url {
        config.crawler.root_url = Some(root_url.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if cli.gate_expansion {
        config.crawler.gate_expansion = true;
    }

    validate(&config)?;
    require_root_url(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-SEO Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Root sitemap: {}",
        config.crawler.root_url.as_deref().unwrap_or("-")
    );
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Gate expansion: {}",
        if config.crawler.gate_expansion { "yes" } else { "no" }
    );
    println!("  Sitemap marker: {}", config.crawler.sitemap_marker);

    println!("\nUser Agents ({}):", config.user_agent.agents.len());
    for agent in &config.user_agent.agents {
        println!("  - {}", agent);
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let root_url = require_root_url(config)?;

    let report = match run_crawl(config, root_url.as_str()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    write_csv(&report.records, Path::new(&config.output.csv_path))?;

    if report.failures() > 0 {
        tracing::warn!(
            "{} sitemaps and {} pages failed",
            report.sitemap_failures,
            report.page_failures
        );
    }

    if !quiet {
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    Ok(())
}
