//! Site-Audit main entry point
//!
//! This is the command-line interface for the Site-Audit accessibility and
//! SEO auditor.

use clap::Parser;
use site_audit::audit::{AuditSession, Scope};
use site_audit::config::{load_config_with_hash, validate, Config};
use site_audit::output::{build_report, write_report};
use site_audit::url::normalize_url;
use site_audit::{AuditError, ResilientFetcher};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Site-Audit: accessibility and SEO audits for small websites
///
/// Site-Audit fetches a page (or the same-site pages it links to), checks
/// each one against a fixed set of accessibility and SEO rules, and writes
/// a combined HTML report sorted by severity.
#[derive(Parser, Debug)]
#[command(name = "site-audit")]
#[command(version)]
#[command(about = "Accessibility and SEO auditor", long_about = None)]
struct Cli {
    /// URL of the page to audit
    #[arg(value_name = "URL")]
    url: String,

    /// Audit only this page (page, 1) or every linked same-site page (site, 2)
    #[arg(short, long, value_enum, default_value_t = Scope::Page)]
    scope: Scope,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the combined report (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the audit settings without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AuditError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(output) = &cli.output {
        config.output.report_path = output.display().to_string();
    }
    validate(&config)?;

    let seed = normalize_url(&cli.url)?;

    if cli.dry_run {
        print_dry_run(&config, &seed, cli.scope);
        return Ok(());
    }

    let fetcher = ResilientFetcher::from_config(&config)?;
    let session = AuditSession::new(&fetcher, &config, seed, cli.scope);
    let session_report = session.run().await?;

    let report = build_report(&session_report)?;
    let path = write_report(&report, &config.output)?;

    if !cli.quiet {
        println!(
            "✓ Audited {} page(s), {} failed",
            report.pages.len(),
            session_report.failed_count()
        );
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_audit=info,warn"),
            1 => EnvFilter::new("site_audit=debug,info"),
            2 => EnvFilter::new("site_audit=trace,debug"),
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

fn print_dry_run(config: &Config, seed: &url::Url, scope: Scope) {
    println!("=== Site-Audit Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", seed);
    println!("  Scope: {}", scope);

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!(
        "  Backoff: {}ms initial, {}ms max",
        config.fetch.initial_backoff_ms, config.fetch.max_backoff_ms
    );
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nAudit:");
    println!(
        "  Excluded region: {}",
        config.audit.excluded_region().unwrap_or("(none)")
    );
    println!("  Max pages: {}", config.audit.max_pages);
    println!("  Slow page threshold: {}s", config.audit.slow_page_secs);
    println!("  Max URL length: {}", config.audit.max_url_length);
    println!("  Min font size: {}px", config.audit.min_font_size_px);

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);
    println!("  Keep page reports: {}", config.output.keep_page_reports);

    println!("\n✓ Configuration is valid");
}
