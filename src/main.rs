//! Decree-Scout main entry point
//!
//! This is the command-line interface for the Decree-Scout bulletin checker.

use clap::Parser;
use decree_scout::case_id::CaseId;
use decree_scout::config::{load_config_with_hash, Config};
use decree_scout::fetcher::{DocumentCatalog, DocumentFetcher};
use decree_scout::output::{render_error, render_summary, render_verdict, ConsoleNotifier};
use decree_scout::processor::DecreeProcessor;
use decree_scout::subscription::{MemoryStore, SubscriptionChecker, SubscriptionStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// Chat identifier used for subscriptions created from the command line
const CONSOLE_CHAT_ID: i64 = 0;

/// Decree-Scout: citizenship decree bulletin checker
///
/// Looks up case numbers such as 123/RD/2023 in the yearly decree bulletin
/// and reports whether each case is absent, listed, or listed as resolved.
#[derive(Parser, Debug)]
#[command(name = "decree-scout")]
#[command(version = "1.0.0")]
#[command(about = "Checks citizenship case numbers against the decree bulletins", long_about = None)]
struct Cli {
    /// Case numbers to check, formatted NUMBER/RD/YEAR
    #[arg(value_name = "CASE_ID", required_unless_present = "dry_run")]
    case_ids: Vec<String>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be checked without downloading anything
    #[arg(long, conflicts_with = "watch")]
    dry_run: bool,

    /// Keep re-checking the cases until all are resolved or Ctrl-C is pressed
    #[arg(long)]
    watch: bool,

    /// Seconds between checks in watch mode
    #[arg(long, value_name = "SECS", default_value_t = 3600)]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        return handle_dry_run(&config, &cli.case_ids);
    }

    let processor = Arc::new(DecreeProcessor::from_config(&config)?);

    if cli.watch {
        handle_watch(processor, &cli.case_ids, Duration::from_secs(cli.interval.max(1))).await
    } else {
        handle_check(processor, &cli.case_ids).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("decree_scout=info,warn"),
            1 => EnvFilter::new("decree_scout=debug,info"),
            2 => EnvFilter::new("decree_scout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be checked
fn handle_dry_run(config: &Config, case_ids: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Decree-Scout Dry Run ===\n");

    let catalog = DocumentCatalog::from_config(&config.source)?;

    println!("Source:");
    println!("  Base URL: {}", catalog.base_url());
    println!("  User agent: {}", config.source.user_agent);
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.source.request_timeout_secs, config.source.connect_timeout_secs
    );
    if config.source.accept_invalid_certs {
        println!("  WARNING: TLS certificate verification is disabled");
    }

    println!("\nBulletins ({}):", config.source.documents.len());
    for year in catalog.years() {
        if let Some(url) = catalog.resolve(year) {
            println!("  - {}: {}", year, url);
        }
    }

    println!("\nCache: {}h time-to-live", config.cache.ttl_hours);
    println!(
        "Retry: {} attempts, {}ms backoff base",
        config.retry.max_attempts, config.retry.backoff_base_ms
    );
    println!(
        "Scanner: {} workers, {} pages per batch",
        config.scanner.max_workers, config.scanner.batch_size
    );

    if !case_ids.is_empty() {
        println!("\nCase numbers ({}):", case_ids.len());
        for raw in case_ids {
            match CaseId::parse(raw) {
                Ok(case_id) if catalog.supports(case_id.year()) => {
                    println!("  - {} (bulletin {})", case_id, case_id.year())
                }
                Ok(case_id) => println!("  - {} (no bulletin for {})", case_id, case_id.year()),
                Err(e) => println!("  - {} (invalid: {})", raw, e),
            }
        }
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Checks every case id once, concurrently, and prints a report for each
async fn handle_check(
    processor: Arc<DecreeProcessor<DocumentFetcher>>,
    case_ids: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tasks = JoinSet::new();
    for (index, raw) in case_ids.iter().enumerate() {
        let processor = Arc::clone(&processor);
        let raw = raw.clone();
        tasks.spawn(async move {
            let result = processor.handle(&raw).await;
            (index, raw, result)
        });
    }

    let mut results = Vec::with_capacity(case_ids.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(index, _, _)| *index);

    let mut failures = 0;
    for (_, raw, result) in &results {
        match result {
            Ok(verdict) => println!("{}\n", render_verdict(raw, verdict)),
            Err(e) => {
                failures += 1;
                tracing::debug!("Lookup of {} failed: {:?}", raw, e);
                println!("{}\n", render_error(raw, e));
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} checks failed", failures, results.len()).into());
    }

    Ok(())
}

/// Handles the --watch mode: re-checks the cases until all are resolved
async fn handle_watch(
    processor: Arc<DecreeProcessor<DocumentFetcher>>,
    case_ids: &[String],
    interval: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    for raw in case_ids {
        match CaseId::parse(raw) {
            Ok(case_id) => {
                if let Err(e) = store.create(CONSOLE_CHAT_ID, &case_id).await {
                    tracing::warn!("Skipping {}: {}", raw, e);
                }
            }
            Err(e) => println!("Invalid format for '{}': {}", raw, e),
        }
    }

    if store.is_empty() {
        return Err("no valid case numbers to watch".into());
    }

    let checker = SubscriptionChecker::new(
        Arc::clone(&processor),
        store.clone(),
        Arc::new(ConsoleNotifier),
    );

    tracing::info!(
        "Watching {} cases, checking every {}s",
        store.len(),
        interval.as_secs()
    );

    loop {
        let summary = checker.check_all().await?;
        if summary.checked > 0 {
            println!("{}", render_summary(&summary));
        }

        if store.is_empty() {
            tracing::info!("All watched cases are resolved");
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let removed = processor.cleanup();
        if removed > 0 {
            tracing::debug!("Dropped {} expired bulletins from the cache", removed);
        }
    }

    processor.cleanup();
    Ok(())
}
