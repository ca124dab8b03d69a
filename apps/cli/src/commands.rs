//! CLI definition, tracing setup, and the run entry point.

use std::path::PathBuf;
use std::time::Duration;

use cardledger_catalog::CatalogClient;
use cardledger_core::pipeline::{self, ProgressReporter, RunOptions, RunReport};
use cardledger_pricing::PricingClient;
use cardledger_shared::{Partition, load_config, load_config_from, resolve_credential};
use cardledger_store::SheetsStore;
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CardLedger — keep card market prices fresh in the inventory spreadsheet.
///
/// There are no subcommands: a run's behavior is governed entirely by the
/// config file. Flags cover plumbing only.
#[derive(Parser)]
#[command(
    name = "cardledger",
    version,
    about = "Incrementally refresh card market prices and the weekly delta in the inventory spreadsheet.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Config file path (defaults to ~/.cardledger/cardledger.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cardledger=info",
        1 => "cardledger=debug",
        _ => "cardledger=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Run entry point
// ---------------------------------------------------------------------------

/// Execute one update run.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    if config.store.spreadsheet_id.is_empty() {
        return Err(eyre!(
            "store.spreadsheet_id is not set. Edit the config file (cardledger.toml)"
        ));
    }

    // Credentials come from the environment, never from the config file
    let pricing_key = resolve_credential(&config.pricing.api_key_env)?;
    let store_token = resolve_credential(&config.store.token_env)?;

    let store = SheetsStore::new(
        &config.store.base_url,
        config.store.spreadsheet_id.as_str(),
        store_token,
    )?;

    let bulk_url = Url::parse(&config.catalog.bulk_url)
        .map_err(|e| eyre!("invalid catalog.bulk_url '{}': {e}", config.catalog.bulk_url))?;
    let catalog = CatalogClient::new(bulk_url)?;

    let pricing_url = Url::parse(&config.pricing.base_url)
        .map_err(|e| eyre!("invalid pricing.base_url '{}': {e}", config.pricing.base_url))?;
    let pricing = PricingClient::new(pricing_url, pricing_key)?;

    let opts = RunOptions {
        daily_limit: config.update.daily_limit,
        call_delay: Duration::from_millis(config.update.call_delay_ms),
        now: chrono::Utc::now(),
    };

    info!(
        daily_limit = opts.daily_limit,
        call_delay_ms = config.update.call_delay_ms,
        "starting update run"
    );

    let reporter = CliProgress::new();
    let report = pipeline::run_update(&store, &catalog, &pricing, &opts, &reporter).await?;

    // Print summary
    println!();
    println!("  Update run complete!");
    println!(
        "  Updated:  {} ({:.2}%)",
        report.summary.updated, report.summary.updated_percent
    );
    println!(
        "  Skipped:  {} ({:.2}%)",
        report.summary.skipped, report.summary.skipped_percent
    );
    println!("  Rollover: {}", report.rollover);
    if report.reloaded {
        println!("  Partitions were rebuilt from the catalog feed");
    }
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn card_updated(&self, name: &str, partition: Partition, price: f64) {
        self.spinner
            .set_message(format!("Updated {name} ({partition}) to {price:.2}"));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
