//! End-to-end update run: schema guard → scheduler → rollover → status.

use std::time::{Duration, Instant};

use cardledger_catalog::CatalogClient;
use cardledger_pricing::PricingClient;
use cardledger_shared::{Partition, Result};
use cardledger_store::TabularStore;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::rollover::{self, RolloverAction};
use crate::scheduler::{self, RunSummary, SchedulerOptions};
use crate::schema;
use crate::status;

/// Tunables and the injected clock for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum pricing calls per partition.
    pub daily_limit: u32,
    /// Pause after each successful price fetch.
    pub call_delay: Duration,
    /// Wall-clock instant the run is evaluated against: staleness, the
    /// rollover branch, and the status timestamp all derive from it.
    pub now: DateTime<Utc>,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Updated/skipped counts and percentages.
    pub summary: RunSummary,
    /// Whether the schema guard rebuilt either partition.
    pub reloaded: bool,
    /// Which weekly branch ran.
    pub rollover: RolloverAction,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callbacks for operator-facing output.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each row's price is refreshed.
    fn card_updated(&self, name: &str, partition: Partition, price: f64);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn card_updated(&self, _name: &str, _partition: Partition, _price: f64) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run one full update cycle.
///
/// 1. Validate partition schemas, rebuilding invalid ones from the feed
/// 2. Refresh stale prices under the per-partition budget
/// 3. Apply exactly one weekly rollover branch for today's date
/// 4. Overwrite the status area
#[instrument(skip_all, fields(run_id = %Uuid::now_v7()))]
pub async fn run_update(
    store: &dyn TabularStore,
    catalog: &CatalogClient,
    pricing: &PricingClient,
    opts: &RunOptions,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();
    let today = opts.now.date_naive();

    progress.phase("Validating partitions");
    let reloaded = schema::validate_or_reload(store, catalog).await?;
    if reloaded {
        info!("partitions rebuilt from the catalog feed");
    }

    progress.phase("Updating prices");
    let sched_opts = SchedulerOptions {
        daily_limit: opts.daily_limit,
        call_delay: opts.call_delay,
        today,
    };
    let summary = scheduler::update_prices(store, pricing, &sched_opts, progress).await?;

    let action = RolloverAction::for_date(today);
    progress.phase(match action {
        RolloverAction::Archive => "Archiving weekly prices",
        RolloverAction::Compute => "Computing weekly change",
    });
    rollover::apply(store, action).await?;

    progress.phase("Writing status");
    status::write_status(store, &summary, opts.now).await?;

    let report = RunReport {
        summary,
        reloaded,
        rollover: action,
        elapsed: start.elapsed(),
    };
    progress.done(&report);

    info!(
        updated = report.summary.updated,
        skipped = report.summary.skipped,
        rollover = %report.rollover,
        reloaded = report.reloaded,
        elapsed_ms = report.elapsed.as_millis(),
        "update run complete"
    );

    Ok(report)
}
