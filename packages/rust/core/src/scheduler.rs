//! Incremental price update scheduler.
//!
//! Walks each partition in fixed row order, refreshing the rows the
//! staleness policy marks as due, under a per-partition call budget. Rows
//! left unvisited after the budget runs out are untouched and excluded
//! from the run's counts.

use std::time::Duration;

use cardledger_pricing::{PricingClient, RateLimiter};
use cardledger_shared::{
    COL_LAST_FETCHED, COL_MARKET_PRICE, CardRow, Partition, Result, format_price,
};
use cardledger_store::TabularStore;
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::pipeline::ProgressReporter;
use crate::staleness;

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Aggregate counts for one scheduler pass over both partitions.
///
/// Percentages are computed over rows actually visited (updated +
/// skipped); rows left behind by budget exhaustion are not in the base.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub updated: usize,
    pub updated_percent: f64,
    pub skipped: usize,
    pub skipped_percent: f64,
}

impl RunSummary {
    fn from_counts(updated: usize, skipped: usize) -> Self {
        let visited = updated + skipped;
        let percent = |count: usize| {
            if visited == 0 {
                0.0
            } else {
                count as f64 / visited as f64 * 100.0
            }
        };
        Self {
            updated,
            updated_percent: percent(updated),
            skipped,
            skipped_percent: percent(skipped),
        }
    }
}

/// Scheduler tunables for one run.
#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Maximum pricing calls per partition.
    pub daily_limit: u32,
    /// Pause after each successful price fetch.
    pub call_delay: Duration,
    /// Calendar date staleness is evaluated against, also written into
    /// `Last Fetched` on update.
    pub today: NaiveDate,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Refresh stale prices across both partitions.
#[instrument(skip_all, fields(daily_limit = opts.daily_limit))]
pub async fn update_prices(
    store: &dyn TabularStore,
    pricing: &PricingClient,
    opts: &SchedulerOptions,
    progress: &dyn ProgressReporter,
) -> Result<RunSummary> {
    let mut updated = 0;
    let mut skipped = 0;

    for partition in Partition::ALL {
        let (u, s) = update_partition(store, pricing, opts, partition, progress).await?;
        updated += u;
        skipped += s;
    }

    let summary = RunSummary::from_counts(updated, skipped);
    info!(
        updated = summary.updated,
        updated_percent = summary.updated_percent,
        skipped = summary.skipped,
        skipped_percent = summary.skipped_percent,
        "price update pass complete"
    );

    Ok(summary)
}

/// Scan one partition, returning `(updated, skipped)` counts.
async fn update_partition(
    store: &dyn TabularStore,
    pricing: &PricingClient,
    opts: &SchedulerOptions,
    partition: Partition,
    progress: &dyn ProgressReporter,
) -> Result<(usize, usize)> {
    let rows = store.read_rows(partition).await?;
    let today_cell = opts.today.format(staleness::LAST_FETCHED_FORMAT).to_string();

    // Fresh budget per partition: spending it all on Regular leaves
    // Signed's allowance intact.
    let mut limiter = RateLimiter::new(opts.daily_limit, opts.call_delay);
    let mut updated = 0;
    let mut skipped = 0;

    for (index, cells) in rows.iter().enumerate().skip(1) {
        if limiter.is_exhausted() {
            info!(
                partition = %partition,
                remaining = rows.len() - index,
                "call budget exhausted, leaving remaining rows untouched"
            );
            break;
        }

        let row = CardRow::from_cells(cells);
        if !staleness::is_eligible(&row.last_fetched, opts.today) {
            skipped += 1;
            continue;
        }

        let price = match pricing.fetch_price(&row.name, partition.is_signed()).await {
            Ok(price) => price,
            Err(e) => {
                warn!(card = %row.name, error = %e, "price lookup failed, recording 0");
                0.0
            }
        };

        // Two individual writes per updated row: the price, then the
        // fetch date. A store fault here aborts the run mid-partition.
        store
            .write_cell(partition, index, COL_MARKET_PRICE, &format_price(price))
            .await?;
        store
            .write_cell(partition, index, COL_LAST_FETCHED, &today_cell)
            .await?;

        updated += 1;
        progress.card_updated(&row.name, partition, price);
        info!(card = %row.name, partition = %partition, price, "price refreshed");
        limiter.record_call().await;
    }

    Ok((updated, skipped))
}
