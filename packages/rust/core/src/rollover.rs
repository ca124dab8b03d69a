//! Weekly rollover between snapshotting and delta computation.

use cardledger_shared::{
    COL_LAST_WEEK_PRICE, COL_WEEKLY_CHANGE, CardRow, Partition, Result, format_price, parse_price,
};
use cardledger_store::TabularStore;
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{info, instrument};

/// The two mutually exclusive weekly actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverAction {
    /// Snapshot current prices into `Last Week Price` and zero the change.
    Archive,
    /// Recompute `Weekly Change` against the stored snapshot.
    Compute,
}

impl RolloverAction {
    /// Pick the action for a calendar date: Sunday archives, every other
    /// day recomputes the delta.
    ///
    /// Nothing records that an archive already happened, so a second run
    /// on the same Sunday archives again and discards the delta that day
    /// would otherwise show.
    pub fn for_date(date: NaiveDate) -> Self {
        if date.weekday() == Weekday::Sun {
            RolloverAction::Archive
        } else {
            RolloverAction::Compute
        }
    }
}

impl std::fmt::Display for RolloverAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RolloverAction::Archive => write!(f, "archive"),
            RolloverAction::Compute => write!(f, "compute"),
        }
    }
}

/// Apply the rollover action to every row of both partitions.
///
/// Non-numeric stored values are coerced to 0 before arithmetic.
#[instrument(skip_all, fields(action = %action))]
pub async fn apply(store: &dyn TabularStore, action: RolloverAction) -> Result<()> {
    for partition in Partition::ALL {
        apply_partition(store, partition, action).await?;
    }
    Ok(())
}

async fn apply_partition(
    store: &dyn TabularStore,
    partition: Partition,
    action: RolloverAction,
) -> Result<()> {
    let rows = store.read_rows(partition).await?;

    for (index, cells) in rows.iter().enumerate().skip(1) {
        let row = CardRow::from_cells(cells);
        let market = parse_price(&row.market_price);

        match action {
            RolloverAction::Archive => {
                store
                    .write_cell(partition, index, COL_LAST_WEEK_PRICE, &format_price(market))
                    .await?;
                store
                    .write_cell(partition, index, COL_WEEKLY_CHANGE, &format_price(0.0))
                    .await?;
            }
            RolloverAction::Compute => {
                let last_week = parse_price(&row.last_week_price);
                store
                    .write_cell(
                        partition,
                        index,
                        COL_WEEKLY_CHANGE,
                        &format_price(market - last_week),
                    )
                    .await?;
            }
        }
    }

    info!(
        partition = %partition,
        rows = rows.len().saturating_sub(1),
        "rollover applied"
    );
    Ok(())
}
