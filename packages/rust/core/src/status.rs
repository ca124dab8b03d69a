//! Status area reporting.

use cardledger_shared::Result;
use cardledger_store::TabularStore;
use chrono::{DateTime, Utc};

use crate::scheduler::RunSummary;

/// Timestamp format shown in the status area.
const STATUS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Build the three status rows for a completed run.
fn status_entries(summary: &RunSummary, now: DateTime<Utc>) -> Vec<(String, String)> {
    vec![
        (
            "Last Updated".to_string(),
            now.format(STATUS_TIME_FORMAT).to_string(),
        ),
        (
            "Cards Updated".to_string(),
            format!("{} ({:.2}%)", summary.updated, summary.updated_percent),
        ),
        (
            "Cards Skipped".to_string(),
            format!("{} ({:.2}%)", summary.skipped, summary.skipped_percent),
        ),
    ]
}

/// Overwrite the status area with the run's outcome.
pub async fn write_status(
    store: &dyn TabularStore,
    summary: &RunSummary,
    now: DateTime<Utc>,
) -> Result<()> {
    store.replace_status(&status_entries(summary, now)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardledger_store::MemoryStore;
    use chrono::TimeZone;

    fn summary() -> RunSummary {
        RunSummary {
            updated: 10,
            updated_percent: 50.0,
            skipped: 10,
            skipped_percent: 50.0,
        }
    }

    #[test]
    fn exactly_three_rows() {
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 9, 30, 0).unwrap();
        let entries = status_entries(&summary(), now);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].0, "Last Updated");
        assert_eq!(entries[0].1, "2026-08-02 09:30 UTC");
        assert_eq!(entries[1].1, "10 (50.00%)");
        assert_eq!(entries[2].1, "10 (50.00%)");
    }

    #[tokio::test]
    async fn overwrites_prior_status() {
        let store = MemoryStore::new();
        store
            .replace_status(&[("Stale Key".into(), "stale value".into())])
            .await
            .unwrap();

        let now = Utc.with_ymd_and_hms(2026, 8, 2, 9, 30, 0).unwrap();
        write_status(&store, &summary(), now).await.unwrap();

        let status = store.status();
        assert_eq!(status.len(), 3);
        assert!(status.iter().all(|(key, _)| key != "Stale Key"));
    }
}
