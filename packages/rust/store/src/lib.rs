//! Tabular store contract and backends.
//!
//! The scheduler talks to the spreadsheet through the [`TabularStore`]
//! trait: [`SheetsStore`] is the HTTP backend against the real
//! spreadsheet service, [`MemoryStore`] implements the same contract in
//! memory for tests.
//!
//! **Access rules:** one writer per run. Nothing here defends against a
//! concurrent editor; read-then-write-by-index assumes row positions are
//! stable for the duration of the run.

mod memory;
mod sheets;

use async_trait::async_trait;
use cardledger_shared::{Partition, Result};

pub use memory::MemoryStore;
pub use sheets::SheetsStore;

/// Name of the sheet holding the run summary.
pub const STATUS_TITLE: &str = "Status";

/// Read/write contract for the external tabular store.
///
/// Row and column coordinates are 0-based over the full table; row 0 is
/// the header row.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Read every row of a partition, header included.
    async fn read_rows(&self, partition: Partition) -> Result<Vec<Vec<String>>>;

    /// Overwrite a single cell.
    async fn write_cell(
        &self,
        partition: Partition,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<()>;

    /// Clear a partition and rewrite it from scratch.
    async fn replace_rows(&self, partition: Partition, rows: &[Vec<String>]) -> Result<()>;

    /// Locate or create the status area, clear it, and write the given
    /// key/value rows.
    async fn replace_status(&self, entries: &[(String, String)]) -> Result<()>;
}
