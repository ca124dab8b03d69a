//! In-memory store implementing the same contract as the HTTP backend.
//!
//! Used by core tests in place of a live spreadsheet.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use cardledger_shared::{CardLedgerError, Partition, Result};

use crate::TabularStore;

/// Mutex-guarded in-memory tables plus a status area.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Partition, Vec<Vec<String>>>>,
    status: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a partition with rows (header included).
    pub fn seed(&self, partition: Partition, rows: Vec<Vec<String>>) {
        self.tables.lock().unwrap().insert(partition, rows);
    }

    /// Snapshot a partition's rows.
    pub fn rows(&self, partition: Partition) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .unwrap()
            .get(&partition)
            .cloned()
            .unwrap_or_default()
    }

    /// Snapshot the status area.
    pub fn status(&self) -> Vec<(String, String)> {
        self.status.lock().unwrap().clone()
    }
}

#[async_trait]
impl TabularStore for MemoryStore {
    async fn read_rows(&self, partition: Partition) -> Result<Vec<Vec<String>>> {
        Ok(self.rows(partition))
    }

    async fn write_cell(
        &self,
        partition: Partition,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(partition).or_default();

        let target = rows.get_mut(row).ok_or_else(|| {
            CardLedgerError::Store(format!("row {row} out of range for {partition}"))
        })?;
        if target.len() <= col {
            target.resize(col + 1, String::new());
        }
        target[col] = value.to_string();
        Ok(())
    }

    async fn replace_rows(&self, partition: Partition, rows: &[Vec<String>]) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .insert(partition, rows.to_vec());
        Ok(())
    }

    async fn replace_status(&self, entries: &[(String, String)]) -> Result<()> {
        *self.status.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}
