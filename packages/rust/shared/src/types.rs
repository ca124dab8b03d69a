//! Core domain types for the CardLedger catalog.

use serde::{Deserialize, Serialize};

/// Fixed partition schema. A partition's header row must equal this list
/// exactly, in order, or the partition is invalid and subject to reload.
pub const EXPECTED_HEADER: [&str; 8] = [
    "Set",
    "Number",
    "Name",
    "Artist",
    "Market Price",
    "Last Week Price",
    "Weekly Change",
    "Last Fetched",
];

/// Column positions within the fixed schema.
pub const COL_SET: usize = 0;
pub const COL_NUMBER: usize = 1;
pub const COL_NAME: usize = 2;
pub const COL_ARTIST: usize = 3;
pub const COL_MARKET_PRICE: usize = 4;
pub const COL_LAST_WEEK_PRICE: usize = 5;
pub const COL_WEEKLY_CHANGE: usize = 6;
pub const COL_LAST_FETCHED: usize = 7;

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// One of the two parallel catalog tables.
///
/// Both are populated from the same catalog source, but the signed
/// partition is priced with a suffix term appended to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partition {
    Regular,
    Signed,
}

impl Partition {
    /// Fixed processing order for a run: Regular first, then Signed.
    pub const ALL: [Partition; 2] = [Partition::Regular, Partition::Signed];

    /// Name of the sheet backing this partition.
    pub fn title(&self) -> &'static str {
        match self {
            Partition::Regular => "Regular Art Cards",
            Partition::Signed => "Signed Art Cards",
        }
    }

    /// Whether pricing queries for this partition carry the signed suffix.
    pub fn is_signed(&self) -> bool {
        matches!(self, Partition::Signed)
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Partition::Regular => write!(f, "Regular"),
            Partition::Signed => write!(f, "Signed"),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogCard
// ---------------------------------------------------------------------------

/// Projection of one bulk-feed object onto the catalog columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCard {
    /// Card name as printed.
    pub name: String,
    /// Set code, uppercased.
    pub set: String,
    /// Collector number within the set.
    pub number: String,
    /// Artist credit, `"Unknown"` when the feed omits it.
    pub artist: String,
}

// ---------------------------------------------------------------------------
// CardRow
// ---------------------------------------------------------------------------

/// One catalog entry as stored in a partition.
///
/// All fields are cell strings: metric cells are decimal-or-blank and
/// `last_fetched` is a `%Y-%m-%d` date or empty. Identity is positional:
/// two rows with the same name are distinct entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRow {
    pub set: String,
    pub number: String,
    pub name: String,
    pub artist: String,
    pub market_price: String,
    pub last_week_price: String,
    pub weekly_change: String,
    pub last_fetched: String,
}

impl CardRow {
    /// Read a row from its raw cells. Missing trailing cells read as blank.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            set: cell(COL_SET),
            number: cell(COL_NUMBER),
            name: cell(COL_NAME),
            artist: cell(COL_ARTIST),
            market_price: cell(COL_MARKET_PRICE),
            last_week_price: cell(COL_LAST_WEEK_PRICE),
            weekly_change: cell(COL_WEEKLY_CHANGE),
            last_fetched: cell(COL_LAST_FETCHED),
        }
    }

    /// A fresh row for a catalog card, with all metric columns blank.
    pub fn from_catalog(card: &CatalogCard) -> Self {
        Self {
            set: card.set.clone(),
            number: card.number.clone(),
            name: card.name.clone(),
            artist: card.artist.clone(),
            ..Self::default()
        }
    }

    /// The row's cells in schema order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.set.clone(),
            self.number.clone(),
            self.name.clone(),
            self.artist.clone(),
            self.market_price.clone(),
            self.last_week_price.clone(),
            self.weekly_change.clone(),
            self.last_fetched.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Price cells
// ---------------------------------------------------------------------------

/// Parse a price cell into a number.
///
/// Strips any `$` signs; blank or otherwise non-numeric cells read as 0.
pub fn parse_price(cell: &str) -> f64 {
    cell.replace('$', "").trim().parse().unwrap_or(0.0)
}

/// Format a price for a metric cell, two decimal places.
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}
