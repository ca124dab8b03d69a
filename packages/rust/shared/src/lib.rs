//! Shared types, error model, and configuration for CardLedger.
//!
//! This crate is the foundation depended on by all other CardLedger crates.
//! It provides:
//! - [`CardLedgerError`] — the unified error type
//! - Domain types ([`Partition`], [`CardRow`], [`CatalogCard`], the fixed
//!   partition schema)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CatalogConfig, PricingConfig, StoreConfig, UpdateConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_credential,
};
pub use error::{CardLedgerError, Result};
pub use types::{
    COL_ARTIST, COL_LAST_FETCHED, COL_LAST_WEEK_PRICE, COL_MARKET_PRICE, COL_NAME, COL_NUMBER,
    COL_SET, COL_WEEKLY_CHANGE, CardRow, CatalogCard, EXPECTED_HEADER, Partition, format_price,
    parse_price,
};
