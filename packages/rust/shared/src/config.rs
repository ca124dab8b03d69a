//! Application configuration for CardLedger.
//!
//! User config lives at `~/.cardledger/cardledger.toml`. A run takes no
//! behavioral flags; everything is governed by this file. Credentials are
//! referenced by environment-variable name and never stored on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CardLedgerError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cardledger.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cardledger";

// ---------------------------------------------------------------------------
// Config structs (matching cardledger.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bulk catalog feed settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Pricing API settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Tabular store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Incremental update tunables.
    #[serde(default)]
    pub update: UpdateConfig,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Bulk metadata endpoint that points at the full card download.
    #[serde(default = "default_bulk_url")]
    pub bulk_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            bulk_url: default_bulk_url(),
        }
    }
}

fn default_bulk_url() -> String {
    "https://api.scryfall.com/bulk-data/default-cards".into()
}

/// `[pricing]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Base URL of the pricing API.
    #[serde(default = "default_pricing_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_pricing_key_env")]
    pub api_key_env: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_url: default_pricing_base_url(),
            api_key_env: default_pricing_key_env(),
        }
    }
}

fn default_pricing_base_url() -> String {
    "https://api.justtcg.com".into()
}
fn default_pricing_key_env() -> String {
    "JUSTTCG_API_KEY".into()
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the spreadsheet values API.
    #[serde(default = "default_store_base_url")]
    pub base_url: String,

    /// Identifier of the spreadsheet holding the partitions.
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Name of the env var holding the store access token.
    #[serde(default = "default_store_token_env")]
    pub token_env: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
            spreadsheet_id: String::new(),
            token_env: default_store_token_env(),
        }
    }
}

fn default_store_base_url() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".into()
}
fn default_store_token_env() -> String {
    "SHEETS_API_TOKEN".into()
}

/// `[update]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Maximum pricing calls per partition per run.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Milliseconds to pause after each successful price fetch.
    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            call_delay_ms: default_call_delay_ms(),
        }
    }
}

fn default_daily_limit() -> u32 {
    16
}
fn default_call_delay_ms() -> u64 {
    1000
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cardledger/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CardLedgerError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cardledger/cardledger.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CardLedgerError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CardLedgerError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CardLedgerError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CardLedgerError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CardLedgerError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read a credential from the environment variable named in config.
pub fn resolve_credential(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(CardLedgerError::config(format!(
            "credential not found. Set the {var_name} environment variable."
        ))),
    }
}
