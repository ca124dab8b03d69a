//! Query-by-name lookups against the pricing API.

use cardledger_shared::{CardLedgerError, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Default timeout in seconds for pricing requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for pricing requests.
const USER_AGENT: &str = concat!("CardLedger/", env!("CARGO_PKG_VERSION"));

/// Suffix term appended to queries for the signed partition.
const SIGNED_SUFFIX: &str = " Signed";

// ---------------------------------------------------------------------------
// PricingError
// ---------------------------------------------------------------------------

/// A failed price lookup, differentiated so callers can choose their own
/// degrade policy instead of a uniform collapse to a default value.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// The API answered with a non-success status (other than auth).
    #[error("pricing API returned HTTP {status} for {query:?}")]
    Unavailable { query: String, status: u16 },

    /// The API rejected the credential.
    #[error("pricing API rejected credentials (HTTP {status})")]
    Auth { status: u16 },

    /// The request never completed (connect, timeout, TLS).
    #[error("pricing request failed for {query:?}: {message}")]
    Transport { query: String, message: String },

    /// The body decoded to something other than the expected record.
    #[error("pricing response for {query:?} could not be parsed: {message}")]
    Parse { query: String, message: String },
}

// ---------------------------------------------------------------------------
// Response records
// ---------------------------------------------------------------------------

/// Search response from the pricing API. Missing fields default rather
/// than failing the decode.
#[derive(Debug, Deserialize)]
struct PricingResponse {
    #[serde(default)]
    results: Vec<PricingResult>,
}

/// One candidate result. Only the market price is consumed.
#[derive(Debug, Deserialize)]
struct PricingResult {
    #[serde(default, rename = "marketPrice")]
    market_price: f64,
}

// ---------------------------------------------------------------------------
// PricingClient
// ---------------------------------------------------------------------------

/// Authenticated client for the pricing API.
pub struct PricingClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl PricingClient {
    /// Create a new pricing client.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CardLedgerError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Build the search query for a card: the name, with the signed suffix
    /// term appended for the signed partition.
    pub fn query_for(name: &str, signed: bool) -> String {
        if signed {
            format!("{name}{SIGNED_SUFFIX}")
        } else {
            name.to_string()
        }
    }

    /// Look up a card's market price.
    ///
    /// The first candidate result's market price is used; an empty result
    /// list yields 0. Every failure mode is surfaced as a [`PricingError`]
    /// variant, so a genuine zero price is distinguishable from a failure
    /// at this layer, though not downstream of callers that degrade.
    pub async fn fetch_price(&self, name: &str, signed: bool) -> std::result::Result<f64, PricingError> {
        let query = Self::query_for(name, signed);
        let url = format!(
            "{}/pricing/search",
            self.base_url.as_str().trim_end_matches('/')
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(|e| PricingError::Transport {
                query: query.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(PricingError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(PricingError::Unavailable {
                query,
                status: status.as_u16(),
            });
        }

        let body: PricingResponse =
            response.json().await.map_err(|e| PricingError::Parse {
                query: query.clone(),
                message: e.to_string(),
            })?;

        let price = body.results.first().map(|r| r.market_price).unwrap_or(0.0);
        debug!(%query, price, candidates = body.results.len(), "price resolved");

        Ok(price)
    }
}
