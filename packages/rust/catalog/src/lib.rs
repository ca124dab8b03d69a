//! Bulk catalog feed client.
//!
//! A full reload pulls the complete card list in two steps: a metadata
//! lookup that returns the bulk download location, then the download
//! itself. The list is filtered to art-series variants and projected onto
//! [`CatalogCard`] for partition population.

use cardledger_shared::{CardLedgerError, CatalogCard, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

/// Default timeout in seconds for feed requests.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("CardLedger/", env!("CARGO_PKG_VERSION"));

/// Layout marker identifying art-series variants in the bulk feed.
const ART_SERIES_LAYOUT: &str = "art_series";

// ---------------------------------------------------------------------------
// Feed response records
// ---------------------------------------------------------------------------

/// Metadata record returned by the bulk-data endpoint.
#[derive(Debug, Deserialize)]
struct BulkMetadata {
    /// Location of the full card-list download.
    #[serde(default)]
    download_uri: Option<String>,
}

/// One card object from the bulk download. Only the projected fields are
/// kept; everything else in the feed is ignored.
#[derive(Debug, Deserialize)]
struct BulkCard {
    #[serde(default)]
    name: String,
    #[serde(default)]
    set: String,
    #[serde(default)]
    collector_number: String,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    layout: Option<String>,
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// Client for the bulk catalog feed.
pub struct CatalogClient {
    client: Client,
    bulk_url: Url,
}

impl CatalogClient {
    /// Create a new feed client pointed at the bulk metadata endpoint.
    pub fn new(bulk_url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CardLedgerError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, bulk_url })
    }

    /// Fetch the complete art-card catalog.
    ///
    /// Resolves the bulk metadata for the download location, pulls the full
    /// list, filters to art-series variants, and projects each card onto
    /// the catalog columns (set uppercased, artist defaulting to
    /// `"Unknown"`).
    #[instrument(skip_all, fields(bulk_url = %self.bulk_url))]
    pub async fn fetch_art_cards(&self) -> Result<Vec<CatalogCard>> {
        let meta: BulkMetadata = self.get_json(self.bulk_url.as_str()).await?;

        let download_uri = meta.download_uri.ok_or_else(|| {
            CardLedgerError::validation("bulk metadata has no download location")
        })?;
        debug!(%download_uri, "bulk download location resolved");

        let cards: Vec<BulkCard> = self.get_json(&download_uri).await?;
        let total = cards.len();

        let art_cards: Vec<CatalogCard> = cards
            .into_iter()
            .filter(|c| c.layout.as_deref() == Some(ART_SERIES_LAYOUT))
            .map(|c| CatalogCard {
                name: c.name,
                set: c.set.to_uppercase(),
                number: c.collector_number,
                artist: c.artist.unwrap_or_else(|| "Unknown".into()),
            })
            .collect();

        info!(
            art_cards = art_cards.len(),
            total, "catalog feed fetched and filtered"
        );

        Ok(art_cards)
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CardLedgerError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CardLedgerError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CardLedgerError::parse(format!("{url}: {e}")))
    }
}
