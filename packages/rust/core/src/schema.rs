//! Partition schema validation and full reload.
//!
//! A partition that is empty or whose header row drifted from the fixed
//! schema cannot be updated in place. It is rebuilt wholesale from the
//! catalog feed, losing whatever price history it held.

use cardledger_catalog::CatalogClient;
use cardledger_shared::{CardRow, CatalogCard, EXPECTED_HEADER, Partition, Result};
use cardledger_store::TabularStore;
use tracing::{error, instrument, warn};

/// Check whether a table's header row matches the fixed catalog schema.
fn header_is_valid(rows: &[Vec<String>]) -> bool {
    match rows.first() {
        Some(header) => {
            header.len() == EXPECTED_HEADER.len()
                && header.iter().zip(EXPECTED_HEADER).all(|(cell, expected)| cell == expected)
        }
        None => false,
    }
}

/// Build the replacement table for a reload: the header plus one row per
/// catalog card with all four metric columns blank.
fn reload_rows(cards: &[CatalogCard]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(cards.len() + 1);
    rows.push(EXPECTED_HEADER.iter().map(|s| s.to_string()).collect());
    for card in cards {
        rows.push(CardRow::from_catalog(card).to_cells());
    }
    rows
}

/// Validate both partitions, rebuilding any whose shape is invalid.
///
/// Returns whether either partition was reloaded, for logging only. A
/// catalog-feed failure during a rebuild degrades to an empty catalog:
/// the partition is still wiped and rewritten with zero rows.
#[instrument(skip_all)]
pub async fn validate_or_reload(
    store: &dyn TabularStore,
    catalog: &CatalogClient,
) -> Result<bool> {
    let mut reloaded = false;

    for partition in Partition::ALL {
        let rows = store.read_rows(partition).await?;
        if header_is_valid(&rows) {
            continue;
        }

        warn!(
            partition = %partition,
            "header invalid or partition empty, rebuilding from catalog feed"
        );

        let cards = match catalog.fetch_art_cards().await {
            Ok(cards) => cards,
            Err(e) => {
                error!(error = %e, "catalog feed unavailable, rebuilding with an empty catalog");
                Vec::new()
            }
        };

        store.replace_rows(partition, &reload_rows(&cards)).await?;
        reloaded = true;
    }

    Ok(reloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardledger_store::MemoryStore;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn header() -> Vec<String> {
        EXPECTED_HEADER.iter().map(|s| s.to_string()).collect()
    }

    async fn feed_server(cards: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        let meta = json!({"download_uri": format!("{}/bulk.json", server.uri())});
        Mock::given(method("GET"))
            .and(path("/bulk-data/default-cards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(meta))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bulk.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cards))
            .mount(&server)
            .await;
        server
    }

    fn catalog_for(server: &MockServer) -> CatalogClient {
        let url = Url::parse(&format!("{}/bulk-data/default-cards", server.uri())).unwrap();
        CatalogClient::new(url).unwrap()
    }

    #[test]
    fn header_validation() {
        assert!(header_is_valid(&[header()]));
        assert!(!header_is_valid(&[]));

        let mut wrong = header();
        wrong[4] = "Price".into();
        assert!(!header_is_valid(&[wrong]));

        let short: Vec<String> = header().into_iter().take(6).collect();
        assert!(!header_is_valid(&[short]));
    }

    #[tokio::test]
    async fn valid_partitions_are_left_alone() {
        let store = MemoryStore::new();
        let rows = vec![header(), vec!["MH3".into(); 8]];
        store.seed(Partition::Regular, rows.clone());
        store.seed(Partition::Signed, rows.clone());

        let server = feed_server(json!([])).await;
        let reloaded = validate_or_reload(&store, &catalog_for(&server))
            .await
            .unwrap();

        assert!(!reloaded);
        assert_eq!(store.rows(Partition::Regular), rows);
    }

    #[tokio::test]
    async fn header_only_partition_is_valid() {
        let store = MemoryStore::new();
        store.seed(Partition::Regular, vec![header()]);
        store.seed(Partition::Signed, vec![header()]);

        let server = feed_server(json!([])).await;
        let reloaded = validate_or_reload(&store, &catalog_for(&server))
            .await
            .unwrap();
        assert!(!reloaded);
    }

    #[tokio::test]
    async fn drifted_header_triggers_rebuild() {
        let store = MemoryStore::new();
        let mut bad_header = header();
        bad_header[0] = "Set Code".into();
        store.seed(
            Partition::Regular,
            vec![bad_header, vec!["OLD".into(); 8]],
        );
        store.seed(Partition::Signed, vec![header()]);

        let server = feed_server(json!([
            {"name": "Fblthp", "set": "mh3", "collector_number": "12", "artist": "Amy Weber", "layout": "art_series"},
        ]))
        .await;

        let reloaded = validate_or_reload(&store, &catalog_for(&server))
            .await
            .unwrap();
        assert!(reloaded);

        let rows = store.rows(Partition::Regular);
        assert_eq!(rows[0], header());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], "MH3");
        assert_eq!(rows[1][2], "Fblthp");
        // All four metric columns blank after a reload
        assert_eq!(&rows[1][4..8], &["", "", "", ""]);

        // The valid partition was not touched
        assert_eq!(store.rows(Partition::Signed), vec![header()]);
    }

    #[tokio::test]
    async fn empty_partition_triggers_rebuild() {
        let store = MemoryStore::new();
        store.seed(Partition::Regular, vec![header()]);
        // Signed never seeded: reads as zero rows

        let server = feed_server(json!([
            {"name": "Static Orb", "set": "7ed", "collector_number": "319", "layout": "art_series"},
        ]))
        .await;

        let reloaded = validate_or_reload(&store, &catalog_for(&server))
            .await
            .unwrap();
        assert!(reloaded);
        assert_eq!(store.rows(Partition::Signed).len(), 2);
    }

    #[tokio::test]
    async fn feed_outage_during_rebuild_wipes_to_header_only() {
        let store = MemoryStore::new();
        store.seed(Partition::Regular, vec![vec!["garbage".into()]]);
        store.seed(Partition::Signed, vec![header()]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bulk-data/default-cards"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let reloaded = validate_or_reload(&store, &catalog_for(&server))
            .await
            .unwrap();
        assert!(reloaded);

        // The partition was still rewritten, with zero data rows
        assert_eq!(store.rows(Partition::Regular), vec![header()]);
    }
}
