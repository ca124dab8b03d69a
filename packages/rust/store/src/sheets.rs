//! HTTP spreadsheet backend.
//!
//! Speaks a Sheets-style values API:
//! - `GET  {base}/{id}/values/{range}` — read a range
//! - `PUT  {base}/{id}/values/{range}` — overwrite a range
//! - `POST {base}/{id}/values/{range}:clear` — clear a range
//! - `POST {base}/{id}/sheets` — create a sheet by title
//!
//! Ranges use A1 notation prefixed with the sheet title. Session setup is
//! out of scope here: the access token is handed in ready to use.

use async_trait::async_trait;
use cardledger_shared::{CardLedgerError, Partition, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{STATUS_TITLE, TabularStore};

/// Default timeout in seconds for store requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for store requests.
const USER_AGENT: &str = concat!("CardLedger/", env!("CARGO_PKG_VERSION"));

/// Wire record for range reads and writes.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Request body for sheet creation.
#[derive(Debug, Serialize)]
struct AddSheetRequest<'a> {
    title: &'a str,
}

/// Spreadsheet store backed by the values API.
pub struct SheetsStore {
    client: Client,
    base_url: Url,
    spreadsheet_id: String,
    token: String,
}

impl SheetsStore {
    /// Create a store client for one spreadsheet.
    pub fn new(
        base_url: &str,
        spreadsheet_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CardLedgerError::config(format!("invalid store base URL: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CardLedgerError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            spreadsheet_id: spreadsheet_id.into(),
            token: token.into(),
        })
    }

    /// Build `{base}/{id}/{segments...}` with percent-encoded segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| CardLedgerError::Store("store base URL cannot be a base".into()))?;
            path.pop_if_empty();
            path.push(&self.spreadsheet_id);
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Map a response to `Ok` on success, a store error otherwise.
    fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(CardLedgerError::Store(format!(
                "{}: HTTP {status}",
                response.url()
            )));
        }
        Ok(response)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.endpoint(&["values", range])?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| CardLedgerError::Network(format!("{url}: {e}")))?;

        let body: ValueRange = Self::check(response)?
            .json()
            .await
            .map_err(|e| CardLedgerError::parse(format!("{url}: {e}")))?;

        Ok(body.values)
    }

    async fn put_values(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        let url = self.endpoint(&["values", range])?;
        let response = self
            .client
            .put(url.clone())
            .bearer_auth(&self.token)
            .json(&ValueRange { values })
            .send()
            .await
            .map_err(|e| CardLedgerError::Network(format!("{url}: {e}")))?;

        Self::check(response)?;
        Ok(())
    }

    /// Clear a range. Returns `false` when the backing sheet does not
    /// exist, so the caller can create it and retry.
    async fn clear_values(&self, range: &str) -> Result<bool> {
        let url = self.endpoint(&["values", &format!("{range}:clear")])?;
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| CardLedgerError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status.as_u16() == 400 || status.as_u16() == 404 {
            return Ok(false);
        }
        Self::check(response)?;
        Ok(true)
    }

    async fn add_sheet(&self, title: &str) -> Result<()> {
        let url = self.endpoint(&["sheets"])?;
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .json(&AddSheetRequest { title })
            .send()
            .await
            .map_err(|e| CardLedgerError::Network(format!("{url}: {e}")))?;

        Self::check(response)?;
        debug!(title, "created missing sheet");
        Ok(())
    }

    /// Clear a sheet, creating it first when absent.
    async fn clear_or_create(&self, title: &str) -> Result<()> {
        if !self.clear_values(title).await? {
            self.add_sheet(title).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TabularStore for SheetsStore {
    async fn read_rows(&self, partition: Partition) -> Result<Vec<Vec<String>>> {
        self.get_values(partition.title()).await
    }

    async fn write_cell(
        &self,
        partition: Partition,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<()> {
        let range = format!("{}!{}{}", partition.title(), column_letter(col), row + 1);
        self.put_values(&range, vec![vec![value.to_string()]])
            .await
    }

    async fn replace_rows(&self, partition: Partition, rows: &[Vec<String>]) -> Result<()> {
        self.clear_or_create(partition.title()).await?;
        self.put_values(&format!("{}!A1", partition.title()), rows.to_vec())
            .await
    }

    async fn replace_status(&self, entries: &[(String, String)]) -> Result<()> {
        self.clear_or_create(STATUS_TITLE).await?;
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|(key, value)| vec![key.clone(), value.clone()])
            .collect();
        self.put_values(&format!("{STATUS_TITLE}!A1"), rows).await
    }
}

/// Convert a 0-based column index to its A1 letter(s).
fn column_letter(col: usize) -> String {
    let mut n = col;
    let mut letters = String::new();
    loop {
        letters.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> SheetsStore {
        SheetsStore::new(&server.uri(), "inv-2026", "test-token").expect("build store")
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(4), "E");
        assert_eq!(column_letter(7), "H");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
    }

    #[tokio::test]
    async fn reads_partition_rows() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/inv-2026/values/Regular%20Art%20Cards"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "Regular Art Cards!A1:H3",
                "values": [
                    ["Set", "Number", "Name"],
                    ["MH3", "12", "Fblthp"],
                ]
            })))
            .mount(&server)
            .await;

        let rows = store_for(&server)
            .read_rows(Partition::Regular)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], "Fblthp");
    }

    #[tokio::test]
    async fn missing_values_field_reads_as_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/inv-2026/values/Signed%20Art%20Cards"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"range": "A1"})))
            .mount(&server)
            .await;

        let rows = store_for(&server)
            .read_rows(Partition::Signed)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn writes_a_single_cell_in_a1_notation() {
        let server = MockServer::start().await;

        // Market Price is column E; row index 3 is spreadsheet row 4
        Mock::given(method("PUT"))
            .and(path("/inv-2026/values/Regular%20Art%20Cards!E4"))
            .and(body_json(json!({"values": [["4.20"]]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .write_cell(Partition::Regular, 3, 4, "4.20")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn replace_rows_clears_then_writes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/inv-2026/values/Regular%20Art%20Cards:clear"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/inv-2026/values/Regular%20Art%20Cards!A1"))
            .and(body_json(json!({"values": [["Set"], ["MH3"]]})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let rows = vec![vec!["Set".to_string()], vec!["MH3".to_string()]];
        store_for(&server)
            .replace_rows(Partition::Regular, &rows)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn replace_status_creates_missing_sheet() {
        let server = MockServer::start().await;

        // Clearing an absent sheet fails, which must trigger creation
        Mock::given(method("POST"))
            .and(path("/inv-2026/values/Status:clear"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/inv-2026/sheets"))
            .and(body_json(json!({"title": "Status"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/inv-2026/values/Status!A1"))
            .and(body_json(json!({
                "values": [["Last Updated", "2026-08-02 09:00 UTC"]]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let entries = vec![("Last Updated".to_string(), "2026-08-02 09:00 UTC".to_string())];
        store_for(&server).replace_status(&entries).await.unwrap();
    }

    #[tokio::test]
    async fn store_fault_surfaces_as_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/inv-2026/values/Regular%20Art%20Cards"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = store_for(&server).read_rows(Partition::Regular).await;
        assert!(matches!(result, Err(CardLedgerError::Store(_))));
    }
}
