//! Record persistence behind a narrow trait.
//!
//! Two logical sheets, addressed by name: one for submissions, one for
//! events. The production backend is the Google Sheets v4 REST API; tests
//! use the in-process `MemoryStore`.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::SheetsConfig;
use crate::error::StoreError;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Appends one row after the last non-empty row of `sheet`.
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<(), StoreError>;

    /// Returns every row of `sheet`, header included.
    async fn list_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError>;
}

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

#[derive(Deserialize, Default)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

pub struct SheetsStore {
    client: Client,
    spreadsheet_id: String,
    api_token: String,
}

impl SheetsStore {
    pub fn new(config: &SheetsConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    /// Builds `{base}/{spreadsheet}/values/{range}`; sheet names are pushed
    /// as path segments so non-ASCII titles get percent-encoded.
    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        let mut url = Url::parse(SHEETS_API_BASE).map_err(|e| StoreError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Url("cannot be a base".to_string()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<(), StoreError> {
        let url = self.values_url(&format!("{}:append", sheet))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&AppendRequest { values: vec![row] })
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn list_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = self.values_url(sheet)?;
        let response = self.client.get(url).bearer_auth(&self.api_token).send().await?;

        let parsed: ValuesResponse = Self::check(response).await?.json().await?;
        Ok(parsed.values)
    }
}

/// In-process store keyed by sheet name.
#[derive(Default)]
pub struct MemoryStore {
    sheets: DashMap<String, Vec<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<(), StoreError> {
        self.sheets.entry(sheet.to_string()).or_default().push(row);
        Ok(())
    }

    async fn list_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.sheets.get(sheet).map(|rows| rows.value().clone()).unwrap_or_default())
    }
}
