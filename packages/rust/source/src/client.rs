//! HTTP client for the tabular API.
//!
//! Retrieval is offset-paginated; [`TableClient::list_rows`] collapses the
//! page loop into one logical call per table. Any transport failure surfaces
//! as a hard error — the pipeline caller aborts the load, there is no
//! partial publication.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use sitefeed_pipeline::RowSource;
use sitefeed_shared::{RawRow, Result, SitefeedError, SourceConfig};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("sitefeed/", env!("CARGO_PKG_VERSION"));

/// One page of the table listing response.
#[derive(Debug, Deserialize)]
struct RowPage {
    #[serde(default)]
    records: Vec<RawRow>,
    /// Cursor for the next page; absent on the last page.
    offset: Option<String>,
}

/// Client for one tabular API base, bound to the configured event and course
/// tables.
#[derive(Debug)]
pub struct TableClient {
    client: Client,
    base_url: Url,
    token: String,
    events_table: String,
    courses_table: String,
    page_size: u32,
}

impl TableClient {
    /// Build a client from config, reading the API token from the env var
    /// the config names.
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let token = std::env::var(&config.api_key_env).map_err(|_| {
            SitefeedError::config(format!(
                "API token not found. Set the {} environment variable.",
                config.api_key_env
            ))
        })?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| SitefeedError::config(format!("invalid base_url: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SitefeedError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token,
            events_table: config.events_table.clone(),
            courses_table: config.courses_table.clone(),
            page_size: config.page_size,
        })
    }

    /// Fetch every row of `table`, following the offset cursor until the
    /// source stops returning one.
    #[instrument(skip(self))]
    pub async fn list_rows(&self, table: &str) -> Result<Vec<RawRow>> {
        let mut rows: Vec<RawRow> = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let url = self.page_url(table, offset.as_deref())?;

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| SitefeedError::Network(format!("{table}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SitefeedError::Network(format!("{table}: HTTP {status}")));
            }

            let page: RowPage = response
                .json()
                .await
                .map_err(|e| SitefeedError::Network(format!("{table}: {e}")))?;

            debug!(table, records = page.records.len(), "fetched page");
            rows.extend(page.records);

            match page.offset {
                Some(next) if !next.is_empty() => offset = Some(next),
                _ => break,
            }
        }

        info!(table, rows = rows.len(), "table fetch complete");
        Ok(rows)
    }

    fn page_url(&self, table: &str, offset: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SitefeedError::config("base_url cannot be a base"))?
            .push(table);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(cursor) = offset {
                query.append_pair("offset", cursor);
            }
        }

        Ok(url)
    }
}

impl RowSource for TableClient {
    async fn fetch_event_rows(&self) -> Result<Vec<RawRow>> {
        self.list_rows(&self.events_table).await
    }

    async fn fetch_course_rows(&self) -> Result<Vec<RawRow>> {
        self.list_rows(&self.courses_table).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
