//! # router-hub
//!
//! Client for the hosted skills search API
//! (`GET <endpoint>?page=&pageSize=&filter=`).
//!
//! The API is young and its responses are not always well-formed, so
//! decoding is lenient: missing fields take defaults and a body that is not
//! a JSON object decodes to an empty page flagged as malformed.

use std::time::Duration;

use router_core::{Result, RouterError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A skill listed by the search API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub description: String,
    pub repository: String,
    pub author: String,
    pub stars: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchResponse {
    results: Vec<SearchResult>,
    total: u64,
    page: Option<u32>,
    page_size: Option<u32>,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// The body could not be decoded; `results` is empty.
    pub malformed: bool,
}

impl SearchPage {
    /// Decode a response body, falling back to the requested page/size for
    /// fields the server left out.
    pub fn from_body(body: &str, page: u32, page_size: u32) -> Self {
        match serde_json::from_str::<SearchResponse>(body) {
            Ok(resp) => Self {
                results: resp.results,
                total: resp.total,
                page: resp.page.filter(|p| *p > 0).unwrap_or(page),
                page_size: resp.page_size.filter(|s| *s > 0).unwrap_or(page_size),
                malformed: false,
            },
            Err(e) => {
                warn!(error = %e, "search API returned an unexpected body");
                Self {
                    results: Vec::new(),
                    total: 0,
                    page,
                    page_size,
                    malformed: true,
                }
            }
        }
    }

    /// `ceil(total / page_size)`, at least 1.
    pub fn total_pages(&self) -> u64 {
        let size = u64::from(self.page_size.max(1));
        self.total.div_ceil(size).max(1)
    }
}

/// HTTP client for the search endpoint.
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
    page_size: u32,
}

impl SearchClient {
    pub fn new(endpoint: &str, page_size: u32, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skills-router/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| RouterError::Network(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            page_size: page_size.max(1),
        })
    }

    /// Fetch one page of results for `keyword`.
    pub async fn search(&self, keyword: &str, page: u32) -> Result<SearchPage> {
        let page = page.max(1);
        debug!(endpoint = %self.endpoint, %keyword, page, "searching skills");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("page", page.to_string()),
                ("pageSize", self.page_size.to_string()),
                ("filter", keyword.to_string()),
            ])
            .send()
            .await
            .map_err(|e| RouterError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RouterError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| RouterError::Network(e.to_string()))?;
        Ok(SearchPage::from_body(&body, page, self.page_size))
    }
}
