//! The HTTP client for the remote search/summary/compare service.
//!
//! Nothing here keeps state between calls. The controller decides what to do
//! with the results.

pub mod compare;
pub mod retry;

use std::time::Duration;

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::{BackendConfig, WarmupConfig};

pub use compare::{Comparison, Lines, Website};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("backend returned {0}")]
    BadStatus(StatusCode),
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("expected 2 websites to compare, got {0}")]
    NotEnoughData(usize),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub snippet: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

/// What `/search` gives back: the ranked results plus the summary bullets
/// generated from the top snippets.
#[derive(Deserialize, Debug, Default)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub results: Vec<ResultItem>,
    #[serde(default, deserialize_with = "string_items")]
    pub summary_result: Vec<String>,
}

impl SearchResults {
    /// Sort by rank, lowest first. Results with the same rank keep the order
    /// the backend sent them in.
    pub fn sort_by_rank(&mut self) {
        self.results.sort_by(|a, b| a.rank.total_cmp(&b.rank));
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// a single bad item (no link, say) is dropped instead of failing the search
fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("skipping malformed result: {err}");
                None
            }
        })
        .collect())
}

// summary_result is produced by splitting model output, so anything that
// isn't an array of strings is treated as no summary at all
fn string_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompareRequest {
    pub url1: String,
    pub url2: String,
    pub title1: Option<String>,
    pub title2: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Backend {
    client: reqwest::Client,
    base_url: Url,
    search_url: Url,
    summary_url: Url,
    compare_url: Url,
    search_timeout: Duration,
    summary_timeout: Duration,
    compare_timeout: Duration,
}

impl Backend {
    pub fn new(config: &BackendConfig) -> eyre::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(concat!("sixthsense/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // make sure relative joins append to the base path instead of
        // replacing its last segment
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            search_url: base_url.join("search")?,
            summary_url: base_url.join("summary")?,
            compare_url: base_url.join("compare")?,
            base_url,
            search_timeout: config.search_timeout,
            summary_timeout: config.summary_timeout,
            compare_timeout: config.compare_timeout,
        })
    }

    /// POST `/search`. The results come back sorted by rank.
    pub async fn search(&self, query: &str) -> Result<SearchResults, FetchError> {
        let mut results: SearchResults = self
            .post_json(&self.search_url, &SearchRequest { query }, self.search_timeout)
            .await?;
        results.sort_by_rank();
        debug!(
            "search for {query:?} returned {} results and {} summary bullets",
            results.results.len(),
            results.summary_result.len()
        );
        Ok(results)
    }

    /// POST `/summary` for a single page.
    pub async fn summarize(&self, link: &str) -> Result<String, FetchError> {
        let res: SummaryResponse = self
            .post_json(&self.summary_url, &SummaryRequest { url: link }, self.summary_timeout)
            .await?;
        Ok(res.summary)
    }

    /// POST `/compare`. Anything short of two websites is
    /// [`FetchError::NotEnoughData`].
    pub async fn compare(&self, request: &CompareRequest) -> Result<Comparison, FetchError> {
        let res: compare::CompareResponse = self
            .post_json(&self.compare_url, request, self.compare_timeout)
            .await?;
        Comparison::try_from(res.websites)
    }

    /// Poke the backend root until it answers. The hosted backend spins down
    /// when idle, so this gets the first real search off to a faster start.
    pub async fn warm_up(&self, warmup: &WarmupConfig) -> Result<(), FetchError> {
        retry::get_with_retry(&self.client, self.base_url.clone(), warmup.retries, warmup.delay)
            .await
            .map(|_| ())
    }

    async fn post_json<B, R>(&self, url: &Url, body: &B, deadline: Duration) -> Result<R, FetchError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = async {
            let res = self.client.post(url.clone()).json(body).send().await?;
            let status = res.status();
            let request_id = res
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_owned();
            debug!("{url} responded with {status} (request id {request_id})");

            if !status.is_success() {
                return Err(FetchError::BadStatus(status));
            }
            let body = res.bytes().await?;
            Ok::<R, FetchError>(serde_json::from_slice(&body)?)
        };

        // dropping the request future on timeout is what aborts it
        match tokio::time::timeout(deadline, request).await {
            Ok(res) => res,
            Err(_) => {
                warn!("{url} did not respond within {deadline:?}");
                Err(FetchError::Timeout(deadline))
            }
        }
    }
}
