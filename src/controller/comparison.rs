//! State for the side-by-side comparison view. Unlike the results page, this
//! is derived entirely from the view's parameters and isn't kept in the
//! session.

use serde::Deserialize;
use tracing::warn;

use crate::backend::{Backend, CompareRequest, Comparison, FetchError};

pub const NOT_ENOUGH_DATA_MESSAGE: &str = "Not enough data to compare websites.";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ComparisonParams {
    #[serde(default)]
    pub url1: Option<String>,
    #[serde(default)]
    pub url2: Option<String>,
    #[serde(default)]
    pub title1: Option<String>,
    #[serde(default)]
    pub title2: Option<String>,
}

impl ComparisonParams {
    /// The request to send, or `None` if either url is missing.
    pub fn request(&self) -> Option<CompareRequest> {
        let non_empty = |s: &Option<String>| s.clone().filter(|s| !s.trim().is_empty());
        Some(CompareRequest {
            url1: non_empty(&self.url1)?,
            url2: non_empty(&self.url2)?,
            title1: self.title1.clone(),
            title2: self.title2.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonView {
    /// One of the urls wasn't given, so nothing was fetched.
    NothingToCompare,
    Loading,
    Ready(Comparison),
    /// The backend answered but with fewer than two websites.
    NotEnoughData,
    Failed(String),
}

impl ComparisonView {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NothingToCompare | Self::NotEnoughData => Some(NOT_ENOUGH_DATA_MESSAGE),
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// Fetch the comparison for the view's parameters. Never retried.
pub async fn load_comparison(backend: &Backend, params: &ComparisonParams) -> ComparisonView {
    let Some(request) = params.request() else {
        return ComparisonView::NothingToCompare;
    };

    match backend.compare(&request).await {
        Ok(comparison) => ComparisonView::Ready(comparison),
        Err(FetchError::NotEnoughData(count)) => {
            warn!("comparison of {} and {} only returned {count} websites", request.url1, request.url2);
            ComparisonView::NotEnoughData
        }
        Err(err) => {
            warn!("comparison of {} and {} failed: {err}", request.url1, request.url2);
            ComparisonView::Failed(failure_message(&err))
        }
    }
}

fn failure_message(err: &FetchError) -> String {
    match err {
        FetchError::BadStatus(_) => "API call failed".to_string(),
        FetchError::Timeout(_) => "The comparison took too long to load.".to_string(),
        FetchError::Network(_) => "Failed to load comparison".to_string(),
        err => err.to_string(),
    }
}
