// Search Provider Service
// Implements the web-search boundary used to gather evidence. The trait
// abstracts the provider so the pipeline can be exercised against a mock;
// the concrete client calls the Tavily search API.

use crate::models::SearchResult;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::warn;

const TAVILY_DEFAULT_URL: &str = "https://api.tavily.com/search";
const API_KEY_ENV: &str = "TAVILY_API_KEY";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("search API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("search API rejected the credentials")]
    AuthFailed,
    #[error("JSON parse error: {0}")]
    JsonError(String),
    #[error("API key not configured (set {API_KEY_ENV})")]
    MissingApiKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDepth {
    Basic,
    Advanced,
}

impl SearchDepth {
    fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

/// Boundary trait for executing one search query. Implemented by the
/// Tavily client in production and by in-memory mocks in tests.
#[allow(async_fn_in_trait)]
pub trait SearchProvider {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        include_raw_content: bool,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_raw_content: bool,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Option<Vec<TavilyResult>>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: Option<String>,
    url: String,
    content: Option<String>,
    raw_content: Option<String>,
    published_date: Option<String>,
}

/// Providers report dates in mixed formats; anything unparseable becomes
/// an absent date rather than an error.
fn parse_published_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

pub struct TavilyClient {
    client: Client,
    url: String,
    api_key: String,
}

impl TavilyClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        let url = env::var("TAVILY_API_URL").unwrap_or_else(|_| TAVILY_DEFAULT_URL.to_string());

        Self {
            client,
            url,
            api_key,
        }
    }

    pub fn from_env() -> Result<Self, SearchError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| SearchError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey);
        }
        Ok(Self::new(api_key))
    }
}

impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
        include_raw_content: bool,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: depth.as_str(),
            include_raw_content,
            max_results,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SearchError::AuthFailed);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::JsonError(e.to_string()))?;

        let results = body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|r| {
                let published_date = r.published_date.as_deref().and_then(|raw| {
                    let parsed = parse_published_date(raw);
                    if parsed.is_none() {
                        warn!("[search] unparseable published_date: {}", raw);
                    }
                    parsed
                });
                SearchResult {
                    title: r.title.unwrap_or_default(),
                    url: r.url,
                    content: r.content.unwrap_or_default(),
                    raw_content: r.raw_content,
                    published_date,
                }
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_rfc3339_date() {
        let parsed = parse_published_date("2024-06-15T10:30:00Z").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 6);
        assert_eq!(parsed.day(), 15);
    }

    #[test]
    fn test_parse_plain_date() {
        let parsed = parse_published_date("2023-01-09").unwrap();
        assert_eq!(parsed.year(), 2023);
        assert_eq!(parsed.month(), 1);
    }

    #[test]
    fn test_unparseable_date_is_none() {
        assert!(parse_published_date("last Tuesday").is_none());
        assert!(parse_published_date("").is_none());
    }

    #[test]
    fn test_depth_strings() {
        assert_eq!(SearchDepth::Basic.as_str(), "basic");
        assert_eq!(SearchDepth::Advanced.as_str(), "advanced");
    }
}
