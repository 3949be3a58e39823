use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{FetchError, SearchError};
use crate::models::{LanguageSet, RawHit, SearchResponse};

/// Where search hits and language breakdowns come from.
///
/// The controller and the detail view only talk to this trait, so the
/// network can be swapped for a fake in tests.
pub trait RepoSource: Send + Sync + 'static {
    /// Search repositories by keyword. Must resolve to
    /// [`SearchError::Cancelled`] once `cancel` fires.
    fn search<'a>(
        &'a self,
        query: &'a str,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<RawHit>, SearchError>>;

    /// Fetch the language names behind a hit's `languages_url`.
    fn fetch_languages<'a>(
        &'a self,
        languages_url: &'a str,
    ) -> BoxFuture<'a, Result<LanguageSet, FetchError>>;
}

#[derive(Clone)]
pub struct GitHubSearcher {
    client: Client,
    token: String,
    search_url: String,
    per_page: u32,
}

impl GitHubSearcher {
    /// Create a new GitHubSearcher instance
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        // GitHub rejects requests without a User-Agent
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Use an already configured HTTP client.
    pub fn with_client(client: Client, config: &Config) -> Self {
        GitHubSearcher {
            client,
            token: config.token.clone(),
            search_url: config.search_url.clone(),
            per_page: config.per_page,
        }
    }

    /// Search repositories, abandoning the request as soon as `cancel` fires.
    pub async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<RawHit>, SearchError> {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Search for '{}' cancelled in flight", query);
                Err(SearchError::Cancelled)
            }
            result = self.search_page(query) => result.map_err(|e| {
                error!("Error fetching repos for '{}': {}", query, e);
                SearchError::from(e)
            }),
        }
    }

    /// Fetch the first page of results for a query
    async fn search_page(&self, query: &str) -> Result<Vec<RawHit>, FetchError> {
        debug!("Requesting {} q={} per_page={}", self.search_url, query, self.per_page);
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query.to_string()), ("per_page", self.per_page.to_string())])
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("token {}", self.token))
            .send()
            .await?;

        let body = Self::success_body(response).await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        debug!("Received {} results for '{}'", parsed.items.len(), query);
        Ok(parsed.items)
    }

    /// Fetch the languages of one repository. The endpoint is public, so no
    /// credential is attached.
    pub async fn fetch_languages(&self, languages_url: &str) -> Result<LanguageSet, FetchError> {
        debug!("Requesting URL: {}", languages_url);
        let response = self
            .client
            .get(languages_url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let body = Self::success_body(response).await?;
        let map: Map<String, Value> = serde_json::from_str(&body)?;
        Ok(LanguageSet::from(map))
    }

    async fn success_body(response: Response) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: response.url().to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

impl RepoSource for GitHubSearcher {
    fn search<'a>(
        &'a self,
        query: &'a str,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<RawHit>, SearchError>> {
        GitHubSearcher::search(self, query, cancel).boxed()
    }

    fn fetch_languages<'a>(
        &'a self,
        languages_url: &'a str,
    ) -> BoxFuture<'a, Result<LanguageSet, FetchError>> {
        GitHubSearcher::fetch_languages(self, languages_url).boxed()
    }
}
