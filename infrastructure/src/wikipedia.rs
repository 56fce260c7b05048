use crate::config::Config;
use domain::errors::RetrievalError;
use domain::models::CandidateArticle;
use domain::provider::LiveSource;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shared::types::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const WIKIPEDIA_SOURCE: &str = "Wikipedia";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchBody>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    pageid: u64,
}

#[derive(Deserialize)]
struct ExtractResponse {
    query: ExtractBody,
}

#[derive(Deserialize)]
struct ExtractBody {
    pages: HashMap<String, ExtractPage>,
}

#[derive(Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

#[derive(Clone)]
pub struct WikipediaClient {
    client: Arc<Client>,
    api_url: String,
    article_url: String,
    timeout: Duration,
}

impl WikipediaClient {
    pub fn new(
        api_url: impl Into<String>,
        article_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("newsctx/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client: Arc::new(client),
            api_url: api_url.into(),
            article_url: article_url.into(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.wiki_api_url.clone(),
            config.wiki_article_url.clone(),
            config.wiki_timeout,
        )
    }

    pub fn article_link(&self, title: &str) -> String {
        let slug = title.split_whitespace().collect::<Vec<_>>().join("_");
        match Url::parse(&self.article_url) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push(&slug);
                }
                url.to_string()
            }
            Err(_) => format!("{}{}", self.article_url, slug),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, RetrievalError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(params)
            .send()
            .await
            .map_err(|err| RetrievalError::LiveSearch(err.to_string()))?
            .error_for_status()
            .map_err(|err| RetrievalError::LiveSearch(err.to_string()))?;
        response
            .json::<T>()
            .await
            .map_err(|err| RetrievalError::LiveSearch(format!("malformed response: {err}")))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, RetrievalError> {
        let response: SearchResponse = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
                ("origin", "*"),
            ])
            .await?;
        Ok(response.query.map(|body| body.search).unwrap_or_default())
    }

    async fn fetch_extract(&self, pageid: u64) -> Result<CandidateArticle, RetrievalError> {
        let id = pageid.to_string();
        let response: ExtractResponse = self
            .get_json(&[
                ("action", "query"),
                ("pageids", id.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("format", "json"),
                ("origin", "*"),
            ])
            .await?;
        let page = response
            .query
            .pages
            .get(&id)
            .ok_or_else(|| RetrievalError::LiveSearch(format!("page {id} missing from response")))?;
        let extract = page
            .extract
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| RetrievalError::LiveSearch(format!("page {id} has no extract")))?;

        Ok(CandidateArticle::external(
            page.title.clone(),
            extract,
            self.article_link(&page.title),
            WIKIPEDIA_SOURCE,
        ))
    }

    /// Search, then fetch up to `limit` extracts concurrently. A failing
    /// extract is dropped; the rest are returned in search order.
    pub async fn search_articles(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateArticle>, RetrievalError> {
        let hits = self.search(query).await?;
        if hits.is_empty() {
            info!("No Wikipedia articles found for query: {query}");
            return Ok(Vec::new());
        }

        let results = stream::iter(hits.into_iter().take(limit))
            .map(|hit| async move { (hit.pageid, self.fetch_extract(hit.pageid).await) })
            .buffered(limit.max(1))
            .collect::<Vec<_>>()
            .await;

        let articles: Vec<CandidateArticle> = results
            .into_iter()
            .filter_map(|(pageid, result)| match result {
                Ok(article) => Some(article),
                Err(err) => {
                    warn!("Skipping Wikipedia page {pageid}: {err}");
                    None
                }
            })
            .collect();
        debug!("Fetched {} Wikipedia extracts for {query:?}", articles.len());
        Ok(articles)
    }
}

impl LiveSource for WikipediaClient {
    async fn fetch_live(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateArticle>, RetrievalError> {
        if limit == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }
        match tokio::time::timeout(self.timeout, self.search_articles(query, limit)).await {
            Ok(Ok(articles)) => Ok(articles),
            Ok(Err(err)) => {
                warn!("Error fetching Wikipedia content: {err}");
                Ok(Vec::new())
            }
            Err(_) => {
                warn!("Wikipedia lookup timed out after {:?}", self.timeout);
                Ok(Vec::new())
            }
        }
    }
}
