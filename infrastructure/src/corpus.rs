use domain::errors::RetrievalError;
use domain::models::CandidateArticle;
use domain::provider::CorpusProvider;
use shared::types::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Corpus backed by a JSON array on disk, re-read on every call.
#[derive(Debug, Clone)]
pub struct JsonFileCorpus {
    path: PathBuf,
}

impl JsonFileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read_articles(&self) -> Result<Vec<CandidateArticle>, RetrievalError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| self.read_error(err.to_string()))?;
        parse_corpus(&raw).map_err(|err| self.read_error(err.to_string()))
    }

    fn read_error(&self, reason: String) -> RetrievalError {
        RetrievalError::CorpusRead {
            path: self.path.display().to_string(),
            reason,
        }
    }
}

impl CorpusProvider for JsonFileCorpus {
    async fn load(&self) -> Result<Vec<CandidateArticle>, RetrievalError> {
        match self.read_articles().await {
            Ok(articles) => {
                debug!("Loaded {} corpus articles from {}", articles.len(), self.path.display());
                Ok(articles)
            }
            Err(err) => {
                warn!("{err}; continuing with an empty local corpus");
                Ok(Vec::new())
            }
        }
    }
}

/// Parses a corpus document. A record without string `title`/`content` is
/// skipped; a document that is not a JSON array is an error.
pub fn parse_corpus(raw: &str) -> Result<Vec<CandidateArticle>, serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = records.len();
    let articles: Vec<CandidateArticle> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match serde_json::from_value::<CandidateArticle>(record) {
            Ok(article) => Some(article.normalized()),
            Err(err) => {
                warn!("Skipping corpus record {idx}: {err}");
                None
            }
        })
        .collect();
    if articles.len() < total {
        debug!("Kept {} of {} corpus records", articles.len(), total);
    }
    Ok(articles)
}

#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    articles: Vec<CandidateArticle>,
}

impl StaticCorpus {
    pub fn new(articles: Vec<CandidateArticle>) -> Self {
        Self { articles }
    }
}

impl CorpusProvider for StaticCorpus {
    async fn load(&self) -> Result<Vec<CandidateArticle>, RetrievalError> {
        Ok(self.articles.clone())
    }
}
