use crate::errors::RetrievalError;
use crate::models::CandidateArticle;
use shared::types::Result;
use std::future::Future;

// Implementations re-read their backing store on every call.
pub trait CorpusProvider: Send + Sync {
    fn load(&self) -> impl Future<Output = Result<Vec<CandidateArticle>, RetrievalError>> + Send;
}

pub trait LiveSource: Send + Sync {
    fn fetch_live(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<CandidateArticle>, RetrievalError>> + Send;
}

/// Local-only retrieval: never contributes candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLiveSource;

impl LiveSource for NoLiveSource {
    async fn fetch_live(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<CandidateArticle>, RetrievalError> {
        Ok(Vec::new())
    }
}

pub trait CompletionModel: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}
