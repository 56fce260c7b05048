use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to read corpus at {path}: {reason}")]
    CorpusRead { path: String, reason: String },

    #[error("live search failed: {0}")]
    LiveSearch(String),

    #[error("context pipeline failed: {0}")]
    Pipeline(String),
}
