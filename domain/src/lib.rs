pub mod errors;
pub mod keywords;
pub mod models;
pub mod provider;
pub mod quiz;

pub use errors::RetrievalError;
pub use keywords::{extract_keywords, KeywordSet};
pub use models::{ArticleSource, CandidateArticle, ContextSnippet, Provenance, Query};
pub use provider::{CompletionModel, CorpusProvider, LiveSource, NoLiveSource};
pub use quiz::{Quiz, QuizQuestion};
