use domain::errors::RetrievalError;
use domain::models::{CandidateArticle, ContextSnippet, Query};
use domain::provider::{CorpusProvider, LiveSource, NoLiveSource};
use futures::FutureExt;
use infrastructure::config::Config;
use infrastructure::search::SearchEngine;
use shared::telemetry::Telemetry;
use shared::types::Result;
use shared::utils::truncate_chars;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub top_k: usize,
    /// Content longer than this many characters is cut and marked with `...`.
    pub snippet_chars: Option<usize>,
    /// How many live articles to request; 0 disables the live source.
    pub live_limit: usize,
}

impl ContextOptions {
    pub const LOCAL: Self = Self {
        top_k: 3,
        snippet_chars: None,
        live_limit: 0,
    };

    pub const ENRICHED: Self = Self {
        top_k: 5,
        snippet_chars: Some(300),
        live_limit: 3,
    };

    pub fn with_config_overrides(mut self, config: &Config) -> Self {
        if let Some(top_k) = config.top_k {
            self.top_k = top_k;
        }
        if let Some(chars) = config.snippet_chars {
            self.snippet_chars = Some(chars);
        }
        if self.live_limit > 0 {
            self.live_limit = config.wiki_limit;
        }
        self
    }
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self::LOCAL
    }
}

/// Picks the reference snippets injected into AI prompts.
///
/// [`fetch_context`](Self::fetch_context) never fails and never returns an
/// empty list: an empty pool yields a "no context" sentinel, any pipeline
/// failure an "error loading context" sentinel.
pub struct ContextService<C, L = NoLiveSource> {
    corpus: C,
    live: L,
    options: ContextOptions,
}

impl<C: CorpusProvider> ContextService<C, NoLiveSource> {
    pub fn local(corpus: C) -> Self {
        Self::new(corpus, NoLiveSource, ContextOptions::LOCAL)
    }
}

impl<C: CorpusProvider, L: LiveSource> ContextService<C, L> {
    pub fn new(corpus: C, live: L, options: ContextOptions) -> Self {
        Self {
            corpus,
            live,
            options,
        }
    }

    pub async fn fetch_context(&self, query: &Query) -> Vec<ContextSnippet> {
        let telemetry = Telemetry::new();
        let outcome = AssertUnwindSafe(self.try_fetch_context(query))
            .catch_unwind()
            .await;

        let snippets = match outcome {
            Ok(Ok(snippets)) => snippets,
            Ok(Err(err)) => {
                error!("RAG fetch failed: {err}");
                vec![ContextSnippet::load_error()]
            }
            Err(payload) => {
                error!("RAG fetch failed: {}", panic_error(payload.as_ref()));
                vec![ContextSnippet::load_error()]
            }
        };
        debug!(
            "Context for {:?}: {} snippet(s) in {}ms",
            query.title,
            snippets.len(),
            telemetry.elapsed_ms()
        );
        snippets
    }

    async fn try_fetch_context(&self, query: &Query) -> Result<Vec<ContextSnippet>, RetrievalError> {
        let pool = self.assemble_pool(query).await?;
        let ranked = SearchEngine::rank(query, &pool, self.options.top_k);
        if ranked.is_empty() {
            info!("No context candidates for {:?}", query.title);
            return Ok(vec![ContextSnippet::no_context()]);
        }
        Ok(ranked
            .into_iter()
            .map(|(similarity, article)| self.to_snippet(similarity, article))
            .collect())
    }

    /// Live candidates first, then the local corpus. A failing live source
    /// only costs its own candidates; a failing corpus aborts the call.
    async fn assemble_pool(&self, query: &Query) -> Result<Vec<CandidateArticle>, RetrievalError> {
        let live = async {
            if self.options.live_limit == 0 {
                return Ok(Vec::new());
            }
            self.live.fetch_live(&query.title, self.options.live_limit).await
        };
        let (live, local) = tokio::join!(live, self.corpus.load());

        let mut pool = live.unwrap_or_else(|err| {
            warn!("Live context unavailable, using local corpus only: {err}");
            Vec::new()
        });
        pool.extend(local?);
        debug!("Candidate pool holds {} article(s)", pool.len());
        Ok(pool)
    }

    fn to_snippet(&self, similarity: f64, article: &CandidateArticle) -> ContextSnippet {
        ContextSnippet {
            snippet: format_snippet(article, self.options.snippet_chars),
            link: article.link().to_string(),
            similarity: Some(similarity),
        }
    }
}

fn panic_error(payload: &(dyn Any + Send)) -> RetrievalError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    RetrievalError::Pipeline(format!("panicked: {message}"))
}

pub fn format_snippet(article: &CandidateArticle, budget: Option<usize>) -> String {
    let content = match budget {
        Some(max_chars) => truncate_chars(&article.content, max_chars),
        None => article.content.clone(),
    };
    format!("{}: {}", article.title, content)
}
