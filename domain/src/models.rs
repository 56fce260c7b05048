use crate::keywords::{extract_keywords, KeywordSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const LOCAL_CONTEXT_LINK: &str = "Local context";
pub const NO_LINK: &str = "N/A";
pub const NO_CONTEXT_SNIPPET: &str = "No relevant context found in local data.";
pub const LOAD_ERROR_SNIPPET: &str = "Error loading context data.";

/// Attribution attached to an article or query. News APIs send an object
/// (`{"id": .., "name": ..}`), hand-written fixtures usually a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleSource {
    Label(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        url: Option<String>,
    },
}

impl ArticleSource {
    pub fn display_name(&self) -> &str {
        match self {
            ArticleSource::Label(label) => label,
            ArticleSource::Detailed { name, .. } => name.as_deref().unwrap_or("Unknown"),
        }
    }
}

impl From<&str> for ArticleSource {
    fn from(label: &str) -> Self {
        ArticleSource::Label(label.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub source: Option<ArticleSource>,
}

impl Query {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<ArticleSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Lowercased `title + " " + content`, the text every candidate is scored against.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Provenance {
    #[default]
    Local,
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateArticle {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ArticleSource>,
    #[serde(skip)]
    pub provenance: Provenance,
}

type LinkAccessor = fn(&CandidateArticle) -> Option<&str>;

/// Attribution lookup order, first non-empty hit wins.
const LINK_FALLBACKS: [LinkAccessor; 4] = [
    link_from_url,
    link_from_source_name,
    link_from_source_label,
    link_from_provenance,
];

fn link_from_url(article: &CandidateArticle) -> Option<&str> {
    article.url.as_deref()
}

fn link_from_source_name(article: &CandidateArticle) -> Option<&str> {
    match &article.source {
        Some(ArticleSource::Detailed { name, .. }) => name.as_deref(),
        _ => None,
    }
}

fn link_from_source_label(article: &CandidateArticle) -> Option<&str> {
    match &article.source {
        Some(ArticleSource::Label(label)) => Some(label.as_str()),
        _ => None,
    }
}

fn link_from_provenance(article: &CandidateArticle) -> Option<&str> {
    (article.provenance == Provenance::Local).then_some(LOCAL_CONTEXT_LINK)
}

impl CandidateArticle {
    pub fn local(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            keywords: None,
            url: None,
            source: None,
            provenance: Provenance::Local,
        }
    }

    pub fn external(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        source: &str,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            keywords: None,
            url: Some(url.into()),
            source: Some(ArticleSource::from(source)),
            provenance: Provenance::External,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = Some(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        );
        self
    }

    pub fn with_source(mut self, source: impl Into<ArticleSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Lowercases precomputed keywords so they compare against extracted ones.
    pub fn normalized(mut self) -> Self {
        if let Some(keywords) = self.keywords.take() {
            self.keywords = Some(keywords.into_iter().map(|k| k.to_lowercase()).collect());
        }
        self
    }

    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    pub fn effective_keywords(&self) -> Cow<'_, KeywordSet> {
        match &self.keywords {
            Some(keywords) => Cow::Borrowed(keywords),
            None => Cow::Owned(extract_keywords(&self.content)),
        }
    }

    pub fn link(&self) -> &str {
        LINK_FALLBACKS
            .iter()
            .filter_map(|accessor| accessor(self))
            .find(|link| !link.trim().is_empty())
            .unwrap_or(NO_LINK)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnippet {
    pub snippet: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl ContextSnippet {
    pub fn no_context() -> Self {
        Self {
            snippet: NO_CONTEXT_SNIPPET.to_string(),
            link: NO_LINK.to_string(),
            similarity: None,
        }
    }

    pub fn load_error() -> Self {
        Self {
            snippet: LOAD_ERROR_SNIPPET.to_string(),
            link: NO_LINK.to_string(),
            similarity: None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.similarity.is_none() && self.link == NO_LINK
    }

    pub fn as_prompt_line(&self) -> String {
        format!("- {} (Source: {})", self.snippet, self.link)
    }
}
