use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CONTEXT_FILE: &str = "data/contextArticle.json";
pub const DEFAULT_WIKI_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_WIKI_ARTICLE_URL: &str = "https://en.wikipedia.org/wiki/";
pub const DEFAULT_WIKI_LIMIT: usize = 3;
pub const DEFAULT_WIKI_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub context_file: PathBuf,
    pub wiki_api_url: String,
    pub wiki_article_url: String,
    pub wiki_limit: usize,
    pub wiki_timeout: Duration,
    /// Overrides the retrieval variant's top-K when set.
    pub top_k: Option<usize>,
    pub snippet_chars: Option<usize>,
    pub ollama_base_url: String,
    pub ollama_model: String,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            context_file: PathBuf::from(string("CONTEXT_FILE", DEFAULT_CONTEXT_FILE)),
            wiki_api_url: string("WIKI_API_URL", DEFAULT_WIKI_API_URL),
            wiki_article_url: string("WIKI_ARTICLE_URL", DEFAULT_WIKI_ARTICLE_URL),
            wiki_limit: parse_or(&lookup, "WIKI_LIMIT", DEFAULT_WIKI_LIMIT),
            wiki_timeout: Duration::from_secs(parse_or(
                &lookup,
                "WIKI_TIMEOUT_SECS",
                DEFAULT_WIKI_TIMEOUT_SECS,
            )),
            top_k: parse_optional(&lookup, "CONTEXT_TOP_K"),
            snippet_chars: parse_optional(&lookup, "SNIPPET_CHARS"),
            ollama_base_url: string("OLLAMA_BASE_URL", "http://localhost:11434"),
            ollama_model: string("OLLAMA_MODEL", "llama3"),
        }
    }
}

fn parse_optional<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {key}={raw:?}");
            None
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    parse_optional(lookup, key).unwrap_or(default)
}
