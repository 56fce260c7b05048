use domain::keywords::{extract_keywords, word_set};
use domain::models::{CandidateArticle, Query};
use rayon::prelude::*;
use std::collections::HashSet;

pub const KEYWORD_WEIGHT: f64 = 0.7;
pub const TEXT_WEIGHT: f64 = 0.3;

pub struct SearchEngine;

impl SearchEngine {
    /// `|a ∩ b| / max(|a|, |b|, 1)`. Dividing by the larger set penalizes a
    /// side that brings many unrelated entries.
    pub fn overlap_ratio(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let shared = small.iter().filter(|item| large.contains(*item)).count();
        shared as f64 / large.len().max(1) as f64
    }

    pub fn similarity(
        query_text: &str,
        query_keywords: &HashSet<String>,
        candidate_text: &str,
        candidate_keywords: &HashSet<String>,
    ) -> f64 {
        Self::score(
            query_keywords,
            &word_set(query_text),
            candidate_keywords,
            &word_set(candidate_text),
        )
    }

    fn score(
        query_keywords: &HashSet<String>,
        query_words: &HashSet<String>,
        candidate_keywords: &HashSet<String>,
        candidate_words: &HashSet<String>,
    ) -> f64 {
        KEYWORD_WEIGHT * Self::overlap_ratio(query_keywords, candidate_keywords)
            + TEXT_WEIGHT * Self::overlap_ratio(query_words, candidate_words)
    }

    /// Sorts descending and keeps the best `top_k`. The sort is stable, so
    /// equal scores keep pool order.
    pub fn rank<'a>(
        query: &Query,
        pool: &'a [CandidateArticle],
        top_k: usize,
    ) -> Vec<(f64, &'a CandidateArticle)> {
        let query_text = query.text();
        let query_keywords = extract_keywords(&query_text);
        let query_words = word_set(&query_text);

        let mut similarities: Vec<(f64, &CandidateArticle)> = pool
            .par_iter()
            .map(|article| {
                let score = Self::score(
                    &query_keywords,
                    &query_words,
                    &article.effective_keywords(),
                    &word_set(&article.scoring_text()),
                );
                (score, article)
            })
            .collect();

        similarities.sort_by(|a, b| b.0.total_cmp(&a.0));
        similarities.truncate(top_k);
        similarities
    }
}
