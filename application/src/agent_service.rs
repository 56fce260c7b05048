use crate::context_service::ContextService;
use crate::prompts;
use domain::models::{ArticleSource, Query};
use domain::provider::{CompletionModel, CorpusProvider, LiveSource};
use domain::quiz::{Quiz, QuizQuestion, QUIZ_QUESTION_COUNT};
use shared::types::Result;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKind {
    Article,
    Prompt,
}

pub struct AgentService<M, C, L> {
    model: M,
    context: ContextService<C, L>,
}

impl<M, C, L> AgentService<M, C, L>
where
    M: CompletionModel,
    C: CorpusProvider,
    L: LiveSource,
{
    pub fn new(model: M, context: ContextService<C, L>) -> Self {
        Self { model, context }
    }

    pub async fn summarize(&self, article: &str) -> Result<String> {
        self.model.complete(&prompts::summary(article)).await
    }

    pub async fn detailed_summary(&self, article: &str) -> Result<String> {
        self.model.complete(&prompts::detailed_summary(article)).await
    }

    pub async fn check_credibility(&self, query: &Query) -> Result<String> {
        let context = self.context.fetch_context(query).await;
        let prompt = prompts::credibility(
            &query.title,
            &query.content,
            query.source.as_ref(),
            &context,
        );
        self.model.complete(&prompt).await
    }

    pub async fn process_feedback(&self, article: &str, feedback: &str) -> Result<String> {
        self.model.complete(&prompts::feedback(article, feedback)).await
    }

    pub async fn generate_quiz(&self, detailed_summary: &str) -> Result<Quiz> {
        let response = self.model.complete(&prompts::quiz(detailed_summary)).await?;
        Ok(parse_quiz(&response, QuizKind::Article, "the article"))
    }

    pub async fn generate_prompt_quiz(&self, user_prompt: &str) -> Result<Quiz> {
        let query = Query::new(user_prompt, user_prompt).with_source(ArticleSource::from("User Prompt"));
        let context = self.context.fetch_context(&query).await;
        let response = self
            .model
            .complete(&prompts::prompt_quiz(user_prompt, &context))
            .await?;
        Ok(parse_quiz(&response, QuizKind::Prompt, user_prompt))
    }
}

/// Reads a quiz out of model output that may wrap the JSON in prose.
///
/// Unparseable output, or a question count other than five, yields
/// [`default_quiz`]. Individual malformed questions are replaced with a
/// placeholder about `topic`.
pub fn parse_quiz(response: &str, kind: QuizKind, topic: &str) -> Quiz {
    let parsed = extract_json_object(response)
        .and_then(|json| serde_json::from_str::<serde_json::Value>(json).ok())
        .and_then(|value| value.get("questions").and_then(|q| q.as_array()).cloned());

    let Some(questions) = parsed.filter(|questions| questions.len() == QUIZ_QUESTION_COUNT) else {
        warn!("Model returned an invalid quiz, using the default quiz");
        return default_quiz(kind);
    };

    let questions = questions
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            serde_json::from_value::<QuizQuestion>(raw)
                .ok()
                .filter(QuizQuestion::is_well_formed)
                .unwrap_or_else(|| {
                    info!("Replacing malformed quiz question {idx}");
                    QuizQuestion::new(format!("Question {} about {topic}", idx + 1), 0)
                })
        })
        .collect();
    Quiz { questions }
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

pub fn default_quiz(kind: QuizKind) -> Quiz {
    let questions: [&str; QUIZ_QUESTION_COUNT] = match kind {
        QuizKind::Article => [
            "What is the main topic of the article?",
            "According to the article, what is the most important point?",
            "What conclusion does the article draw?",
            "What evidence does the article provide?",
            "What is the author's perspective on the topic?",
        ],
        QuizKind::Prompt => [
            "What is the main topic of the prompt?",
            "According to the context, what is the most important point?",
            "What conclusion can be drawn from the information?",
            "What evidence is provided in the context?",
            "What is the perspective on the topic in the context?",
        ],
    };
    Quiz {
        questions: questions
            .into_iter()
            .enumerate()
            .map(|(idx, question)| QuizQuestion::new(question, idx % 4))
            .collect(),
    }
}
