use domain::models::{ArticleSource, ContextSnippet};

pub fn summary(article: &str) -> String {
    format!(
        "You are a helpful assistant. Summarize the following news article in 2-3 sentences:\n\
         ---\n{article}\n---\nSummary:"
    )
}

pub fn detailed_summary(article: &str) -> String {
    format!(
        "You are a helpful assistant. Generate a detailed summary of the following news article \
         in 100-150 words, focusing on key points, context, and important details:\n\
         ---\n{article}\n---\nDetailed Summary:"
    )
}

pub fn credibility(
    title: &str,
    content: &str,
    source: Option<&ArticleSource>,
    context: &[ContextSnippet],
) -> String {
    let source = source.map(ArticleSource::display_name).unwrap_or("Unknown");
    format!(
        "You are a fact-checking assistant.\n\
         Analyze the credibility of the following news article.\n\
         Consider the source, language, bias, and sensationalism, and compare its claims \
         with the reference context.\n\n\
         Title: {title}\nSource: {source}\nContent: {content}\n\n\
         Reference Context:\n{context}\n\n\
         Respond with:\n\
         - Credibility Score (0-10)\n\
         - Reasoning (2-3 sentences)",
        context = context_block(context),
    )
}

pub fn feedback(article: &str, user_feedback: &str) -> String {
    format!(
        "You are an assistant improving a credibility system.\n\
         A user provided feedback on the following article.\n\n\
         Article: {article}\nFeedback: {user_feedback}\n\n\
         Suggest an update or a reason to reconsider the credibility score."
    )
}

const QUIZ_FORMAT: &str = r#"Each question should have 4 options (A, B, C, D) with only one correct answer.
Format the response as a JSON object with the following structure:
{
  "questions": [
    {
      "question": "Question text here",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": 0 (index of the correct option, 0-3)
    },
    ...
  ]
}"#;

pub fn quiz(detailed_summary: &str) -> String {
    format!(
        "You are a helpful assistant. Generate a quiz with 5 multiple-choice questions based on \
         the following detailed summary.\n{QUIZ_FORMAT}\n\nDetailed Summary:\n{detailed_summary}\n"
    )
}

pub fn prompt_quiz(user_prompt: &str, context: &[ContextSnippet]) -> String {
    format!(
        "You are a helpful educational assistant. Generate a quiz with 5 multiple-choice \
         questions based on the following user prompt and context.\n{QUIZ_FORMAT}\n\n\
         User Prompt: {user_prompt}\n\nRelevant Context:\n{context}\n",
        context = context_block(context),
    )
}

pub fn context_block(context: &[ContextSnippet]) -> String {
    context
        .iter()
        .map(ContextSnippet::as_prompt_line)
        .collect::<Vec<_>>()
        .join("\n")
}
