use application::agent_service::AgentService;
use application::context_service::{ContextOptions, ContextService};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use domain::models::{ContextSnippet, Query};
use domain::quiz::Quiz;
use infrastructure::config::Config;
use infrastructure::corpus::JsonFileCorpus;
use infrastructure::ollama_client::OllamaClient;
use infrastructure::wikipedia::WikipediaClient;
use shared::prompt::ask_text;
use shared::types::Result;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "newsctx")]
#[command(about = "Context retrieval and AI helpers for news articles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank reference snippets for an article
    Context {
        #[command(flatten)]
        article: ArticleArgs,

        /// Print snippets as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize an article
    Summarize {
        #[command(flatten)]
        article: ArticleArgs,

        /// 100-150 word summary instead of 2-3 sentences
        #[arg(long)]
        detailed: bool,
    },
    /// Score an article's credibility against retrieved context
    Credibility {
        #[command(flatten)]
        article: ArticleArgs,
    },
    /// Reconsider a credibility assessment given reader feedback
    Feedback {
        #[command(flatten)]
        article: ArticleArgs,

        /// The reader's feedback
        #[arg(long)]
        feedback: String,
    },
    /// Generate a five-question multiple-choice quiz
    Quiz {
        /// Summary text, or a free-form topic with --from-prompt
        text: Option<String>,

        /// Treat the text as a user prompt and ground the quiz with retrieved context
        #[arg(long)]
        from_prompt: bool,

        /// Print the quiz as JSON
        #[arg(long)]
        json: bool,

        /// Also search Wikipedia for context
        #[arg(long)]
        live: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ArticleArgs {
    /// Article title (asked for interactively when omitted)
    pub title: Option<String>,

    /// Article body
    #[arg(long, default_value = "")]
    pub content: String,

    /// Publisher or source name
    #[arg(long)]
    pub source: Option<String>,

    /// Also search Wikipedia for context
    #[arg(long)]
    pub live: bool,
}

impl ArticleArgs {
    fn into_query(self) -> Result<Query> {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => ask_text("Article title", false)?,
        };
        let mut query = Query::new(title, self.content);
        if let Some(source) = self.source {
            query = query.with_source(source.as_str());
        }
        Ok(query)
    }
}

type Agents = AgentService<OllamaClient, JsonFileCorpus, WikipediaClient>;

pub struct CliApp {
    config: Config,
}

impl CliApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn context_service(&self, live: bool) -> Result<ContextService<JsonFileCorpus, WikipediaClient>> {
        let variant = if live {
            ContextOptions::ENRICHED
        } else {
            ContextOptions::LOCAL
        };
        Ok(ContextService::new(
            JsonFileCorpus::new(&self.config.context_file),
            WikipediaClient::from_config(&self.config)?,
            variant.with_config_overrides(&self.config),
        ))
    }

    fn agents(&self, live: bool) -> Result<Agents> {
        Ok(AgentService::new(
            OllamaClient::from_config(&self.config),
            self.context_service(live)?,
        ))
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            Command::Context { article, json } => self.handle_context(article, json).await,
            Command::Summarize { article, detailed } => self.handle_summarize(article, detailed).await,
            Command::Credibility { article } => self.handle_credibility(article).await,
            Command::Feedback { article, feedback } => self.handle_feedback(article, &feedback).await,
            Command::Quiz {
                text,
                from_prompt,
                json,
                live,
            } => self.handle_quiz(text, from_prompt, json, live).await,
        }
    }

    async fn handle_context(&self, article: ArticleArgs, json: bool) -> Result<()> {
        let service = self.context_service(article.live)?;
        let query = article.into_query()?;
        let snippets = service.fetch_context(&query).await;
        if json {
            println!("{}", serde_json::to_string_pretty(&snippets)?);
        } else {
            print_snippets(&snippets);
        }
        Ok(())
    }

    async fn handle_summarize(&self, article: ArticleArgs, detailed: bool) -> Result<()> {
        let agents = self.agents(false)?;
        let query = article.into_query()?;
        let text = article_text(&query);
        info!("Summarizing {:?}", query.title);
        let summary = if detailed {
            agents.detailed_summary(&text).await?
        } else {
            agents.summarize(&text).await?
        };
        println!("{}\n{}", "Summary:".green().bold(), summary);
        Ok(())
    }

    async fn handle_credibility(&self, article: ArticleArgs) -> Result<()> {
        let agents = self.agents(article.live)?;
        let query = article.into_query()?;
        let assessment = agents.check_credibility(&query).await?;
        println!("{}\n{}", "Credibility:".green().bold(), assessment);
        Ok(())
    }

    async fn handle_feedback(&self, article: ArticleArgs, feedback: &str) -> Result<()> {
        let agents = self.agents(false)?;
        let query = article.into_query()?;
        let suggestion = agents.process_feedback(&article_text(&query), feedback).await?;
        println!("{}\n{}", "Suggestion:".green().bold(), suggestion);
        Ok(())
    }

    async fn handle_quiz(&self, text: Option<String>, from_prompt: bool, json: bool, live: bool) -> Result<()> {
        let agents = self.agents(live)?;
        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => ask_text("Quiz topic or summary", false)?,
        };
        let quiz = if from_prompt {
            agents.generate_prompt_quiz(&text).await?
        } else {
            agents.generate_quiz(&text).await?
        };
        if json {
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        } else {
            print_quiz(&quiz);
        }
        Ok(())
    }
}

fn article_text(query: &Query) -> String {
    if query.content.trim().is_empty() {
        query.title.clone()
    } else {
        format!("{}\n\n{}", query.title, query.content)
    }
}

fn has_context(snippets: &[ContextSnippet]) -> bool {
    !snippets.iter().all(ContextSnippet::is_sentinel)
}

fn print_snippets(snippets: &[ContextSnippet]) {
    if !has_context(snippets) {
        for snippet in snippets {
            println!("{}", snippet.snippet.yellow());
        }
        return;
    }
    for (i, snippet) in snippets.iter().enumerate() {
        let score = snippet
            .similarity
            .map(|s| format!("{s:.3}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} {} {}",
            format!("[{}]", i + 1).blue(),
            format!("({score})").dimmed(),
            snippet.snippet
        );
        println!("    {} {}", "Source:".green(), snippet.link.yellow());
    }
}

fn print_quiz(quiz: &Quiz) {
    const LABELS: [char; 4] = ['A', 'B', 'C', 'D'];
    for (i, question) in quiz.questions.iter().enumerate() {
        println!("\n{} {}", format!("{}.", i + 1).green().bold(), question.question);
        for (label, option) in LABELS.iter().zip(&question.options) {
            println!("   {label}) {option}");
        }
        if let Some(answer) = LABELS.get(question.correct_answer) {
            println!("   {} {}", "Answer:".dimmed(), answer.to_string().dimmed());
        }
    }
}
