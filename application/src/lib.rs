pub mod agent_service;
pub mod context_service;
pub mod prompts;

pub use agent_service::{AgentService, QuizKind};
pub use context_service::{ContextOptions, ContextService};
