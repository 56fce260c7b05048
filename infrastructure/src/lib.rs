pub mod config;
pub mod corpus;
pub mod ollama_client;
pub mod search;
pub mod wikipedia;
