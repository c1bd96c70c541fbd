//! LLM integration: prompt construction, generation client, analysis engine

pub mod analyzer;
pub mod client;
pub mod prompts;
