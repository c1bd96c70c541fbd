//! Semantic CV analyzer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;

pub use config::Config;
pub use error::{CvAnalyzerError, Result};
pub use llm::analyzer::{AnalysisEngine, AnalysisResult};
pub use llm::client::{Generate, GeminiClient};
