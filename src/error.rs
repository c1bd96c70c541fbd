//! Error handling for the CV analyzer

use thiserror::Error;

/// Failures produced while turning a document into plain text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The byte stream could not be parsed as a PDF at all.
    #[error("not a valid PDF document: {0}")]
    MalformedDocument(String),

    /// The document parsed fine but carries no machine-readable text,
    /// e.g. a scan made of page images. Expected outcome, not a bug.
    #[error("document contains no extractable text")]
    EmptyContent,
}

/// Failures produced by the generation pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The generation call failed, or its response was not parseable
    /// as a JSON object.
    #[error("analysis failed: {0}")]
    GenerationFailed(String),
}

#[derive(Error, Debug)]
pub enum CvAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("file format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CvAnalyzerError>;
