use thiserror::Error;

/// Result type for corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Errors that can occur while loading papers or keyword customizations
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Keyword customization table is not a valid partial function
    #[error("Invalid keyword customization:\n{}", .0.join("\n"))]
    InvalidKeywordCustomization(Vec<String>),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl CorpusError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
