use crate::file_processor::FileProcessorError;
use crate::logging::{codes, Code};
use crate::normalizer::TokenizerError;
use crate::syntax::SyntaxError;

/// Any failure while turning one file into a token stream
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Syntax analysis failed: {0}")]
    SyntaxAnalysis(#[from] SyntaxError),

    #[error("Tokenization failed: {0}")]
    Tokenization(#[from] TokenizerError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::FileProcessing(e) => e.error_code(),
            Self::SyntaxAnalysis(e) => e.error_code(),
            Self::Tokenization(e) => e.error_code(),
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// The submitted file itself is malformed
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::SyntaxAnalysis(SyntaxError::ParseFailure { .. }))
    }
}
