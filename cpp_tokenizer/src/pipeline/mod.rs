//! File to token stream: load, parse, normalize

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use crate::file_processor::{self, FileProcessor};
use crate::logging;
use crate::normalizer::Tokenizer;
use crate::syntax::{self, CppTreeSitterProvider};
use crate::tokens::TokenStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

/// The per-file stages with their configuration. Cheap to clone, so batch
/// workers each take their own copy.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    processor: FileProcessor,
    provider: CppTreeSitterProvider,
    tokenizer: Tokenizer,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            processor: file_processor::create_processor(),
            provider: CppTreeSitterProvider::new(),
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_processor(mut self, processor: FileProcessor) -> Self {
        self.processor = processor;
        self
    }

    /// Share a cancellation flag with the tokenizer, so that a file in
    /// progress stops once another worker has failed
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.tokenizer = self.tokenizer.with_cancel_flag(flag);
        self
    }

    /// Load and tokenize one file, attributing log events to it
    pub fn process_file(&self, file_path: &Path, file_id: usize) -> Result<PipelineResult, PipelineError> {
        let start_time = Instant::now();
        let file_label = file_path.display().to_string();

        logging::with_file_context(PathBuf::from(file_path), file_id, || {
            crate::log_info!("Tokenizing file", "file" => file_label);

            let loaded = self.processor.process_file(file_path)?;
            let mut result = self.run(&file_label, &loaded.source)?;

            result.file_metadata = Some(loaded.metadata);
            result.processing_duration = start_time.elapsed();
            result.log_success(&file_label);
            Ok(result)
        })
    }

    /// Tokenize in-memory source under the identifier `file_name`
    pub fn tokenize_source(&self, file_name: &str, source: &str) -> Result<PipelineResult, PipelineError> {
        let start_time = Instant::now();
        let mut result = self.run(file_name, source)?;
        result.processing_duration = start_time.elapsed();
        Ok(result)
    }

    fn run(&self, file_name: &str, source: &str) -> Result<PipelineResult, PipelineError> {
        let parse_start = Instant::now();
        let tree = syntax::parse_with(&self.provider, file_name, source)?;
        let parse_duration = parse_start.elapsed();

        let output = self.tokenizer.tokenize(&tree)?;

        Ok(PipelineResult {
            stream: output.stream,
            file_metadata: None,
            metrics: output.metrics,
            parse_duration,
            processing_duration: parse_duration,
        })
    }
}

/// Tokenize a file with default settings
pub fn process_file<P: AsRef<Path>>(file_path: P) -> Result<PipelineResult, PipelineError> {
    Pipeline::new().process_file(file_path.as_ref(), 0)
}

/// Tokenize source text with default settings
pub fn tokenize_source(file_name: &str, source: &str) -> Result<TokenStream, PipelineError> {
    Pipeline::new()
        .tokenize_source(file_name, source)
        .map(|result| result.stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxError;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_process_file_end_to_end() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("content.cpp");
        fs::write(&file_path, "int x = square(2);\n").unwrap();

        let result = process_file(&file_path).unwrap();
        assert_eq!(
            result.stream.kinds(),
            vec![
                TokenKind::Vardef,
                TokenKind::Assign,
                TokenKind::Apply,
                TokenKind::FileEnd
            ]
        );
        assert_eq!(result.file_metadata.unwrap().line_count, 1);
        assert_eq!(
            &*result.stream.tokens()[0].position.file,
            file_path.display().to_string()
        );
    }

    #[test]
    fn test_syntax_error_fails_the_file() {
        let err = tokenize_source("broken.cpp", "void f() { int = ; }").unwrap_err();
        assert!(err.is_parse_failure());
        assert_matches!(
            err,
            PipelineError::SyntaxAnalysis(SyntaxError::ParseFailure { ref file, .. }) if file == "broken.cpp"
        );
    }

    #[test]
    fn test_missing_file() {
        assert_matches!(
            process_file("no/such/file.cpp"),
            Err(PipelineError::FileProcessing(_))
        );
    }

    #[test]
    fn test_error_codes_come_from_stages() {
        let err = PipelineError::pipeline_error("boom");
        assert_eq!(err.error_code(), crate::logging::codes::system::INTERNAL_ERROR);

        let err = tokenize_source("broken.cpp", "class {").unwrap_err();
        assert_eq!(err.error_code().as_str().chars().next(), Some('E'));
    }
}
