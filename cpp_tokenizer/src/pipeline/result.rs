use crate::file_processor::FileMetadata;
use crate::normalizer::TokenizationMetrics;
use crate::tokens::TokenStream;
use std::time::Duration;

/// One file's token stream together with how it was produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub stream: TokenStream,
    pub file_metadata: Option<FileMetadata>,
    pub metrics: TokenizationMetrics,
    pub parse_duration: Duration,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn token_count(&self) -> usize {
        self.stream.len()
    }

    pub fn log_success(&self, file_path: &str) {
        let seconds = self.processing_duration.as_secs_f64();
        crate::log_success!(
            crate::logging::codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "File tokenized",
            "file" => file_path,
            "tokens" => self.token_count(),
            "parse_ms" => format!("{:.2}", self.parse_duration.as_secs_f64() * 1000.0),
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "tokens_per_sec" => format!("{:.0}", self.token_count() as f64 / seconds.max(f64::EPSILON))
        );
    }
}
