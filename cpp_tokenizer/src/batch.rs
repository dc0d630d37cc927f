//! Batch tokenization of a submission directory
//!
//! A submission is every C/C++ file under a directory, discovered in sorted
//! path order. Files are tokenized sequentially or on worker threads; either
//! way the per-file results come back in discovery order, so the concatenated
//! submission stream is identical for both modes.

use crate::config::compile_time::batch_processing::{
    MAX_CHUNK_SIZE, MAX_FILES_PER_BATCH, MAX_WORKER_THREADS,
};
use crate::file_processor::has_cpp_extension;
use crate::logging::{codes, Code};
use crate::normalizer::TokenizerError;
use crate::pipeline::{Pipeline, PipelineError, PipelineResult};
use crate::tokens::TokenStream;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    /// Defaults to the compiled-in `MAX_FILES_PER_BATCH`
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(1),
            recursive: true,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    pub fn sequential() -> Self {
        Self {
            max_threads: 1,
            ..Self::default()
        }
    }

    fn file_limit(&self) -> usize {
        self.max_files.unwrap_or(MAX_FILES_PER_BATCH)
    }
}

/// Per-file outcomes of a batch run, each list in discovery order
#[derive(Debug)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub started_at: DateTime<Utc>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            successful_files: Vec::new(),
            failed_files: Vec::new(),
            started_at: Utc::now(),
            processing_duration: Duration::new(0, 0),
            files_processed: 0,
            files_discovered: 0,
        }
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn total_tokens(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.token_count())
            .sum()
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    /// The whole submission as one stream, one `FILE_END` per file.
    ///
    /// A submission with a failed file has no meaningful stream, so this
    /// refuses rather than silently comparing a partial submission.
    pub fn concatenated_tokens(&self) -> Result<TokenStream, BatchError> {
        if let Some((path, _)) = self.failed_files.first() {
            return Err(BatchError::IncompleteSubmission {
                failed: self.failure_count(),
                first: path.display().to_string(),
            });
        }
        Ok(TokenStream::concatenate(
            self.successful_files
                .iter()
                .map(|(_, result)| result.stream.clone()),
        ))
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch started {}: {} files processed, {} successful ({:.1}%), {} failed, {} tokens, {:.2}s total",
            self.started_at.to_rfc3339(),
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.total_tokens(),
            self.processing_duration.as_secs_f64()
        )
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No C/C++ files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },

    #[error("Submission incomplete: {failed} file(s) failed, first: {first}")]
    IncompleteSubmission { failed: usize, first: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            Self::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            Self::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::ThreadError { .. } => codes::batch::WORKER_FAILURE,
            Self::IncompleteSubmission { .. } => codes::batch::INCOMPLETE_SUBMISSION,
        }
    }
}

impl From<walkdir::Error> for BatchError {
    fn from(error: walkdir::Error) -> Self {
        match error.path() {
            Some(path) if error.depth() == 0 => Self::DirectoryNotFound {
                path: path.display().to_string(),
            },
            _ => Self::IoError {
                error: error.to_string(),
            },
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Every C/C++ file under `dir_path`, sorted by path
pub fn discover_cpp_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let mut walker = WalkDir::new(dir_path).follow_links(false);
    if !config.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => return Err(error.into()),
            Err(error) => {
                crate::log_warning!(
                    code = codes::file_processing::PERMISSION_DENIED,
                    "Skipping unreadable entry",
                    "error" => error
                );
                continue;
            }
        };
        if entry.file_type().is_file() && has_cpp_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    let limit = config.file_limit();
    if files.len() > limit {
        return Err(BatchError::TooManyFiles {
            count: files.len(),
            max: limit,
        });
    }

    files.sort();

    crate::log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

type Outcome = (usize, PathBuf, Result<PipelineResult, PipelineError>);

fn is_cancellation(error: &PipelineError) -> bool {
    matches!(error, PipelineError::Tokenization(TokenizerError::Cancelled))
}

/// Tokenize `files` one after another, in the given order
pub fn process_files_sequential(
    pipeline: &Pipeline,
    files: &[PathBuf],
    config: &BatchConfig,
) -> BatchResults {
    let start_time = Instant::now();
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            eprintln!(
                "Tokenizing file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }

        match pipeline.process_file(file_path, file_id) {
            Ok(result) => results.add_success(file_path.clone(), result),
            Err(error) => {
                crate::log_error!(
                    error.error_code(),
                    "File tokenization failed",
                    "file" => file_path.display(),
                    "file_id" => file_id,
                    "error" => error
                );
                results.add_failure(file_path.clone(), error);

                if config.fail_fast {
                    crate::log_warning!("Fail-fast mode enabled, stopping batch processing");
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
        "Sequential batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    results
}

/// Tokenize `files` on worker threads; results keep the order of `files`
pub fn process_files_parallel(
    pipeline: &Pipeline,
    files: &[PathBuf],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.max_threads.clamp(1, MAX_WORKER_THREADS);
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    let cancel = Arc::new(AtomicBool::new(false));
    let pipeline = pipeline.clone().with_cancel_flag(Arc::clone(&cancel));
    let chunk_size = calculate_chunk_size(files.len(), threads);

    crate::log_debug!("Parallel processing configuration",
        "total_files" => files.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    let indexed: Vec<(usize, PathBuf)> = files.iter().cloned().enumerate().collect();
    let mut outcomes: Vec<Outcome> = Vec::with_capacity(files.len());

    for chunk in indexed.chunks(chunk_size) {
        outcomes.extend(process_chunk_parallel(chunk, &pipeline, threads, config, &cancel)?);
        if cancel.load(Ordering::Relaxed) {
            crate::log_warning!("Fail-fast mode enabled, stopping batch processing");
            break;
        }
    }

    outcomes.sort_by_key(|(file_id, _, _)| *file_id);
    for (file_id, file_path, outcome) in outcomes {
        match outcome {
            Ok(result) => results.add_success(file_path, result),
            Err(error) if is_cancellation(&error) => {
                crate::log_debug!("File abandoned after fail-fast", "file_id" => file_id);
            }
            Err(error) => results.add_failure(file_path, error),
        }
    }

    results.processing_duration = start_time.elapsed();

    crate::log_success!(
        codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
        "Parallel batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

fn process_chunk_parallel(
    files: &[(usize, PathBuf)],
    pipeline: &Pipeline,
    threads: usize,
    config: &BatchConfig,
    cancel: &Arc<AtomicBool>,
) -> Result<Vec<Outcome>, BatchError> {
    let collected: Arc<Mutex<Vec<Outcome>>> = Arc::new(Mutex::new(Vec::with_capacity(files.len())));
    let files_per_thread = files.len().div_ceil(threads).max(1);
    let mut handles = Vec::new();

    for thread_files in files.chunks(files_per_thread) {
        let thread_files = thread_files.to_vec();
        let collected = Arc::clone(&collected);
        let cancel = Arc::clone(cancel);
        let pipeline = pipeline.clone();
        let fail_fast = config.fail_fast;

        handles.push(thread::spawn(move || {
            for (file_id, file_path) in thread_files {
                if cancel.load(Ordering::Relaxed) {
                    return;
                }

                let outcome = pipeline.process_file(&file_path, file_id);
                if let Err(error) = &outcome {
                    if !is_cancellation(error) {
                        crate::log_error!(
                            error.error_code(),
                            "File tokenization failed",
                            "file" => file_path.display(),
                            "file_id" => file_id,
                            "error" => error
                        );
                        if fail_fast {
                            cancel.store(true, Ordering::Relaxed);
                        }
                    }
                }

                let Ok(mut guard) = collected.lock() else {
                    return;
                };
                guard.push((file_id, file_path, outcome));
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| BatchError::ThreadError {
            message: "Worker thread panicked during tokenization".to_string(),
        })?;
    }

    Arc::try_unwrap(collected)
        .map_err(|_| BatchError::ThreadError {
            message: "Failed to extract results from worker threads".to_string(),
        })?
        .into_inner()
        .map_err(|_| BatchError::ThreadError {
            message: "Result collector poisoned by a worker".to_string(),
        })
}

fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    let ideal_chunk_size = file_count.div_ceil(max_threads.max(1)) * max_threads.max(1);
    ideal_chunk_size.clamp(1, MAX_CHUNK_SIZE)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Tokenize an explicit list of files with `config`
pub fn process_files(
    pipeline: &Pipeline,
    files: &[PathBuf],
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if files.len() > config.file_limit() {
        return Err(BatchError::TooManyFiles {
            count: files.len(),
            max: config.file_limit(),
        });
    }
    if config.max_threads <= 1 || files.len() <= 1 {
        Ok(process_files_sequential(pipeline, files, config))
    } else {
        process_files_parallel(pipeline, files, config)
    }
}

/// Discover and tokenize a submission directory with default configuration
pub fn process_directory(dir_path: &Path) -> Result<BatchResults, BatchError> {
    process_directory_with_config(dir_path, &BatchConfig::default())
}

pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let files = discover_cpp_files(dir_path, config)?;
    let pipeline = Pipeline::new();
    let mut results = process_files(&pipeline, &files, config)?;
    results.files_discovered = files.len();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn write_submission(dir: &Path) {
        fs::create_dir_all(dir.join("src/util")).unwrap();
        fs::write(dir.join("main.cpp"), "int main() { return run(); }\n").unwrap();
        fs::write(dir.join("src/model.hpp"), "struct Model { int weight; };\n").unwrap();
        fs::write(dir.join("src/util/math.cc"), "int square(int x) { return x * x; }\n").unwrap();
        fs::write(dir.join("README.md"), "not code").unwrap();
    }

    #[test]
    fn test_file_discovery_is_recursive_and_sorted() {
        let temp_dir = tempdir().unwrap();
        write_submission(temp_dir.path());

        let files = discover_cpp_files(temp_dir.path(), &BatchConfig::default()).unwrap();

        assert_eq!(files.len(), 3);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
        assert!(files.iter().all(|f| has_cpp_extension(f)));
    }

    #[test]
    fn test_file_discovery_single_level() {
        let temp_dir = tempdir().unwrap();
        write_submission(temp_dir.path());

        let config = BatchConfig {
            recursive: false,
            ..BatchConfig::default()
        };
        let files = discover_cpp_files(temp_dir.path(), &config).unwrap();

        assert_eq!(files, vec![temp_dir.path().join("main.cpp")]);
    }

    #[test]
    fn test_discovery_errors() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "text").unwrap();

        let err = discover_cpp_files(temp_dir.path(), &BatchConfig::default()).unwrap_err();
        assert_matches!(err, BatchError::NoFilesFound { .. });
        assert_eq!(err.error_code(), codes::batch::NO_FILES_FOUND);

        let missing = temp_dir.path().join("absent");
        assert_matches!(
            discover_cpp_files(&missing, &BatchConfig::default()),
            Err(BatchError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_too_many_files() {
        let temp_dir = tempdir().unwrap();
        write_submission(temp_dir.path());

        let config = BatchConfig {
            max_files: Some(2),
            ..BatchConfig::default()
        };
        assert_matches!(
            discover_cpp_files(temp_dir.path(), &config),
            Err(BatchError::TooManyFiles { count: 3, max: 2 })
        );
    }

    #[test]
    fn test_sequential_submission_stream() {
        let temp_dir = tempdir().unwrap();
        write_submission(temp_dir.path());

        let results =
            process_directory_with_config(temp_dir.path(), &BatchConfig::sequential()).unwrap();

        assert_eq!(results.files_discovered, 3);
        assert_eq!(results.success_count(), 3);
        assert_eq!(results.failure_count(), 0);

        let stream = results.concatenated_tokens().unwrap();
        assert_eq!(stream.count_of(TokenKind::FileEnd), 3);
        assert_eq!(stream.file_segments().len(), 3);
        assert_eq!(stream.len(), results.total_tokens());
        assert_eq!(stream.tokens()[0].kind, TokenKind::FunctionBegin);
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let temp_dir = tempdir().unwrap();
        for i in 0..12 {
            let source = format!("int f{i}() {{ int v = g({i}); return v; }}\n");
            fs::write(temp_dir.path().join(format!("file_{i:02}.cpp")), source).unwrap();
        }

        let sequential =
            process_directory_with_config(temp_dir.path(), &BatchConfig::sequential()).unwrap();
        let parallel = process_directory_with_config(
            temp_dir.path(),
            &BatchConfig {
                max_threads: 4,
                ..BatchConfig::default()
            },
        )
        .unwrap();

        let order = |r: &BatchResults| -> Vec<PathBuf> {
            r.successful_files.iter().map(|(p, _)| p.clone()).collect()
        };
        assert_eq!(order(&sequential), order(&parallel));
        assert_eq!(
            sequential.concatenated_tokens().unwrap().kinds(),
            parallel.concatenated_tokens().unwrap().kinds()
        );
    }

    #[test]
    fn test_failed_file_makes_submission_incomplete() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a_broken.cpp"), "void f( {\n").unwrap();
        fs::write(temp_dir.path().join("b_fine.cpp"), "int x;\n").unwrap();

        let results =
            process_directory_with_config(temp_dir.path(), &BatchConfig::sequential()).unwrap();

        assert_eq!(results.success_count(), 1);
        assert_eq!(results.failure_count(), 1);
        assert!(results.failed_files[0].1.is_parse_failure());

        let err = results.concatenated_tokens().unwrap_err();
        assert_matches!(err, BatchError::IncompleteSubmission { failed: 1, .. });
        assert_eq!(err.error_code(), codes::batch::INCOMPLETE_SUBMISSION);
    }

    #[test]
    fn test_fail_fast_stops_sequential_run() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("a_broken.cpp"), "void f( {\n").unwrap();
        fs::write(temp_dir.path().join("b_fine.cpp"), "int x;\n").unwrap();

        let config = BatchConfig {
            fail_fast: true,
            ..BatchConfig::sequential()
        };
        let results = process_directory_with_config(temp_dir.path(), &config).unwrap();

        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
        assert_eq!(results.files_discovered, 2);
    }

    #[test]
    fn test_explicit_file_list_reports_missing_files() {
        let temp_dir = tempdir().unwrap();
        let present = temp_dir.path().join("present.cpp");
        fs::write(&present, "int x;\n").unwrap();
        let files = vec![present, temp_dir.path().join("missing.cpp")];

        let results = process_files(&Pipeline::new(), &files, &BatchConfig::sequential()).unwrap();

        assert_eq!(results.success_count(), 1);
        assert_matches!(
            results.failed_files[0].1,
            PipelineError::FileProcessing(_)
        );
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(1, 4), 4.min(MAX_CHUNK_SIZE));
        assert_eq!(calculate_chunk_size(0, 4), 1);
        assert!(calculate_chunk_size(10_000, 4) <= MAX_CHUNK_SIZE);
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert!(config.max_threads >= 1);
        assert!(config.max_threads <= MAX_WORKER_THREADS);
        assert!(config.recursive);
        assert!(!config.fail_fast);
        assert_eq!(config.file_limit(), MAX_FILES_PER_BATCH);
        assert_eq!(BatchConfig::sequential().max_threads, 1);
    }

    #[test]
    fn test_empty_results_summary() {
        let results = BatchResults::new();
        assert_eq!(results.success_rate(), 0.0);
        assert!(results.summary().contains("0 files processed"));
        assert_eq!(results.concatenated_tokens().unwrap().len(), 0);
    }
}
