//! Source file loading with compile-time size limits

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Extensions accepted as C or C++ translation units and headers
pub const CPP_EXTENSIONS: &[&str] = &["cpp", "cc", "cxx", "c++", "c", "h", "hpp", "hh", "hxx"];

pub fn has_cpp_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CPP_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Not a C or C++ source file: extension {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            Self::InvalidExtension { .. } => codes::file_processing::INVALID_EXTENSION,
            Self::FileTooLarge { .. } | Self::TooManyLines { .. } => {
                codes::file_processing::FILE_TOO_LARGE
            }
            Self::EmptyFile { .. } => codes::file_processing::EMPTY_FILE,
            Self::PermissionDenied { .. } => codes::file_processing::PERMISSION_DENIED,
            Self::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    fn from_io(error: &std::io::Error, path: &Path) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::InvalidData => Self::InvalidEncoding {
                path: path.display().to_string(),
            },
            _ => Self::IoError {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical path
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_cpp_file: bool,
}

impl FileMetadata {
    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }
}

/// A loaded source file
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }
}

#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_cpp_extension: bool,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_cpp_extension: false,
            enable_performance_logging: true,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_cpp_extension: prefs.require_cpp_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_cpp_extension_required(mut self, required: bool) -> Self {
        self.require_cpp_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Validate, read and measure a source file
    pub fn process_file<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let file_path = file_path.as_ref();
        let display = file_path.display().to_string();

        log_debug!("Starting file processing", "file" => display);

        let result = self
            .validate_path(file_path)
            .and_then(|path| self.read_metadata(&path))
            .and_then(|metadata| self.validate_metadata(metadata))
            .and_then(|metadata| self.read_source(metadata))
            .map(|(source, metadata)| FileProcessingResult {
                source,
                metadata,
                processing_duration: start_time.elapsed(),
            });

        match &result {
            Ok(loaded) => self.log_success(loaded, &display),
            Err(error) => {
                log_error!(error.error_code(), "Failed to load source file",
                    "file" => display,
                    "error" => error
                );
            }
        }

        result
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            return Err(FileProcessorError::InvalidPath {
                path: String::new(),
            });
        }
        if !file_path.exists() {
            return Err(FileProcessorError::FileNotFound {
                path: file_path.display().to_string(),
            });
        }
        if !file_path.is_file() {
            return Err(FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            });
        }
        file_path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(&e, file_path))
    }

    fn read_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| FileProcessorError::from_io(&e, path))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_cpp_file: has_cpp_extension(path),
        })
    }

    fn validate_metadata(&self, metadata: FileMetadata) -> Result<FileMetadata, FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            return Err(FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            });
        }
        if metadata.size == 0 {
            return Err(FileProcessorError::EmptyFile {
                path: metadata.path.display().to_string(),
            });
        }
        if self.require_cpp_extension && !metadata.is_cpp_file {
            return Err(FileProcessorError::InvalidExtension {
                extension: metadata.extension,
            });
        }
        Ok(metadata)
    }

    fn read_source(
        &self,
        mut metadata: FileMetadata,
    ) -> Result<(String, FileMetadata), FileProcessorError> {
        let source = fs::read_to_string(&metadata.path)
            .map_err(|e| FileProcessorError::from_io(&e, &metadata.path))?;

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            return Err(FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            });
        }
        metadata.line_count = line_count;
        Ok((source, metadata))
    }

    fn log_success(&self, result: &FileProcessingResult, file: &str) {
        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "Source file loaded",
                "file" => file,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "large_file" => result.metadata.is_large_file(),
                "duration_ms" => format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0)
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "Source file loaded",
                "file" => file
            );
        }
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_process_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("main.cpp");
        let content = "int main() {\n  return 0;\n}\n";
        fs::write(&file_path, content).unwrap();

        let result = FileProcessor::new().process_file(&file_path).unwrap();
        assert_eq!(result.source, content);
        assert_eq!(result.metadata.line_count, 3);
        assert!(result.metadata.is_cpp_file);
        assert!(!result.metadata.is_large_file());
        assert_eq!(result.char_count(), content.chars().count());
    }

    #[test]
    fn test_file_not_found() {
        assert_matches!(
            FileProcessor::new().process_file("does/not/exist.cpp"),
            Err(FileProcessorError::FileNotFound { .. })
        );
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempdir().unwrap();
        assert_matches!(
            FileProcessor::new().process_file(dir.path()),
            Err(FileProcessorError::InvalidPath { .. })
        );
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("empty.cpp");
        fs::write(&file_path, "").unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::EmptyFile { .. })
        );
    }

    #[test]
    fn test_extension_requirement() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        fs::write(&file_path, "int x;").unwrap();

        assert!(FileProcessor::new().process_file(&file_path).is_ok());
        assert_matches!(
            FileProcessor::new()
                .with_cpp_extension_required(true)
                .process_file(&file_path),
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "txt"
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("latin1.cpp");
        fs::write(&file_path, [0x69u8, 0x6e, 0x74, 0x20, 0xff, 0xfe, 0x3b]).unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::InvalidEncoding { .. })
        );
    }

    #[test]
    fn test_too_many_lines() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("long.cpp");
        fs::write(&file_path, ";\n".repeat(MAX_LINE_COUNT + 1)).unwrap();

        assert_matches!(
            FileProcessor::new().process_file(&file_path),
            Err(FileProcessorError::TooManyLines { max_lines: MAX_LINE_COUNT, .. })
        );
    }

    #[test]
    fn test_cpp_extensions() {
        for name in ["a.cpp", "a.CC", "a.cxx", "a.c++", "a.c", "a.h", "a.hpp", "a.hh", "a.hxx"] {
            assert!(has_cpp_extension(Path::new(name)), "{}", name);
        }
        assert!(!has_cpp_extension(Path::new("a.rs")));
        assert!(!has_cpp_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_error_metadata() {
        let error = FileProcessorError::FileNotFound {
            path: "x.cpp".to_string(),
        };
        assert_eq!(error.error_code().as_str(), "E005");
        assert_eq!(error.category(), "FileProcessing");
        assert!(error.is_recoverable());
        assert!(!error.requires_halt());
    }

    #[test]
    fn test_from_preferences() {
        let prefs = FileProcessorPreferences {
            require_cpp_extension: true,
            enable_performance_logging: false,
        };
        let processor = FileProcessor::from_preferences(&prefs);
        assert!(processor.require_cpp_extension);
        assert!(!processor.enable_performance_logging);
    }
}
