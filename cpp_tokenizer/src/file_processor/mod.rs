//! Loading C and C++ source files
//!
//! Size and line-count limits are compile-time constants; whether a C/C++
//! extension is required comes from `CPPTOK_REQUIRE_CPP_EXTENSION`.

mod processor;

use crate::config::runtime::FileProcessorPreferences;
pub use processor::{
    has_cpp_extension, FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError,
    CPP_EXTENSIONS,
};

/// Load a file with preferences from the environment
pub fn process_file<P: AsRef<std::path::Path>>(
    file_path: P,
) -> Result<FileProcessingResult, FileProcessorError> {
    create_processor().process_file(file_path)
}

pub fn create_processor() -> FileProcessor {
    FileProcessor::from_preferences(&FileProcessorPreferences::default())
}
