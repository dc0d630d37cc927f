//! Error and success codes with their classification metadata
//!
//! Every diagnostic the tokenizer emits carries one of these codes. The
//! registry below is the single place that decides how severe a code is,
//! whether processing of the current file can continue, and what the user
//! should do about it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper shared by error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    /// Other files in the same batch can still be processed
    pub recoverable: bool,
    /// The whole run must stop
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Syntax tree provider codes
pub mod syntax {
    use super::Code;

    pub const LANGUAGE_UNAVAILABLE: Code = Code::new("E020");
    pub const SYNTAX_ERROR: Code = Code::new("E021");
    pub const MISSING_NODE: Code = Code::new("E022");
    pub const NO_TREE_PRODUCED: Code = Code::new("E023");
}

/// Normalization and token stream assembly codes
pub mod tokenization {
    use super::Code;

    pub const NESTING_VIOLATION: Code = Code::new("E030");
    pub const UNCLOSED_CONSTRUCT: Code = Code::new("E031");
    pub const MAX_DEPTH_EXCEEDED: Code = Code::new("E032");
    pub const TOKEN_LIMIT_EXCEEDED: Code = Code::new("E033");
    pub const CANCELLED: Code = Code::new("E034");
    pub const INVALID_TERMINATION: Code = Code::new("E035");

    pub const TRANSPARENT_NODE: Code = Code::new("D030");
}

pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E040");
    pub const NO_FILES_FOUND: Code = Code::new("E041");
    pub const WORKER_FAILURE: Code = Code::new("E042");
    pub const TOO_MANY_FILES: Code = Code::new("E043");
    pub const INCOMPLETE_SUBMISSION: Code = Code::new("E044");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I007");

    pub const PARSE_COMPLETE: Code = Code::new("I010");

    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const NESTING_VERIFIED: Code = Code::new("I021");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

use Severity::*;

const REGISTRY_ENTRIES: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the offending input",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Critical,
        false,
        true,
        "Logging or configuration failed to initialize",
        "Check CPPTOK_* environment variables",
    ),
    // File processing
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        High,
        true,
        false,
        "Source file not found",
        "Check the file path",
    ),
    ErrorMetadata::new(
        "E006",
        "FileProcessing",
        Low,
        true,
        false,
        "File does not have a C or C++ extension",
        "Rename the file or unset CPPTOK_REQUIRE_CPP_EXTENSION",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Medium,
        true,
        false,
        "Source file exceeds the configured size limit",
        "Split the file or raise max_file_size in the build profile",
    ),
    ErrorMetadata::new(
        "E008",
        "FileProcessing",
        Low,
        true,
        false,
        "Source file is empty",
        "Remove the file from the submission",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        High,
        true,
        false,
        "Permission denied reading source file",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        "E010",
        "FileProcessing",
        Medium,
        true,
        false,
        "Source file is not valid UTF-8",
        "Re-encode the file as UTF-8",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        High,
        true,
        false,
        "I/O error while reading source file",
        "Check disk and filesystem health",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Medium,
        true,
        false,
        "Path is not a regular file or exceeds the line limit",
        "Pass a regular source file within configured limits",
    ),
    // Syntax
    ErrorMetadata::new(
        "E020",
        "Syntax",
        Critical,
        false,
        true,
        "C++ grammar could not be loaded into the parser",
        "Rebuild against a tree-sitter version compatible with tree-sitter-cpp",
    ),
    ErrorMetadata::new(
        "E021",
        "Syntax",
        High,
        true,
        false,
        "Source does not parse as C++",
        "Fix the syntax error at the reported position",
    ),
    ErrorMetadata::new(
        "E022",
        "Syntax",
        High,
        true,
        false,
        "Parser had to insert a missing token",
        "Add the missing token at the reported position",
    ),
    ErrorMetadata::new(
        "E023",
        "Syntax",
        Critical,
        false,
        false,
        "Parser returned no syntax tree",
        "File a bug report with the offending input",
    ),
    // Tokenization
    ErrorMetadata::new(
        "E030",
        "Tokenization",
        Critical,
        false,
        false,
        "Construct closed out of order",
        "File a bug report; the normalizer emitted unbalanced tokens",
    ),
    ErrorMetadata::new(
        "E031",
        "Tokenization",
        Critical,
        false,
        false,
        "Construct left open at end of file",
        "File a bug report; the normalizer emitted unbalanced tokens",
    ),
    ErrorMetadata::new(
        "E032",
        "Tokenization",
        Medium,
        true,
        false,
        "Syntax tree nests deeper than the traversal limit",
        "Raise max_traversal_depth in the build profile",
    ),
    ErrorMetadata::new(
        "E033",
        "Tokenization",
        Medium,
        true,
        false,
        "File produced more tokens than allowed",
        "Raise max_tokens_per_file in the build profile",
    ),
    ErrorMetadata::new(
        "E034",
        "Tokenization",
        Low,
        true,
        true,
        "Tokenization cancelled",
        "Re-run the submission",
    ),
    ErrorMetadata::new(
        "E035",
        "Tokenization",
        Critical,
        false,
        false,
        "Token stream is not terminated by exactly one FILE_END",
        "File a bug report",
    ),
    ErrorMetadata::new(
        "D030",
        "Tokenization",
        Low,
        true,
        false,
        "Node has no normalization rule and was traversed transparently",
        "None required",
    ),
    // Batch
    ErrorMetadata::new(
        "E040",
        "Batch",
        High,
        false,
        true,
        "Submission directory not found",
        "Check the directory path",
    ),
    ErrorMetadata::new(
        "E041",
        "Batch",
        Medium,
        false,
        true,
        "No C or C++ files found in submission",
        "Check the directory contents and recursion settings",
    ),
    ErrorMetadata::new(
        "E042",
        "Batch",
        Critical,
        false,
        true,
        "Worker thread failed",
        "Re-run with --sequential to isolate the failing file",
    ),
    ErrorMetadata::new(
        "E043",
        "Batch",
        Medium,
        false,
        true,
        "Submission has more files than allowed",
        "Raise max_files_per_batch or split the submission",
    ),
    ErrorMetadata::new(
        "E044",
        "Batch",
        High,
        false,
        false,
        "Submission has failed files and cannot be concatenated",
        "Fix the failing files listed above",
    ),
    // Success
    ErrorMetadata::new(
        "I001",
        "General",
        Low,
        true,
        false,
        "Operation completed",
        "None required",
    ),
    ErrorMetadata::new(
        "I004",
        "General",
        Low,
        true,
        false,
        "Logging initialized",
        "None required",
    ),
    ErrorMetadata::new(
        "I006",
        "FileProcessing",
        Low,
        true,
        false,
        "File processed",
        "None required",
    ),
    ErrorMetadata::new(
        "I007",
        "Batch",
        Low,
        true,
        false,
        "File discovery completed",
        "None required",
    ),
    ErrorMetadata::new(
        "I010",
        "Syntax",
        Low,
        true,
        false,
        "Source parsed",
        "None required",
    ),
    ErrorMetadata::new(
        "I020",
        "Tokenization",
        Low,
        true,
        false,
        "Token stream assembled",
        "None required",
    ),
    ErrorMetadata::new(
        "I021",
        "Tokenization",
        Low,
        true,
        false,
        "Token stream nesting verified",
        "None required",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| REGISTRY_ENTRIES.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_codes_are_unique() {
        let mut seen = HashSet::new();
        for entry in REGISTRY_ENTRIES {
            assert!(seen.insert(entry.code), "duplicate code {}", entry.code);
        }
    }

    #[test]
    fn test_every_constant_is_registered() {
        let constants = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::EMPTY_FILE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            syntax::LANGUAGE_UNAVAILABLE,
            syntax::SYNTAX_ERROR,
            syntax::MISSING_NODE,
            syntax::NO_TREE_PRODUCED,
            tokenization::NESTING_VIOLATION,
            tokenization::UNCLOSED_CONSTRUCT,
            tokenization::MAX_DEPTH_EXCEEDED,
            tokenization::TOKEN_LIMIT_EXCEEDED,
            tokenization::CANCELLED,
            tokenization::INVALID_TERMINATION,
            tokenization::TRANSPARENT_NODE,
            batch::DIRECTORY_NOT_FOUND,
            batch::NO_FILES_FOUND,
            batch::WORKER_FAILURE,
            batch::TOO_MANY_FILES,
            batch::INCOMPLETE_SUBMISSION,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::FILE_PROCESSING_SUCCESS,
            success::FILE_DISCOVERY_COMPLETE,
            success::PARSE_COMPLETE,
            success::TOKENIZATION_COMPLETE,
            success::NESTING_VERIFIED,
        ];
        for code in constants {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "{} missing from registry",
                code
            );
        }
        assert_eq!(constants.len(), REGISTRY_ENTRIES.len());
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("ZZZ999"), "Unknown error");
        assert_eq!(get_category("ZZZ999"), "Unknown");
        assert_eq!(get_severity("ZZZ999"), Severity::Medium);
        assert!(is_recoverable("ZZZ999"));
        assert!(!requires_halt("ZZZ999"));
    }

    #[test]
    fn test_parse_failure_is_recoverable_per_file() {
        assert!(is_recoverable(syntax::SYNTAX_ERROR.as_str()));
        assert!(!requires_halt(syntax::SYNTAX_ERROR.as_str()));
        assert!(requires_halt(syntax::LANGUAGE_UNAVAILABLE.as_str()));
        assert_eq!(get_category("E030"), "Tokenization");
    }
}
