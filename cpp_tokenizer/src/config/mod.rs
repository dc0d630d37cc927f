//! Configuration for the tokenizer
//!
//! Limits are compiled in from `config/<profile>.toml` by build.rs; user-facing
//! preferences are read from `CPPTOK_*` environment variables at runtime.

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("CPPTOK_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("CPPTOK_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(file_processing::LARGE_FILE_THRESHOLD <= file_processing::MAX_FILE_SIZE);
        assert!(traversal::MAX_CONSTRUCT_NESTING <= traversal::MAX_TRAVERSAL_DEPTH);
        assert!(batch_processing::MAX_WORKER_THREADS > 0);
        assert!(logging::MAX_LOG_EVENTS_PER_FILE > 0);
    }

    #[test]
    fn test_source_info_names_profile() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
