//! # cpptok
//!
//! Prints the normalized token stream of C/C++ files or submission
//! directories. Exits with status 1 when any file fails to tokenize.

use clap::Parser;
use cpp_tokenizer::batch::{self, BatchConfig, BatchResults};
use cpp_tokenizer::pipeline::Pipeline;
use cpp_tokenizer::tokens::{render_json, render_listing, TokenStream};
use cpp_tokenizer::{log_error, log_info, logging};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cpptok", version, about = "Structural C++ tokenizer", long_about = None)]
struct Cli {
    /// Source files and/or submission directories
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    #[arg(long, help = "Print tokens as JSON instead of a listing")]
    json: bool,

    #[arg(long, requires = "json", help = "Pretty-print the JSON output")]
    pretty: bool,

    #[arg(long, conflicts_with = "threads", help = "Tokenize files one at a time")]
    sequential: bool,

    #[arg(long, value_name = "N", help = "Number of worker threads")]
    threads: Option<usize>,

    #[arg(long, help = "Only look at the top level of directories")]
    no_recursive: bool,

    #[arg(long, help = "Stop at the first file that fails")]
    fail_fast: bool,

    #[arg(short, long, help = "Do not print tokens")]
    quiet: bool,

    #[arg(long, help = "Print a batch summary to stderr")]
    summary: bool,
}

impl Cli {
    fn batch_config(&self) -> BatchConfig {
        let defaults = BatchConfig::default();
        let max_threads = if self.sequential {
            1
        } else {
            self.threads.unwrap_or(defaults.max_threads).max(1)
        };
        BatchConfig {
            max_threads,
            recursive: !self.no_recursive,
            fail_fast: self.fail_fast,
            ..defaults
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_global_logging() {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file tokenized
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.batch_config();
    log_info!("cpptok starting", "inputs" => cli.paths.len(), "threads" => config.max_threads);

    let mut files = Vec::new();
    for path in &cli.paths {
        if path.is_dir() {
            files.extend(batch::discover_cpp_files(path, &config)?);
        } else {
            files.push(path.clone());
        }
    }

    let results = batch::process_files(&Pipeline::new(), &files, &config)?;

    if !cli.quiet {
        print_tokens(cli, &results)?;
    }

    for (path, error) in &results.failed_files {
        log_error!(error.error_code(), "File failed", "file" => path.display());
        eprintln!("error[{}]: {}: {}", error.error_code().as_str(), path.display(), error);
    }

    if cli.summary {
        eprintln!("{}", results.summary());
    }
    logging::print_cargo_style_summary();

    Ok(results.failed_files.is_empty())
}

fn print_tokens(cli: &Cli, results: &BatchResults) -> Result<(), serde_json::Error> {
    let stream = TokenStream::concatenate(
        results
            .successful_files
            .iter()
            .map(|(_, result)| result.stream.clone()),
    );

    if cli.json {
        println!("{}", render_json(&stream, cli.pretty)?);
    } else {
        print!("{}", render_listing(&stream));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["cpptok", "--sequential", "--no-recursive", "src"]).unwrap();
        let config = cli.batch_config();
        assert_eq!(config.max_threads, 1);
        assert!(!config.recursive);
        assert_eq!(cli.paths, vec![PathBuf::from("src")]);
    }

    #[test]
    fn test_cli_rejects_conflicts() {
        assert!(Cli::try_parse_from(["cpptok", "--sequential", "--threads", "4", "a.cpp"]).is_err());
        assert!(Cli::try_parse_from(["cpptok", "--pretty", "a.cpp"]).is_err());
        assert!(Cli::try_parse_from(["cpptok"]).is_err());
    }

    #[test]
    fn test_thread_count_is_at_least_one() {
        let cli = Cli::try_parse_from(["cpptok", "--threads", "0", "a.cpp"]).unwrap();
        assert_eq!(cli.batch_config().max_threads, 1);
    }
}
