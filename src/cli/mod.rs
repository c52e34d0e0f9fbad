//! The `phpast` command line.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as _;
use walkdir::WalkDir;

use crate::cli::args::{Command, Format, PhpAstArgs};
use crate::parser::Parser;
use crate::php;
use crate::syntax::ParseOptions;
use crate::validation::validate_grammar;

pub mod args;
pub mod output;

type CliResult = Result<bool, Box<dyn std::error::Error>>;

/// The main entry point for the CLI.
pub fn run() {
    let args = PhpAstArgs::parse();
    init_logging(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Ast {
            file,
            bounds,
            offsets,
            options,
            path_name,
            format,
        } => handle_ast(&file, bounds, offsets, options.as_deref(), path_name, format),
        Command::Check { path } => handle_check(&path),
        Command::Grammar => handle_grammar(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

// ============================================================================
// COMMANDS
// ============================================================================

fn handle_ast(
    file: &Path,
    bounds: bool,
    offsets: bool,
    options_file: Option<&Path>,
    path_name: Option<String>,
    format: Format,
) -> CliResult {
    let mut options = match options_file {
        Some(options_file) => ParseOptions::from_json(&fs::read_to_string(options_file)?)?,
        None => ParseOptions::default(),
    };
    if bounds {
        options = options.with_bounds(true);
    }
    if offsets {
        options = options.with_offsets(true);
    }

    let source = fs::read_to_string(file)?;
    let mut parser = Parser::with_options(options);
    parser.set_path(path_name.unwrap_or_else(|| file.display().to_string()));

    match parser.parse(&source) {
        Ok(program) => {
            output::print_tree(&program, format)?;
            Ok(true)
        }
        Err(error) => {
            output::print_error(error);
            Ok(false)
        }
    }
}

fn handle_check(path: &Path) -> CliResult {
    if !path.exists() {
        return Err(format!("{} does not exist", path.display()).into());
    }
    let files = php_files(path);
    let mut failed = 0;

    for file in &files {
        let source = fs::read_to_string(file)?;
        let mut parser = Parser::new();
        parser.set_path(file.display().to_string());
        let outcome = parser.parse(&source);
        let error = outcome.as_ref().err();
        if error.is_some() {
            failed += 1;
        }
        output::print_status(file, error);
    }

    output::print_summary(files.len(), failed);
    Ok(failed == 0)
}

fn handle_grammar() -> CliResult {
    let grammar = php::grammar();
    let result = validate_grammar(grammar, php::ROOTS);
    output::print_validation(grammar.len(), &result);
    Ok(result.is_valid())
}

/// `path` itself if it is a file, else every `*.php` file under it, sorted.
fn php_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "php"))
        .map(|entry| entry.into_path())
        .collect()
}
