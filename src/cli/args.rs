//! Defines the command-line arguments and subcommands for `phpast`.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(name = "phpast", version, about = "Parse PHP source into an AST.")]
pub struct PhpAstArgs {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the AST of a PHP file.
    Ast {
        /// The PHP file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Attach start/end positions to every node.
        #[arg(long)]
        bounds: bool,
        /// Attach start position and length to every node.
        #[arg(long)]
        offsets: bool,
        /// Read parse options from a JSON file such as `{"captureAllBounds": true}`.
        #[arg(long, value_name = "JSON FILE")]
        options: Option<PathBuf>,
        /// Path reported in error messages instead of the file name.
        #[arg(long, value_name = "NAME")]
        path_name: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Parse a file, or every `*.php` file under a directory, and report failures.
    Check {
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Validate the built-in PHP rule table.
    Grammar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}
