//! # php-ast
//!
//! A PHP front-end: a memoizing PEG engine, the PHP rule table it runs, and
//! the processors that shape its captures into an AST.
//!
//! ## Layout
//! - [`grammar`]: the engine (patterns, rules, sessions)
//! - [`php`]: the PHP rule table and tree-shaping processors
//! - [`ast`]: the tagged-record tree the parser produces
//! - [`syntax`]: spans, line/column tracking and parse options
//! - [`diagnostics`] / [`errors`]: turning failures into PHP-style messages
//! - [`validation`]: static checks over rule tables
//! - [`cli`]: the `phpast` command line
//!
//! ```no_run
//! let program = php_ast::parse("<?php return 1;").unwrap();
//! assert_eq!(program.name, "Program");
//! ```

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod errors;
pub mod grammar;
pub mod parser;
pub mod php;
pub mod syntax;
pub mod validation;

pub use ast::{Fields, Node, Value};
pub use diagnostics::{MessageCatalog, Translator};
pub use errors::{ParseException, PhpError};
pub use parser::{parse, Parser};
pub use syntax::ParseOptions;
