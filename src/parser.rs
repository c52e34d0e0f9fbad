//! The public entry point: source text in, `Program` node out.
//!
//! A [`Parser`] carries the request-scoped settings (the path reported in
//! errors, the message translator and the instrumentation options). The rule
//! table itself is process-wide and shared by every parser.

use std::sync::Arc;

use crate::ast::{Node, Value};
use crate::diagnostics::{ErrorHandler, MessageCatalog, Translator};
use crate::errors::{ParseException, PhpError};
use crate::grammar::Session;
use crate::php;
use crate::syntax::{ParseOptions, PositionTracker};

#[derive(Clone)]
pub struct Parser {
    path: Option<String>,
    translator: Arc<dyn Translator>,
    options: ParseOptions,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            path: None,
            translator: Arc::new(MessageCatalog::new()),
            options: ParseOptions::default(),
        }
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Path reported in error messages. Defaults to `(program)`.
    pub fn set_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    pub fn set_translator(&mut self, translator: Arc<dyn Translator>) -> &mut Self {
        self.translator = translator;
        self
    }

    pub fn set_options(&mut self, options: ParseOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Parses a whole PHP file into a `Program` node.
    pub fn parse(&self, source: &str) -> Result<Node, PhpError> {
        log::debug!(
            "parsing {} ({} bytes)",
            self.path().unwrap_or(crate::diagnostics::DEFAULT_PATH),
            source.len()
        );
        self.run(source).map_err(|exception| {
            ErrorHandler::new(self.translator.as_ref(), self.path()).handle(&exception, source)
        })
    }

    fn run(&self, source: &str) -> Result<Node, ParseException> {
        let tracker = PositionTracker::new(source);
        let mut session = Session::new(php::grammar(), source, 0, &tracker, self.options);
        match session.run(php::START, true)? {
            Value::Node(program) => Ok(Node::unshare(program)),
            other => {
                log::debug!("start rule yielded a {other:?}, not a node");
                Err(ParseException::syntax(session.furthest(), true, None))
            }
        }
    }
}

/// Parses `source` with default settings.
pub fn parse(source: &str) -> Result<Node, PhpError> {
    Parser::new().parse(source)
}
