//! The PHP rule table.
//!
//! Each submodule contributes the rules for one area of the language; they
//! are linked into a single [`Grammar`] the first time it is needed.
//! [`shaping`] holds the processors that turn flat captures into the final
//! tree.

use once_cell::sync::Lazy;

use crate::grammar::{Grammar, Rule};

pub mod classes;
pub mod expressions;
pub mod lexical;
pub mod shaping;
pub mod statements;
pub mod strings;

/// Start rule for a whole file.
pub const START: &str = "Program";

/// Every rule a session may start from: the file rule plus the two
/// interpolation sub-parsers.
pub const ROOTS: &[&str] = &[START, "StringParts", "HeredocParts"];

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    Grammar::new(rules(), Some(lexical::trivia()))
        .unwrap_or_else(|error| panic!("PHP grammar failed to link: {error}"))
});

/// The unlinked rule list, in declaration order.
pub fn rules() -> Vec<Rule> {
    let mut table = statements::rules();
    table.extend(classes::rules());
    table.extend(expressions::rules());
    table.extend(strings::rules());
    table.extend(lexical::rules());
    table
}

/// The linked PHP grammar, shared by every parse.
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}
