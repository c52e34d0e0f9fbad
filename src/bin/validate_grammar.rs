//! Grammar Validation Tool
//!
//! Links the PHP rule table and checks it for problems linking alone does
//! not catch: unreachable rules, repetitions over patterns that can match
//! empty input, start rules that do not anchor at end of input, and
//! redundant aliases.
//!
//! ## Usage
//! ```bash
//! cargo run --bin validate_grammar
//! ```

use std::process;

use php_ast::php;
use php_ast::validation::validate_grammar;

fn main() {
    let grammar = php::grammar();
    println!("Validating PHP grammar ({} rules)", grammar.len());

    let result = validate_grammar(grammar, php::ROOTS);
    print!("{}", result.render());

    if !result.is_valid() {
        process::exit(1);
    }
}
