//! Message lookup for diagnostics.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

pub const UNEXPECTED_END_OF_INPUT: &str = "core.unexpected_end_of_input";
pub const SYNTAX_ERROR: &str = "core.syntax_error";
pub const MALFORMED_HALT_COMPILER: &str = "core.malformed_halt_compiler";
pub const NESTED_HALT_COMPILER: &str = "core.nested_halt_compiler";
pub const TRY_WITHOUT_CATCH_OR_FINALLY: &str = "core.try_without_catch_or_finally";
pub const NESTING_TOO_DEEP: &str = "core.nesting_too_deep";

pub const DEFAULT_LOCALE: &str = "en";

const BUILT_IN: &[(&str, &str)] = &[
    (UNEXPECTED_END_OF_INPUT, "syntax error, unexpected end of file"),
    (SYNTAX_ERROR, "syntax error, unexpected '${what}'"),
    (
        MALFORMED_HALT_COMPILER,
        "__halt_compiler must be followed by '();'",
    ),
    (
        NESTED_HALT_COMPILER,
        "__HALT_COMPILER() can only be used from the outermost scope",
    ),
    (
        TRY_WITHOUT_CATCH_OR_FINALLY,
        "Cannot use try without catch or finally",
    ),
    (
        NESTING_TOO_DEEP,
        "Maximum nesting depth of ${depth} rule invocations exceeded",
    ),
];

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\$\{(\w+)\}").unwrap();
}

/// Resolves a message key and named placeholders into display text.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, placeholders: &HashMap<String, String>) -> String;
}

/// Locale-keyed message templates with `${name}` placeholders.
///
/// Lookups try the current locale, then [`DEFAULT_LOCALE`]. A key found in
/// neither is returned as-is.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: String,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        let mut catalog = Self {
            locale: DEFAULT_LOCALE.to_string(),
            messages: HashMap::new(),
        };
        for (key, template) in BUILT_IN {
            catalog.add(DEFAULT_LOCALE, key, template);
        }
        catalog
    }
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    pub fn add(&mut self, locale: &str, key: &str, template: &str) {
        self.messages
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), template.to_string());
    }

    /// Registers several keys for one locale.
    pub fn add_all<'k>(&mut self, locale: &str, entries: impl IntoIterator<Item = (&'k str, &'k str)>) {
        for (key, template) in entries {
            self.add(locale, key, template);
        }
    }

    fn template(&self, key: &str) -> Option<&str> {
        [self.locale.as_str(), DEFAULT_LOCALE]
            .into_iter()
            .find_map(|locale| self.messages.get(locale)?.get(key))
            .map(String::as_str)
    }
}

impl Translator for MessageCatalog {
    fn translate(&self, key: &str, placeholders: &HashMap<String, String>) -> String {
        let Some(template) = self.template(key) else {
            return key.to_string();
        };
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                placeholders
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn what(value: &str) -> HashMap<String, String> {
        HashMap::from([("what".to_string(), value.to_string())])
    }

    #[test]
    fn built_in_messages_substitute_placeholders() {
        let catalog = MessageCatalog::new();
        assert_eq!(
            catalog.translate(SYNTAX_ERROR, &what(",")),
            "syntax error, unexpected ','"
        );
        assert_eq!(
            catalog.translate(UNEXPECTED_END_OF_INPUT, &HashMap::new()),
            "syntax error, unexpected end of file"
        );
    }

    #[test]
    fn missing_locale_entries_fall_back_to_english() {
        let mut catalog = MessageCatalog::new();
        catalog.add("fr", SYNTAX_ERROR, "erreur de syntaxe, '${what}' inattendu");
        catalog.set_locale("fr");
        assert_eq!(
            catalog.translate(SYNTAX_ERROR, &what(";")),
            "erreur de syntaxe, ';' inattendu"
        );
        assert_eq!(
            catalog.translate(UNEXPECTED_END_OF_INPUT, &HashMap::new()),
            "syntax error, unexpected end of file"
        );
    }

    #[test]
    fn unknown_keys_and_placeholders_are_left_alone() {
        let catalog = MessageCatalog::new();
        assert_eq!(catalog.translate("app.custom", &HashMap::new()), "app.custom");
        assert_eq!(
            catalog.translate(SYNTAX_ERROR, &HashMap::new()),
            "syntax error, unexpected '${what}'"
        );
    }
}
