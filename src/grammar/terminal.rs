//! Terminal patterns: anchored regular expressions with capture-group
//! selection and text post-processing.

use std::borrow::Cow;
use std::fmt;

use lazy_static::lazy_static;
use regex::{Captures, Regex, RegexBuilder};

use crate::ast::Value;

/// Post-processing applied to the text a terminal matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    None,
    Lowercase,
    Uppercase,
    /// Hexadecimal, binary and octal integer literals become decimal text.
    Integer,
    Escapes(EscapeSet),
}

/// Which backslash escapes a literal body understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeSet {
    /// `'...'`: only `\\` and `\'`.
    SingleQuoted,
    /// `"..."`: the full set including `\"`.
    DoubleQuoted,
    /// Heredoc bodies: the double-quoted set without `\"`.
    Heredoc,
}

lazy_static! {
    static ref SINGLE_QUOTED_ESCAPE: Regex = Regex::new(r"\\([\\'])").unwrap();
    static ref DOUBLE_QUOTED_ESCAPE: Regex = Regex::new(
        r#"\\(?:([nrtvef\\$"])|([0-7]{1,3})|x([0-9A-Fa-f]{1,2})|u\{([0-9A-Fa-f]+)\})"#
    )
    .unwrap();
}

impl EscapeSet {
    /// Resolves escapes in literal text. Unknown escapes are kept verbatim.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if !text.contains('\\') {
            return Cow::Borrowed(text);
        }
        match self {
            EscapeSet::SingleQuoted => SINGLE_QUOTED_ESCAPE.replace_all(text, "$1"),
            EscapeSet::DoubleQuoted | EscapeSet::Heredoc => {
                let set = *self;
                DOUBLE_QUOTED_ESCAPE.replace_all(text, |caps: &Captures| resolve_escape(set, caps))
            }
        }
    }
}

fn resolve_escape(set: EscapeSet, caps: &Captures) -> String {
    if let Some(simple) = caps.get(1) {
        return match simple.as_str() {
            "n" => "\n".into(),
            "r" => "\r".into(),
            "t" => "\t".into(),
            "v" => "\u{0b}".into(),
            "e" => "\u{1b}".into(),
            "f" => "\u{0c}".into(),
            "\"" if set == EscapeSet::Heredoc => "\\\"".into(),
            other => other.into(),
        };
    }
    let code = if let Some(octal) = caps.get(2) {
        u32::from_str_radix(octal.as_str(), 8).ok().map(|n| n & 0xff)
    } else if let Some(hex) = caps.get(3) {
        u32::from_str_radix(hex.as_str(), 16).ok()
    } else {
        caps.get(4)
            .and_then(|unicode| u32::from_str_radix(unicode.as_str(), 16).ok())
    };
    match code.and_then(char::from_u32) {
        Some(c) => c.to_string(),
        None => caps[0].to_string(),
    }
}

/// Rewrites `0x1A`, `0b101` and `017` as decimal. Decimal input and values
/// too large to convert are returned unchanged.
pub fn normalize_integer(text: &str) -> String {
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (bin, 2)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        return text.to_string();
    };
    u128::from_str_radix(digits, radix).map_or_else(|_| text.to_string(), |n| n.to_string())
}

/// An anchored regex terminal. Compiled when the owning grammar is linked.
#[derive(Clone)]
pub struct Terminal {
    source: Cow<'static, str>,
    case_insensitive: bool,
    group: usize,
    transform: Transform,
    compiled: Option<Regex>,
}

impl Terminal {
    pub fn new(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
            case_insensitive: false,
            group: 0,
            transform: Transform::None,
            compiled: None,
        }
    }

    /// Yields capture group `index` instead of the whole match.
    pub fn group(mut self, index: usize) -> Self {
        self.group = index;
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    pub(crate) fn compile(&mut self) -> Result<(), regex::Error> {
        if self.compiled.is_none() {
            let anchored = format!(r"\A(?:{})", self.source);
            let regex = RegexBuilder::new(&anchored)
                .case_insensitive(self.case_insensitive)
                .build()?;
            self.compiled = Some(regex);
        }
        Ok(())
    }

    /// Whether the terminal succeeds without consuming anything.
    pub fn matches_empty(&self) -> bool {
        match &self.compiled {
            Some(regex) => regex.is_match(""),
            None => {
                let mut linked = self.clone();
                linked.compile().is_ok() && linked.match_len("").is_some()
            }
        }
    }

    /// Number of bytes matched at the start of `input`, ignoring the capture.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        let regex = self.compiled.as_ref()?;
        regex.find(input).map(|m| m.end())
    }

    /// Matches at the start of `input`, returning the consumed length and the
    /// captured, transformed text.
    pub fn match_at(&self, input: &str) -> Option<(usize, Value)> {
        let regex = self.compiled.as_ref()?;
        let (len, text) = if self.group == 0 {
            let found = regex.find(input)?;
            (found.end(), found.as_str())
        } else {
            let caps = regex.captures(input)?;
            let len = caps.get(0).map_or(0, |m| m.end());
            (len, caps.get(self.group).map_or("", |m| m.as_str()))
        };
        Some((len, Value::Text(self.apply(text))))
    }

    fn apply(&self, text: &str) -> String {
        match self.transform {
            Transform::None => text.to_string(),
            Transform::Lowercase => text.to_lowercase(),
            Transform::Uppercase => text.to_uppercase(),
            Transform::Integer => normalize_integer(text),
            Transform::Escapes(set) => set.apply(text).into_owned(),
        }
    }
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)?;
        if self.case_insensitive {
            write!(f, "i")?;
        }
        if self.group != 0 {
            write!(f, "[{}]", self.group)?;
        }
        Ok(())
    }
}

/// A case-sensitive regex terminal.
pub fn re(source: impl Into<Cow<'static, str>>) -> Terminal {
    Terminal::new(source)
}

/// A case-insensitive regex terminal.
pub fn re_i(source: impl Into<Cow<'static, str>>) -> Terminal {
    Terminal::new(source).case_insensitive()
}

/// An exact piece of punctuation.
pub fn lit(text: &str) -> Terminal {
    Terminal::new(regex::escape(text))
}

/// A case-insensitive keyword that must not run into a following word
/// character. Yields the lowercased keyword.
pub fn kw(word: &str) -> Terminal {
    Terminal::new(format!(r"{}\b", regex::escape(word)))
        .case_insensitive()
        .transform(Transform::Lowercase)
}
