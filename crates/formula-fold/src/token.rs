//! Lexical units produced by [`crate::tokenize`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A double-quoted literal, including both delimiting quotes.
    String,
    /// A cell or range reference, optionally sheet-qualified (e.g. `Sheet1!$A$1:B2`).
    CellRef,
    Operator,
    Punctuation,
    /// A name from the built-in function catalog (case-insensitive match).
    Function,
    Number,
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text exactly as written (original casing, quotes and `$` markers preserved).
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.text == punct
    }

    /// Upper-cased function name, used to select a layout policy.
    pub fn name_upper(&self) -> String {
        self.text.to_ascii_uppercase()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
