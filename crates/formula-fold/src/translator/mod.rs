//! Target notations for folded output.
//!
//! A [`Translator`] decides how each token kind is spelled in one notation, how comments and
//! indentation look, and how to undo its own spelling when unfolding. Translators are stateless
//! `static`s registered in [`crate::registry`].
//!
//! Reverse hooks receive whole (joined) folded text and must leave string literals untouched; the
//! helpers in [`crate::text`] take care of splitting code from literals.

mod compact;
mod css;
mod excel;
mod javascript;
mod python;

pub use compact::{CompactTranslator, COMPACT};
pub use css::{CssTranslator, CSS};
pub use excel::{ExcelTranslator, ANNOTATED, PLAIN};
pub use javascript::{JavaScriptTranslator, JAVASCRIPT};
pub use python::{PythonTranslator, PYTHON};

use crate::functions::function_description;
use crate::token::{Token, TokenKind};

/// How comments are recognized when unfolding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSyntax {
    /// Comment runs from the marker to end of line (`//`, `#`).
    Line(&'static str),
    /// Delimited comment (`/* ... */`).
    Block {
        open: &'static str,
        close: &'static str,
    },
}

/// Separator comment text emitted before each `IFS`/`SWITCH` case/result pair.
pub const CASE_PAIR_LABEL: &str = "── CASE/RESULT PAIR ──";

pub trait Translator: Send + Sync {
    fn format_function(&self, name: &str) -> String;
    fn format_cell_ref(&self, reference: &str) -> String;
    /// `literal` includes its quotes.
    fn format_string(&self, literal: &str) -> String;
    fn format_number(&self, number: &str) -> String;
    fn format_operator(&self, op: &str) -> String;
    fn format_punctuation(&self, punct: &str) -> String;
    fn format_identifier(&self, identifier: &str) -> String;

    /// First line of folded output, if the notation has one.
    fn header_comment(&self) -> Option<String>;
    /// A full comment line carrying `text`; `None` means this notation emits no comments at all.
    fn section_comment(&self, text: &str) -> Option<String>;
    fn indent(&self, depth: usize) -> String;
    fn comment_syntax(&self) -> CommentSyntax;

    fn reverse_cell_ref(&self, text: &str) -> String;
    fn reverse_operator(&self, text: &str) -> String;
    fn reverse_line(&self, text: &str) -> String;

    /// Comment placed above a multi-line call to `name`.
    fn function_comment(&self, name: &str) -> Option<String> {
        self.section_comment(function_description(name)?)
    }

    fn format_token(&self, token: &Token) -> String {
        let text = token.text.as_str();
        match token.kind {
            TokenKind::String => self.format_string(text),
            TokenKind::CellRef => self.format_cell_ref(text),
            TokenKind::Operator => self.format_operator(text),
            TokenKind::Punctuation => self.format_punctuation(text),
            TokenKind::Function => self.format_function(text),
            TokenKind::Number => self.format_number(text),
            TokenKind::Identifier => self.format_identifier(text),
        }
    }

    /// Undo every forward transformation, in the fixed order cell refs, operators, then the rest.
    fn reverse(&self, text: &str) -> String {
        let text = self.reverse_cell_ref(text);
        let text = self.reverse_operator(&text);
        self.reverse_line(&text)
    }
}

/// Operators surrounded by single spaces, as most notations render them.
pub(crate) fn spaced_operator(op: &str) -> String {
    format!(" {op} ")
}

/// Parentheses padded on the inside and a space after commas.
pub(crate) fn spaced_punctuation(punct: &str) -> String {
    match punct {
        "(" => "( ".to_string(),
        ")" => " )".to_string(),
        "," => ", ".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn spaces(depth: usize, unit: usize) -> String {
    " ".repeat(depth * unit)
}
