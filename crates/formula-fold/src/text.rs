//! String-literal aware text helpers shared by the translators and the reverse engine.
//!
//! Folded text is split into alternating code and literal segments using Excel's quoting rules
//! (`""` escapes a quote). Reverse transforms only ever rewrite code segments.

use crate::lexer::{is_word_char, string_literal_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Code(&'a str),
    /// A double-quoted literal including its quotes (the closing quote may be missing at end of
    /// input).
    Literal(&'a str),
}

impl<'a> Segment<'a> {
    pub(crate) fn text(&self) -> &'a str {
        match *self {
            Segment::Code(text) | Segment::Literal(text) => text,
        }
    }

    /// Content of a terminated literal without its quotes.
    pub(crate) fn literal_content(&self) -> Option<&'a str> {
        match *self {
            Segment::Literal(text) if text.len() >= 2 && text.ends_with('"') => {
                Some(&text[1..text.len() - 1])
            }
            _ => None,
        }
    }
}

pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find('"') {
            Some(0) => {
                let (len, _) = string_literal_len(rest);
                out.push(Segment::Literal(&rest[..len]));
                rest = &rest[len..];
            }
            Some(pos) => {
                out.push(Segment::Code(&rest[..pos]));
                rest = &rest[pos..];
            }
            None => {
                out.push(Segment::Code(rest));
                rest = "";
            }
        }
    }
    out
}

/// Rewrite every code segment with `f`, copying literals verbatim.
pub(crate) fn map_code(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        match segment {
            Segment::Code(code) => out.push_str(&f(code)),
            Segment::Literal(literal) => out.push_str(literal),
        }
    }
    out
}

/// Replace every occurrence of each `(from, to)` pair outside string literals, in order.
pub(crate) fn replace_in_code(text: &str, pairs: &[(&str, &str)]) -> String {
    map_code(text, |code| {
        pairs
            .iter()
            .fold(code.to_string(), |acc, (from, to)| acc.replace(from, to))
    })
}

/// Whether two rendered fragments must be separated by a space to stay distinct tokens: two word
/// characters (`A1` `B1`) or two quotes (`"a"` `"b"`) must not touch.
pub(crate) fn needs_space(left: &str, right: &str) -> bool {
    match (left.chars().next_back(), right.chars().next()) {
        (Some(a), Some(b)) => chars_fuse(a, b),
        _ => false,
    }
}

/// Whether `a` directly followed by `b` would scan as a single token.
pub(crate) fn chars_fuse(a: char, b: char) -> bool {
    (is_word_char(a) && is_word_char(b)) || (a == '"' && b == '"')
}

/// Leading whitespace width of `line`, counting a tab as one column.
pub(crate) fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
