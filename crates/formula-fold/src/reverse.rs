//! Unfold direction: folded text + translator → canonical single-line Excel formula.
//!
//! Unfolding never fails. Text that was not produced by [`crate::fold`] is handled best-effort:
//! comments are removed, lines are joined, the translator's spelling is undone and the result is
//! re-tokenized so spacing is canonical.

use crate::document::{split_formula, wrap_formula};
use crate::lexer::{string_literal_len, tokenize};
use crate::text::needs_space;
use crate::token::Token;
use crate::translator::{CommentSyntax, Translator};

pub fn unfold_text(text: &str, translator: &dyn Translator) -> String {
    let stripped = strip_comments(text, translator.comment_syntax());
    let mut lines: Vec<&str> = stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut is_array_formula = false;
    if lines.len() >= 2 && lines.first() == Some(&"{=") && lines.last() == Some(&"}") {
        is_array_formula = true;
        lines.remove(0);
        lines.pop();
    }

    let joined = lines.join(" ");
    let reversed = translator.reverse(&joined);
    let (single_line_array, body) = split_formula(&reversed);
    let body = if is_array_formula {
        body.strip_prefix('=').unwrap_or(body).trim()
    } else {
        body
    };
    wrap_formula(
        &normalize_body(body),
        is_array_formula || single_line_array,
    )
}

/// Remove comments outside string literals.
///
/// Line comments run from the marker to the end of the line; text before the marker is kept
/// (including a trailing comma). A line marker only counts at the start of a line or after
/// whitespace, and only when followed by whitespace or the end of the line, so `#N/A` and `//`
/// inside references are not comments.
pub(crate) fn strip_comments(text: &str, syntax: CommentSyntax) -> String {
    let mut out = String::with_capacity(text.len());
    let mut idx = 0;
    while idx < text.len() {
        let rest = &text[idx..];
        if rest.starts_with('"') {
            let (len, _) = string_literal_len(rest);
            out.push_str(&rest[..len]);
            idx += len;
            continue;
        }

        match syntax {
            CommentSyntax::Line(marker)
                if rest.starts_with(marker) && is_line_comment(text, idx, marker) =>
            {
                idx += rest.find('\n').unwrap_or(rest.len());
                continue;
            }
            CommentSyntax::Block { open, close } if rest.starts_with(open) => {
                let body = &rest[open.len()..];
                idx += match body.find(close) {
                    Some(end) => open.len() + end + close.len(),
                    None => rest.len(),
                };
                continue;
            }
            _ => {}
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}

fn is_line_comment(text: &str, at: usize, marker: &str) -> bool {
    let starts_ok = text[..at]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    let ends_ok = text[at + marker.len()..]
        .chars()
        .next()
        .map_or(true, char::is_whitespace);
    starts_ok && ends_ok
}

/// Re-render a formula body with canonical spacing: `", "` after commas, a single space between
/// adjacent names (the intersection operator), nothing else.
pub fn normalize_body(body: &str) -> String {
    let tokens = tokenize(body);
    let mut out = String::with_capacity(body.len());
    let mut prev: Option<&Token> = None;
    for token in &tokens {
        if let Some(prev) = prev {
            let space = if prev.is_punct(",") {
                !(token.is_punct(",") || token.is_punct(")"))
            } else {
                needs_space(&prev.text, &token.text)
            };
            if space {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(token);
    }
    out
}
