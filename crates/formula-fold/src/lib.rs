#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Fold single-line Excel formulas into indented, syntax-highlightable text and unfold them back.
//!
//! ```text
//! =IF(A1<>B1,"Different","Same")
//! ```
//!
//! folds (in the `j` mode) to
//!
//! ```text
//! // Excel Formula (JavaScript syntax for highlighting)
//! // Conditional logic
//! IF(
//!     "A1" != "B1",
//!     "Different",
//!     "Same"
//! )
//! ```
//!
//! and [`unfold`] turns that back into `=IF(A1<>B1, "Different", "Same")`. Unfolding is lossless up
//! to whitespace outside string literals; the `{=...}` array-formula wrapper survives every
//! fold/unfold/switch cycle.
//!
//! Each notation is a [`Translator`] registered under a short [`Mode`] id (`j`, `a`, `p`, `c`,
//! `py`, `css`). The pipeline is [`tokenize`] → [`tree::parse`] → [`layout`] for folding and
//! [`reverse`] for unfolding.

pub mod document;
pub mod error;
pub mod functions;
pub mod layout;
pub mod lexer;
pub mod options;
pub mod registry;
pub mod reverse;
mod text;
pub mod token;
pub mod translator;
pub mod tree;

pub use document::FormulaDocument;
pub use error::FoldError;
pub use layout::{fold_document, layout_document, Line, LineKind};
pub use lexer::{is_cell_ref, tokenize};
pub use options::FoldOptions;
pub use registry::{detect_mode, translator, Mode};
pub use reverse::unfold_text;
pub use token::{Token, TokenKind};
pub use translator::{CommentSyntax, Translator};

/// Fold `formula` (with or without its leading `=`) in the mode named `mode_id`.
pub fn fold(mode_id: &str, formula: &str) -> Result<String, FoldError> {
    fold_with_options(mode_id, formula, &FoldOptions::default())
}

pub fn fold_with_options(
    mode_id: &str,
    formula: &str,
    options: &FoldOptions,
) -> Result<String, FoldError> {
    let translator = translator(mode_id)?;
    Ok(fold_document(
        &FormulaDocument::parse(formula),
        translator,
        options,
    ))
}

/// Unfold text produced by [`fold`] in `mode_id` back to a single-line formula.
pub fn unfold(mode_id: &str, text: &str) -> Result<String, FoldError> {
    let translator = translator(mode_id)?;
    Ok(unfold_text(text, translator))
}

/// Re-fold text from one mode into another. Equal modes return `text` unchanged.
pub fn switch_mode(text: &str, from_id: &str, to_id: &str) -> Result<String, FoldError> {
    switch_mode_with_options(text, from_id, to_id, &FoldOptions::default())
}

pub fn switch_mode_with_options(
    text: &str,
    from_id: &str,
    to_id: &str,
    options: &FoldOptions,
) -> Result<String, FoldError> {
    let from: Mode = from_id.parse()?;
    let to: Mode = to_id.parse()?;
    if from == to {
        return Ok(text.to_string());
    }
    log::debug!("switching folded text from mode {from} to mode {to}");
    let formula = unfold_text(text, from.translator());
    Ok(fold_document(
        &FormulaDocument::parse(&formula),
        to.translator(),
        options,
    ))
}

/// Fold a single-line formula, or unfold text that spans several lines.
///
/// Blank input yields an empty string. A single line that does not start with `=` or `{=` is not a
/// formula and is returned unchanged.
pub fn auto_format(mode_id: &str, text: &str) -> Result<String, FoldError> {
    auto_format_with_options(mode_id, text, &FoldOptions::default())
}

pub fn auto_format_with_options(
    mode_id: &str,
    text: &str,
    options: &FoldOptions,
) -> Result<String, FoldError> {
    let translator = translator(mode_id)?;
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(first) = lines.next() else {
        return Ok(String::new());
    };
    if lines.next().is_some() {
        return Ok(unfold_text(text, translator));
    }
    let first = first.trim_start();
    if first.starts_with('=') || first.starts_with("{=") {
        Ok(fold_document(
            &FormulaDocument::parse(text),
            translator,
            options,
        ))
    } else {
        log::debug!("auto format left a single non-formula line unchanged");
        Ok(text.to_string())
    }
}
