use thiserror::Error;

/// Errors surfaced by the public fold/unfold entry points.
///
/// Text anomalies (unbalanced parentheses, unterminated strings, unknown comment styles) are
/// absorbed by the lexer and engines; only caller mistakes are reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("invalid mode: {0:?} (expected one of j, a, p, c, py, css)")]
    InvalidMode(String),
}
