use crate::lexer::tokenize;
use crate::token::Token;

/// A raw formula split into its array-formula flag and body tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaDocument {
    pub is_array_formula: bool,
    pub tokens: Vec<Token>,
}

impl FormulaDocument {
    /// Trim `raw` and strip its `{=...}` or `=` prefix. Input without a prefix is treated as if it
    /// started with `=`.
    pub fn parse(raw: &str) -> Self {
        let (is_array_formula, body) = split_formula(raw);
        Self {
            is_array_formula,
            tokens: tokenize(body),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Returns `(is_array_formula, body)` for a single formula.
pub(crate) fn split_formula(raw: &str) -> (bool, &str) {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("{=")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        return (true, inner.trim());
    }
    let body = trimmed.strip_prefix('=').unwrap_or(trimmed);
    (false, body.trim())
}

/// Wrap a formula body back into `=body` or `{=body}`.
pub(crate) fn wrap_formula(body: &str, is_array_formula: bool) -> String {
    if body.is_empty() {
        String::new()
    } else if is_array_formula {
        format!("{{={body}}}")
    } else {
        format!("={body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_leading_equals() {
        let doc = FormulaDocument::parse("  =SUM(A1:A10) ");
        assert!(!doc.is_array_formula);
        assert_eq!(doc.tokens[0], Token::new(TokenKind::Function, "SUM"));
    }

    #[test]
    fn detects_array_wrapper() {
        let doc = FormulaDocument::parse("{=SUM(A1:A3*B1:B3)}");
        assert!(doc.is_array_formula);
        assert_eq!(doc.tokens.len(), 6);
    }

    #[test]
    fn missing_prefix_is_an_implicit_formula() {
        assert_eq!(split_formula("A1+1"), (false, "A1+1"));
        assert!(FormulaDocument::parse("").is_empty());
        assert!(FormulaDocument::parse("=").is_empty());
    }

    #[test]
    fn unbalanced_brace_is_not_an_array_wrapper() {
        assert_eq!(split_formula("{=A1"), (false, "{=A1"));
    }

    #[test]
    fn wraps_bodies() {
        assert_eq!(wrap_formula("A1", false), "=A1");
        assert_eq!(wrap_formula("A1", true), "{=A1}");
        assert_eq!(wrap_formula("", true), "");
    }
}
