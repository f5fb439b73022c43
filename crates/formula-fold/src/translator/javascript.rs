use super::{spaced_operator, spaced_punctuation, spaces, CommentSyntax, Translator};
use crate::lexer::is_cell_ref;
use crate::text::{map_code, replace_in_code, segments, Segment};

/// JavaScript-like notation: cell references become string literals so editors highlight them.
///
/// Genuine string literals whose content looks like a cell reference (`"A1"`) would be ambiguous
/// with a quoted reference, so they are written as back-tick literals (`` `A1` ``) instead.
#[derive(Debug)]
pub struct JavaScriptTranslator;

pub static JAVASCRIPT: JavaScriptTranslator = JavaScriptTranslator;

impl Translator for JavaScriptTranslator {
    fn format_function(&self, name: &str) -> String {
        name.to_string()
    }

    fn format_cell_ref(&self, reference: &str) -> String {
        format!("\"{reference}\"")
    }

    fn format_string(&self, literal: &str) -> String {
        match Segment::Literal(literal).literal_content() {
            Some(content) if is_cell_ref(content) => format!("`{content}`"),
            _ => literal.to_string(),
        }
    }

    fn format_number(&self, number: &str) -> String {
        number.to_string()
    }

    fn format_operator(&self, op: &str) -> String {
        match op {
            "<>" => " != ".to_string(),
            other => spaced_operator(other),
        }
    }

    fn format_punctuation(&self, punct: &str) -> String {
        spaced_punctuation(punct)
    }

    fn format_identifier(&self, identifier: &str) -> String {
        identifier.to_string()
    }

    fn header_comment(&self) -> Option<String> {
        Some("// Excel Formula (JavaScript syntax for highlighting)".to_string())
    }

    fn section_comment(&self, text: &str) -> Option<String> {
        Some(format!("// {text}"))
    }

    fn indent(&self, depth: usize) -> String {
        spaces(depth, 4)
    }

    fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax::Line("//")
    }

    /// `"A1"` → `A1`. Only literals whose whole content is a reference are unquoted.
    fn reverse_cell_ref(&self, text: &str) -> String {
        segments(text)
            .into_iter()
            .map(|segment| match segment.literal_content() {
                Some(content) if is_cell_ref(content) => content,
                _ => segment.text(),
            })
            .collect()
    }

    fn reverse_operator(&self, text: &str) -> String {
        replace_in_code(text, &[("!=", "<>")])
    }

    /// Restore back-tick literals to Excel strings.
    fn reverse_line(&self, text: &str) -> String {
        map_code(text, restore_backtick_literals)
    }
}

fn restore_backtick_literals(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;
    while let Some(start) = rest.find('`') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('`') {
            Some(end) if is_cell_ref(&after[..end]) => {
                out.push('"');
                out.push_str(&after[..end]);
                out.push('"');
                rest = &after[end + 1..];
            }
            _ => {
                out.push('`');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::test_support::assert_token_round_trips;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_round_trip() {
        assert_token_round_trips(&JAVASCRIPT);
    }

    #[test]
    fn references_are_quoted_and_reference_like_strings_use_backticks() {
        assert_eq!(JAVASCRIPT.format_cell_ref("A1:A10"), r#""A1:A10""#);
        assert_eq!(JAVASCRIPT.format_string(r#""A1""#), "`A1`");
        assert_eq!(JAVASCRIPT.format_string(r#""Total""#), r#""Total""#);
    }

    #[test]
    fn reverse_distinguishes_references_from_strings() {
        let folded = r#"IF( "A1" != `B2`, "B2", "text" )"#;
        assert_eq!(
            JAVASCRIPT.reverse(folded),
            r#"IF( A1 <> "B2", B2, "text" )"#
        );
    }

    #[test]
    fn stray_backticks_are_kept() {
        assert_eq!(restore_backtick_literals("a ` b"), "a ` b");
        assert_eq!(restore_backtick_literals("`x` `C3`"), r#"`x` "C3""#);
    }
}
