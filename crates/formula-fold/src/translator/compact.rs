use super::{spaces, CommentSyntax, Translator};

/// Excel notation with no spacing at all and two-column indentation.
#[derive(Debug)]
pub struct CompactTranslator;

pub static COMPACT: CompactTranslator = CompactTranslator;

impl Translator for CompactTranslator {
    fn format_function(&self, name: &str) -> String {
        name.to_string()
    }

    fn format_cell_ref(&self, reference: &str) -> String {
        reference.to_string()
    }

    fn format_string(&self, literal: &str) -> String {
        literal.to_string()
    }

    fn format_number(&self, number: &str) -> String {
        number.to_string()
    }

    fn format_operator(&self, op: &str) -> String {
        op.to_string()
    }

    fn format_punctuation(&self, punct: &str) -> String {
        punct.to_string()
    }

    fn format_identifier(&self, identifier: &str) -> String {
        identifier.to_string()
    }

    fn header_comment(&self) -> Option<String> {
        None
    }

    fn section_comment(&self, _text: &str) -> Option<String> {
        None
    }

    fn indent(&self, depth: usize) -> String {
        spaces(depth, 2)
    }

    fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax::Line("//")
    }

    fn reverse_cell_ref(&self, text: &str) -> String {
        text.to_string()
    }

    fn reverse_operator(&self, text: &str) -> String {
        text.to_string()
    }

    fn reverse_line(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::test_support::assert_token_round_trips;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_round_trip() {
        assert_token_round_trips(&COMPACT);
    }

    #[test]
    fn nothing_is_spaced() {
        assert_eq!(COMPACT.format_operator("<>"), "<>");
        assert_eq!(COMPACT.format_punctuation(","), ",");
        assert_eq!(COMPACT.format_punctuation("("), "(");
        assert_eq!(COMPACT.indent(3), "      ");
        assert_eq!(COMPACT.function_comment("SUM"), None);
    }
}
