use super::{spaced_operator, spaced_punctuation, spaces, CommentSyntax, Translator};

/// Excel notation with spaced operators and parentheses.
///
/// The annotated and plain modes share this translator and differ only in whether a header and
/// comments are emitted.
#[derive(Debug)]
pub struct ExcelTranslator {
    header: Option<&'static str>,
    comments: bool,
}

pub static ANNOTATED: ExcelTranslator = ExcelTranslator {
    header: Some("// Excel Formula (annotated Excel syntax with helpful comments)"),
    comments: true,
};

pub static PLAIN: ExcelTranslator = ExcelTranslator {
    header: None,
    comments: false,
};

impl Translator for ExcelTranslator {
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
        spaced_operator(op)
    }

    fn format_punctuation(&self, punct: &str) -> String {
        spaced_punctuation(punct)
    }

    fn format_identifier(&self, identifier: &str) -> String {
        identifier.to_string()
    }

    fn header_comment(&self) -> Option<String> {
        self.header.map(str::to_string)
    }

    fn section_comment(&self, text: &str) -> Option<String> {
        self.comments.then(|| format!("// {text}"))
    }

    fn indent(&self, depth: usize) -> String {
        spaces(depth, 4)
    }

    fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax::Line("//")
    }

    // Excel tokens are emitted verbatim; spacing is normalized by the reverse engine.
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
        assert_token_round_trips(&ANNOTATED);
        assert_token_round_trips(&PLAIN);
    }

    #[test]
    fn plain_suppresses_every_comment() {
        assert_eq!(PLAIN.header_comment(), None);
        assert_eq!(PLAIN.section_comment("x"), None);
        assert_eq!(PLAIN.function_comment("SUM"), None);
    }

    #[test]
    fn annotated_comments_use_slashes() {
        assert_eq!(ANNOTATED.function_comment("sum").as_deref(), Some("// Sum values"));
        assert_eq!(ANNOTATED.function_comment("RAND"), None);
        assert_eq!(ANNOTATED.format_operator("<>"), " <> ");
        assert_eq!(ANNOTATED.indent(2), "        ");
    }
}
