use super::{spaced_operator, spaced_punctuation, spaces, CommentSyntax, Translator};
use crate::functions::{excel_name_for_python, python_name};
use crate::lexer::{is_cell_ref, is_word_char};
use crate::text::{map_code, replace_in_code, segments, Segment};

const SHEET_OPEN: &str = "sheet[";

/// Python-like notation: `sheet["A1"]` subscripts, `==`/`!=` comparisons and builtin-style names
/// for common functions.
#[derive(Debug)]
pub struct PythonTranslator;

pub static PYTHON: PythonTranslator = PythonTranslator;

impl Translator for PythonTranslator {
    fn format_function(&self, name: &str) -> String {
        python_name(name).unwrap_or(name).to_string()
    }

    fn format_cell_ref(&self, reference: &str) -> String {
        format!("{SHEET_OPEN}\"{reference}\"]")
    }

    fn format_string(&self, literal: &str) -> String {
        literal.to_string()
    }

    fn format_number(&self, number: &str) -> String {
        number.to_string()
    }

    fn format_operator(&self, op: &str) -> String {
        match op {
            "=" => " == ".to_string(),
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
        Some("# Excel Formula (Python syntax for highlighting)".to_string())
    }

    fn section_comment(&self, text: &str) -> Option<String> {
        Some(format!("# {text}"))
    }

    fn indent(&self, depth: usize) -> String {
        spaces(depth, 4)
    }

    fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax::Line("#")
    }

    /// `sheet["A1"]` → `A1`.
    fn reverse_cell_ref(&self, text: &str) -> String {
        let segs = segments(text);
        let mut out = String::with_capacity(text.len());
        let mut skip_bracket = false;
        for (idx, segment) in segs.iter().enumerate() {
            match *segment {
                Segment::Code(code) => {
                    let code = if skip_bracket {
                        code.strip_prefix(']').unwrap_or(code)
                    } else {
                        code
                    };
                    skip_bracket = false;
                    out.push_str(code);
                }
                Segment::Literal(literal) => {
                    let next_closes = matches!(
                        segs.get(idx + 1),
                        Some(Segment::Code(next)) if next.starts_with(']')
                    );
                    match segment.literal_content() {
                        Some(reference)
                            if next_closes
                                && is_cell_ref(reference)
                                && ends_with_sheet_open(&out) =>
                        {
                            out.truncate(out.len() - SHEET_OPEN.len());
                            out.push_str(reference);
                            skip_bracket = true;
                        }
                        _ => out.push_str(literal),
                    }
                }
            }
        }
        out
    }

    fn reverse_operator(&self, text: &str) -> String {
        replace_in_code(text, &[("==", "="), ("!=", "<>")])
    }

    /// Map Python-style names back to Excel functions where they are called.
    fn reverse_line(&self, text: &str) -> String {
        map_code(text, |code| {
            let mut out = String::with_capacity(code.len());
            let mut rest = code;
            while let Some(start) = rest.find(is_word_char) {
                out.push_str(&rest[..start]);
                let word_rest = &rest[start..];
                let len = word_rest
                    .find(|c: char| !is_word_char(c))
                    .unwrap_or(word_rest.len());
                let word = &word_rest[..len];
                let after = &word_rest[len..];
                match excel_name_for_python(word) {
                    Some(excel) if after.trim_start().starts_with('(') => out.push_str(excel),
                    _ => out.push_str(word),
                }
                rest = after;
            }
            out.push_str(rest);
            out
        })
    }
}

/// `sheet[` preceded by a non-word character (so `mysheet[` does not match).
fn ends_with_sheet_open(out: &str) -> bool {
    out.strip_suffix(SHEET_OPEN).is_some_and(|before| {
        before
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::test_support::assert_token_round_trips;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_round_trip() {
        assert_token_round_trips(&PYTHON);
    }

    #[test]
    fn forward_spelling() {
        assert_eq!(PYTHON.format_cell_ref("A1:A10"), r#"sheet["A1:A10"]"#);
        assert_eq!(PYTHON.format_function("AND"), "all");
        assert_eq!(PYTHON.format_function("Vlookup"), "Vlookup");
        assert_eq!(PYTHON.format_operator("="), " == ");
        assert_eq!(PYTHON.format_operator("<>"), " != ");
    }

    #[test]
    fn reverse_restores_excel() {
        let folded = r#"all( sheet["A1"] == 1, sum( sheet["B1:B3"] ) != "sum(x)" )"#;
        assert_eq!(
            PYTHON.reverse(folded),
            r#"AND( A1 = 1, SUM( B1:B3 ) <> "sum(x)" )"#
        );
    }

    #[test]
    fn names_are_only_mapped_in_call_position() {
        assert_eq!(PYTHON.reverse_line("len + max (A1)"), "len + MAX (A1)");
    }

    #[test]
    fn string_subscripts_that_are_not_references_stay() {
        let text = r#"sheet["Total"] & mysheet["A1"]"#;
        assert_eq!(PYTHON.reverse_cell_ref(text), text);
    }
}
