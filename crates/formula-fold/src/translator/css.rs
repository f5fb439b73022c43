use super::{spaced_operator, spaces, CommentSyntax, Translator};
use crate::lexer::{is_cell_ref, is_word_char};
use crate::text::{map_code, replace_in_code};

/// Reference characters that are not valid in a CSS id, with their spelled-out replacements.
/// Decoding applies them in reverse order.
const REF_ESCAPES: [(&str, &str); 3] = [("$", "abs_"), (":", "_to_"), ("!", "_sheet_")];

const STRING_PREFIX: &str = "content:";
const NUMBER_PREFIX: &str = "value:";

/// CSS-like notation: functions as classes, references as ids, arguments as declarations.
///
/// Excel array constants (`{1,2}`) and `;` separators collide with this notation's own braces
/// and semicolons and do not survive a round trip.
#[derive(Debug)]
pub struct CssTranslator;

pub static CSS: CssTranslator = CssTranslator;

impl Translator for CssTranslator {
    fn format_function(&self, name: &str) -> String {
        format!(".{name}")
    }

    fn format_cell_ref(&self, reference: &str) -> String {
        let id = REF_ESCAPES
            .iter()
            .fold(reference.to_string(), |acc, (raw, escaped)| {
                acc.replace(raw, escaped)
            });
        format!("#{id}")
    }

    fn format_string(&self, literal: &str) -> String {
        format!("{STRING_PREFIX} {literal}")
    }

    fn format_number(&self, number: &str) -> String {
        format!("{NUMBER_PREFIX} {number}")
    }

    fn format_operator(&self, op: &str) -> String {
        match op {
            "<>" => " != ".to_string(),
            other => spaced_operator(other),
        }
    }

    fn format_punctuation(&self, punct: &str) -> String {
        match punct {
            "(" => " {".to_string(),
            ")" => " }".to_string(),
            "," => "; ".to_string(),
            other => other.to_string(),
        }
    }

    fn format_identifier(&self, identifier: &str) -> String {
        identifier.to_string()
    }

    fn header_comment(&self) -> Option<String> {
        Some("/* Excel Formula (CSS syntax for highlighting) */".to_string())
    }

    fn section_comment(&self, text: &str) -> Option<String> {
        Some(format!("/* {text} */"))
    }

    fn indent(&self, depth: usize) -> String {
        spaces(depth, 4)
    }

    fn comment_syntax(&self) -> CommentSyntax {
        CommentSyntax::Block {
            open: "/*",
            close: "*/",
        }
    }

    /// `#Sheet1_sheet_abs_A1_to_B2` → `Sheet1!$A1:B2`. Error literals such as `#N/A` do not decode
    /// to a reference and are left alone.
    fn reverse_cell_ref(&self, text: &str) -> String {
        map_code(text, |code| {
            let mut out = String::with_capacity(code.len());
            let mut rest = code;
            while let Some(hash) = rest.find('#') {
                out.push_str(&rest[..hash]);
                let after = &rest[hash + 1..];
                let len = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                let decoded = decode_id(&after[..len]);
                if len > 0 && is_cell_ref(&decoded) {
                    out.push_str(&decoded);
                    rest = &after[len..];
                } else {
                    out.push('#');
                    rest = after;
                }
            }
            out.push_str(rest);
            out
        })
    }

    fn reverse_operator(&self, text: &str) -> String {
        replace_in_code(text, &[("!=", "<>")])
    }

    fn reverse_line(&self, text: &str) -> String {
        map_code(text, |code| {
            let code = restore_calls(code);
            let code = strip_prefix_word(&code, STRING_PREFIX, |after| after == " ");
            let code = strip_prefix_word(&code, NUMBER_PREFIX, |after| {
                after
                    .strip_prefix(' ')
                    .is_some_and(|num| num.starts_with(|c: char| c.is_ascii_digit() || c == '.'))
            });
            code.replace('{', "(").replace('}', ")").replace(';', ",")
        })
    }
}

fn decode_id(id: &str) -> String {
    REF_ESCAPES
        .iter()
        .rev()
        .fold(id.to_string(), |acc, (raw, escaped)| acc.replace(escaped, raw))
}

fn starts_word(code: &str, at: usize) -> bool {
    code[..at]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c))
}

/// `.NAME {` → `NAME(`. A `.` only starts a class when it begins a word and is followed by a
/// letter, so decimals like `.5` are untouched.
fn restore_calls(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;
    let mut consumed = 0;
    while let Some(dot) = rest.find('.') {
        let after = &rest[dot + 1..];
        let name_len = after
            .find(|c: char| !is_word_char(c))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let tail = &after[name_len..];
        let is_class = starts_word(code, consumed + dot)
            && name.starts_with(|c: char| c.is_ascii_alphabetic())
            && tail.trim_start().starts_with('{');
        out.push_str(&rest[..dot]);
        if is_class {
            out.push_str(name);
            out.push('(');
            let brace = tail.len() - tail.trim_start().len();
            let next = dot + 1 + name_len + brace + 1;
            consumed += next;
            rest = &rest[next..];
        } else {
            out.push('.');
            consumed += dot + 1;
            rest = &rest[dot + 1..];
        }
    }
    out.push_str(rest);
    out
}

/// Drop `prefix` and the space after it wherever it starts a word and `accept` holds for the rest
/// of the code segment. A string prefix always ends its segment (`content: ` precedes the literal)
/// and a number prefix is followed by the number, so names such as `content:value` are kept.
fn strip_prefix_word(code: &str, prefix: &str, accept: impl Fn(&str) -> bool) -> String {
    let mut out = String::with_capacity(code.len());
    let mut from = 0;
    while let Some(pos) = code[from..].find(prefix) {
        let at = from + pos;
        out.push_str(&code[from..at]);
        let after = &code[at + prefix.len()..];
        if starts_word(code, at) && accept(after) {
            from = at + prefix.len() + 1;
        } else {
            out.push_str(prefix);
            from = at + prefix.len();
        }
    }
    out.push_str(&code[from..]);
    out
}
