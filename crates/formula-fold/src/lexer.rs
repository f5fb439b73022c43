//! Single-pass formula scanner.
//!
//! The lexer is deliberately tolerant: it never fails, always terminates, and every
//! non-whitespace character of the input ends up in exactly one [`Token`]. Malformed input
//! (unterminated strings, stray characters) degrades to literal tokens so that folding can still
//! reproduce it.

use crate::functions::is_function_name;
use crate::token::{Token, TokenKind};

/// Two-character comparison operators, matched before their one-character prefixes.
const TWO_CHAR_OPERATORS: [&str; 3] = ["<>", ">=", "<="];

/// Excel caps column letters at `XFD`.
const MAX_COLUMN_LETTERS: usize = 3;

/// Scan a formula body (no leading `=` / `{=` wrapper) into tokens.
pub fn tokenize(body: &str) -> Vec<Token> {
    Lexer::new(body).lex()
}

pub(crate) fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '^' | '&' | '=' | '<' | '>')
}

pub(crate) fn is_punctuation_char(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | ',' | ':' | ';' | '!' | '%' | '[' | ']' | '{' | '}'
    )
}

/// Characters that terminate a word.
pub(crate) fn is_delimiter(c: char) -> bool {
    c == '"' || is_operator_char(c) || is_punctuation_char(c)
}

/// Characters that can be part of a bare word (names, numbers, references).
pub(crate) fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !is_delimiter(c)
}

/// Length in bytes of the string literal at the start of `src` (which must begin with `"`), and
/// whether it was terminated. A doubled `""` inside the literal is an escaped quote.
pub(crate) fn string_literal_len(src: &str) -> (usize, bool) {
    debug_assert!(src.starts_with('"'));
    let bytes = src.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return (i + 1, true);
        }
        i += 1;
    }
    (bytes.len(), false)
}

/// `true` when `text` is exactly one cell reference (or range), e.g. `A1`, `$B$2:C3`,
/// `Sheet1!A1`.
pub fn is_cell_ref(text: &str) -> bool {
    match_cell_ref(text) == Some(text.len())
}

/// Length of the cell reference at the start of `src`, if there is one.
///
/// The match must end at a word boundary and must not be immediately followed by `(`, so that
/// function names shaped like references (`LOG10(`, `ATAN2(`) stay function calls.
pub(crate) fn match_cell_ref(src: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let sheet_len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    if sheet_len > 0 && bytes.get(sheet_len) == Some(&b'!') {
        let offset = sheet_len + 1;
        if let Some(len) = match_a1_range(src, offset) {
            return Some(offset + len);
        }
    }
    match_a1_range(src, 0)
}

fn match_a1_range(src: &str, offset: usize) -> Option<usize> {
    let bytes = &src.as_bytes()[offset..];
    let first = match_a1_cell(bytes)?;
    if bytes.get(first) == Some(&b':') {
        if let Some(second) = match_a1_cell(&bytes[first + 1..]) {
            let end = first + 1 + second;
            if ends_at_boundary(src, offset + end) {
                return Some(end);
            }
        }
    }
    ends_at_boundary(src, offset + first).then_some(first)
}

fn match_a1_cell(bytes: &[u8]) -> Option<usize> {
    let mut i = 0;
    if bytes.first() == Some(&b'$') {
        i += 1;
    }
    let cols = bytes[i..]
        .iter()
        .take_while(|b| b.is_ascii_uppercase())
        .count();
    if cols == 0 || cols > MAX_COLUMN_LETTERS {
        return None;
    }
    i += cols;
    if bytes.get(i) == Some(&b'$') {
        i += 1;
    }
    let rows = bytes[i..].iter().take_while(|b| b.is_ascii_digit()).count();
    if rows == 0 {
        return None;
    }
    Some(i + rows)
}

fn ends_at_boundary(src: &str, end: usize) -> bool {
    match src[end..].chars().next() {
        None => true,
        Some('(') => false,
        Some(c) => !is_word_char(c),
    }
}

/// Decimal literal with optional fraction and exponent (`12`, `1.5`, `.5`, `3E10`).
///
/// Signed exponents never reach this check: `+`/`-` are delimiters, so `1E+5` scans as three
/// tokens.
pub(crate) fn is_number(text: &str) -> bool {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(pos) => (&text[..pos], Some(&text[pos + 1..])),
        None => (text, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return false;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return false;
    }
    exponent.map_or(true, |exp| !exp.is_empty() && all_digits(exp))
}

struct Lexer<'a> {
    src: &'a str,
    chars: std::str::Chars<'a>,
    idx: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.chars(),
            idx: 0,
            tokens: Vec::new(),
        }
    }

    fn lex(mut self) -> Vec<Token> {
        while let Some(ch) = self.peek_char() {
            let start = self.idx;
            if ch.is_whitespace() {
                self.bump();
                continue;
            }

            if ch == '"' {
                let (len, terminated) = string_literal_len(&self.src[start..]);
                if !terminated {
                    log::debug!("unterminated string literal at byte {start}; taking rest of input");
                }
                self.advance_to(start + len);
                self.push(TokenKind::String, start);
                continue;
            }

            if let Some(len) = match_cell_ref(&self.src[start..]) {
                self.advance_to(start + len);
                self.push(TokenKind::CellRef, start);
                continue;
            }

            if let Some(op) = TWO_CHAR_OPERATORS
                .iter()
                .find(|op| self.src[start..].starts_with(**op))
            {
                self.advance_to(start + op.len());
                self.push(TokenKind::Operator, start);
                continue;
            }

            if is_operator_char(ch) {
                self.bump();
                self.push(TokenKind::Operator, start);
                continue;
            }

            if is_punctuation_char(ch) {
                self.bump();
                self.push(TokenKind::Punctuation, start);
                continue;
            }

            self.take_while(is_word_char);
            let word = &self.src[start..self.idx];
            let kind = classify_word(word, self.peek_char() == Some('('));
            self.push(kind, start);
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens
            .push(Token::new(kind, &self.src[start..self.idx]));
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.idx += ch.len_utf8();
        Some(ch)
    }

    fn advance_to(&mut self, end: usize) {
        while self.idx < end {
            if self.bump().is_none() {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn take_while<F>(&mut self, mut pred: F)
    where
        F: FnMut(char) -> bool,
    {
        while let Some(ch) = self.peek_char() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }
}

fn classify_word(word: &str, followed_by_paren: bool) -> TokenKind {
    if is_function_name(word) {
        TokenKind::Function
    } else if !followed_by_paren && is_cell_ref(word) {
        TokenKind::CellRef
    } else if is_number(word) {
        TokenKind::Number
    } else {
        TokenKind::Identifier
    }
}
