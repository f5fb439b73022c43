//! Fold direction: call tree + translator → indented lines.
//!
//! Every [`Line`] carries its own nesting depth; indentation is applied only when rendering, so a
//! line can be re-indented by a different translator without re-running layout.
//!
//! Layout policies are chosen by the upper-cased function name:
//!
//! - `LET`: `name, value` pairs share a line, the trailing body sits one level deeper.
//! - `IFS` / `SWITCH`: one block per argument, with a separator comment before every case/result
//!   pair.
//! - `AND` / `OR`: packed onto as few lines as fit when every argument is itself one line.
//! - everything else: short single-argument calls stay inline, otherwise one argument per line.

use crate::document::FormulaDocument;
use crate::options::FoldOptions;
use crate::text::{chars_fuse, needs_space};
use crate::token::{Token, TokenKind};
use crate::translator::{Translator, CASE_PAIR_LABEL};
use crate::tree::{parse, ArgumentGroup, Call, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Code,
    Comment,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub depth: usize,
    /// Unindented, trimmed text.
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    fn code(depth: usize, text: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
            kind: LineKind::Code,
        }
    }

    fn comment(depth: usize, text: impl Into<String>) -> Self {
        Self {
            depth,
            text: text.into(),
            kind: LineKind::Comment,
        }
    }

    fn blank() -> Self {
        Self {
            depth: 0,
            text: String::new(),
            kind: LineKind::Blank,
        }
    }

    pub fn render(&self, translator: &dyn Translator) -> String {
        match self.kind {
            LineKind::Blank => String::new(),
            LineKind::Code | LineKind::Comment => {
                format!("{}{}", translator.indent(self.depth), self.text)
            }
        }
    }
}

/// Lay out a parsed formula, including the header comment and array wrapper lines.
pub fn layout_document(
    document: &FormulaDocument,
    translator: &dyn Translator,
    options: &FoldOptions,
) -> Vec<Line> {
    if document.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    if let Some(header) = translator.header_comment() {
        lines.push(Line::comment(0, header));
    }
    if document.is_array_formula {
        lines.push(Line::code(0, "{="));
    }
    let nodes = parse(document.tokens.clone());
    let engine = LayoutEngine {
        translator,
        options,
    };
    lines.extend(engine.layout_nodes(&nodes, 0, Context::default()));
    if document.is_array_formula {
        lines.push(Line::code(0, "}"));
    }
    lines
}

/// Fold a parsed formula into newline-joined text.
pub fn fold_document(
    document: &FormulaDocument,
    translator: &dyn Translator,
    options: &FoldOptions,
) -> String {
    layout_document(document, translator, options)
        .iter()
        .map(|line| line.render(translator))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Calls laid out directly inside an `IFS`/`SWITCH` argument list get no function comment.
    in_case_list: bool,
}

/// Accumulates rendered fragments for one line, separating fragments that would otherwise fuse
/// into a different token.
#[derive(Debug)]
struct LineBuffer {
    depth: usize,
    text: String,
    /// Last Excel character behind the most recent fragment, when it came from a source token.
    source_tail: Option<char>,
}

impl LineBuffer {
    fn new(depth: usize) -> Self {
        Self::with_text(depth, String::new())
    }

    fn with_text(depth: usize, text: String) -> Self {
        Self {
            depth,
            text,
            source_tail: None,
        }
    }

    /// Push a rendering of Excel source text whose first and last characters are `head` and
    /// `tail`. Adjacent source tokens that would scan as one (the intersection operator) stay
    /// separated even when the rendered text would not fuse, e.g. `sheet["A1"] sheet["B1"]`.
    fn push_source(&mut self, fragment: &str, head: Option<char>, tail: Option<char>) {
        let fuses = matches!((self.source_tail, head), (Some(a), Some(b)) if chars_fuse(a, b));
        if fuses && !self.text.is_empty() && !self.text.ends_with(char::is_whitespace) {
            self.text.push(' ');
        }
        self.push(fragment);
        self.source_tail = tail;
    }

    fn push(&mut self, fragment: &str) {
        self.source_tail = None;
        let fragment = if self.text.is_empty() || self.text.ends_with(char::is_whitespace) {
            fragment.trim_start()
        } else {
            fragment
        };
        if fragment.is_empty() {
            return;
        }
        if needs_space(&self.text, fragment) {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
    }

    fn trimmed(&self) -> &str {
        self.text.trim()
    }

    fn finish(self) -> Option<Line> {
        let text = self.text.trim();
        (!text.is_empty()).then(|| Line::code(self.depth, text))
    }

    fn flush_into(&mut self, lines: &mut Vec<Line>) {
        let depth = self.depth;
        if let Some(line) = std::mem::replace(self, LineBuffer::new(depth)).finish() {
            lines.push(line);
        }
    }
}

/// Append `comma` to the last code line.
fn append_comma(lines: &mut [Line], comma: &str) {
    if let Some(line) = lines
        .iter_mut()
        .rev()
        .find(|line| line.kind == LineKind::Code)
    {
        line.text.push_str(comma);
    }
}

struct LayoutEngine<'a> {
    translator: &'a dyn Translator,
    options: &'a FoldOptions,
}

impl LayoutEngine<'_> {
    fn layout_nodes(&self, nodes: &[Node], depth: usize, ctx: Context) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current = LineBuffer::new(depth);
        for node in nodes {
            match node {
                Node::Leaf(token) => self.push_leaf(&mut current, token),
                Node::Call(call) => {
                    if let Some(text) = self.single_line(call, depth) {
                        current.push_source(&text, call.name.text.chars().next(), None);
                        continue;
                    }
                    current.flush_into(&mut lines);
                    let mut call_lines = self.layout_call(call, depth, ctx);
                    // Whatever follows the call continues on its closing line.
                    if call_lines.last().is_some_and(|l| l.kind == LineKind::Code) {
                        if let Some(closing) = call_lines.pop() {
                            current = LineBuffer::with_text(closing.depth, closing.text);
                        }
                    }
                    lines.extend(call_lines);
                }
            }
        }
        current.flush_into(&mut lines);
        lines
    }

    fn push_leaf(&self, buf: &mut LineBuffer, token: &Token) {
        buf.push_source(
            &self.render_leaf(token),
            token.text.chars().next(),
            token.text.chars().next_back(),
        );
    }

    fn render_leaf(&self, token: &Token) -> String {
        match token.kind {
            // A function name that is not called is a plain name.
            TokenKind::Function => self.translator.format_identifier(&token.text),
            _ => self.translator.format_token(token),
        }
    }

    fn comma(&self) -> String {
        self.translator.format_punctuation(",").trim_end().to_string()
    }

    fn header(&self, call: &Call) -> String {
        let mut buf = LineBuffer::new(0);
        buf.push(&self.translator.format_function(&call.name.text));
        buf.push(&self.translator.format_punctuation("("));
        buf.trimmed().to_string()
    }

    fn closing(&self) -> String {
        self.translator.format_punctuation(")").trim().to_string()
    }

    /// Render a group on one line, or `None` if any call in it needs several lines.
    fn inline_group(&self, group: &ArgumentGroup, depth: usize) -> Option<String> {
        let mut buf = LineBuffer::new(0);
        for node in &group.nodes {
            match node {
                Node::Leaf(token) => self.push_leaf(&mut buf, token),
                Node::Call(call) => {
                    let text = self.single_line(call, depth)?;
                    buf.push_source(&text, call.name.text.chars().next(), None);
                }
            }
        }
        Some(buf.trimmed().to_string())
    }

    fn call_text(&self, call: &Call, args: &[String]) -> String {
        let mut buf = LineBuffer::new(0);
        buf.push(&self.translator.format_function(&call.name.text));
        if args.is_empty() {
            buf.push(self.translator.format_punctuation("(").trim_end());
            if call.closed {
                buf.push(self.translator.format_punctuation(")").trim_start());
            }
            return buf.trimmed().to_string();
        }
        buf.push(&self.translator.format_punctuation("("));
        let separator = self.translator.format_punctuation(",");
        for (idx, arg) in args.iter().enumerate() {
            if idx > 0 {
                buf.push(&separator);
            }
            buf.push(arg);
        }
        if call.closed {
            buf.push(&self.translator.format_punctuation(")"));
        }
        buf.trimmed().to_string()
    }

    /// The one-line rendering of `call`, when its layout policy keeps it on one line.
    fn single_line(&self, call: &Call, depth: usize) -> Option<String> {
        if call.args.is_empty() {
            return Some(self.call_text(call, &[]));
        }
        match call.name_upper().as_str() {
            "LET" | "IFS" | "SWITCH" => None,
            "AND" | "OR" => {
                let args = self.wrappable_args(call, depth)?;
                let text = self.call_text(call, &args);
                let width = self.translator.indent(depth).chars().count() + text.chars().count();
                (args.len() == 1 || width <= self.options.wrap_width).then_some(text)
            }
            _ => {
                let [arg] = call.args.as_slice() else {
                    return None;
                };
                if arg.contains_call() {
                    return None;
                }
                let text = self.call_text(call, &[self.inline_group(arg, depth)?]);
                (text.chars().count() <= self.options.inline_width).then_some(text)
            }
        }
    }

    /// One-line renderings of every argument, if all of them are non-empty and fit on one line.
    fn wrappable_args(&self, call: &Call, depth: usize) -> Option<Vec<String>> {
        call.args
            .iter()
            .map(|arg| {
                if arg.is_empty() {
                    None
                } else {
                    self.inline_group(arg, depth + 1)
                }
            })
            .collect()
    }

    fn layout_call(&self, call: &Call, depth: usize, ctx: Context) -> Vec<Line> {
        let mut lines = Vec::new();
        let name = call.name_upper();
        if !ctx.in_case_list {
            if let Some(comment) = self.translator.function_comment(&name) {
                lines.push(Line::comment(depth, comment));
            }
        }

        match name.as_str() {
            "LET" => self.layout_let(call, depth, &mut lines),
            "IFS" | "SWITCH" => self.layout_cases(call, depth, &mut lines),
            "AND" | "OR" => match self.wrappable_args(call, depth) {
                Some(args) => self.layout_wrapped(call, &args, depth, &mut lines),
                None => self.layout_generic(call, depth, &mut lines),
            },
            _ => self.layout_generic(call, depth, &mut lines),
        }
        lines
    }

    fn push_closing(&self, call: &Call, depth: usize, lines: &mut Vec<Line>) {
        if call.closed {
            lines.push(Line::code(depth, self.closing()));
        }
    }

    fn layout_generic(&self, call: &Call, depth: usize, lines: &mut Vec<Line>) {
        lines.push(Line::code(depth, self.header(call)));
        let comma = self.comma();
        let last = call.args.len().saturating_sub(1);
        for (idx, arg) in call.args.iter().enumerate() {
            if arg.is_empty() {
                if idx != last {
                    lines.push(Line::code(depth + 1, comma.clone()));
                }
                continue;
            }
            let mut arg_lines = self.layout_nodes(&arg.nodes, depth + 1, Context::default());
            if idx != last {
                append_comma(&mut arg_lines, &comma);
            }
            lines.extend(arg_lines);
        }
        self.push_closing(call, depth, lines);
    }

    fn layout_let(&self, call: &Call, depth: usize, lines: &mut Vec<Line>) {
        lines.push(Line::code(depth, self.header(call)));
        let comma = self.comma();
        let separator = self.translator.format_punctuation(",");
        let args = &call.args;

        for (pair_idx, pair) in args.chunks_exact(2).enumerate() {
            let has_more = (pair_idx + 1) * 2 < args.len();
            let name_lines = self.layout_nodes(&pair[0].nodes, depth + 1, Context::default());
            let value_lines = self.layout_nodes(&pair[1].nodes, depth + 1, Context::default());

            let (mut name_code, name_notes): (Vec<Line>, Vec<Line>) = name_lines
                .into_iter()
                .partition(|line| line.kind == LineKind::Code);
            let first_code = value_lines
                .iter()
                .position(|line| line.kind == LineKind::Code)
                .unwrap_or(value_lines.len());
            let mut value_lines = value_lines;
            let mut value_rest = value_lines.split_off(first_code);
            let value_notes = value_lines;

            lines.extend(name_notes);
            lines.extend(value_notes);

            let mut pair_line = LineBuffer::new(depth + 1);
            if let Some(name_last) = name_code.pop() {
                lines.extend(name_code);
                pair_line.push(&name_last.text);
            }
            pair_line.push(&separator);
            if !value_rest.is_empty() {
                pair_line.push(&value_rest.remove(0).text);
            }

            let mut pair_lines: Vec<Line> = pair_line.finish().into_iter().collect();
            pair_lines.extend(value_rest);
            if has_more {
                append_comma(&mut pair_lines, &comma);
            }
            lines.extend(pair_lines);
        }

        if let [.., body] = args.as_slice() {
            if args.len() % 2 == 1 {
                lines.extend(self.layout_nodes(&body.nodes, depth + 1, Context::default()));
            }
        }
        self.push_closing(call, depth, lines);
    }

    fn layout_cases(&self, call: &Call, depth: usize, lines: &mut Vec<Line>) {
        lines.push(Line::code(depth, self.header(call)));
        let comma = self.comma();
        let separator = self.translator.section_comment(CASE_PAIR_LABEL);
        let last = call.args.len().saturating_sub(1);
        let case_ctx = Context { in_case_list: true };

        for (idx, arg) in call.args.iter().enumerate() {
            if idx % 2 == 0 {
                if let Some(separator) = &separator {
                    if idx > 0 {
                        lines.push(Line::blank());
                    }
                    lines.push(Line::comment(depth + 1, separator.clone()));
                }
            }
            if arg.is_empty() {
                if idx != last {
                    lines.push(Line::code(depth + 1, comma.clone()));
                }
                continue;
            }
            let mut arg_lines = self.layout_nodes(&arg.nodes, depth + 1, case_ctx);
            if idx != last {
                append_comma(&mut arg_lines, &comma);
            }
            lines.extend(arg_lines);
        }
        self.push_closing(call, depth, lines);
    }

    /// `AND`/`OR` whose arguments are all one-liners but do not fit on one line together: the
    /// first argument stays on the header line, the rest are packed onto continuation lines.
    fn layout_wrapped(&self, call: &Call, args: &[String], depth: usize, lines: &mut Vec<Line>) {
        let comma = self.comma();
        let separator = self.translator.format_punctuation(",");
        let Some((first, rest)) = args.split_first() else {
            return;
        };

        let mut header = LineBuffer::new(depth);
        header.push(&self.translator.format_function(&call.name.text));
        header.push(&self.translator.format_punctuation("("));
        header.push(first);
        if !rest.is_empty() {
            header.push(&comma);
        }
        lines.extend(header.finish());

        let indent_width = self.translator.indent(depth + 1).chars().count();
        let mut packed: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_width = indent_width;
        for arg in rest {
            let arg_width = arg.chars().count();
            let extra = if current.is_empty() {
                arg_width
            } else {
                separator.chars().count() + arg_width
            };
            let fits = current_width + extra + comma.chars().count() <= self.options.wrap_width;
            if !current.is_empty() && (!fits || current.len() >= self.options.max_args_per_line) {
                packed.push(std::mem::take(&mut current));
                current_width = indent_width;
                current_width += arg_width;
            } else {
                current_width += extra;
            }
            current.push(arg);
        }
        if !current.is_empty() {
            packed.push(current);
        }

        let line_count = packed.len();
        for (idx, group) in packed.into_iter().enumerate() {
            let mut line = LineBuffer::new(depth + 1);
            for (pos, arg) in group.iter().enumerate() {
                if pos > 0 {
                    line.push(&separator);
                }
                line.push(arg);
            }
            if idx + 1 < line_count {
                line.push(&comma);
            } else if call.closed {
                line.push(&self.translator.format_punctuation(")"));
            }
            lines.extend(line.finish());
        }
    }
}
