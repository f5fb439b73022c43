//! Recursive-descent call tree over the token stream.
//!
//! Only function calls are structured; every other token stays a [`Node::Leaf`]. Parenthesized
//! sub-expressions are kept as leaves too, but commas inside them never split the enclosing call's
//! arguments.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::token::{Token, TokenKind};

/// Deepest call nesting that is structured. Calls below it stay leaves, which bounds recursion in
/// the parser and the layout engine.
pub const MAX_NESTED_CALLS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Call(Call),
    Leaf(Token),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: Token,
    pub args: Vec<ArgumentGroup>,
    /// `false` when the input ended before the matching `)`.
    pub closed: bool,
}

/// Nodes between two top-level commas of one call. May be empty (`IF(A1,,B1)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentGroup {
    pub nodes: Vec<Node>,
}

impl ArgumentGroup {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_call(&self) -> bool {
        self.nodes.iter().any(|node| matches!(node, Node::Call(_)))
    }
}

impl Call {
    pub fn name_upper(&self) -> String {
        self.name.name_upper()
    }
}

/// Build the call tree. Never fails: unclosed calls run to the end of input, stray `)` become
/// leaves, and calls nested deeper than [`MAX_NESTED_CALLS`] are kept as flat tokens.
pub fn parse(tokens: Vec<Token>) -> Vec<Node> {
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        call_depth: 0,
    };
    let mut nodes = Vec::new();
    let mut depth = 0usize;
    while let Some(node) = parser.next_node() {
        if let Node::Leaf(token) = &node {
            if token.is_punct("(") {
                depth += 1;
            } else if token.is_punct(")") {
                if depth == 0 {
                    log::debug!("stray `)` outside any call; keeping it as a literal");
                }
                depth = depth.saturating_sub(1);
            }
        }
        nodes.push(node);
    }
    nodes
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    call_depth: usize,
}

impl Parser {
    fn next_node(&mut self) -> Option<Node> {
        let token = self.tokens.next()?;
        if token.kind == TokenKind::Function && self.peek_is_punct("(") {
            if self.call_depth >= MAX_NESTED_CALLS {
                log::debug!(
                    "call to {} nested deeper than {MAX_NESTED_CALLS}; keeping it flat",
                    token.text
                );
                return Some(Node::Leaf(token));
            }
            self.tokens.next();
            self.call_depth += 1;
            let call = self.parse_call(token);
            self.call_depth -= 1;
            return Some(Node::Call(call));
        }
        Some(Node::Leaf(token))
    }

    fn peek_is_punct(&mut self, punct: &str) -> bool {
        self.tokens.peek().is_some_and(|t| t.is_punct(punct))
    }

    /// Parse arguments after the call's opening `(` up to and including its `)`.
    fn parse_call(&mut self, name: Token) -> Call {
        let mut args = Vec::new();
        let mut current = Vec::new();
        let mut saw_comma = false;
        // Nesting of plain `(`/`{` groups inside the current argument.
        let mut depth = 0usize;
        let mut closed = false;

        loop {
            if depth == 0 {
                if self.peek_is_punct(")") {
                    self.tokens.next();
                    closed = true;
                    break;
                }
                if self.peek_is_punct(",") {
                    self.tokens.next();
                    args.push(ArgumentGroup {
                        nodes: std::mem::take(&mut current),
                    });
                    saw_comma = true;
                    continue;
                }
            }

            let Some(node) = self.next_node() else {
                log::debug!("unclosed call to {}; running to end of input", name.text);
                break;
            };
            if let Node::Leaf(token) = &node {
                if token.is_punct("(") || token.is_punct("{") {
                    depth += 1;
                } else if token.is_punct(")") || token.is_punct("}") {
                    depth = depth.saturating_sub(1);
                }
            }
            current.push(node);
        }

        if saw_comma || !current.is_empty() {
            args.push(ArgumentGroup { nodes: current });
        }
        Call { name, args, closed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn parse_str(body: &str) -> Vec<Node> {
        parse(tokenize(body))
    }

    fn only_call(nodes: &[Node]) -> &Call {
        match nodes {
            [Node::Call(call)] => call,
            other => panic!("expected a single call, got {other:?}"),
        }
    }

    #[test]
    fn splits_arguments_at_top_level_commas() {
        let nodes = parse_str("IF(A1>0,SUM(B1,B2),\"x\")");
        let call = only_call(&nodes);
        assert_eq!(call.name.text, "IF");
        assert!(call.closed);
        assert_eq!(call.args.len(), 3);
        assert!(call.args[1].contains_call());

        let Node::Call(inner) = &call.args[1].nodes[0] else {
            panic!("expected nested call");
        };
        assert_eq!(inner.args.len(), 2);
    }

    #[test]
    fn commas_inside_plain_parentheses_do_not_split() {
        let nodes = parse_str("SUM((A1,B1),C1)");
        assert_eq!(only_call(&nodes).args.len(), 2);
    }

    #[test]
    fn empty_arguments_are_preserved() {
        assert_eq!(only_call(&parse_str("NOW()")).args.len(), 0);
        let call_nodes = parse_str("IF(A1,,B1)");
        let call = only_call(&call_nodes);
        assert_eq!(call.args.len(), 3);
        assert!(call.args[1].is_empty());

        let trailing = parse_str("SUM(,)");
        assert_eq!(only_call(&trailing).args, vec![ArgumentGroup::default(); 2]);
    }

    #[test]
    fn unclosed_call_runs_to_end_of_input() {
        let nodes = parse_str("SUM(A1,MAX(B1");
        let call = only_call(&nodes);
        assert!(!call.closed);
        let Node::Call(inner) = &call.args[1].nodes[0] else {
            panic!("expected nested call");
        };
        assert!(!inner.closed);
    }

    #[test]
    fn stray_closing_paren_is_a_leaf() {
        let nodes = parse_str("A1)+1");
        assert_eq!(nodes.len(), 4);
        assert!(matches!(&nodes[1], Node::Leaf(t) if t.is_punct(")")));
    }

    fn call_depth(nodes: &[Node]) -> usize {
        let mut depth = 0;
        let mut level: Vec<&Node> = nodes.iter().collect();
        while !level.is_empty() {
            let calls: Vec<&Call> = level
                .into_iter()
                .filter_map(|node| match node {
                    Node::Call(call) => Some(call),
                    Node::Leaf(_) => None,
                })
                .collect();
            if calls.is_empty() {
                break;
            }
            depth += 1;
            level = calls
                .into_iter()
                .flat_map(|call| call.args.iter().flat_map(|arg| arg.nodes.iter()))
                .collect();
        }
        depth
    }

    #[test]
    fn deep_nesting_is_capped() {
        let n = 1000;
        let body = format!("{}A1,B1{}", "IF(".repeat(n), ")".repeat(n));
        let nodes = parse_str(&body);
        assert_eq!(call_depth(&nodes), MAX_NESTED_CALLS);

        let mut call = only_call(&nodes);
        while let [ArgumentGroup { nodes: inner }] = call.args.as_slice() {
            match inner.as_slice() {
                [Node::Call(next)] => call = next,
                _ => break,
            }
        }
        // The innermost structured call holds the rest as flat tokens; the comma sits inside
        // plain parentheses and does not split it.
        assert!(call.closed);
        assert_eq!(call.args.len(), 1);
        assert!(!call.args[0].contains_call());
        assert!(call.args[0]
            .nodes
            .iter()
            .any(|node| matches!(node, Node::Leaf(t) if t.kind == TokenKind::Function)));
    }

    #[test]
    fn function_name_without_parenthesis_is_a_leaf() {
        let nodes = parse_str("SUM+1");
        assert!(matches!(&nodes[0], Node::Leaf(t) if t.kind == TokenKind::Function));
    }
}
