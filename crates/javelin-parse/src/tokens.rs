//! Token streams derived from parse trees.
//!
//! A token is a leaf of the tree-sitter tree, in document order, carrying its
//! byte span in the original text. Whitespace between tokens is not itself a
//! token; the rewrite engine re-emits inter-token gaps verbatim. Comments are
//! leaves and therefore occupy token indices, exactly like any other token.

use javelin_core::Span;
use tree_sitter::{Node, Tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub span: Span,
}

/// Half-open `[start, end)` range of token indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "invalid token range: {start}..{end}");
        Self { start, end }
    }

    /// An empty range marking the boundary before token `index`.
    pub fn empty_at(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// True when `other` lies entirely inside `self`.
    pub fn covers(&self, other: TokenRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Debug for TokenRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenRange({}..{})", self.start, self.end)
    }
}

/// The ordered lexical units of one file.
///
/// Spans are non-overlapping and strictly monotonic; this is the addressable
/// unit for every text edit downstream.
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn from_tree(tree: &Tree) -> Self {
        let mut tokens = Vec::new();
        collect_leaves(tree.root_node(), &mut tokens);
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Byte span covered by a non-empty token range, from the first token's
    /// start to the last token's end.
    pub fn span(&self, range: TokenRange) -> Option<Span> {
        if range.is_empty() || range.end > self.tokens.len() {
            return None;
        }
        Some(Span::new(
            self.tokens[range.start].span.start,
            self.tokens[range.end - 1].span.end,
        ))
    }

    /// Verbatim text of a token range, inter-token whitespace included.
    pub fn text<'a>(&self, source: &'a str, range: TokenRange) -> &'a str {
        match self.span(range) {
            Some(span) => &source[span.start..span.end],
            None => "",
        }
    }

    /// Byte offset where text inserted at token boundary `index` lands:
    /// immediately after token `index - 1`, at the start of the first token
    /// for boundary 0, or at `eof` (the file length) past the last token.
    pub fn insertion_offset(&self, index: usize, eof: usize) -> usize {
        if index == 0 {
            return self.tokens.first().map_or(0, |t| t.span.start);
        }
        match self.tokens.get(index - 1) {
            Some(token) => token.span.end,
            None => eof,
        }
    }

    /// Token-index range of the leaves covered by `node`.
    ///
    /// Node boundaries always coincide with token boundaries, so this is the
    /// exact lexical extent of the node, comments inside it included.
    pub fn range_of(&self, node: Node<'_>) -> TokenRange {
        let start = self
            .tokens
            .partition_point(|t| t.span.start < node.start_byte());
        let end = self
            .tokens
            .partition_point(|t| t.span.start < node.end_byte());
        TokenRange::new(start, end)
    }
}

fn collect_leaves(node: Node<'_>, out: &mut Vec<Token>) {
    if node.child_count() == 0 {
        // Zero-width leaves only occur in error trees, which ingestion rejects.
        if node.end_byte() > node.start_byte() {
            out.push(Token {
                kind: node.kind(),
                span: Span::new(node.start_byte(), node.end_byte()),
            });
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaves(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_java;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "class A { /* keep */ int a = 1, b; }\n";

    fn stream() -> TokenStream {
        let tree = parse_java(SOURCE).unwrap();
        TokenStream::from_tree(&tree)
    }

    #[test]
    fn spans_are_monotonic_and_disjoint() {
        let tokens = stream();
        let mut prev_end = 0;
        for token in tokens.iter() {
            assert!(token.span.start >= prev_end, "overlap at {:?}", token.span);
            assert!(token.span.end <= SOURCE.len());
            prev_end = token.span.end;
        }
    }

    #[test]
    fn comments_occupy_token_indices() {
        let tokens = stream();
        assert!(tokens.iter().any(|t| t.kind == "line_comment" || t.kind == "block_comment"));
    }

    #[test]
    fn range_of_recovers_node_text() {
        let tree = parse_java(SOURCE).unwrap();
        let tokens = TokenStream::from_tree(&tree);
        let root = tree.root_node();
        let class = root.child(0).unwrap();
        let range = tokens.range_of(class);
        assert_eq!(tokens.text(SOURCE, range), SOURCE.trim_end());
    }

    #[test]
    fn insertion_offsets_cover_both_ends() {
        let tokens = stream();
        assert_eq!(tokens.insertion_offset(0, SOURCE.len()), 0);
        assert_eq!(tokens.insertion_offset(tokens.len(), SOURCE.len()), SOURCE.len());
    }
}
