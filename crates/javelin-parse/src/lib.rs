//! Source ingestion for Javelin.
//!
//! Wraps the external `tree-sitter-java` grammar: given file paths (or
//! in-memory sources), this crate yields one parse tree and one token stream
//! per file. Downstream crates never re-parse or re-tokenize; every later
//! text edit is addressed in token indices derived here.

mod tokens;

pub use tokens::{Token, TokenRange, TokenStream};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use javelin_core::{FileId, Span};
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tree-sitter-java is unavailable: {0}")]
    Language(String),
    #[error("syntax error in {0:?}")]
    Syntax(FileId),
}

thread_local! {
    static JAVA_PARSER: RefCell<Result<Parser, String>> = RefCell::new({
        let mut parser = Parser::new();
        match parser.set_language(tree_sitter_java::language()) {
            Ok(()) => Ok(parser),
            Err(_) => Err("tree-sitter-java language load failed".to_string()),
        }
    });
}

/// Parse Java source text with `tree-sitter-java`.
pub fn parse_java(source: &str) -> Result<Tree, IngestError> {
    JAVA_PARSER.with(|parser_cell| {
        let mut parser = parser_cell
            .try_borrow_mut()
            .map_err(|_| IngestError::Language("tree-sitter parser is already in use".into()))?;
        let parser = match parser.as_mut() {
            Ok(parser) => parser,
            Err(err) => return Err(IngestError::Language(err.clone())),
        };

        parser
            .parse(source, None)
            .ok_or_else(|| IngestError::Language("tree-sitter failed to produce a syntax tree".into()))
    })
}

/// A parsed source file: original text, parse tree and derived token stream.
pub struct SourceFile {
    pub file: FileId,
    pub text: String,
    pub tree: Tree,
    pub tokens: TokenStream,
}

impl SourceFile {
    /// Parses `text`, rejecting any tree that contains syntax errors so a
    /// partially understood file can never feed the program model.
    pub fn parse(file: FileId, text: String) -> Result<Self, IngestError> {
        let tree = parse_java(&text)?;
        if tree.root_node().has_error() {
            return Err(IngestError::Syntax(file));
        }
        let tokens = TokenStream::from_tree(&tree);
        Ok(Self {
            file,
            text,
            tree,
            tokens,
        })
    }

    /// The verbatim text of a token range.
    pub fn token_text(&self, range: TokenRange) -> &str {
        self.tokens.text(&self.text, range)
    }
}

/// The fixed, caller-supplied file set of one refactoring invocation.
///
/// Every file is parsed up front; a syntax error in any file aborts the whole
/// invocation before an entity from any file is trusted.
pub struct SourceSet {
    files: BTreeMap<FileId, SourceFile>,
}

impl SourceSet {
    pub fn load(paths: &[PathBuf]) -> Result<Self, IngestError> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
                path: path.clone(),
                source,
            })?;
            sources.push((FileId::new(path.to_string_lossy()), text));
        }
        Self::from_sources(sources)
    }

    pub fn from_sources(
        sources: impl IntoIterator<Item = (FileId, String)>,
    ) -> Result<Self, IngestError> {
        let mut files = BTreeMap::new();
        for (file, text) in sources {
            let parsed = SourceFile::parse(file.clone(), text)?;
            files.insert(file, parsed);
        }
        Ok(Self { files })
    }

    pub fn get(&self, file: &FileId) -> Option<&SourceFile> {
        self.files.get(file)
    }

    /// Files in deterministic (path) order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Visit a node and all its descendants in pre-order.
pub fn visit_nodes<'a, F: FnMut(Node<'a>)>(node: Node<'a>, f: &mut F) {
    f(node);
    if node.child_count() == 0 {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_nodes(child, f);
    }
}

/// Find the first named child with the given kind.
pub fn find_named_child<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == kind);
    result
}

/// Best-effort helper to fetch a node's `modifiers` field, falling back to a named child.
pub fn modifier_node(node: Node<'_>) -> Option<Node<'_>> {
    node.child_by_field_name("modifiers")
        .or_else(|| find_named_child(node, "modifiers"))
}

/// Return the byte slice for `node` within `source`.
pub fn node_text<'a>(source: &'a str, node: Node<'_>) -> &'a str {
    &source[node.byte_range()]
}

/// The byte span covered by `node`.
pub fn node_span(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

/// Absolute path of `path` with a marker inserted before the extension
/// (`Foo.java` -> `Foo.re.java` for marker `re`). Non-`.java` paths get the
/// marker appended as an extra extension.
pub fn marked_path(path: &Path, marker: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mapped = match name.strip_suffix(".java") {
        Some(stem) => format!("{stem}.{marker}.java"),
        None => format!("{name}.{marker}"),
    };
    path.with_file_name(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_rejects_broken_source() {
        let err = SourceFile::parse(FileId::new("Broken.java"), "class {".to_string());
        assert!(matches!(err, Err(IngestError::Syntax(_))));
    }

    #[test]
    fn source_set_aborts_on_any_broken_file() {
        let result = SourceSet::from_sources([
            (FileId::new("A.java"), "class A {}".to_string()),
            (FileId::new("B.java"), "class B { int".to_string()),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn marked_path_inserts_marker_before_extension() {
        assert_eq!(
            marked_path(Path::new("src/Foo.java"), "re"),
            PathBuf::from("src/Foo.re.java")
        );
        assert_eq!(marked_path(Path::new("NOTES"), "re"), PathBuf::from("NOTES.re"));
    }
}
