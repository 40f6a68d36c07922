//! Syntax tree provider.
//!
//! Turns raw source text into a tree-sitter tree whose nodes can be classified
//! into a small, language-neutral set of [`NodeKind`]s. Checkers only ever look
//! at trees through this module, so adding a language means adding a provider
//! here and nothing else.
//!
//! A parse that produces any ERROR or MISSING node is rejected with a
//! [`SyntaxError`] pointing at the first offending line.

mod python;

pub use python::PythonSyntax;

use std::path::Path;

use thiserror::Error;
use tree_sitter::{Node, Tree, TreeCursor};

/// Unparsable source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// Line of the first offending node (1-indexed).
    pub line: usize,
    pub message: String,
}

/// Language-neutral view of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    /// `if` statement.
    Conditional,
    /// `elif` branch of a conditional. Each one chains one level deeper than
    /// the branch before it.
    ElseIf,
    /// `for`, `async for`, `while`.
    Loop,
    /// `try` block.
    ExceptionHandling,
    /// `with`, `async with`.
    ContextScope,
    /// `def`, `async def`.
    FunctionDef,
    ClassDef,
    Call,
    ExpressionStatement,
    /// Parenthesized expression, `(expr)`.
    Parenthesized,
    /// A string literal with no interpolation or bytes prefix, or an implicit
    /// concatenation made only of such literals.
    PlainString,
    Identifier,
    Comment,
    Other,
}

impl NodeKind {
    /// Whether the node opens a new nesting level inside a function body.
    pub fn increases_nesting(self) -> bool {
        matches!(
            self,
            NodeKind::Conditional
                | NodeKind::Loop
                | NodeKind::ExceptionHandling
                | NodeKind::ContextScope
        )
    }

    /// Function and class definitions start their own scope.
    pub fn is_definition(self) -> bool {
        matches!(self, NodeKind::FunctionDef | NodeKind::ClassDef)
    }
}

/// Classifies a node of one grammar. Gets the full source for prefix checks.
pub type Classifier = fn(Node<'_>, &[u8]) -> NodeKind;

/// A successfully parsed source file.
pub struct SyntaxTree {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source (kept for node text extraction).
    pub source: Vec<u8>,
    /// File identifier used in error reporting.
    pub path: String,
    classify: Classifier,
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("path", &self.path)
            .field("root", &self.tree.root_node().kind())
            .field("len", &self.source.len())
            .finish()
    }
}

impl SyntaxTree {
    pub fn new(tree: Tree, source: Vec<u8>, path: String, classify: Classifier) -> Self {
        Self {
            tree,
            source,
            path,
            classify,
        }
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source_str(&self) -> &str {
        std::str::from_utf8(&self.source).unwrap_or("")
    }

    /// Get text for a node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    pub fn kind_of(&self, node: Node) -> NodeKind {
        (self.classify)(node, &self.source)
    }

    /// Line a node starts on (1-indexed).
    pub fn line_of(node: Node) -> usize {
        node.start_position().row + 1
    }

    /// All nodes of the tree in document order.
    pub fn nodes(&self) -> Preorder<'_> {
        Preorder::new(self.root())
    }
}

/// Document-order traversal over every node below (and including) a root.
pub struct Preorder<'t> {
    cursor: TreeCursor<'t>,
    done: bool,
}

impl<'t> Preorder<'t> {
    pub fn new(root: Node<'t>) -> Self {
        Self {
            cursor: root.walk(),
            done: false,
        }
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        if self.done {
            return None;
        }
        let node = self.cursor.node();
        if !self.cursor.goto_first_child() {
            while !self.cursor.goto_next_sibling() {
                if !self.cursor.goto_parent() {
                    self.done = true;
                    break;
                }
            }
        }
        Some(node)
    }
}

/// Language-specific parser front end.
///
/// Implementations are stateless; a fresh tree-sitter parser is created per
/// call because `tree_sitter::Parser` is not `Sync`.
pub trait SyntaxProvider: Send + Sync {
    /// Language identifier (e.g. "python").
    fn language_id(&self) -> &'static str;

    /// File extensions handled, without the dot.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse source into a tree, rejecting sources with syntax errors.
    fn parse(&self, path: &Path, source: &[u8]) -> Result<SyntaxTree, SyntaxError>;

    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

/// All built-in providers.
pub fn providers() -> Vec<Box<dyn SyntaxProvider>> {
    vec![Box::new(PythonSyntax::new())]
}

/// The built-in provider for this path's extension, if any.
pub fn provider_for_path(path: &Path) -> Option<Box<dyn SyntaxProvider>> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    providers().into_iter().find(|p| p.handles_extension(ext))
}

/// Whether any built-in provider handles this path's extension.
pub fn is_source_path(path: &Path) -> bool {
    provider_for_path(path).is_some()
}

/// Find the first ERROR or MISSING node and describe it.
pub(crate) fn first_syntax_error(tree: &Tree) -> Option<SyntaxError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    let error = match Preorder::new(root).find(|n| n.is_error() || n.is_missing()) {
        Some(node) if node.is_missing() => SyntaxError {
            line: SyntaxTree::line_of(node),
            message: format!("missing {}", node.kind()),
        },
        Some(node) => SyntaxError {
            line: SyntaxTree::line_of(node),
            message: "invalid syntax".to_string(),
        },
        None => SyntaxError {
            line: 1,
            message: "invalid syntax".to_string(),
        },
    };
    Some(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nesting_kinds() {
        assert!(NodeKind::Conditional.increases_nesting());
        assert!(NodeKind::Loop.increases_nesting());
        assert!(NodeKind::ExceptionHandling.increases_nesting());
        assert!(NodeKind::ContextScope.increases_nesting());
        assert!(!NodeKind::Call.increases_nesting());
        assert!(!NodeKind::FunctionDef.increases_nesting());
        assert!(NodeKind::ClassDef.is_definition());
        assert!(!NodeKind::ElseIf.increases_nesting());
    }

    #[test]
    fn test_tree_debug_output() {
        let tree = PythonSyntax::new()
            .parse(Path::new("t.py"), b"x = 1\n")
            .unwrap();
        let debug = format!("{:?}", tree);
        assert!(debug.contains("t.py"));
        assert!(debug.contains("module"));
    }

    #[test]
    fn test_preorder_visits_in_document_order() {
        let tree = PythonSyntax::new()
            .parse(Path::new("t.py"), b"a = 1\nb = 2\n")
            .unwrap();
        let identifiers: Vec<&str> = tree
            .nodes()
            .filter(|n| tree.kind_of(*n) == NodeKind::Identifier)
            .map(|n| tree.node_text(n))
            .collect();
        assert_eq!(identifiers, vec!["a", "b"]);
    }

    #[test]
    fn test_is_source_path() {
        assert!(is_source_path(Path::new("src/app.py")));
        assert!(!is_source_path(Path::new("README.md")));
        assert!(!is_source_path(Path::new("Makefile")));
    }

    #[test]
    fn test_provider_for_path() {
        let provider = provider_for_path(Path::new("pkg/module.py")).unwrap();
        assert_eq!(provider.language_id(), "python");
        assert!(provider_for_path(Path::new("lib.rs")).is_none());
    }
}
