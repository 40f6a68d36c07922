//! Documentation checks: module-level docstring presence.

use tree_sitter::Node;

use crate::syntax::{NodeKind, SyntaxTree};

use super::{Category, Severity, SourceFile, Violation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationChecker {
    pub require_module_doc: bool,
}

impl Default for DocumentationChecker {
    fn default() -> Self {
        Self {
            require_module_doc: true,
        }
    }
}

impl DocumentationChecker {
    pub fn new(require_module_doc: bool) -> Self {
        Self { require_module_doc }
    }

    /// At most one violation per file.
    pub fn check(&self, unit: &SourceFile<'_>) -> Vec<Violation> {
        if !self.require_module_doc || has_module_docstring(unit.tree) {
            return Vec::new();
        }
        vec![Violation::new(
            Category::Documentation,
            unit.path,
            Some(1),
            "Module missing docstring",
            Severity::Warning,
        )]
    }
}

/// The first statement of the module (comments aside) is a bare plain string,
/// optionally wrapped in parentheses. A trailing comma makes it a tuple.
pub fn has_module_docstring(tree: &SyntaxTree) -> bool {
    let root = tree.root();
    let mut cursor = root.walk();
    let first = root
        .named_children(&mut cursor)
        .find(|n| tree.kind_of(*n) != NodeKind::Comment);

    let Some(statement) = first else {
        return false;
    };
    if tree.kind_of(statement) != NodeKind::ExpressionStatement {
        return false;
    }

    let mut expr = sole_child(tree, statement);
    while let Some(node) = expr.filter(|n| tree.kind_of(*n) == NodeKind::Parenthesized) {
        expr = sole_named_child(tree, node);
    }
    expr.is_some_and(|n| tree.kind_of(n) == NodeKind::PlainString)
}

/// The only child of `node`, punctuation included, ignoring comments.
fn sole_child<'t>(tree: &SyntaxTree, node: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let mut children = node
        .children(&mut cursor)
        .filter(|n| tree.kind_of(*n) != NodeKind::Comment);
    let only = children.next()?;
    children.next().is_none().then_some(only)
}

/// The only named child of `node`, ignoring comments.
fn sole_named_child<'t>(tree: &SyntaxTree, node: Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let mut children = node
        .named_children(&mut cursor)
        .filter(|n| tree.kind_of(*n) != NodeKind::Comment);
    let only = children.next()?;
    children.next().is_none().then_some(only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PythonSyntax, SyntaxProvider};
    use std::path::Path;

    fn check(source: &str) -> Vec<Violation> {
        let tree = PythonSyntax::new()
            .parse(Path::new("mod.py"), source.as_bytes())
            .unwrap();
        DocumentationChecker::default().check(&SourceFile {
            path: "mod.py",
            text: source,
            tree: &tree,
        })
    }

    #[test]
    fn test_missing_docstring() {
        let v = check("import os\n\nx = 1\n");
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::Documentation);
        assert_eq!(v[0].severity, Severity::Warning);
        assert_eq!(v[0].line, Some(1));
        assert_eq!(v[0].message, "Module missing docstring");
    }

    #[test]
    fn test_docstring_present() {
        assert!(check("\"\"\"Utilities for parsing.\"\"\"\n\nimport os\n").is_empty());
        assert!(check("'single quoted works too'\n").is_empty());
    }

    #[test]
    fn test_leading_comments_are_skipped() {
        assert!(check("#!/usr/bin/env python3\n# -*- coding: utf-8 -*-\n\"\"\"Doc.\"\"\"\n").is_empty());
    }

    #[test]
    fn test_comment_is_not_documentation() {
        assert_eq!(check("# Just a comment\nx = 1\n").len(), 1);
    }

    #[test]
    fn test_empty_module_lacks_docstring() {
        assert_eq!(check("").len(), 1);
    }

    #[test]
    fn test_non_plain_strings_do_not_count() {
        assert_eq!(check("f\"\"\"Doc {x}.\"\"\"\n").len(), 1);
        assert_eq!(check("b\"bytes\"\n").len(), 1);
        assert_eq!(check("\"doc\", 1\n").len(), 1);
    }

    #[test]
    fn test_tuple_is_not_a_docstring() {
        assert_eq!(check("\"doc\",\n").len(), 1);
        assert_eq!(check("(\"doc\",)\n").len(), 1);
    }

    #[test]
    fn test_parenthesized_string_is_a_docstring() {
        assert!(check("(\"Wrapped module doc.\")\n").is_empty());
        assert!(check("((\"Doubly wrapped.\"))\n").is_empty());
        assert!(check("(\"Implicitly \"\n \"joined.\")\n").is_empty());
    }

    #[test]
    fn test_docstring_after_code_does_not_count() {
        assert_eq!(check("import os\n\"\"\"Late.\"\"\"\n").len(), 1);
    }

    #[test]
    fn test_disabled() {
        let tree = PythonSyntax::new()
            .parse(Path::new("mod.py"), b"x = 1\n")
            .unwrap();
        let v = DocumentationChecker::new(false).check(&SourceFile {
            path: "mod.py",
            text: "x = 1\n",
            tree: &tree,
        });
        assert!(v.is_empty());
    }
}
