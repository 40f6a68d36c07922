//! Python syntax provider using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use super::{first_syntax_error, NodeKind, Preorder, SyntaxError, SyntaxProvider, SyntaxTree};

pub struct PythonSyntax {
    language: Language,
}

impl PythonSyntax {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, SyntaxError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|e| SyntaxError {
            line: 1,
            message: format!("unsupported grammar: {}", e),
        })?;
        Ok(parser)
    }
}

impl Default for PythonSyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxProvider for PythonSyntax {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> Result<SyntaxTree, SyntaxError> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| SyntaxError {
            line: 1,
            message: "parser produced no tree".to_string(),
        })?;

        if let Some(err) = first_syntax_error(&tree) {
            tracing::debug!(file = %path.display(), line = err.line, "python syntax error");
            return Err(err);
        }
        if let Some(err) = legacy_statement(&tree) {
            tracing::debug!(file = %path.display(), line = err.line, "python 2 statement");
            return Err(err);
        }

        Ok(SyntaxTree::new(
            tree,
            source.to_vec(),
            path.to_string_lossy().to_string(),
            classify,
        ))
    }
}

/// `print x` and `exec code` parse in the grammar but are not Python 3.
fn legacy_statement(tree: &Tree) -> Option<SyntaxError> {
    Preorder::new(tree.root_node()).find_map(|node| {
        let keyword = match node.kind() {
            "print_statement" => "print",
            "exec_statement" => "exec",
            _ => return None,
        };
        Some(SyntaxError {
            line: SyntaxTree::line_of(node),
            message: format!("Missing parentheses in call to '{}'", keyword),
        })
    })
}

fn classify(node: Node<'_>, source: &[u8]) -> NodeKind {
    if !node.is_named() {
        return NodeKind::Other;
    }
    match node.kind() {
        "module" => NodeKind::Module,
        "if_statement" => NodeKind::Conditional,
        "elif_clause" => NodeKind::ElseIf,
        // `async for` parses as a for_statement with a leading `async` token
        "for_statement" | "while_statement" => NodeKind::Loop,
        "try_statement" => NodeKind::ExceptionHandling,
        "with_statement" => NodeKind::ContextScope,
        "function_definition" => NodeKind::FunctionDef,
        "class_definition" => NodeKind::ClassDef,
        "call" => NodeKind::Call,
        "expression_statement" => NodeKind::ExpressionStatement,
        "parenthesized_expression" => NodeKind::Parenthesized,
        "string" if is_plain_string(node, source) => NodeKind::PlainString,
        "concatenated_string" => {
            let mut cursor = node.walk();
            let all_plain = node
                .named_children(&mut cursor)
                .all(|part| part.kind() == "string" && is_plain_string(part, source));
            if all_plain {
                NodeKind::PlainString
            } else {
                NodeKind::Other
            }
        }
        "identifier" => NodeKind::Identifier,
        "comment" => NodeKind::Comment,
        _ => NodeKind::Other,
    }
}

/// A string without `f` (interpolation) or `b` (bytes) prefix.
fn is_plain_string(node: Node<'_>, source: &[u8]) -> bool {
    let Some(start) = node.child(0) else {
        return false;
    };
    let opener = start.utf8_text(source).unwrap_or("");
    !opener
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .any(|c| matches!(c, 'f' | 'F' | 'b' | 'B'))
}
