//! Performance checks: excessive nesting depth inside functions.
//!
//! Depth starts at 0 at a function body. Every conditional, loop, exception
//! handling block or scoped-resource block adds one level relative to the
//! compound statement that encloses it, and each `elif` adds one more level
//! below the branch it follows. Other nodes are descended into at the
//! same depth so deep constructs below them are still found. Nested function
//! and class definitions are not counted towards the enclosing function; every
//! function is measured on its own.

use tree_sitter::Node;

use crate::syntax::{NodeKind, SyntaxTree};

use super::{Category, Severity, SourceFile, Violation};

/// Default maximum nesting depth.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceChecker {
    max_nesting_depth: usize,
}

impl Default for PerformanceChecker {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl PerformanceChecker {
    /// A limit of 0 is raised to 1; a limit of 0 means "disabled" only at the
    /// configuration level, where the checker is not built at all.
    pub fn new(max_nesting_depth: usize) -> Self {
        Self {
            max_nesting_depth: max_nesting_depth.max(1),
        }
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    pub fn check(&self, unit: &SourceFile<'_>) -> Vec<Violation> {
        let tree = unit.tree;
        let mut violations = Vec::new();

        for node in tree.nodes() {
            if tree.kind_of(node) != NodeKind::FunctionDef {
                continue;
            }
            let depth = function_nesting_depth(tree, node);
            if depth <= self.max_nesting_depth {
                continue;
            }

            let name = node
                .child_by_field_name("name")
                .map(|n| tree.node_text(n))
                .unwrap_or("<anonymous>");
            tracing::debug!(file = unit.path, function = name, depth, "nesting limit exceeded");
            violations.push(Violation::new(
                Category::Performance,
                unit.path,
                Some(SyntaxTree::line_of(node)),
                format!(
                    "Function '{}' has nesting depth {} (max: {})",
                    name, depth, self.max_nesting_depth
                ),
                Severity::Warning,
            ));
        }

        violations
    }
}

/// Maximum nesting depth reached inside a function definition's body.
pub fn function_nesting_depth(tree: &SyntaxTree, func: Node<'_>) -> usize {
    match func.child_by_field_name("body") {
        Some(body) => depth_at(tree, body, 0),
        None => 0,
    }
}

/// Deepest level reached below `node`, which itself sits at `depth`.
fn depth_at(tree: &SyntaxTree, node: Node<'_>, depth: usize) -> usize {
    let mut deepest = depth;
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        let kind = tree.kind_of(child);
        if kind.is_definition() {
            continue;
        }
        let child_depth = match kind {
            NodeKind::Conditional => conditional_depth(tree, child, depth + 1),
            k if k.increases_nesting() => depth_at(tree, child, depth + 1),
            _ => depth_at(tree, child, depth),
        };
        deepest = deepest.max(child_depth);
    }

    deepest
}

/// An `if` statement sitting at `level`.
///
/// Every `elif` opens one level below the branch before it, the way an
/// `else: if` chain would. A trailing `else` stays at the level of the last
/// branch.
fn conditional_depth(tree: &SyntaxTree, node: Node<'_>, level: usize) -> usize {
    let mut deepest = level;
    let mut branch_level = level;
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if tree.kind_of(child) == NodeKind::ElseIf {
            branch_level += 1;
            deepest = deepest.max(branch_level);
        }
        deepest = deepest.max(depth_at(tree, child, branch_level));
    }

    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{PythonSyntax, SyntaxProvider};
    use std::path::Path;

    fn parse(source: &str) -> SyntaxTree {
        PythonSyntax::new()
            .parse(Path::new("perf.py"), source.as_bytes())
            .unwrap()
    }

    fn check(max: usize, source: &str) -> Vec<Violation> {
        let tree = parse(source);
        PerformanceChecker::new(max).check(&SourceFile {
            path: "perf.py",
            text: source,
            tree: &tree,
        })
    }

    /// A function whose body nests `levels` if statements.
    fn nested_ifs(levels: usize) -> String {
        let mut source = String::from("def deep(x):\n");
        for level in 0..levels {
            source.push_str(&"    ".repeat(level + 1));
            source.push_str(&format!("if x > {}:\n", level));
        }
        source.push_str(&"    ".repeat(levels + 1));
        source.push_str("return x\n");
        source
    }

    fn depth_of_first_function(source: &str) -> usize {
        let tree = parse(source);
        let func = tree
            .nodes()
            .find(|n| tree.kind_of(*n) == NodeKind::FunctionDef)
            .unwrap();
        function_nesting_depth(&tree, func)
    }

    #[test]
    fn test_five_levels_within_limit() {
        assert!(check(5, &nested_ifs(5)).is_empty());
    }

    #[test]
    fn test_six_levels_reported() {
        let v = check(5, &nested_ifs(6));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category, Category::Performance);
        assert_eq!(v[0].severity, Severity::Warning);
        assert_eq!(v[0].line, Some(1));
        assert_eq!(v[0].message, "Function 'deep' has nesting depth 6 (max: 5)");
    }

    #[test]
    fn test_flat_function_has_depth_zero() {
        assert_eq!(depth_of_first_function("def f():\n    return 1\n"), 0);
    }

    #[test]
    fn test_all_compound_kinds_count() {
        let source = r#"
async def run(items, lock):
    for item in items:
        while item:
            try:
                with lock:
                    async with lock:
                        async for x in item:
                            if x:
                                pass
            except ValueError:
                pass
"#;
        assert_eq!(depth_of_first_function(source), 7);
    }

    #[test]
    fn test_each_elif_adds_a_level() {
        let source = r#"
def branches(x):
    if x == 1:
        pass
    elif x == 2:
        pass
    elif x == 3:
        pass
    else:
        pass
"#;
        assert_eq!(depth_of_first_function(source), 3);
    }

    #[test]
    fn test_long_elif_chain_reported() {
        let mut source = String::from("def route(x):\n    if x == 0:\n        return 0\n");
        for i in 1..=5 {
            source.push_str(&format!("    elif x == {}:\n        return {}\n", i, i));
        }
        let v = check(5, &source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].message, "Function 'route' has nesting depth 6 (max: 5)");
        assert!(check(6, &source).is_empty());
    }

    #[test]
    fn test_else_body_nests_below_last_elif() {
        let source = r#"
def branches(x):
    if x == 1:
        pass
    elif x == 2:
        pass
    else:
        for i in x:
            pass
"#;
        assert_eq!(depth_of_first_function(source), 3);
    }

    #[test]
    fn test_if_without_elif_counts_once() {
        let source = r#"
def branches(x):
    if x:
        pass
    else:
        pass
"#;
        assert_eq!(depth_of_first_function(source), 1);
    }

    #[test]
    fn test_sibling_blocks_take_maximum() {
        let source = r#"
def siblings(x):
    if x:
        if x:
            pass
    for i in x:
        pass
"#;
        assert_eq!(depth_of_first_function(source), 2);
    }

    #[test]
    fn test_depth_found_below_plain_statements() {
        // match/case adds no depth but the blocks below it are still searched.
        let source = r#"
def dispatch(command):
    result = [c for c in command if c]
    match command:
        case "go":
            if result:
                for r in result:
                    print(r)
        case _:
            pass
"#;
        assert_eq!(depth_of_first_function(source), 2);
    }

    #[test]
    fn test_nested_functions_measured_independently() {
        let mut source = String::from("def outer(x):\n    if x:\n        if x:\n");
        source.push_str("            def inner(y):\n");
        source.push_str("                if y:\n                    return y\n");
        source.push_str("            return inner\n");

        let tree = parse(&source);
        let depths: Vec<(String, usize)> = tree
            .nodes()
            .filter(|n| tree.kind_of(*n) == NodeKind::FunctionDef)
            .map(|n| {
                let name = tree.node_text(n.child_by_field_name("name").unwrap()).to_string();
                (name, function_nesting_depth(&tree, n))
            })
            .collect();
        assert_eq!(
            depths,
            vec![("outer".to_string(), 2), ("inner".to_string(), 1)]
        );
    }

    #[test]
    fn test_methods_inside_classes_checked() {
        let mut source = String::from("class Service:\n    def handle(self, x):\n");
        for level in 0..3 {
            source.push_str(&"    ".repeat(level + 2));
            source.push_str("if x:\n");
        }
        source.push_str(&"    ".repeat(5));
        source.push_str("return x\n");

        let v = check(2, &source);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].line, Some(2));
        assert!(v[0].message.contains("'handle'"));
        assert!(v[0].message.contains("depth 3 (max: 2)"));
    }

    #[test]
    fn test_zero_limit_raised_to_one() {
        assert_eq!(PerformanceChecker::new(0).max_nesting_depth(), 1);
    }
}
