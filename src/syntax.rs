//! Syntax-tree helpers shared by the walker and the type provider
//!
//! Everything here is a pure function of a node and the source text it was
//! parsed from. Node classification in particular is a plain predicate so
//! that concurrent units never share any lookup state.

use tree_sitter::Node;

// ============================================================================
// Text Extraction
// ============================================================================

/// Get text content of a node
pub fn get_node_text(node: &Node, source: &str) -> String {
    node_str(node, source).to_string()
}

/// Borrow the text content of a node
pub fn node_str<'s>(node: &Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Get text content of a node, normalized to single line (collapse whitespace)
pub fn get_node_text_normalized(node: &Node, source: &str) -> String {
    normalize_whitespace(node_str(node, source))
}

/// Normalize whitespace: collapse multiple spaces/newlines to single space
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text between the start of the line containing `offset` and `offset`
pub fn line_prefix(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    &source[line_start..offset]
}

/// Line terminator used by the source (`\r\n` if any line uses it)
pub fn detect_newline(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

// ============================================================================
// AST Traversal
// ============================================================================

/// Visit all nodes below `node` (iterative), not descending into nodes for
/// which `prune` returns true. The root itself is always visited.
pub fn visit_pruned<P, F>(node: &Node, prune: P, mut visitor: F)
where
    P: Fn(&Node) -> bool,
    F: FnMut(&Node),
{
    let mut cursor = node.walk();
    let mut did_visit_children = false;
    let root_id = node.id();

    loop {
        if !did_visit_children {
            let current = cursor.node();
            visitor(&current);

            let descend = current.id() == root_id || !prune(&current);
            if descend && cursor.goto_first_child() {
                did_visit_children = false;
                continue;
            }
        }

        if cursor.node().id() == root_id {
            break;
        }

        if cursor.goto_next_sibling() {
            did_visit_children = false;
            continue;
        }

        if !cursor.goto_parent() || cursor.node().id() == root_id {
            break;
        }
        did_visit_children = true;
    }
}

/// Node kinds that open a new function or class scope
pub const SCOPE_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class",
    "class_declaration",
    "abstract_class_declaration",
];

/// True if the node starts a nested function or class scope
pub fn is_scope_boundary(node: &Node) -> bool {
    SCOPE_KINDS.contains(&node.kind())
}

// ============================================================================
// Classification
// ============================================================================

/// What a syntax node is, as far as annotation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// `function` or `function*` declaration with a body
    Function,
    /// `class` or `abstract class` declaration
    Class,
    /// Instance or static method (constructors and accessors excluded)
    Method,
    /// Class field definition
    Property,
    /// `export` wrapper around another declaration
    Export,
}

/// Classify a node. Returns `None` for anything that is never annotated.
pub fn classify(node: &Node, source: &str) -> Option<NodeClass> {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => Some(NodeClass::Function),
        "class_declaration" | "abstract_class_declaration" => Some(NodeClass::Class),
        "abstract_method_signature" => Some(NodeClass::Method),
        "method_definition" => {
            let is_constructor = node
                .child_by_field_name("name")
                .map(|n| node_str(&n, source) == "constructor")
                .unwrap_or(false);
            if is_constructor || is_accessor(node) {
                None
            } else {
                Some(NodeClass::Method)
            }
        }
        "public_field_definition" => Some(NodeClass::Property),
        "export_statement" => Some(NodeClass::Export),
        _ => None,
    }
}

/// True for `get`/`set` accessors (the keyword precedes the member name)
fn is_accessor(node: &Node) -> bool {
    let name_id = node.child_by_field_name("name").map(|n| n.id());
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if Some(child.id()) == name_id {
            break;
        }
        if !child.is_named() && matches!(child.kind(), "get" | "set") {
            return true;
        }
    }
    false
}

/// Children of a member that precede its name (modifier keywords live here)
pub fn children_before_name<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let name_id = node.child_by_field_name("name").map(|n| n.id());
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .take_while(|child| Some(child.id()) != name_id)
        .collect()
}

/// True for a `/** ... */` comment (but not the empty `/**/`)
pub fn is_doc_comment(node: &Node, source: &str) -> bool {
    if node.kind() != "comment" {
        return false;
    }
    let text = node_str(node, source);
    text.starts_with("/**") && !text.starts_with("/**/")
}
