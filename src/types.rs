//! Type-analysis provider
//!
//! The walker never looks at type syntax itself; it asks a [`TypeProvider`]
//! for printable type text, modifiers and initializers. [`SyntaxTypes`] is
//! the bundled provider: it reads declared types straight from the tree and
//! infers undeclared return types from the `return` statements of a body.

use tree_sitter::Node;

use crate::schema::{Modifier, Parameter};
use crate::syntax::{
    children_before_name, get_node_text, get_node_text_normalized, is_scope_boundary, node_str,
    visit_pruned,
};

/// Pure queries about declarations. Implementations must not keep state
/// between calls.
pub trait TypeProvider {
    /// Declared type of a formal parameter node
    fn parameter_type(&self, param: &Node) -> Option<String>;

    /// Declared or inferred return type of a function or method node.
    /// `parameters` are the already-resolved parameters of that node.
    fn return_type(&self, decl: &Node, parameters: &[Parameter]) -> Option<String>;

    /// Modifiers of a class member, in source order
    fn modifiers(&self, member: &Node) -> Vec<Modifier>;

    /// Initializer source text of a class field
    fn initializer(&self, property: &Node) -> Option<String>;
}

/// Provider backed by the syntax tree alone
#[derive(Debug, Clone, Copy)]
pub struct SyntaxTypes<'s> {
    source: &'s str,
}

impl<'s> SyntaxTypes<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source }
    }

    /// Printable text of a `type_annotation`-like node
    fn annotation_text(&self, node: &Node) -> Option<String> {
        match node.kind() {
            "type_predicate_annotation" => Some("boolean".to_string()),
            "asserts_annotation" => Some("void".to_string()),
            _ => {
                let text = get_node_text_normalized(node, self.source);
                let text = text.strip_prefix(':').unwrap_or(&text).trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
        }
    }

    fn infer_return_type(&self, decl: &Node, parameters: &[Parameter]) -> Option<String> {
        let body = decl.child_by_field_name("body")?;
        let keywords = children_before_name(decl);
        if decl.kind() == "generator_function_declaration" || keywords.iter().any(|k| k.kind() == "*")
        {
            return None;
        }
        let is_async = keywords.iter().any(|k| k.kind() == "async");

        let mut valued: Vec<Option<String>> = Vec::new();
        let mut has_bare_return = false;
        visit_pruned(&body, is_scope_boundary, |node| {
            if node.kind() != "return_statement" {
                return;
            }
            let mut cursor = node.walk();
            let expr = node
                .named_children(&mut cursor)
                .find(|child| child.kind() != "comment");
            match expr {
                Some(expr) => valued.push(self.infer_expression(&expr, parameters)),
                None => has_bare_return = true,
            }
        });

        let mut types: Vec<String> = Vec::new();
        for ty in valued.iter() {
            let ty = ty.as_ref()?;
            if !types.contains(ty) {
                types.push(ty.clone());
            }
        }
        if types.is_empty() {
            types.push("void".to_string());
        } else if has_bare_return && !types.iter().any(|t| t == "undefined") {
            types.push("undefined".to_string());
        }

        let joined = types.join(" | ");
        if is_async {
            Some(format!("Promise<{}>", joined))
        } else {
            Some(joined)
        }
    }

    fn infer_expression(&self, expr: &Node, parameters: &[Parameter]) -> Option<String> {
        let text = node_str(expr, self.source);
        match expr.kind() {
            "string" | "template_string" => Some("string".to_string()),
            "number" if text.ends_with('n') => Some("bigint".to_string()),
            "number" => Some("number".to_string()),
            "true" | "false" => Some("boolean".to_string()),
            "null" => Some("null".to_string()),
            "undefined" => Some("undefined".to_string()),
            "identifier" if text == "undefined" => Some("undefined".to_string()),
            "identifier" => parameters
                .iter()
                .find(|p| p.name == text)
                .and_then(|p| p.declared_type.clone()),
            "parenthesized_expression" | "await_expression" => {
                let inner = expr.named_child(0)?;
                self.infer_expression(&inner, parameters)
            }
            "as_expression" | "satisfies_expression" => {
                let asserted = expr.named_child(1)?;
                Some(get_node_text_normalized(&asserted, self.source))
            }
            "new_expression" => {
                let constructor = expr.child_by_field_name("constructor")?;
                let mut ty = get_node_text(&constructor, self.source);
                if let Some(args) = expr.child_by_field_name("type_arguments") {
                    ty.push_str(&get_node_text_normalized(&args, self.source));
                }
                Some(ty)
            }
            "unary_expression" => {
                let operator = expr.child_by_field_name("operator")?;
                match node_str(&operator, self.source) {
                    "!" | "delete" => Some("boolean".to_string()),
                    "-" | "+" | "~" => Some("number".to_string()),
                    "typeof" => Some("string".to_string()),
                    "void" => Some("undefined".to_string()),
                    _ => None,
                }
            }
            "binary_expression" => self.infer_binary(expr, parameters),
            _ => None,
        }
    }

    fn infer_binary(&self, expr: &Node, parameters: &[Parameter]) -> Option<String> {
        let operator = expr.child_by_field_name("operator")?;
        let operand = |field: &str| {
            expr.child_by_field_name(field)
                .and_then(|n| self.infer_expression(&n, parameters))
        };
        match node_str(&operator, self.source) {
            "==" | "!=" | "===" | "!==" | "<" | ">" | "<=" | ">=" | "instanceof" | "in" => {
                Some("boolean".to_string())
            }
            "-" | "*" | "/" | "%" | "**" | "&" | "|" | "^" | "<<" | ">>" | ">>>" => {
                Some("number".to_string())
            }
            "+" => {
                let (left, right) = (operand("left"), operand("right"));
                match (left.as_deref(), right.as_deref()) {
                    (Some("string"), _) | (_, Some("string")) => Some("string".to_string()),
                    (Some("number"), Some("number")) => Some("number".to_string()),
                    _ => None,
                }
            }
            "&&" | "||" | "??" => {
                let (left, right) = (operand("left")?, operand("right")?);
                if left == right {
                    Some(left)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl TypeProvider for SyntaxTypes<'_> {
    fn parameter_type(&self, param: &Node) -> Option<String> {
        let annotation = param.child_by_field_name("type")?;
        self.annotation_text(&annotation)
    }

    fn return_type(&self, decl: &Node, parameters: &[Parameter]) -> Option<String> {
        match decl.child_by_field_name("return_type") {
            Some(annotation) => self.annotation_text(&annotation),
            None => self.infer_return_type(decl, parameters),
        }
    }

    fn modifiers(&self, member: &Node) -> Vec<Modifier> {
        children_before_name(member)
            .iter()
            .filter_map(|child| match child.kind() {
                "accessibility_modifier" => Modifier::from_keyword(node_str(child, self.source)),
                "static" | "readonly" => Modifier::from_keyword(child.kind()),
                _ => None,
            })
            .collect()
    }

    fn initializer(&self, property: &Node) -> Option<String> {
        property
            .child_by_field_name("value")
            .map(|value| get_node_text(&value, self.source))
    }
}
