//! Declaration walker
//!
//! Enumerates the annotatable declarations of one parsed source unit: all
//! top-level functions first, then the methods and fields of each class.
//! Both groups are in source order. Candidate nodes are collected up front;
//! the [`Declaration`] views themselves are built one at a time as the
//! iterator is advanced.

use std::collections::VecDeque;

use tree_sitter::{Node, Tree};

use crate::jsdoc::DocBlock;
use crate::schema::{Declaration, DeclarationKind, DocSite, Parameter, SkipReason, Skipped};
use crate::syntax::{classify, get_node_text, is_doc_comment, node_str, NodeClass};
use crate::types::TypeProvider;

/// Item produced by the walker
#[derive(Debug, Clone)]
pub enum Walked {
    Declaration(Declaration),
    Skipped(Skipped),
}

/// A node to turn into a declaration, plus the node its documentation
/// attaches to (the `export` wrapper or the first decorator, if any)
#[derive(Debug, Clone, Copy)]
struct Candidate<'t> {
    node: Node<'t>,
    anchor: Node<'t>,
    kind: DeclarationKind,
}

/// Lazy, single-pass iterator over the declarations of a source unit
pub struct DeclarationWalker<'t, P> {
    source: &'t str,
    provider: &'t P,
    queue: VecDeque<Candidate<'t>>,
}

impl<'t, P: TypeProvider> DeclarationWalker<'t, P> {
    pub fn new(tree: &'t Tree, source: &'t str, provider: &'t P) -> Self {
        let root = tree.root_node();
        let mut functions = Vec::new();
        let mut classes = Vec::new();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let (node, anchor) = match classify(&child, source) {
                Some(NodeClass::Export) => match child.child_by_field_name("declaration") {
                    Some(decl) => (decl, child),
                    None => continue,
                },
                Some(_) => (child, child),
                None => continue,
            };
            match classify(&node, source) {
                Some(NodeClass::Function) => functions.push(Candidate {
                    node,
                    anchor,
                    kind: DeclarationKind::Function,
                }),
                Some(NodeClass::Class) => classes.push(node),
                _ => {}
            }
        }

        let mut queue: VecDeque<Candidate<'t>> = functions.into();
        for class in classes {
            let Some(body) = class.child_by_field_name("body") else {
                continue;
            };
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                let kind = match classify(&member, source) {
                    Some(NodeClass::Method) => DeclarationKind::Method,
                    Some(NodeClass::Property) => DeclarationKind::Property,
                    _ => continue,
                };
                queue.push_back(Candidate {
                    node: member,
                    anchor: leading_decorator(member),
                    kind,
                });
            }
        }

        Self {
            source,
            provider,
            queue,
        }
    }

    fn build(&self, candidate: Candidate<'t>) -> Walked {
        let Candidate { node, anchor, kind } = candidate;
        let line = node.start_position().row + 1;
        let name_node = node.child_by_field_name("name");
        let name = name_node.map(|n| get_node_text(&n, self.source));

        if node.has_error() {
            tracing::debug!("skipping {:?} at line {}: syntax error", name, line);
            return Walked::Skipped(Skipped {
                name,
                line,
                reason: SkipReason::ParseError,
            });
        }
        if name_node.is_some_and(|n| n.kind() == "computed_property_name") {
            tracing::debug!("skipping {:?} at line {}: computed name", name, line);
            return Walked::Skipped(Skipped {
                name,
                line,
                reason: SkipReason::ComputedName,
            });
        }

        let (site, doc) = match find_doc_comment(anchor, self.source) {
            Some(comment) => (
                DocSite::Existing(comment.start_byte()..comment.end_byte()),
                DocBlock::parse(node_str(&comment, self.source)),
            ),
            None => (DocSite::Insert(anchor.start_byte()), None),
        };

        let mut decl = Declaration::new(kind, name.unwrap_or_else(|| "default".to_string()), site);
        decl.doc = doc;
        decl.line = line;

        if kind.has_signature() {
            decl.parameters = self.parameters(&node);
            decl.return_type = self.provider.return_type(&node, &decl.parameters);
        }
        if kind.is_member() {
            decl.modifiers = self.provider.modifiers(&node);
        }
        if kind == DeclarationKind::Property {
            decl.initializer = self.provider.initializer(&node);
        }
        Walked::Declaration(decl)
    }

    /// Identifier and rest parameters. Destructuring patterns and `this`
    /// have no name a tag could refer to and are left out.
    fn parameters(&self, node: &Node) -> Vec<Parameter> {
        let Some(list) = node.child_by_field_name("parameters") else {
            return Vec::new();
        };
        let mut params = Vec::new();
        let mut cursor = list.walk();
        for param in list.named_children(&mut cursor) {
            if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
                continue;
            }
            let Some(pattern) = param.child_by_field_name("pattern") else {
                continue;
            };
            let name_node = match pattern.kind() {
                "identifier" => Some(pattern),
                "rest_pattern" => pattern.named_child(0).filter(|n| n.kind() == "identifier"),
                _ => None,
            };
            let Some(name_node) = name_node else {
                tracing::debug!(
                    "unsupported parameter pattern `{}`",
                    node_str(&pattern, self.source)
                );
                continue;
            };
            params.push(Parameter {
                name: get_node_text(&name_node, self.source),
                declared_type: self.provider.parameter_type(&param),
            });
        }
        params
    }
}

impl<'t, P: TypeProvider> Iterator for DeclarationWalker<'t, P> {
    type Item = Walked;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.queue.pop_front()?;
        Some(self.build(candidate))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.queue.len()))
    }
}

/// Method decorators are siblings in the class body; documentation goes
/// before the first of them.
fn leading_decorator(member: Node) -> Node {
    let mut anchor = member;
    while let Some(prev) = anchor.prev_sibling() {
        if prev.kind() != "decorator" {
            break;
        }
        anchor = prev;
    }
    anchor
}

/// First `/** */` comment in the run of comments directly preceding
/// `anchor`. A comment on the same line as the end of the previous sibling
/// trails that sibling and is not part of the run; an opening brace owns no
/// comments.
fn find_doc_comment<'t>(anchor: Node<'t>, source: &str) -> Option<Node<'t>> {
    let mut run = Vec::new();
    let mut prev = anchor.prev_sibling();
    while let Some(node) = prev {
        if node.kind() != "comment" {
            break;
        }
        run.push(node);
        prev = node.prev_sibling();
    }

    if let Some(owner) = prev.filter(|p| p.kind() != "{") {
        let owner_row = owner.end_position().row;
        run.retain(|c| c.start_position().row != owner_row);
    }

    run.into_iter()
        .rev()
        .find(|comment| is_doc_comment(comment, source))
}
