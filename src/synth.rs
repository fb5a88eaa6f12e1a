//! Tag synthesizer
//!
//! Merges a declaration's declared types, modifiers and default value into
//! its documentation block:
//!
//! - typed parameters: an existing `@param` with the same name gets its type
//!   rewritten (tag spelling and comment kept), otherwise a new one is added;
//!   untyped parameters are never touched
//! - return type: the first `@returns`/`@return` is rewritten, otherwise one
//!   is added
//! - modifiers (class members): one bare tag each, in source order, unless
//!   already present
//! - initializer (fields): an `@default` tag is always appended
//!
//! Parameter, return and modifier tags are idempotent. `@default` is not: a
//! second pass over already-annotated output appends another one.

use std::collections::HashSet;

use crate::jsdoc::{DocBlock, Tag, TagKind};
use crate::schema::{Declaration, DeclarationKind};

/// What a synthesis pass did to one block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Synthesis {
    pub added: usize,
    pub rewritten: usize,
}

impl Synthesis {
    pub fn changed(&self) -> bool {
        self.added > 0 || self.rewritten > 0
    }
}

/// Update the declaration's documentation block in place.
///
/// A block is created if the declaration has none; if nothing ends up in
/// it, the declaration is left without one.
pub fn synthesize(decl: &mut Declaration) -> Synthesis {
    let created = decl.doc.is_none();
    let mut block = decl.doc.take().unwrap_or_default();
    let mut result = Synthesis::default();

    if decl.kind.has_signature() {
        merge_parameters(decl, &mut block, &mut result);
        merge_return(decl, &mut block, &mut result);
    }
    if decl.kind.is_member() {
        append_modifiers(decl, &mut block, &mut result);
    }
    if decl.kind == DeclarationKind::Property {
        if let Some(init) = &decl.initializer {
            block.tags.push(Tag::default_value(init));
            result.added += 1;
        }
    }

    if !(created && !result.changed()) {
        decl.doc = Some(block);
    }
    result
}

fn merge_parameters(decl: &Declaration, block: &mut DocBlock, result: &mut Synthesis) {
    let mut claimed: HashSet<usize> = HashSet::new();

    for param in &decl.parameters {
        let Some(declared) = &param.declared_type else {
            continue;
        };
        let existing = block.tags.iter().enumerate().position(|(i, tag)| {
            !claimed.contains(&i)
                && tag.kind() == TagKind::Param
                && tag.subject_name() == Some(param.name.as_str())
        });

        match existing {
            Some(index) => {
                claimed.insert(index);
                if block.tags[index].set_type(declared) {
                    result.rewritten += 1;
                }
            }
            None => {
                claimed.insert(block.tags.len());
                block.tags.push(Tag::param(&param.name, declared));
                result.added += 1;
            }
        }
    }
}

fn merge_return(decl: &Declaration, block: &mut DocBlock, result: &mut Synthesis) {
    let Some(return_type) = &decl.return_type else {
        return;
    };
    match block.find(TagKind::Return) {
        Some(index) => {
            if block.tags[index].set_type(return_type) {
                result.rewritten += 1;
            }
        }
        None => {
            block.tags.push(Tag::returns(return_type));
            result.added += 1;
        }
    }
}

fn append_modifiers(decl: &Declaration, block: &mut DocBlock, result: &mut Synthesis) {
    for modifier in &decl.modifiers {
        let name = modifier.tag_name();
        let present = block
            .tags
            .iter()
            .any(|tag| tag.name == name && tag.is_bare());
        if !present {
            block.tags.push(Tag::bare(name));
            result.added += 1;
        }
    }
}
