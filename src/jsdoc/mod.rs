//! JSDoc block model
//!
//! A [`DocBlock`] is the description prose of a `/** */` comment followed by
//! its tags. Tags read from source keep their original text until something
//! changes them, so untouched tags are written back byte for byte.

mod parse;
mod render;

pub use render::Layout;

/// Tag names recognized as parameter tags
pub const PARAM_TAG_NAMES: &[&str] = &["param", "parameter"];

/// Tag names recognized as return tags
pub const RETURN_TAG_NAMES: &[&str] = &["returns", "return"];

/// Classification of a tag by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Param,
    Return,
    Modifier,
    Default,
    Other,
}

impl TagKind {
    /// Classify a tag name
    pub fn of(name: &str) -> Self {
        if PARAM_TAG_NAMES.contains(&name) {
            Self::Param
        } else if RETURN_TAG_NAMES.contains(&name) {
            Self::Return
        } else if crate::schema::Modifier::from_keyword(name).is_some() {
            Self::Modifier
        } else if name == "default" {
            Self::Default
        } else {
            Self::Other
        }
    }
}

/// One `@tag` of a documentation block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name without the `@`, spelled as in source
    pub name: String,
    /// Contents of the `{...}` type expression
    pub type_expression: Option<String>,
    /// Subject of a parameter tag, spelled as in source (`x`, `[x]`, `[x=1]`)
    pub subject: Option<String>,
    /// Trailing free text (may span lines)
    pub comment: String,
    /// Original source text, kept while the tag is unmodified
    raw: Option<String>,
}

impl Tag {
    fn synthesized(name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_expression: None,
            subject: None,
            comment: String::new(),
            raw: None,
        }
    }

    /// New `@param {type} name` tag with no comment
    pub fn param(name: &str, type_expression: &str) -> Self {
        Self {
            type_expression: Some(type_expression.to_string()),
            subject: Some(name.to_string()),
            ..Self::synthesized("param")
        }
    }

    /// New `@returns {type}` tag
    pub fn returns(type_expression: &str) -> Self {
        Self {
            type_expression: Some(type_expression.to_string()),
            ..Self::synthesized("returns")
        }
    }

    /// New bare tag such as `@private`
    pub fn bare(name: &str) -> Self {
        Self::synthesized(name)
    }

    /// New `@default <value>` tag
    pub fn default_value(value: &str) -> Self {
        Self {
            comment: value.to_string(),
            ..Self::synthesized("default")
        }
    }

    pub fn kind(&self) -> TagKind {
        TagKind::of(&self.name)
    }

    /// True if the tag has no type, subject or comment
    pub fn is_bare(&self) -> bool {
        self.type_expression.is_none() && self.subject.is_none() && self.comment.is_empty()
    }

    /// Parameter name the subject refers to, without optional brackets or
    /// default value
    pub fn subject_name(&self) -> Option<&str> {
        let subject = self.subject.as_deref()?;
        let inner = subject
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(subject);
        let name = inner.split('=').next().unwrap_or(inner).trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Replace the type expression. Returns true if the tag text changed.
    pub fn set_type(&mut self, type_expression: &str) -> bool {
        let before = self.to_text();
        let mut updated = self.clone();
        updated.type_expression = Some(type_expression.to_string());
        updated.raw = None;
        if updated.to_text() == before {
            return false;
        }
        *self = updated;
        true
    }
}

/// A parsed documentation block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Description lines preceding the first tag
    pub description: Vec<String>,
    pub tags: Vec<Tag>,
}

impl DocBlock {
    /// First tag of the given kind
    pub fn find(&self, kind: TagKind) -> Option<usize> {
        self.tags.iter().position(|t| t.kind() == kind)
    }
}
