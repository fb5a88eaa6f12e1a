//! Declaration model handed from the walker to the tag synthesizer

use std::ops::Range;

use serde::Serialize;

use crate::jsdoc::DocBlock;

/// Kind of annotatable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Function,
    Method,
    Property,
}

impl DeclarationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Property => "property",
        }
    }

    /// Functions and methods carry parameter and return tags
    pub fn has_signature(&self) -> bool {
        matches!(self, Self::Function | Self::Method)
    }

    /// Class members carry modifier tags
    pub fn is_member(&self) -> bool {
        matches!(self, Self::Method | Self::Property)
    }
}

/// Access and mutability modifiers mirrored as bare tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Readonly,
    Static,
}

impl Modifier {
    /// Parse a modifier keyword as written in source
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            "readonly" => Some(Self::Readonly),
            "static" => Some(Self::Static),
            _ => None,
        }
    }

    /// Tag name (and source keyword) for this modifier
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Readonly => "readonly",
            Self::Static => "static",
        }
    }
}

/// A formal parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Declared type text; `None` when the parameter is untyped
    pub declared_type: Option<String>,
}

/// Where a declaration's documentation block lives in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocSite {
    /// Byte range of the existing `/** */` comment
    Existing(Range<usize>),
    /// Byte offset where a new block would be inserted
    Insert(usize),
}

/// A function, method or property, as seen by the synthesizer.
///
/// This is a transient view over one source unit; it holds copies of the
/// relevant text and the location of the documentation block, never a
/// reference into the syntax tree.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub modifiers: Vec<Modifier>,
    pub initializer: Option<String>,
    pub doc: Option<DocBlock>,
    pub site: DocSite,
    /// 1-based line of the declaration
    pub line: usize,
}

impl Declaration {
    /// Create a declaration with no signature, modifiers or documentation
    pub fn new(kind: DeclarationKind, name: impl Into<String>, site: DocSite) -> Self {
        Self {
            kind,
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            modifiers: Vec::new(),
            initializer: None,
            doc: None,
            site,
            line: 1,
        }
    }
}

/// Why a declaration was passed through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The declaration contains a syntax error
    ParseError,
    /// Member name is a computed expression (`[key]()`)
    ComputedName,
}

/// A declaration the walker could not turn into a [`Declaration`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub name: Option<String>,
    pub line: usize,
    pub reason: SkipReason,
}
