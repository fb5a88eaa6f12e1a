//! Annotation of a single source unit
//!
//! Parses the unit, walks its declarations, runs the synthesizer on each and
//! splices every changed block back into the original text. Bytes outside
//! changed blocks are copied through untouched.

use std::ops::Range;
use std::path::PathBuf;

use crate::error::Result;
use crate::jsdoc::Layout;
use crate::lang::Lang;
use crate::parsing::parse_source;
use crate::schema::{Declaration, DocSite, Skipped};
use crate::synth::synthesize;
use crate::syntax::{detect_newline, line_prefix};
use crate::types::{SyntaxTypes, TypeProvider};
use crate::walker::{DeclarationWalker, Walked};

/// Raw text of one file plus the name that selects its dialect
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub filename: PathBuf,
    pub text: String,
}

impl SourceUnit {
    pub fn new(filename: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
        }
    }

    /// Dialect selected by the filename extension
    pub fn lang(&self) -> Result<Lang> {
        Lang::from_path(&self.filename)
    }
}

/// Result of annotating one unit
#[derive(Debug, Clone)]
pub struct Annotated {
    /// Full output text
    pub text: String,
    /// Number of declarations visited
    pub declarations: usize,
    /// Number of documentation blocks rewritten or created
    pub changed_blocks: usize,
    /// Declarations passed through because of their shape
    pub skipped: Vec<Skipped>,
}

impl Annotated {
    pub fn is_changed(&self) -> bool {
        self.changed_blocks > 0
    }
}

/// A replacement of `range` in the original text
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Annotate a unit using the syntax-based type provider
pub fn annotate(unit: &SourceUnit) -> Result<Annotated> {
    annotate_with(unit, &SyntaxTypes::new(&unit.text))
}

/// Annotate a unit with a custom type provider
pub fn annotate_with<P: TypeProvider>(unit: &SourceUnit, provider: &P) -> Result<Annotated> {
    let lang = unit.lang()?;
    let source = unit.text.as_str();
    let tree = parse_source(&unit.filename, source, lang)?;
    tracing::debug!("{}: parsed as {}", unit.filename.display(), lang.name());
    let newline = detect_newline(source);

    let mut edits = Vec::new();
    let mut skipped = Vec::new();
    let mut declarations = 0;

    for item in DeclarationWalker::new(&tree, source, provider) {
        let mut decl = match item {
            Walked::Declaration(decl) => decl,
            Walked::Skipped(skip) => {
                skipped.push(skip);
                continue;
            }
        };
        declarations += 1;

        let synthesis = synthesize(&mut decl);
        if !synthesis.changed() {
            continue;
        }
        tracing::debug!(
            "{}:{} {} `{}`: {} tag(s) added, {} rewritten",
            unit.filename.display(),
            decl.line,
            decl.kind.name(),
            decl.name,
            synthesis.added,
            synthesis.rewritten
        );
        if let Some(edit) = render_edit(&decl, source, newline) {
            edits.push(edit);
        }
    }

    let changed_blocks = edits.len();
    let text = apply_edits(source, edits);
    tracing::info!(
        "{}: {} declaration(s), {} block(s) changed, {} skipped",
        unit.filename.display(),
        declarations,
        changed_blocks,
        skipped.len()
    );

    Ok(Annotated {
        text,
        declarations,
        changed_blocks,
        skipped,
    })
}

/// Text edit that writes the declaration's block back into the source
fn render_edit(decl: &Declaration, source: &str, newline: &str) -> Option<Edit> {
    let block = decl.doc.as_ref()?;
    let start = match &decl.site {
        DocSite::Existing(range) => range.start,
        DocSite::Insert(at) => *at,
    };

    let prefix = line_prefix(source, start);
    let starts_line = prefix.chars().all(char::is_whitespace);
    let layout = if starts_line {
        Layout::Block {
            indent: prefix,
            newline,
        }
    } else {
        Layout::Inline
    };
    let rendered = block.render(layout);

    Some(match &decl.site {
        DocSite::Existing(range) => Edit {
            range: range.clone(),
            text: rendered,
        },
        DocSite::Insert(at) => {
            let separator = if starts_line {
                format!("{}{}", newline, prefix)
            } else {
                " ".to_string()
            };
            Edit {
                range: *at..*at,
                text: format!("{}{}", rendered, separator),
            }
        }
    })
}

/// Apply non-overlapping edits, back to front
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.range.start.cmp(&a.range.start));
    let mut out = source.to_string();
    for edit in edits {
        out.replace_range(edit.range, &edit.text);
    }
    out
}
