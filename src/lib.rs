//! docmagen: JSDoc type tags synthesized from TypeScript declarations
//!
//! Documentation generators that only understand JSDoc lose the type
//! information TypeScript already carries. docmagen walks each source file
//! with tree-sitter, finds every function, class method and class property,
//! and rewrites the declaration's `/** */` block so its `@param`, `@returns`,
//! modifier and `@default` tags agree with the code. Everything outside the
//! rewritten blocks is copied byte for byte.
//!
//! # Example
//!
//! ```ignore
//! use docmagen::{annotate, SourceUnit};
//!
//! let unit = SourceUnit::new("math.ts", "function double(n: number): number { return n * 2; }");
//! let annotated = annotate(&unit)?;
//! assert!(annotated.text.contains("@param {number} n"));
//! ```

pub mod annotate;
pub mod cli;
pub mod config;
pub mod error;
pub mod jsdoc;
pub mod lang;
pub mod parsing;
pub mod pipeline;
pub mod schema;
pub mod synth;
pub mod syntax;
pub mod terminal_link;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use annotate::{annotate, annotate_with, Annotated, SourceUnit};
pub use cli::{Cli, OutputFormat};
pub use config::DocmagenConfig;
pub use error::{DocmagenError, Result};
pub use jsdoc::{DocBlock, Tag, TagKind};
pub use lang::Lang;
pub use pipeline::{run, FileReport, Identity, RunOptions, RunReport, Transpiler};
pub use schema::{Declaration, DeclarationKind, DocSite, Modifier, Parameter, SkipReason, Skipped};
pub use synth::{synthesize, Synthesis};
pub use types::{SyntaxTypes, TypeProvider};
pub use walker::{DeclarationWalker, Walked};
