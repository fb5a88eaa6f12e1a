//! Parsing of source units into tree-sitter syntax trees.
//!
//! Every call builds its own `tree_sitter::Parser`, so units can be parsed
//! from any number of threads without sharing state.
//!
//! # Example
//!
//! ```ignore
//! use docmagen::parsing::parse_source;
//! use docmagen::Lang;
//! use std::path::Path;
//!
//! let tree = parse_source(Path::new("hello.ts"), "function hello() {}", Lang::TypeScript)?;
//! assert_eq!(tree.root_node().kind(), "program");
//! ```

use std::path::Path;

use tree_sitter::Tree;

use crate::error::DocmagenError;
use crate::lang::Lang;

/// Parse source code into a syntax tree.
///
/// # Errors
///
/// Returns `DocmagenError::ParseFailure` if the grammar cannot be loaded or
/// the parser gives up on the input.
pub fn parse_source(file_path: &Path, source: &str, lang: Lang) -> Result<Tree, DocmagenError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| DocmagenError::ParseFailure {
            message: format!(
                "Failed to set language for {}: {:?}",
                file_path.display(),
                e
            ),
        })?;

    parser
        .parse(source, None)
        .ok_or_else(|| DocmagenError::ParseFailure {
            message: format!("Failed to parse file: {}", file_path.display()),
        })
}
