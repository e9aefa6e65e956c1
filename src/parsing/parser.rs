//! Source parser trait
//!
//! The seam between the lookup engine and the language front end: a parser
//! turns the contents of one file into the owned syntax model.

use crate::error::ParseResult;
use crate::parsing::ast::SourceFile;
use crate::types::FileId;
use std::path::Path;

/// Common interface for source parsers
pub trait SourceParser {
    /// Parse one file. Syntax errors are reported, never partially recovered.
    fn parse_file(&mut self, path: &Path, file_id: FileId, code: String)
    -> ParseResult<SourceFile>;

    /// Whether this parser accepts the given file
    fn handles(&self, path: &Path) -> bool;
}
