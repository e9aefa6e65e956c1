//! Go language parser implementation
//!
//! Lowers tree-sitter-go trees into the owned syntax model used by the
//! lookup engine: declarations, specs, receivers, type shapes and comment
//! groups with exact source positions.
//!
//! ## Module Components
//!
//! - [`parser`]: Tree-sitter integration and lowering

pub mod parser;

pub use parser::GoParser;
