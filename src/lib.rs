//! Documentation lookup for Go source trees.
//!
//! Given a name, a `pkg.name` pair or a regular expression, finds matching
//! exported declarations under `GOROOT` and `GOPATH` and prints their doc
//! comments, source locations and documentation URLs.

pub mod checker;
pub mod config;
pub mod error;
pub mod indexing;
pub mod io;
pub mod lookup;
pub mod parsing;
pub mod types;

// Explicit exports for better API clarity
pub use config::{ExportRule, Settings};
pub use error::{DocError, DocResult, ParseError, ParseResult};
pub use lookup::{DocLookup, KindFilter, LookupSummary, OutputFilter, Query};
pub use parsing::GoParser;
pub use types::{FileId, Pos, Span};
