//! Error types for documentation lookup
//!
//! Fatal errors (bad patterns, malformed invocations) are reported before any
//! scanning starts. Per-file problems surface as [`ParseError`] and are
//! skipped by the loader rather than propagated.

use thiserror::Error;

/// Main error type for lookup operations
#[derive(Error, Debug)]
pub enum DocError {
    /// The search target looked like a regular expression but did not compile
    #[error("regular expression `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: Box<regex::Error>,
    },

    /// Wrong argument count or conflicting flags
    #[error("{reason}")]
    Usage { reason: String },

    #[error("package name cannot contain slash: '{package}'")]
    PackageWithSlash { package: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Parser(#[from] ParseError),
}

impl DocError {
    /// Whether usage text should accompany this error.
    pub fn shows_usage(&self) -> bool {
        matches!(self, Self::Usage { .. } | Self::InvalidPattern { .. })
    }
}

/// Errors specific to parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to initialize {language} parser: {reason}")]
    ParserInit { language: String, reason: String },

    #[error("Failed to parse code at line {line}, column {column}: {reason}")]
    SyntaxError {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Missing package clause")]
    MissingPackage,

    #[error("Source file of {bytes} bytes is too large")]
    FileTooLarge { bytes: usize },
}

/// Result type alias for lookup operations
pub type DocResult<T> = Result<T, DocError>;

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;
