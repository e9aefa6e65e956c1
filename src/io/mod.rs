//! Command-line plumbing: argument interpretation, usage text and exit codes.

pub mod args;
pub mod exit_code;
pub mod usage;

pub use args::{Request, normalize_args};
pub use exit_code::ExitCode;
pub use usage::USAGE;
