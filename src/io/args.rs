//! Command-line argument handling
//!
//! Flags are accepted the Go way, with a single dash (`-const`, `-pkg`),
//! and rewritten to the double-dash form before clap sees them. The
//! positional arguments are then interpreted by [`Request::from_args`].

use crate::config::ExportRule;
use crate::error::{DocError, DocResult};
use crate::lookup::{KindFilter, OutputFilter, Query};

/// Long flags that may be written with one dash.
const LONG_FLAGS: &[&str] = &[
    "const",
    "func",
    "interface",
    "method",
    "package",
    "pkg",
    "struct",
    "type",
    "var",
    "doc",
    "src",
    "url",
    "config",
    "help",
    "version",
];

/// Rewrites `-flag` and `-flag=value` to `--flag` and `--flag=value` for
/// every known long flag. The program name and everything after `--` are
/// left alone.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        let arg: String = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        match arg.strip_prefix('-') {
            Some(rest) if !rest.starts_with('-') && is_long_flag(rest) => {
                out.push(format!("-{arg}"));
            }
            _ => out.push(arg),
        }
    }
    out
}

fn is_long_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}

/// What the positional arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `-package pkg`
    PackageDoc { package: String },
    /// `name`, `pkg.name`, `pkg name` or `-r expr`
    Declarations {
        package: Option<String>,
        name: String,
    },
}

impl Request {
    /// Interprets the positional arguments.
    ///
    /// One argument is the package with `-package`, the whole name with
    /// `-r`, split at its first `.` when it has one, and a bare name
    /// otherwise. Two arguments are a package and a name and cannot be
    /// combined with `-package`.
    pub fn from_args(args: &[String], package_mode: bool, regex: bool) -> DocResult<Self> {
        match args {
            [arg] if package_mode => Ok(Request::PackageDoc {
                package: arg.clone(),
            }),
            [arg] if regex => Ok(Request::Declarations {
                package: None,
                name: arg.clone(),
            }),
            [arg] => Ok(match arg.split_once('.') {
                Some((package, name)) => Request::Declarations {
                    package: Some(package.to_string()),
                    name: name.to_string(),
                },
                None => Request::Declarations {
                    package: None,
                    name: arg.clone(),
                },
            }),
            [_, _] if package_mode => Err(DocError::Usage {
                reason: "-package takes a single package name".to_string(),
            }),
            [package, name] => Ok(Request::Declarations {
                package: Some(package.clone()),
                name: name.clone(),
            }),
            _ => Err(DocError::Usage {
                reason: format!("expected one or two arguments, got {}", args.len()),
            }),
        }
    }

    /// Builds the immutable query for this request.
    pub fn into_query(
        self,
        kinds: KindFilter,
        outputs: OutputFilter,
        rule: ExportRule,
    ) -> DocResult<Query> {
        match self {
            Request::PackageDoc { package } => Query::package_doc(package, outputs),
            Request::Declarations { package, name } => {
                Query::declarations(package, &name, kinds, outputs, rule)
            }
        }
    }
}
