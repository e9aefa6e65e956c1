//! Query configuration
//!
//! Built once from the command line and handed by reference to every
//! component; nothing downstream consults global state.

use crate::config::ExportRule;
use crate::error::{DocError, DocResult};
use crate::lookup::matcher::{NameMatcher, SearchTarget};
use bitflags::bitflags;

bitflags! {
    /// Declaration kinds a query is restricted to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindFilter: u8 {
        const CONST = 1 << 0;
        const VAR = 1 << 1;
        const TYPE = 1 << 2;
        const INTERFACE = 1 << 3;
        const STRUCT = 1 << 4;
        const FUNC = 1 << 5;
        const METHOD = 1 << 6;
        const PACKAGE = 1 << 7;
    }
}

impl KindFilter {
    /// Kinds searched when the caller names none. Package docs are a
    /// different kind of query and never part of it.
    pub const DEFAULT: Self = Self::CONST
        .union(Self::FUNC)
        .union(Self::METHOD)
        .union(Self::TYPE)
        .union(Self::VAR);

    pub fn or_default(self) -> Self {
        if self.is_empty() { Self::DEFAULT } else { self }
    }
}

bitflags! {
    /// Facets printed for each hit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutputFilter: u8 {
        const DOC = 1 << 0;
        const SOURCE = 1 << 1;
        const URL = 1 << 2;
    }
}

impl OutputFilter {
    pub fn or_default(self) -> Self {
        if self.is_empty() { Self::all() } else { self }
    }
}

/// What a query looks for.
#[derive(Debug, Clone)]
pub enum QueryMode {
    /// Package clause documentation only
    PackageDoc,
    /// Top-level declarations whose names match
    Declarations(NameMatcher),
}

#[derive(Debug, Clone)]
pub struct Query {
    /// Final path component of the package to search; `None` searches all
    pub package: Option<String>,
    pub mode: QueryMode,
    pub kinds: KindFilter,
    pub outputs: OutputFilter,
}

impl Query {
    /// Query for declarations named (or matching) `name`.
    pub fn declarations(
        package: Option<String>,
        name: &str,
        kinds: KindFilter,
        outputs: OutputFilter,
        rule: ExportRule,
    ) -> DocResult<Self> {
        let package = check_package(package)?;
        let target = SearchTarget::parse(name)?;
        Ok(Self {
            package,
            mode: QueryMode::Declarations(NameMatcher::new(target, rule)),
            kinds: kinds.or_default(),
            outputs: outputs.or_default(),
        })
    }

    /// Query for the package doc comment of `package`.
    pub fn package_doc(package: String, outputs: OutputFilter) -> DocResult<Self> {
        let package = check_package(Some(package))?;
        Ok(Self {
            package,
            mode: QueryMode::PackageDoc,
            kinds: KindFilter::PACKAGE,
            outputs: outputs.or_default(),
        })
    }

    pub fn matcher(&self) -> Option<&NameMatcher> {
        match &self.mode {
            QueryMode::Declarations(matcher) => Some(matcher),
            QueryMode::PackageDoc => None,
        }
    }

    pub fn is_package_doc(&self) -> bool {
        matches!(self.mode, QueryMode::PackageDoc)
    }
}

fn check_package(package: Option<String>) -> DocResult<Option<String>> {
    match package {
        Some(p) if p.contains('/') => Err(DocError::PackageWithSlash { package: p }),
        Some(p) if p.is_empty() => Ok(None),
        other => Ok(other),
    }
}
