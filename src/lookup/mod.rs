//! Documentation lookup
//!
//! Ties the pieces together: candidate directories come from the
//! [`PackageLocator`](crate::indexing::PackageLocator), each is parsed into
//! packages, and each package is walked twice. The first walk only decides
//! whether the package holds a match at all; the package is type-checked and
//! rendered only when it does.

pub mod matcher;
pub mod methods;
pub mod query;
pub mod render;
pub mod roots;
pub mod walker;

pub use matcher::{NameMatcher, SearchTarget};
pub use methods::{MethodSetEntry, MethodSetResolver};
pub use query::{KindFilter, OutputFilter, Query, QueryMode};
pub use render::Renderer;
pub use roots::{DocRoot, DocRoots};
pub use walker::{DeclNode, DeclarationWalker, MatchedDeclaration, Walk, WalkMode};

use crate::config::Settings;
use crate::error::DocResult;
use crate::indexing::{PackageLoader, PackageLocator, PackageScan};
use std::io::Write;
use tracing::debug;

/// Counters for one lookup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupSummary {
    pub directories: usize,
    pub packages: usize,
    /// Packages that held at least one match
    pub matched_packages: usize,
    /// Entries written, methods included
    pub rendered: usize,
}

/// One documentation query against the configured source trees.
pub struct DocLookup<'a> {
    query: &'a Query,
    settings: &'a Settings,
}

impl<'a> DocLookup<'a> {
    pub fn new(query: &'a Query, settings: &'a Settings) -> Self {
        Self { query, settings }
    }

    /// Runs the query, writing documentation to `out`. Finding nothing is
    /// not an error.
    pub fn run<W: Write>(&self, out: &mut W) -> DocResult<LookupSummary> {
        let locator = PackageLocator::new(&self.settings.search_roots());
        let mut loader = PackageLoader::new(DocRoots::from_settings(self.settings))?;
        let mut summary = LookupSummary::default();

        for dir in locator.locate(self.query.package.as_deref()) {
            summary.directories += 1;
            for package in loader.load(&dir) {
                summary.packages += 1;
                let rendered = if self.query.is_package_doc() {
                    self.package_doc(&package, out)?
                } else {
                    self.declarations(&package, out)?
                };
                if rendered > 0 {
                    summary.matched_packages += 1;
                    summary.rendered += rendered;
                }
            }
        }
        out.flush()?;

        debug!(
            "Lookup finished: {} directories, {} packages, {} matched, {} entries",
            summary.directories, summary.packages, summary.matched_packages, summary.rendered
        );
        Ok(summary)
    }

    fn package_doc<W: Write>(&self, package: &PackageScan, out: &mut W) -> DocResult<usize> {
        let renderer = Renderer::new();
        let mut rendered = 0;
        for file in &package.files {
            if let Some(text) = renderer.render_package_doc(file, self.query.outputs) {
                out.write_all(text.as_bytes())?;
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    fn declarations<W: Write>(&self, package: &PackageScan, out: &mut W) -> DocResult<usize> {
        let walker = DeclarationWalker::new(self.query);
        let found = package
            .files
            .iter()
            .any(|file| walker.walk(package, file, WalkMode::Discovery).found);
        if !found {
            return Ok(0);
        }
        debug!("Match in package {} at {}", package.name, package.dir.display());

        package.type_info();
        let renderer = Renderer::new();
        let mut rendered = 0;
        for file in &package.files {
            for hit in walker.walk(package, file, WalkMode::Render).matches {
                out.write_all(renderer.render(&hit).as_bytes())?;
                rendered += 1;
            }
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExportRule, RootsConfig};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn settings(goroot: &Path, gopath: &Path) -> Settings {
        Settings {
            roots: RootsConfig {
                goroot: Some(goroot.to_path_buf()),
                gopath: vec![gopath.to_path_buf()],
            },
            ..Settings::default()
        }
    }

    fn write(root: &Path, rel: &str, code: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, code).unwrap();
    }

    fn run(settings: &Settings, query: &Query) -> (String, LookupSummary) {
        let mut out = Vec::new();
        let summary = DocLookup::new(query, settings).run(&mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn searches_every_root_in_order() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("go");
        let gopath = temp.path().join("work");
        write(&goroot, "src/errors/errors.go", "package errors\n\n// New makes an error.\nfunc New() {}\n");
        write(&gopath, "src/example.com/errors/e.go", "package errors\n\n// New is not that New.\nfunc New() {}\n");

        let query = Query::declarations(
            Some("errors".to_string()),
            "new",
            KindFilter::empty(),
            OutputFilter::URL,
            ExportRule::Uppercase,
        )
        .unwrap();
        let (out, summary) = run(&settings(&goroot, &gopath), &query);
        assert_eq!(
            out,
            "http://golang.org/pkg/errors/#New\nhttp://godoc.org/example.com/errors/#New\n"
        );
        assert_eq!(summary.matched_packages, 2);
    }

    #[test]
    fn no_match_is_silent() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("go");
        write(&goroot, "src/errors/errors.go", "package errors\n\nfunc New() {}\n");

        let query = Query::declarations(
            None,
            "Missing",
            KindFilter::empty(),
            OutputFilter::empty(),
            ExportRule::Uppercase,
        )
        .unwrap();
        let (out, summary) = run(&settings(&goroot, &temp.path().join("none")), &query);
        assert!(out.is_empty());
        assert_eq!(summary.rendered, 0);
        assert!(summary.packages >= 1);
    }

    #[test]
    fn package_doc_skips_files_without_one() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("go");
        write(&goroot, "src/fmt/doc.go", "// Package fmt formats.\npackage fmt\n");
        write(&goroot, "src/fmt/print.go", "package fmt\n\n// Fmt is a decl.\nconst Fmt = 1\n");

        let query = Query::package_doc("fmt".to_string(), OutputFilter::DOC).unwrap();
        let (out, summary) = run(&settings(&goroot, &temp.path().join("none")), &query);
        assert_eq!(out, "package fmt\nPackage fmt formats.\n\n\n");
        assert_eq!(summary.rendered, 1);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let temp = TempDir::new().unwrap();
        let goroot = temp.path().join("go");
        write(&goroot, "src/a/a.go", "package a\n\n// Print prints.\nfunc Print() {}\n");
        write(&goroot, "src/b/b.go", "package b\n\n// Sprint formats.\nfunc Sprint() {}\n");

        let query = Query::declarations(
            None,
            ".?print",
            KindFilter::empty(),
            OutputFilter::empty(),
            ExportRule::Uppercase,
        )
        .unwrap();
        let settings = settings(&goroot, &temp.path().join("none"));
        let (first, _) = run(&settings, &query);
        let (second, _) = run(&settings, &query);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
