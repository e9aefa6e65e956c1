#![allow(dead_code)]

use gdoc::config::RootsConfig;
use gdoc::{DocLookup, LookupSummary, Query, Settings};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway Go installation plus one workspace.
pub struct GoTree {
    pub dir: TempDir,
}

impl GoTree {
    pub fn new() -> Self {
        let tree = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        fs::create_dir_all(tree.goroot().join("src")).expect("Failed to create GOROOT");
        fs::create_dir_all(tree.gopath().join("src")).expect("Failed to create GOPATH");
        tree
    }

    pub fn goroot(&self) -> PathBuf {
        self.dir.path().join("goroot")
    }

    pub fn gopath(&self) -> PathBuf {
        self.dir.path().join("gopath")
    }

    /// Writes `content` to `rel` under GOROOT/src.
    pub fn std_file(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.goroot().join("src").join(rel), content)
    }

    /// Writes `content` to `rel` under GOPATH/src.
    pub fn workspace_file(&self, rel: &str, content: &str) -> PathBuf {
        write(&self.gopath().join("src").join(rel), content)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            roots: RootsConfig {
                goroot: Some(self.goroot()),
                gopath: vec![self.gopath()],
            },
            ..Settings::default()
        }
    }

    pub fn run(&self, query: &Query) -> (String, LookupSummary) {
        let settings = self.settings();
        let mut out = Vec::new();
        let summary = DocLookup::new(query, &settings)
            .run(&mut out)
            .expect("lookup failed");
        (String::from_utf8(out).expect("output is not UTF-8"), summary)
    }
}

fn write(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(path, content).expect("Failed to write file");
    path.to_path_buf()
}

pub const UNICODE: &str = "// Package unicode provides data and functions to test some properties of
// Unicode code points.
package unicode

// IsUpper reports whether the rune is an upper case letter.
func IsUpper(r rune) bool {
	if r <= MaxLatin1 {
		return 'A' <= r && r <= 'Z'
	}
	return false
}

const MaxLatin1 = '\\u00FF' // maximum Latin-1 value.
";

pub const FMT: &str = "// Package fmt implements formatted I/O with functions analogous
// to C's printf and scanf.
package fmt

// Print formats using the default formats.
func Print(a ...any) (n int, err error) { return 0, nil }

// Fprint formats using the default formats and writes to w.
func Fprint(w any, a ...any) (n int, err error) { return 0, nil }

// Sprint formats using the default formats and returns the string.
func Sprint(a ...any) string { return \"\" }

// Fprintf formats according to a format specifier and writes to w.
func Fprintf(w any, format string, a ...any) (n int, err error) { return 0, nil }
";
