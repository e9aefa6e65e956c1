//! Candidate package directories
//!
//! Walks the `src` directory of every configured root, in order, never
//! descending into hidden directories.

use std::path::PathBuf;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Finds directories that may hold the requested package.
#[derive(Debug, Clone)]
pub struct PackageLocator {
    roots: Vec<PathBuf>,
}

impl PackageLocator {
    /// `roots` are installation or workspace roots; their `src` directories
    /// are searched.
    pub fn new(roots: &[PathBuf]) -> Self {
        Self {
            roots: roots.iter().map(|root| root.join("src")).collect(),
        }
    }

    /// Directories whose last component equals `package`, or every directory
    /// when no package is given. Roots are visited in order and each one in
    /// file-name order, so results are stable between runs.
    pub fn locate(&self, package: Option<&str>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                debug!("Skipping missing root {}", root.display());
                continue;
            }
            let found = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(is_visible)
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        debug!("Skipping unreadable entry: {e}");
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_dir())
                .filter(|entry| package.is_none_or(|name| entry.file_name() == name))
                .map(DirEntry::into_path);
            dirs.extend(found);
        }
        debug!(
            "{} candidate directories for {}",
            dirs.len(),
            package.unwrap_or("<all>")
        );
        dirs
    }
}

fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        for dir in [
            "goroot/src/fmt",
            "goroot/src/unicode",
            "goroot/src/cmd/gofmt",
            "goroot/src/.hidden/fmt",
            "gopath/src/example.com/fmt",
        ] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        temp
    }

    #[test]
    fn locates_by_last_component_across_roots() {
        let temp = tree();
        let locator = PackageLocator::new(&[temp.path().join("goroot"), temp.path().join("gopath")]);
        let dirs = locator.locate(Some("fmt"));
        assert_eq!(
            dirs,
            vec![
                temp.path().join("goroot/src/fmt"),
                temp.path().join("gopath/src/example.com/fmt"),
            ]
        );
    }

    #[test]
    fn no_package_returns_every_directory() {
        let temp = tree();
        let locator = PackageLocator::new(&[temp.path().join("goroot")]);
        let dirs = locator.locate(None);
        assert!(dirs.contains(&temp.path().join("goroot/src")));
        assert!(dirs.contains(&temp.path().join("goroot/src/cmd/gofmt")));
        assert!(!dirs.iter().any(|d| d.to_string_lossy().contains(".hidden")));
    }

    #[test]
    fn missing_roots_are_ignored() {
        let temp = TempDir::new().unwrap();
        let locator = PackageLocator::new(&[temp.path().join("nowhere")]);
        assert!(locator.locate(None).is_empty());
    }
}
