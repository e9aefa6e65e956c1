//! Reads and parses the Go files of one directory.

use crate::error::DocResult;
use crate::indexing::package::{PackageScan, ParsedFile};
use crate::lookup::roots::DocRoots;
use crate::parsing::{GoParser, SourceParser};
use crate::types::{FileCounter, MAX_SOURCE_LEN};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Turns a directory into the packages declared in it.
pub struct PackageLoader<P: SourceParser = GoParser> {
    parser: P,
    roots: DocRoots,
}

impl PackageLoader<GoParser> {
    pub fn new(roots: DocRoots) -> DocResult<Self> {
        Ok(Self::with_parser(GoParser::new()?, roots))
    }
}

impl<P: SourceParser> PackageLoader<P> {
    pub fn with_parser(parser: P, roots: DocRoots) -> Self {
        Self { parser, roots }
    }

    /// Packages in `dir`, ordered by name. Files that cannot be read or
    /// parsed are skipped; a directory without source files yields nothing.
    pub fn load(&mut self, dir: &Path) -> Vec<PackageScan> {
        let mut counter = FileCounter::new();
        let mut packages: BTreeMap<String, Vec<ParsedFile>> = BTreeMap::new();

        for path in self.source_files(dir) {
            let Some(file_id) = counter.next_id() else {
                warn!("Too many files in {}", dir.display());
                break;
            };
            if fs::metadata(&path).is_ok_and(|meta| !within_limit(meta.len())) {
                warn!("Skipping {}: file too large", path.display());
                continue;
            }
            let code = match fs::read_to_string(&path) {
                Ok(code) => code,
                Err(e) => {
                    warn!("Failed to read {}: {e}", path.display());
                    continue;
                }
            };
            match self.parser.parse_file(&path, file_id, code) {
                Ok(file) => {
                    let root = self.roots.classify(&path);
                    packages
                        .entry(file.package_name().to_string())
                        .or_default()
                        .push(ParsedFile::new(file, root));
                }
                Err(e) => debug!("Skipping {}: {e}", path.display()),
            }
        }

        packages
            .into_iter()
            .map(|(name, files)| PackageScan::new(name, dir.to_path_buf(), files))
            .collect()
    }

    fn source_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping directory {}: {e}", dir.display());
                return Vec::new();
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
            .map(|entry| entry.path())
            .filter(|path| self.parser.handles(path))
            .collect();
        files.sort();
        files
    }
}

/// Whether a file of `len` bytes can be positioned.
fn within_limit(len: u64) -> bool {
    usize::try_from(len).is_ok_and(|len| len <= MAX_SOURCE_LEN)
}
