//! Parsed packages
//!
//! A [`PackageScan`] owns the files of one package in one directory. It
//! lives for one step of the lookup and is dropped once that directory has
//! been rendered.

use crate::checker::{Checker, DiscardErrors, TypeInfo};
use crate::lookup::roots::DocRoot;
use crate::parsing::{CommentMap, SourceFile};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// One source file with its comment bindings and documentation root.
#[derive(Debug)]
pub struct ParsedFile {
    pub file: SourceFile,
    pub comments: CommentMap,
    pub root: DocRoot,
}

impl ParsedFile {
    pub fn new(file: SourceFile, root: DocRoot) -> Self {
        let comments = CommentMap::new(&file);
        Self {
            file,
            comments,
            root,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// The files of one package, with type information built on first use.
#[derive(Debug)]
pub struct PackageScan {
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<ParsedFile>,
    type_info: OnceCell<TypeInfo>,
}

impl PackageScan {
    pub fn new(name: String, dir: PathBuf, files: Vec<ParsedFile>) -> Self {
        Self {
            name,
            dir,
            files,
            type_info: OnceCell::new(),
        }
    }

    /// Type information for the whole package. Type errors are discarded.
    pub fn type_info(&self) -> &TypeInfo {
        self.type_info.get_or_init(|| {
            tracing::debug!("Type-checking package {} in {}", self.name, self.dir.display());
            Checker::new(DiscardErrors).check(self.files.iter().map(|f| &f.file))
        })
    }

    /// Whether [`type_info`](Self::type_info) has already run.
    pub fn checked(&self) -> bool {
        self.type_info.get().is_some()
    }
}
