//! Documentation roots
//!
//! Every file is classified once against the known source roots to find the
//! prefix stripped from its path and the documentation site its URL points
//! at.

use crate::config::{Settings, UrlConfig};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Where a file's documentation lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRoot {
    /// Root directory stripped from file paths; empty when unrecognized
    pub path_prefix: String,
    /// Documentation site base
    pub url_prefix: String,
}

impl DocRoot {
    /// URL of the package directory holding `file`, ending in `/`.
    pub fn package_url(&self, file: &Path) -> String {
        let full = slashed(file);
        let mut s = full.strip_prefix(&self.path_prefix).unwrap_or(&full);
        if let Some(i) = s.rfind('/') {
            if i > 0 {
                s = &s[..=i];
            }
        }
        format!("{}{}", self.url_prefix, s)
    }

    pub fn name_url(&self, file: &Path, name: &str) -> String {
        format!("{}#{}", self.package_url(file), name)
    }

    /// Anchor for a method; a leading `*` on the receiver type is dropped.
    pub fn method_url(&self, file: &Path, receiver_type: &str, name: &str) -> String {
        let type_name = receiver_type.strip_prefix('*').unwrap_or(receiver_type);
        format!("{}#{}.{}", self.package_url(file), type_name, name)
    }
}

/// The recognized roots, checked command root first since it sits inside
/// the standard root.
#[derive(Debug, Clone)]
pub struct DocRoots {
    command: PathBuf,
    standard: PathBuf,
    user: Vec<PathBuf>,
    urls: UrlConfig,
}

impl DocRoots {
    pub fn new(goroot: &Path, gopath: &[PathBuf], urls: UrlConfig) -> Self {
        let standard = goroot.join("src");
        Self {
            command: standard.join("cmd"),
            standard,
            user: gopath.iter().map(|p| p.join("src")).collect(),
            urls,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.goroot(),
            &settings.roots.gopath,
            settings.urls.clone(),
        )
    }

    pub fn classify(&self, file: &Path) -> DocRoot {
        if file.starts_with(&self.command) {
            return DocRoot {
                path_prefix: slashed(&self.command),
                url_prefix: self.urls.command.clone(),
            };
        }
        if file.starts_with(&self.standard) {
            return DocRoot {
                path_prefix: slashed(&self.standard),
                url_prefix: self.urls.standard.clone(),
            };
        }
        let path_prefix = self
            .user
            .iter()
            .find(|root| file.starts_with(root))
            .map(|root| slashed(root))
            .unwrap_or_default();
        DocRoot {
            path_prefix,
            url_prefix: self.urls.community.clone(),
        }
    }
}

fn slashed(path: &Path) -> String {
    let s = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(MAIN_SEPARATOR, "/")
    }
}
