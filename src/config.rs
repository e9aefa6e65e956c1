//! Configuration module for documentation lookup.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.gdoc/settings.toml`)
//! - Environment variable overrides
//! - The conventional `GOROOT` and `GOPATH` variables
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `GDOC_` and use double
//! underscores to separate nested levels:
//! - `GDOC_URLS__COMMUNITY=https://pkg.go.dev` sets `urls.community`
//! - `GDOC_EXPORT_RULE=any` sets `export_rule`
//! - `GDOC_DEBUG=true` sets `debug`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DEFAULT_GOROOT: &str = "/usr/local/go";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Source trees to search
    #[serde(default)]
    pub roots: RootsConfig,

    /// Documentation sites used to build URLs
    #[serde(default)]
    pub urls: UrlConfig,

    /// Which names count as exported
    #[serde(default)]
    pub export_rule: ExportRule,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RootsConfig {
    /// Go installation root; falls back to `$GOROOT`, then `/usr/local/go`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goroot: Option<PathBuf>,

    /// Workspace roots, searched after the installation root
    #[serde(default)]
    pub gopath: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct UrlConfig {
    /// Base for packages under `<goroot>/src`
    #[serde(default = "default_standard_url")]
    pub standard: String,

    /// Base for commands under `<goroot>/src/cmd`
    #[serde(default = "default_command_url")]
    pub command: String,

    /// Base for everything else
    #[serde(default = "default_community_url")]
    pub community: String,
}

/// Convention deciding whether a declared name is part of a package's
/// public surface.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportRule {
    /// Go: the first character is an upper-case letter (category Lu)
    #[default]
    Uppercase,
    /// Every name is searchable
    Any,
}

impl ExportRule {
    pub fn is_exported(&self, name: &str) -> bool {
        match self {
            ExportRule::Uppercase => name.chars().next().is_some_and(is_upper_letter),
            ExportRule::Any => !name.is_empty(),
        }
    }
}

/// Unicode `Uppercase` minus `Other_Uppercase`, which leaves category Lu.
fn is_upper_letter(c: char) -> bool {
    const OTHER_UPPERCASE: &[(char, char)] = &[
        ('\u{2160}', '\u{216F}'),
        ('\u{24B6}', '\u{24CF}'),
        ('\u{1F130}', '\u{1F149}'),
        ('\u{1F150}', '\u{1F169}'),
        ('\u{1F170}', '\u{1F189}'),
    ];
    c.is_uppercase() && !OTHER_UPPERCASE.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_false() -> bool {
    false
}
fn default_standard_url() -> String {
    "http://golang.org/pkg".to_string()
}
fn default_command_url() -> String {
    "http://golang.org/cmd".to_string()
}
fn default_community_url() -> String {
    "http://godoc.org".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            roots: RootsConfig::default(),
            urls: UrlConfig::default(),
            export_rule: ExportRule::default(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            standard: default_standard_url(),
            command: default_command_url(),
            community: default_community_url(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(".gdoc/settings.toml"));
        Self::load_from(config_path)
    }

    /// Load configuration layered on a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref())
            .extract()
            .map_err(Box::new)
            .map(|settings: Settings| {
                settings.with_go_env(std::env::var_os("GOROOT"), std::env::var_os("GOPATH"))
            })
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path))
            // Double underscore separates nested levels
            .merge(Env::prefixed("GDOC_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Apply `GOROOT` (only when no root is configured) and `GOPATH`
    /// (appended to configured roots, split on the platform list separator).
    pub fn with_go_env(mut self, goroot: Option<OsString>, gopath: Option<OsString>) -> Self {
        if self.roots.goroot.is_none() {
            self.roots.goroot = goroot.filter(|g| !g.is_empty()).map(PathBuf::from);
        }
        if let Some(gopath) = gopath {
            for root in std::env::split_paths(&gopath) {
                if !root.as_os_str().is_empty() && !self.roots.gopath.contains(&root) {
                    self.roots.gopath.push(root);
                }
            }
        }
        self
    }

    /// Find `.gdoc/settings.toml` from the current directory upwards
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(".gdoc");
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    pub fn goroot(&self) -> PathBuf {
        self.roots
            .goroot
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GOROOT))
    }

    /// Roots to search, installation root first.
    pub fn search_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.goroot()];
        roots.extend(self.roots.gopath.iter().cloned());
        roots
    }
}
