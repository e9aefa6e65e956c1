//! Name matching
//!
//! A search target is decided once, when the query is built: if the raw
//! input contains regular-expression metacharacters it is compiled as a
//! case-insensitive pattern anchored at both ends, otherwise it is compared
//! literally, ignoring case. Either way only exported names can match.

use crate::config::ExportRule;
use crate::error::{DocError, DocResult};
use regex::Regex;

/// What the user is looking for.
#[derive(Debug, Clone)]
pub enum SearchTarget {
    /// Whole-name comparison, ignoring case
    Literal(String),
    /// Whole-name regular expression, ignoring case
    Pattern(Regex),
}

impl SearchTarget {
    /// Classify and, when needed, compile the raw target.
    pub fn parse(raw: &str) -> DocResult<Self> {
        if regex::escape(raw) == raw {
            return Ok(SearchTarget::Literal(raw.to_lowercase()));
        }
        Regex::new(&format!("^(?i:{raw})$"))
            .map(SearchTarget::Pattern)
            .map_err(|e| DocError::InvalidPattern {
                pattern: raw.to_string(),
                source: Box::new(e),
            })
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, SearchTarget::Pattern(_))
    }
}

/// Decides whether a declared name is a hit.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    target: SearchTarget,
    rule: ExportRule,
}

impl NameMatcher {
    pub fn new(target: SearchTarget, rule: ExportRule) -> Self {
        Self { target, rule }
    }

    pub fn target(&self) -> &SearchTarget {
        &self.target
    }

    pub fn export_rule(&self) -> ExportRule {
        self.rule
    }

    pub fn matches(&self, name: &str) -> bool {
        if !self.rule.is_exported(name) {
            return false;
        }
        match &self.target {
            SearchTarget::Literal(literal) => name.to_lowercase() == *literal,
            SearchTarget::Pattern(pattern) => pattern.is_match(name),
        }
    }
}
