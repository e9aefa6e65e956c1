//! Output formatting
//!
//! Every hit prints, in this order and as enabled by its output filter: the
//! documentation URL, a `file:line:` locator, and the declaration text with
//! its doc comment followed by a blank line.

use crate::indexing::ParsedFile;
use crate::lookup::query::OutputFilter;
use crate::lookup::walker::MatchedDeclaration;
use crate::parsing::ast::{CommentGroup, SourceFile};
use crate::types::Span;
use std::fmt::Write as _;

#[derive(Debug, Default, Clone, Copy)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, hit: &MatchedDeclaration<'_>) -> String {
        let mut out = String::new();
        if hit.outputs.contains(OutputFilter::URL) {
            out.push_str(&hit.url);
            out.push('\n');
        }
        if hit.outputs.contains(OutputFilter::SOURCE) {
            let _ = writeln!(out, "{}:{}:", hit.file.path().display(), hit.ident.line);
        }
        if hit.outputs.contains(OutputFilter::DOC) {
            out.push_str(&node_text(&hit.file.file, hit.node.span(), &hit.comments));
            out.push_str("\n\n");
        }
        out
    }

    /// Package clause documentation of one file, or `None` when it has none.
    pub fn render_package_doc(&self, file: &ParsedFile, outputs: OutputFilter) -> Option<String> {
        let doc = file.file.package_doc()?;
        let mut out = String::new();
        if outputs.contains(OutputFilter::URL) {
            out.push_str(&file.root.package_url(file.path()));
            out.push('\n');
        }
        if outputs.contains(OutputFilter::SOURCE) {
            let _ = writeln!(out, "{}:{}:", file.path().display(), doc.span().start_line);
        }
        if outputs.contains(OutputFilter::DOC) {
            let _ = write!(out, "package {}\n{}\n\n", file.file.package_name(), doc.text());
        }
        Some(out)
    }
}

/// Source of the node, widened to its leading doc comment and a comment
/// trailing its last line, with the node's own indentation removed.
///
/// A trailing comment is only taken when nothing but blanks separates it
/// from the node, so a function cut down to its signature never regains a
/// one-line body.
fn node_text(file: &SourceFile, span: Span, comments: &[&CommentGroup]) -> String {
    let mut start = span.start;
    let mut end = span.end;
    for group in comments {
        let g = group.span();
        if g.end <= span.start {
            start = start.min(g.start);
        } else if g.start_line == span.end_line && trails(file, span, g) {
            end = end.max(g.end);
        }
    }

    let text = file.source.get(start..end).unwrap_or("");
    let line_start = file.source[..start].rfind('\n').map_or(0, |i| i + 1);
    let indent = &file.source[line_start..start];
    if indent.is_empty() || !indent.chars().all(char::is_whitespace) {
        return text.to_string();
    }

    let mut lines = text.split('\n');
    let mut out = lines.next().unwrap_or("").to_string();
    for line in lines {
        out.push('\n');
        out.push_str(line.strip_prefix(indent).unwrap_or(line));
    }
    out
}

fn trails(file: &SourceFile, node: Span, group: Span) -> bool {
    group.start >= node.end
        && file
            .source
            .get(node.end..group.start)
            .is_some_and(|gap| gap.trim().is_empty())
}
