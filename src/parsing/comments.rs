//! Comment binding
//!
//! Associates comment groups with the declarations and specs they document.
//! A group binds to a node when it
//! - starts on the line where the node ends (a trailing comment), or
//! - ends on the line directly above the node, or on its first line, with
//!   nothing but whitespace in between (a leading doc comment).
//!
//! When several nodes start at the same place, the outermost one wins, so
//! the comment above `type T int` binds to the declaration while the comment
//! above an entry of a parenthesized group binds to that entry.

use crate::parsing::ast::{CommentGroup, Decl, NodeId, SourceFile};
use crate::types::Span;
use std::collections::HashMap;

/// Node-to-comment-group associations for one file.
#[derive(Debug, Clone, Default)]
pub struct CommentMap {
    bindings: HashMap<NodeId, Vec<usize>>,
    children: HashMap<NodeId, Vec<NodeId>>,
}

impl CommentMap {
    pub fn new(file: &SourceFile) -> Self {
        let nodes = file.nodes();
        let func_spans: Vec<Span> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Func(f) => f.body.map(|_| f.span),
                Decl::Gen(_) => None,
            })
            .collect();

        let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for decl in &file.decls {
            if let Decl::Gen(gen_decl) = decl {
                children.insert(
                    gen_decl.id,
                    gen_decl.specs.iter().map(|spec| spec.id()).collect(),
                );
            }
        }

        let mut bindings: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (index, group) in file.comments.iter().enumerate() {
            if file.package.doc == Some(index) {
                continue;
            }
            let span = group.span();
            if func_spans
                .iter()
                .any(|f| f.start < span.start && span.end <= f.end)
            {
                continue;
            }

            let owner =
                trailing_owner(&nodes, span).or_else(|| leading_owner(file, &nodes, span));
            if let Some(node) = owner {
                bindings.entry(node).or_default().push(index);
            }
        }

        Self { bindings, children }
    }

    /// Indices of the groups bound to `node` or to any spec inside it, in
    /// source order.
    pub fn filter(&self, node: NodeId) -> Vec<usize> {
        let mut indices: Vec<usize> = self.bindings.get(&node).cloned().unwrap_or_default();
        if let Some(children) = self.children.get(&node) {
            for child in children {
                if let Some(bound) = self.bindings.get(child) {
                    indices.extend(bound);
                }
            }
        }
        indices.sort_unstable();
        indices
    }

    /// The comment groups bound to `node`, resolved against its file.
    pub fn groups<'f>(&self, file: &'f SourceFile, node: NodeId) -> Vec<&'f CommentGroup> {
        self.filter(node)
            .into_iter()
            .filter_map(|i| file.comments.get(i))
            .collect()
    }
}

/// Outermost node ending on the group's first line, before the group.
fn trailing_owner(nodes: &[(NodeId, Span)], group: Span) -> Option<NodeId> {
    let mut best: Option<(NodeId, Span)> = None;
    for &(id, span) in nodes {
        if span.end_line != group.start_line || span.end > group.start {
            continue;
        }
        match best {
            Some((_, current)) if current.end - current.start >= span.end - span.start => {}
            _ => best = Some((id, span)),
        }
    }
    best.map(|(id, _)| id)
}

/// First node starting after the group, if adjacent to it.
fn leading_owner(file: &SourceFile, nodes: &[(NodeId, Span)], group: Span) -> Option<NodeId> {
    let mut next: Option<(NodeId, Span)> = None;
    for &(id, span) in nodes {
        if span.start < group.end {
            continue;
        }
        match next {
            Some((_, current)) if current.start <= span.start => {}
            _ => next = Some((id, span)),
        }
    }
    let (id, span) = next?;
    let gap = file.source.get(group.end..span.start)?;
    let adjacent = span.start_line == group.end_line || span.start_line == group.end_line + 1;
    (adjacent && gap.trim().is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::GoParser;
    use crate::parsing::ast::Spec;
    use crate::types::FileId;
    use std::path::Path;

    fn parse(code: &str) -> SourceFile {
        GoParser::new()
            .unwrap()
            .parse(
                Path::new("/tmp/c.go"),
                FileId::new(1).unwrap(),
                code.to_string(),
            )
            .unwrap()
    }

    fn texts(file: &SourceFile, map: &CommentMap, node: NodeId) -> Vec<String> {
        map.groups(file, node).iter().map(|g| g.text()).collect()
    }

    #[test]
    fn doc_comment_binds_to_single_declaration() {
        let file = parse(
            r#"// Package p is documented.
package p

// T is a type.
type T int

// Detached comment.

func F() {}
"#,
        );
        let map = CommentMap::new(&file);
        let t = file.decls[0].id();
        let f = file.decls[1].id();
        assert_eq!(texts(&file, &map, t), vec!["T is a type.\n".to_string()]);
        assert!(texts(&file, &map, f).is_empty());
    }

    #[test]
    fn grouped_entries_get_their_own_comments() {
        let file = parse(
            r#"package p

// Group doc.
type (
	// Reader doc.
	Reader interface{}

	// Writer doc.
	Writer interface{}
)
"#,
        );
        let map = CommentMap::new(&file);
        let Decl::Gen(decl) = &file.decls[0] else {
            panic!("expected gen decl");
        };
        let reader = decl.specs[0].id();
        let writer = decl.specs[1].id();
        assert_eq!(texts(&file, &map, reader), vec!["Reader doc.\n".to_string()]);
        assert_eq!(texts(&file, &map, writer), vec!["Writer doc.\n".to_string()]);
        // The declaration sees its own doc plus its entries'.
        assert_eq!(map.filter(decl.id).len(), 3);
    }

    #[test]
    fn trailing_comment_binds_to_the_line_it_ends() {
        let file = parse(
            r#"package p

const (
	A = 1 // about A
	B = 2
)
"#,
        );
        let map = CommentMap::new(&file);
        let Decl::Gen(decl) = &file.decls[0] else {
            panic!("expected gen decl");
        };
        let Spec::Value(a) = &decl.specs[0] else {
            panic!("expected value spec");
        };
        assert_eq!(texts(&file, &map, a.id), vec!["about A\n".to_string()]);
        assert!(texts(&file, &map, decl.specs[1].id()).is_empty());
    }

    #[test]
    fn body_comments_are_not_bound() {
        let file = parse(
            r#"package p

// F doc.
func F() {
	// inside
	return
}
"#,
        );
        let map = CommentMap::new(&file);
        let f = file.decls[0].id();
        assert_eq!(texts(&file, &map, f), vec!["F doc.\n".to_string()]);
    }
}
