//! Owned syntax model for one Go source file.
//!
//! The concrete tree-sitter tree is converted into this closed set of node
//! variants so the walkers can match exhaustively instead of dispatching on
//! node-kind strings.

use crate::types::{FileId, Pos, Span};
use std::path::{Path, PathBuf};

/// Stable identity of a declaration-level node within its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// An identifier occurrence with its exact position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
    /// 1-based line of the identifier
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Import,
    Const,
    Var,
    Type,
}

/// Top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    /// `import`, `const`, `var` or `type`, grouped or not
    Gen(GenDecl),
    /// Function or method
    Func(FuncDecl),
}

impl Decl {
    pub fn id(&self) -> NodeId {
        match self {
            Decl::Gen(decl) => decl.id,
            Decl::Func(decl) => decl.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Decl::Gen(decl) => decl.span,
            Decl::Func(decl) => decl.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenDecl {
    pub id: NodeId,
    pub keyword: Keyword,
    /// True when the specs are enclosed in parentheses
    pub lparen: bool,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn id(&self) -> NodeId {
        match self {
            Spec::Import(spec) => spec.id,
            Spec::Value(spec) => spec.id,
            Spec::Type(spec) => spec.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Spec::Import(spec) => spec.span,
            Spec::Value(spec) => spec.span,
            Spec::Type(spec) => spec.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub id: NodeId,
    pub span: Span,
}

/// One line of a `const` or `var` declaration: `A, B = 1, 2`.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub id: NodeId,
    pub names: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub id: NodeId,
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Function or method declaration.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: NodeId,
    pub name: Ident,
    pub recv: Option<Receiver>,
    pub body: Option<Span>,
    pub span: Span,
    /// The declaration up to, but excluding, its body
    pub signature: Span,
}

impl FuncDecl {
    /// Drops the body so the declaration renders as its signature only.
    pub fn clear_body(&mut self) {
        if self.body.take().is_some() {
            self.span = self.signature;
        }
    }
}

/// Receiver of a method, e.g. `(l *List[T])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Receiver type as written, e.g. `*List[T]`
    pub type_text: String,
    /// Name of the receiver's base type, e.g. `List`
    pub base: Option<String>,
    pub pointer: bool,
}

/// Shape of a type expression, as much as method sets need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named {
        package: Option<String>,
        name: String,
    },
    Pointer(Box<TypeExpr>),
    Struct(StructType),
    Interface(InterfaceType),
    Other,
}

impl TypeExpr {
    pub fn shape(&self) -> Shape {
        match self {
            TypeExpr::Struct(_) => Shape::Struct,
            TypeExpr::Interface(_) => Shape::Interface,
            _ => Shape::Other,
        }
    }

    /// Strips one pointer level, reporting whether there was one.
    pub fn deref(&self) -> (&TypeExpr, bool) {
        match self {
            TypeExpr::Pointer(inner) => (inner, true),
            other => (other, false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Struct,
    Interface,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructType {
    pub fields: Vec<Field>,
}

/// Struct field. Embedded fields have no names; the type names them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: TypeExpr,
    pub embedded: bool,
}

impl Field {
    /// The name a field is selected by; for embedded fields that is the type name.
    pub fn selector_names(&self) -> Vec<&str> {
        if !self.embedded {
            return self.names.iter().map(|n| n.name.as_str()).collect();
        }
        match self.ty.deref().0 {
            TypeExpr::Named { name, .. } => vec![name.as_str()],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceType {
    pub methods: Vec<Ident>,
    pub embeds: Vec<TypeExpr>,
}

/// One `//` or `/* */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Comments with no blank line or token between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    pub fn span(&self) -> Span {
        let first = self.comments.first().map(|c| c.span);
        let last = self.comments.last().map(|c| c.span);
        match (first, last) {
            (Some(first), Some(last)) => {
                Span::new(first.start, last.end, first.start_line, last.end_line)
            }
            _ => Span::new(0, 0, 0, 0),
        }
    }

    /// Comment text without markers: the first space after `//` goes, blank
    /// lines at either end go, runs of blank lines collapse, and the result
    /// ends in a newline unless empty. Tool directives such as `//go:embed`
    /// are dropped.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for comment in &self.comments {
            let raw = comment.text.as_str();
            if let Some(rest) = raw.strip_prefix("//") {
                if is_directive(rest) {
                    continue;
                }
                let rest = rest.strip_prefix(' ').unwrap_or(rest);
                lines.push(rest.trim_end().to_string());
            } else if let Some(rest) = raw.strip_prefix("/*") {
                let rest = rest.strip_suffix("*/").unwrap_or(rest);
                lines.extend(rest.lines().map(|l| l.trim_end().to_string()));
            }
        }

        let mut out: Vec<&str> = Vec::new();
        for line in &lines {
            if line.is_empty() && out.last().is_none_or(|prev| prev.is_empty()) {
                continue;
            }
            out.push(line);
        }
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        if out.is_empty() {
            return String::new();
        }
        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

fn is_directive(after_slashes: &str) -> bool {
    if after_slashes.starts_with("line ") {
        return true;
    }
    match after_slashes.split_once(':') {
        Some((tool, rest)) => {
            !tool.is_empty()
                && !rest.is_empty()
                && tool
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                && rest.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct PackageClause {
    pub name: Ident,
    pub span: Span,
    /// Index into [`SourceFile::comments`] of the package doc comment
    pub doc: Option<usize>,
}

/// One parsed file: its syntax, comments and source text.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub source: String,
    pub package: PackageClause,
    pub decls: Vec<Decl>,
    pub comments: Vec<CommentGroup>,
}

impl SourceFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn package_name(&self) -> &str {
        &self.package.name.name
    }

    pub fn package_doc(&self) -> Option<&CommentGroup> {
        self.package.doc.and_then(|i| self.comments.get(i))
    }

    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    /// Every declaration and spec in pre-order, outer nodes first.
    pub fn nodes(&self) -> Vec<(NodeId, Span)> {
        let mut nodes = Vec::new();
        for decl in &self.decls {
            nodes.push((decl.id(), decl.span()));
            if let Decl::Gen(gen_decl) = decl {
                for spec in &gen_decl.specs {
                    nodes.push((spec.id(), spec.span()));
                }
            }
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(texts: &[&str]) -> CommentGroup {
        CommentGroup {
            comments: texts
                .iter()
                .enumerate()
                .map(|(i, t)| Comment {
                    text: t.to_string(),
                    span: Span::new(i * 10, i * 10 + t.len(), i + 1, i + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn line_comment_text_strips_markers() {
        let g = group(&["// IsUpper reports whether the rune is upper case."]);
        assert_eq!(g.text(), "IsUpper reports whether the rune is upper case.\n");
    }

    #[test]
    fn text_collapses_blank_lines() {
        let g = group(&["//", "// First.", "//", "//", "// Second.", "//"]);
        assert_eq!(g.text(), "First.\n\nSecond.\n");
    }

    #[test]
    fn text_keeps_indentation_after_first_space() {
        let g = group(&["// Usage:", "//\tdoc name"]);
        assert_eq!(g.text(), "Usage:\n\tdoc name\n");
    }

    #[test]
    fn block_comment_text() {
        let g = group(&["/*\nPackage fmt implements formatted I/O.\n*/"]);
        assert_eq!(g.text(), "Package fmt implements formatted I/O.\n");
    }

    #[test]
    fn directives_are_dropped() {
        let g = group(&["// Data is embedded.", "//go:embed data.txt"]);
        assert_eq!(g.text(), "Data is embedded.\n");
    }

    #[test]
    fn clear_body_truncates_span() {
        let file = FileId::new(1).unwrap();
        let mut func = FuncDecl {
            id: NodeId(0),
            name: Ident {
                name: "F".to_string(),
                pos: Pos::new(file, 5).unwrap(),
                line: 1,
            },
            recv: None,
            body: Some(Span::new(9, 20, 1, 3)),
            span: Span::new(0, 20, 1, 3),
            signature: Span::new(0, 8, 1, 1),
        };
        func.clear_body();
        assert!(func.body.is_none());
        assert_eq!(func.span.end, 8);
        assert_eq!(func.span.end_line, 1);
    }
}
