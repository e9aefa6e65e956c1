//! Go parser implementation
//!
//! Uses tree-sitter-go crate's LANGUAGE constant (converted via .into()) and
//! lowers the concrete tree into [`crate::parsing::ast`] nodes.
//!
//! Note: This parser uses ABI-15.

use crate::error::{ParseError, ParseResult};
use crate::parsing::SourceParser;
use crate::parsing::ast::{
    Comment, CommentGroup, Decl, Field, FuncDecl, GenDecl, Ident, ImportSpec, InterfaceType,
    Keyword, NodeId, PackageClause, Receiver, Spec, StructType, SourceFile, TypeExpr, TypeSpec,
    ValueSpec,
};
use crate::types::{FileId, MAX_SOURCE_LEN, Pos, Span};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Go language parser
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a new Go parser
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        let lang = tree_sitter_go::LANGUAGE;
        parser
            .set_language(&lang.into())
            .map_err(|e| ParseError::ParserInit {
                language: "Go".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { parser })
    }

    /// Parse one Go file into its syntax model.
    ///
    /// Files with syntax errors are rejected; documentation lookups only use
    /// sources the Go toolchain would accept.
    pub fn parse(&mut self, path: &Path, file_id: FileId, code: String) -> ParseResult<SourceFile> {
        if code.len() > MAX_SOURCE_LEN {
            return Err(ParseError::FileTooLarge { bytes: code.len() });
        }
        let tree = self
            .parser
            .parse(&code, None)
            .ok_or_else(|| ParseError::SyntaxError {
                line: 0,
                column: 0,
                reason: "parser produced no tree".to_string(),
            })?;
        let root = tree.root_node();

        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            return Err(ParseError::SyntaxError {
                line: bad.start_position().row + 1,
                column: bad.start_position().column + 1,
                reason: format!("unexpected {}", bad.kind()),
            });
        }

        let mut lower = Lowering {
            code: &code,
            file_id,
            next_node: 0,
        };

        let mut package = None;
        let mut decls = Vec::new();
        let mut raw_comments = Vec::new();
        collect_comments(root, &code, &mut raw_comments);

        for child in root.named_children(&mut root.walk()) {
            match child.kind() {
                "package_clause" => package = lower.package_clause(child),
                "import_declaration" => decls.push(Decl::Gen(lower.import_declaration(child))),
                "const_declaration" => decls.push(Decl::Gen(lower.value_declaration(
                    child,
                    Keyword::Const,
                    "const_spec",
                    "const_spec_list",
                ))),
                "var_declaration" => decls.push(Decl::Gen(lower.value_declaration(
                    child,
                    Keyword::Var,
                    "var_spec",
                    "var_spec_list",
                ))),
                "type_declaration" => decls.push(Decl::Gen(lower.type_declaration(child))),
                "function_declaration" | "method_declaration" => {
                    if let Some(func) = lower.func_declaration(child) {
                        decls.push(Decl::Func(func));
                    }
                }
                _ => {}
            }
        }

        let mut package = package.ok_or(ParseError::MissingPackage)?;
        let comments = group_comments(&code, raw_comments);
        package.doc = comments.iter().rposition(|group| {
            let span = group.span();
            span.end <= package.span.start
                && (span.end_line + 1 == package.span.start_line
                    || span.end_line == package.span.start_line)
        });

        Ok(SourceFile {
            id: file_id,
            path: path.to_path_buf(),
            source: code,
            package,
            decls,
            comments,
        })
    }
}

impl SourceParser for GoParser {
    fn parse_file(
        &mut self,
        path: &Path,
        file_id: FileId,
        code: String,
    ) -> ParseResult<SourceFile> {
        self.parse(path, file_id, code)
    }

    fn handles(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "go")
    }
}

fn span_of(node: Node) -> Span {
    Span::new(
        node.start_byte(),
        node.end_byte(),
        node.start_position().row + 1,
        node.end_position().row + 1,
    )
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let children: Vec<Node> = node.children(&mut node.walk()).collect();
    children.into_iter().find_map(first_error)
}

fn has_token(node: Node, token: &str) -> bool {
    node.children(&mut node.walk()).any(|c| c.kind() == token)
}

/// Per-file conversion state.
struct Lowering<'a> {
    code: &'a str,
    file_id: FileId,
    next_node: u32,
}

impl<'a> Lowering<'a> {
    fn node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn text(&self, node: Node) -> &'a str {
        &self.code[node.byte_range()]
    }

    /// `None` only past [`MAX_SOURCE_LEN`], which `parse` rejects up front.
    fn ident(&self, node: Node) -> Option<Ident> {
        Some(Ident {
            name: self.text(node).to_string(),
            pos: Pos::new(self.file_id, node.start_byte())?,
            line: node.start_position().row + 1,
        })
    }

    fn line_at(&self, base: Node, offset: usize) -> usize {
        let start = base.start_byte();
        let rows = self.code[start..offset.max(start)]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        base.start_position().row + 1 + rows
    }

    fn package_clause(&self, node: Node) -> Option<PackageClause> {
        let name = node
            .named_children(&mut node.walk())
            .find(|c| c.kind() == "package_identifier" || c.kind() == "identifier")?;
        Some(PackageClause {
            name: self.ident(name)?,
            span: span_of(node),
            doc: None,
        })
    }

    fn import_declaration(&mut self, node: Node) -> GenDecl {
        let id = self.node_id();
        let mut specs = Vec::new();
        let mut lparen = false;
        for child in node.named_children(&mut node.walk()) {
            match child.kind() {
                "import_spec" => specs.push(self.import_spec(child)),
                "import_spec_list" => {
                    lparen = true;
                    for spec in child.named_children(&mut child.walk()) {
                        if spec.kind() == "import_spec" {
                            specs.push(self.import_spec(spec));
                        }
                    }
                }
                _ => {}
            }
        }
        GenDecl {
            id,
            keyword: Keyword::Import,
            lparen,
            specs,
            span: span_of(node),
        }
    }

    fn import_spec(&mut self, node: Node) -> Spec {
        Spec::Import(ImportSpec {
            id: self.node_id(),
            span: span_of(node),
        })
    }

    /// `const` and `var` share one shape; older grammars nest grouped specs
    /// in a `*_spec_list` node.
    fn value_declaration(
        &mut self,
        node: Node,
        keyword: Keyword,
        spec_kind: &str,
        list_kind: &str,
    ) -> GenDecl {
        let id = self.node_id();
        let mut specs = Vec::new();
        let mut lparen = has_token(node, "(");
        for child in node.named_children(&mut node.walk()) {
            if child.kind() == spec_kind {
                specs.push(self.value_spec(child));
            } else if child.kind() == list_kind {
                lparen = true;
                for spec in child.named_children(&mut child.walk()) {
                    if spec.kind() == spec_kind {
                        specs.push(self.value_spec(spec));
                    }
                }
            }
        }
        GenDecl {
            id,
            keyword,
            lparen,
            specs,
            span: span_of(node),
        }
    }

    fn value_spec(&mut self, node: Node) -> Spec {
        let names = node
            .children_by_field_name("name", &mut node.walk())
            .filter(|n| n.kind() == "identifier")
            .filter_map(|n| self.ident(n))
            .collect();
        Spec::Value(ValueSpec {
            id: self.node_id(),
            names,
            span: span_of(node),
        })
    }

    fn type_declaration(&mut self, node: Node) -> GenDecl {
        let id = self.node_id();
        let lparen = has_token(node, "(");
        let mut specs = Vec::new();
        for child in node.named_children(&mut node.walk()) {
            if matches!(child.kind(), "type_spec" | "type_alias") {
                if let Some(spec) = self.type_spec(child) {
                    specs.push(spec);
                }
            }
        }
        GenDecl {
            id,
            keyword: Keyword::Type,
            lparen,
            specs,
            span: span_of(node),
        }
    }

    fn type_spec(&mut self, node: Node) -> Option<Spec> {
        let name = self.ident(node.child_by_field_name("name")?)?;
        let ty = node
            .child_by_field_name("type")
            .map(|t| self.type_expr(t))
            .unwrap_or(TypeExpr::Other);
        Some(Spec::Type(TypeSpec {
            id: self.node_id(),
            name,
            alias: node.kind() == "type_alias",
            ty,
            span: span_of(node),
        }))
    }

    fn type_expr(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "type_identifier" => TypeExpr::Named {
                package: None,
                name: self.text(node).to_string(),
            },
            "qualified_type" => {
                let package = node
                    .child_by_field_name("package")
                    .map(|p| self.text(p).to_string());
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                TypeExpr::Named { package, name }
            }
            "generic_type" => node
                .child_by_field_name("type")
                .map(|t| self.type_expr(t))
                .unwrap_or(TypeExpr::Other),
            "pointer_type" => match node.named_child(0) {
                Some(inner) => TypeExpr::Pointer(Box::new(self.type_expr(inner))),
                None => TypeExpr::Other,
            },
            "parenthesized_type" | "interface_type_name" | "constraint_elem" => node
                .named_child(0)
                .map(|inner| self.type_expr(inner))
                .unwrap_or(TypeExpr::Other),
            "struct_type" => TypeExpr::Struct(self.struct_type(node)),
            "interface_type" => TypeExpr::Interface(self.interface_type(node)),
            _ => TypeExpr::Other,
        }
    }

    fn struct_type(&self, node: Node) -> StructType {
        let mut fields = Vec::new();
        for list in node.named_children(&mut node.walk()) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            for decl in list.named_children(&mut list.walk()) {
                if decl.kind() != "field_declaration" {
                    continue;
                }
                let names: Vec<Ident> = decl
                    .children_by_field_name("name", &mut decl.walk())
                    .filter_map(|n| self.ident(n))
                    .collect();
                let Some(type_node) = decl.child_by_field_name("type") else {
                    continue;
                };
                let embedded = names.is_empty();
                let mut ty = self.type_expr(type_node);
                if embedded && has_token(decl, "*") {
                    ty = TypeExpr::Pointer(Box::new(ty));
                }
                fields.push(Field {
                    names,
                    ty,
                    embedded,
                });
            }
        }
        StructType { fields }
    }

    fn interface_type(&self, node: Node) -> InterfaceType {
        let mut iface = InterfaceType::default();
        for elem in node.named_children(&mut node.walk()) {
            match elem.kind() {
                "method_elem" | "method_spec" => {
                    let name = elem.child_by_field_name("name");
                    if let Some(name) = name.and_then(|n| self.ident(n)) {
                        iface.methods.push(name);
                    }
                }
                "type_elem" | "constraint_elem" => {
                    // Unions such as `~int | ~string` embed nothing.
                    let terms: Vec<Node> = elem.named_children(&mut elem.walk()).collect();
                    if let [term] = terms.as_slice() {
                        iface.embeds.push(self.type_expr(*term));
                    }
                }
                "interface_type_name" | "type_identifier" | "qualified_type" => {
                    iface.embeds.push(self.type_expr(elem));
                }
                _ => {}
            }
        }
        iface
    }

    fn func_declaration(&mut self, node: Node) -> Option<FuncDecl> {
        let name = self.ident(node.child_by_field_name("name")?)?;
        let recv = node
            .child_by_field_name("receiver")
            .and_then(|r| self.receiver(r));
        let body = node.child_by_field_name("body");

        let span = span_of(node);
        let signature = match body {
            Some(body) => {
                let head = self.code[node.start_byte()..body.start_byte()].trim_end();
                let end = node.start_byte() + head.len();
                Span::new(span.start, end, span.start_line, self.line_at(node, end))
            }
            None => span,
        };

        Some(FuncDecl {
            id: self.node_id(),
            name,
            recv,
            body: body.map(span_of),
            span,
            signature,
        })
    }

    fn receiver(&self, params: Node) -> Option<Receiver> {
        let param = params
            .named_children(&mut params.walk())
            .find(|c| c.kind() == "parameter_declaration")?;
        let type_node = param.child_by_field_name("type")?;
        let ty = self.type_expr(type_node);
        let (base, pointer) = match ty.deref() {
            (TypeExpr::Named { name, .. }, pointer) => (Some(name.clone()), pointer),
            (_, pointer) => (None, pointer),
        };
        Some(Receiver {
            type_text: self.text(type_node).to_string(),
            base,
            pointer,
        })
    }
}

fn collect_comments(node: Node, code: &str, out: &mut Vec<Comment>) {
    if node.kind() == "comment" {
        let text = code[node.byte_range()].trim_end();
        let start_line = node.start_position().row + 1;
        let end_line = start_line + text.bytes().filter(|&b| b == b'\n').count();
        out.push(Comment {
            text: text.to_string(),
            span: Span::new(
                node.start_byte(),
                node.start_byte() + text.len(),
                start_line,
                end_line,
            ),
        });
        return;
    }
    for child in node.children(&mut node.walk()) {
        collect_comments(child, code, out);
    }
}

/// Groups adjacent comments. Comments join a group when only whitespace with
/// at most one newline separates them; a group that starts after code on the
/// same line only takes comments from that line.
fn group_comments(code: &str, comments: Vec<Comment>) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();
    let mut trailing_group = false;

    for comment in comments {
        let line_start = code[..comment.span.start].rfind('\n').map_or(0, |i| i + 1);
        let after_code = !code[line_start..comment.span.start].trim().is_empty();

        let joins = groups
            .last()
            .and_then(|g| g.comments.last())
            .is_some_and(|last| {
                let between = &code[last.span.end..comment.span.start];
                between.trim().is_empty()
                    && between.matches('\n').count() <= 1
                    && (!trailing_group || comment.span.start_line == last.span.end_line)
            });

        match groups.last_mut() {
            Some(group) if joins => group.comments.push(comment),
            _ => {
                trailing_group = after_code;
                groups.push(CommentGroup {
                    comments: vec![comment],
                });
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ast::Shape;

    fn parse(code: &str) -> SourceFile {
        let mut parser = GoParser::new().unwrap();
        parser
            .parse(
                Path::new("/tmp/x.go"),
                FileId::new(1).unwrap(),
                code.to_string(),
            )
            .unwrap()
    }

    #[test]
    fn test_go_package_clause_and_doc() {
        let file = parse(
            r#"// Copyright notice.

// Package unicode provides data and functions.
package unicode
"#,
        );
        assert_eq!(file.package_name(), "unicode");
        let doc = file.package_doc().expect("package doc");
        assert_eq!(doc.text(), "Package unicode provides data and functions.\n");
        assert_eq!(file.comments.len(), 2);
    }

    #[test]
    fn test_go_package_without_doc() {
        let file = parse("// Detached.\n\npackage p\n");
        assert!(file.package_doc().is_none());
    }

    #[test]
    fn test_go_grouped_and_single_declarations() {
        let file = parse(
            r#"package p

import "fmt"

const Single = 1

const (
	A, B = 1, 2
	C    = 3
)

var (
	X int
	Y = "y"
)

type T struct{}

type (
	Reader interface{ Read(p []byte) (int, error) }
	Pair   struct{ a, b int }
)
"#,
        );
        let gens: Vec<&GenDecl> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Gen(g) => Some(g),
                Decl::Func(_) => None,
            })
            .collect();
        assert_eq!(gens.len(), 6);
        assert_eq!(gens[0].keyword, Keyword::Import);
        assert!(!gens[1].lparen);
        assert!(gens[2].lparen);
        assert_eq!(gens[2].specs.len(), 2);
        match &gens[2].specs[0] {
            Spec::Value(v) => {
                let names: Vec<&str> = v.names.iter().map(|n| n.name.as_str()).collect();
                assert_eq!(names, vec!["A", "B"]);
            }
            other => panic!("expected value spec, got {other:?}"),
        }
        assert_eq!(gens[3].keyword, Keyword::Var);
        assert!(gens[3].lparen);
        assert_eq!(gens[3].specs.len(), 2);
        assert!(!gens[4].lparen);
        assert!(gens[5].lparen);
        let shapes: Vec<Shape> = gens[5]
            .specs
            .iter()
            .filter_map(|s| match s {
                Spec::Type(t) => Some(t.ty.shape()),
                _ => None,
            })
            .collect();
        assert_eq!(shapes, vec![Shape::Interface, Shape::Struct]);
    }

    #[test]
    fn test_go_method_receivers() {
        let file = parse(
            r#"package p

type List[T any] struct{}

func (l *List[T]) Push(v T) {
	_ = v
}

func (l List[T]) Len() int { return 0 }

func Free() {}
"#,
        );
        let funcs: Vec<&FuncDecl> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Func(f) => Some(f),
                Decl::Gen(_) => None,
            })
            .collect();
        assert_eq!(funcs.len(), 3);
        let push = funcs[0].recv.as_ref().unwrap();
        assert_eq!(push.type_text, "*List[T]");
        assert_eq!(push.base.as_deref(), Some("List"));
        assert!(push.pointer);
        let len = funcs[1].recv.as_ref().unwrap();
        assert!(!len.pointer);
        assert!(funcs[2].recv.is_none());
        assert_eq!(file.text(funcs[0].signature), "func (l *List[T]) Push(v T)");
    }

    #[test]
    fn test_go_struct_embedding_and_interfaces() {
        let file = parse(
            r#"package p

type Outer struct {
	Inner
	*Ptr
	io.Writer
	Name string
}

type RW interface {
	Reader
	Write(p []byte) (int, error)
}
"#,
        );
        let types: Vec<&TypeSpec> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Gen(g) => g.specs.first(),
                Decl::Func(_) => None,
            })
            .filter_map(|s| match s {
                Spec::Type(t) => Some(t),
                _ => None,
            })
            .collect();
        let TypeExpr::Struct(outer) = &types[0].ty else {
            panic!("expected struct");
        };
        assert_eq!(outer.fields.len(), 4);
        assert!(outer.fields[0].embedded);
        assert!(matches!(outer.fields[1].ty, TypeExpr::Pointer(_)));
        assert_eq!(
            outer.fields[2].ty,
            TypeExpr::Named {
                package: Some("io".to_string()),
                name: "Writer".to_string()
            }
        );
        assert!(!outer.fields[3].embedded);

        let TypeExpr::Interface(rw) = &types[1].ty else {
            panic!("expected interface");
        };
        assert_eq!(rw.methods.len(), 1);
        assert_eq!(rw.methods[0].name, "Write");
        assert_eq!(rw.embeds.len(), 1);
    }

    #[test]
    fn test_go_comment_grouping() {
        let file = parse(
            r#"package p

// One
// group.

// Another.
const X = 1 // trailing
// next line starts a new group
var Y int
"#,
        );
        let texts: Vec<String> = file.comments.iter().map(|g| g.text()).collect();
        assert_eq!(
            texts,
            vec![
                "One\ngroup.\n".to_string(),
                "Another.\n".to_string(),
                "trailing\n".to_string(),
                "next line starts a new group\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_go_syntax_error_rejected() {
        let mut parser = GoParser::new().unwrap();
        let result = parser.parse(
            Path::new("/tmp/bad.go"),
            FileId::new(1).unwrap(),
            "package p\n\nfunc {\n".to_string(),
        );
        assert!(matches!(result, Err(ParseError::SyntaxError { .. })));
    }
}
