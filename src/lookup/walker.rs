//! Declaration walker
//!
//! Visits the top-level declarations of one file and applies the name
//! matcher and kind filter to each. A discovery walk only answers whether
//! anything matches; a render walk collects every hit, followed for matched
//! types by the methods in their method set.

use crate::indexing::{PackageScan, ParsedFile};
use crate::lookup::methods::MethodSetResolver;
use crate::lookup::query::{KindFilter, OutputFilter, Query};
use crate::parsing::ast::{
    CommentGroup, Decl, FuncDecl, GenDecl, Ident, Keyword, NodeId, Shape, Spec, TypeSpec,
};
use crate::types::Span;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Stop at the first hit and produce nothing
    Discovery,
    /// Collect every hit
    Render,
}

/// The syntax node a hit renders.
#[derive(Debug, Clone)]
pub enum DeclNode<'s> {
    /// A whole `const`, `var` or unparenthesized `type` declaration
    Gen(&'s GenDecl),
    /// One entry of a parenthesized `type` group
    Spec(&'s Spec),
    /// A function or method with its body removed
    Func(FuncDecl),
}

impl DeclNode<'_> {
    pub fn id(&self) -> NodeId {
        match self {
            DeclNode::Gen(decl) => decl.id,
            DeclNode::Spec(spec) => spec.id(),
            DeclNode::Func(func) => func.id,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            DeclNode::Gen(decl) => decl.span,
            DeclNode::Spec(spec) => spec.span(),
            DeclNode::Func(func) => func.span,
        }
    }
}

/// A declaration that passed the matcher and the kind filter.
#[derive(Debug, Clone)]
pub struct MatchedDeclaration<'s> {
    pub file: &'s ParsedFile,
    pub node: DeclNode<'s>,
    /// The identifier that matched; its line is the reported location
    pub ident: &'s Ident,
    /// Comment groups bound to the node or its entries
    pub comments: Vec<&'s CommentGroup>,
    pub url: String,
    pub outputs: OutputFilter,
}

impl<'s> MatchedDeclaration<'s> {
    pub fn new(
        file: &'s ParsedFile,
        node: DeclNode<'s>,
        ident: &'s Ident,
        url: String,
        outputs: OutputFilter,
    ) -> Self {
        let comments = file.comments.groups(&file.file, node.id());
        Self {
            file,
            node,
            ident,
            comments,
            url,
            outputs,
        }
    }
}

/// Result of walking one file.
#[derive(Debug, Default)]
pub struct Walk<'s> {
    pub found: bool,
    pub matches: Vec<MatchedDeclaration<'s>>,
}

impl<'s> Walk<'s> {
    /// Records a hit. The declaration is only built when rendering.
    fn hit(&mut self, mode: WalkMode, build: impl FnOnce() -> MatchedDeclaration<'s>) {
        self.found = true;
        if mode == WalkMode::Render {
            self.matches.push(build());
        }
    }

    fn done(&self, mode: WalkMode) -> bool {
        mode == WalkMode::Discovery && self.found
    }
}

/// Where a walk is: the package, the file within it and the walk mode.
#[derive(Clone, Copy)]
struct Site<'s> {
    package: &'s PackageScan,
    file: &'s ParsedFile,
    mode: WalkMode,
}

pub struct DeclarationWalker<'q> {
    query: &'q Query,
}

impl<'q> DeclarationWalker<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self { query }
    }

    /// Walks `file`, one of the files of `package`. Package-doc queries
    /// never match a declaration.
    pub fn walk<'s>(
        &self,
        package: &'s PackageScan,
        file: &'s ParsedFile,
        mode: WalkMode,
    ) -> Walk<'s> {
        let mut walk = Walk::default();
        if self.query.matcher().is_none() {
            return walk;
        }
        let site = Site {
            package,
            file,
            mode,
        };
        for decl in &file.file.decls {
            match decl {
                Decl::Gen(gen_decl) => self.gen_decl(site, gen_decl, &mut walk),
                Decl::Func(func) => self.func_decl(site, func, &mut walk),
            }
            if walk.done(mode) {
                break;
            }
        }
        walk
    }

    fn matches(&self, name: &str) -> bool {
        self.query.matcher().is_some_and(|m| m.matches(name))
    }

    fn gen_decl<'s>(&self, site: Site<'s>, decl: &'s GenDecl, walk: &mut Walk<'s>) {
        let file = site.file;
        let kinds = self.query.kinds;
        for spec in &decl.specs {
            match spec {
                Spec::Import(_) => continue,
                Spec::Value(value) => {
                    let wanted = match decl.keyword {
                        Keyword::Const => kinds.contains(KindFilter::CONST),
                        Keyword::Var => kinds.contains(KindFilter::VAR),
                        Keyword::Import | Keyword::Type => false,
                    };
                    if !wanted {
                        continue;
                    }
                    // The whole declaration renders once per matching entry.
                    if let Some(ident) = value.names.iter().find(|n| self.matches(&n.name)) {
                        trace!("{} matches in {}", ident.name, file.path().display());
                        walk.hit(site.mode, || {
                            let url = file.root.name_url(file.path(), &ident.name);
                            let node = DeclNode::Gen(decl);
                            MatchedDeclaration::new(file, node, ident, url, self.query.outputs)
                        });
                    }
                }
                Spec::Type(type_spec) => self.type_spec(site, decl, spec, type_spec, walk),
            }
            if walk.done(site.mode) {
                return;
            }
        }
    }

    fn type_spec<'s>(
        &self,
        site: Site<'s>,
        decl: &'s GenDecl,
        spec: &'s Spec,
        type_spec: &'s TypeSpec,
        walk: &mut Walk<'s>,
    ) {
        let file = site.file;
        let ident = &type_spec.name;
        if !self.matches(&ident.name) {
            return;
        }
        let kinds = self.query.kinds;
        let wanted = kinds.contains(KindFilter::TYPE)
            || match type_spec.ty.shape() {
                Shape::Interface => kinds.contains(KindFilter::INTERFACE),
                Shape::Struct => kinds.contains(KindFilter::STRUCT),
                Shape::Other => false,
            };
        if wanted {
            trace!("type {} matches in {}", ident.name, file.path().display());
            // Without parentheses the doc comment sits above `type` and binds
            // to the declaration; inside a group it binds to the entry.
            walk.hit(site.mode, || {
                let node = if decl.lparen {
                    DeclNode::Spec(spec)
                } else {
                    DeclNode::Gen(decl)
                };
                let url = file.root.name_url(file.path(), &ident.name);
                MatchedDeclaration::new(file, node, ident, url, self.query.outputs)
            });
        }
        if site.mode == WalkMode::Render && kinds.contains(KindFilter::TYPE) {
            let resolver = MethodSetResolver::new(self.query);
            walk.matches.extend(resolver.resolve(site.package, ident));
        }
    }

    fn func_decl<'s>(&self, site: Site<'s>, func: &'s FuncDecl, walk: &mut Walk<'s>) {
        let file = site.file;
        let ident = &func.name;
        if !self.matches(&ident.name) {
            return;
        }
        let kinds = self.query.kinds;
        let wanted = match &func.recv {
            Some(_) => kinds.contains(KindFilter::METHOD),
            None => kinds.contains(KindFilter::FUNC),
        };
        if !wanted {
            return;
        }
        trace!("func {} matches in {}", ident.name, file.path().display());
        walk.hit(site.mode, || {
            let mut func = func.clone();
            func.clear_body();
            let url = match &func.recv {
                Some(recv) => file.root.method_url(file.path(), &recv.type_text, &ident.name),
                None => file.root.name_url(file.path(), &ident.name),
            };
            MatchedDeclaration::new(file, DeclNode::Func(func), ident, url, self.query.outputs)
        });
    }
}
