//! Best-effort type checking
//!
//! Builds just enough of a package's type information to answer method-set
//! questions: the package scope, a map from defining identifier positions to
//! objects, and the methods declared on each named type. Every problem is
//! handed to an [`ErrorSink`] and checking carries on; nothing here fails.

mod method_set;

pub use method_set::{MethodSet, Selection};

use crate::parsing::ast::{self, Decl, Ident, Spec, TypeExpr};
use crate::parsing::SourceFile;
use crate::types::Pos;
use std::collections::HashMap;
use thiserror::Error;

/// Index of an object in [`TypeInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

/// Which view of a named type a method set is computed for, and which kind
/// of receiver a method declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `T`
    Value,
    /// `*T`
    Pointer,
}

/// A package-level entity.
#[derive(Debug, Clone)]
pub enum Object {
    TypeName(TypeObject),
    Func(FuncObject),
    Value(ValueObject),
}

impl Object {
    pub fn name(&self) -> &str {
        match self {
            Object::TypeName(obj) => &obj.name,
            Object::Func(obj) => &obj.name,
            Object::Value(obj) => &obj.name,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Object::TypeName(obj) => obj.pos,
            Object::Func(obj) => obj.pos,
            Object::Value(obj) => obj.pos,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeObject {
    pub name: String,
    pub pos: Pos,
    pub ty: TypeExpr,
    pub alias: bool,
}

/// Function or method. Methods carry the kind of receiver they declare.
#[derive(Debug, Clone)]
pub struct FuncObject {
    pub name: String,
    pub pos: Pos,
    pub receiver: Option<Receiver>,
}

/// Constant or variable.
#[derive(Debug, Clone)]
pub struct ValueObject {
    pub name: String,
    pub pos: Pos,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("line {line}: {name} redeclared in this package")]
    Redeclared { name: String, line: usize },

    #[error("line {line}: undefined receiver type {receiver} for method {method}")]
    UnknownReceiver {
        method: String,
        receiver: String,
        line: usize,
    },

    #[error("line {line}: invalid receiver type {receiver} for method {method}")]
    InvalidReceiver {
        method: String,
        receiver: String,
        line: usize,
    },

    #[error("line {line}: method {receiver}.{method} already declared")]
    DuplicateMethod {
        method: String,
        receiver: String,
        line: usize,
    },

    #[error("type {type_name} embeds {package}.{name} from another package")]
    ExternalType {
        type_name: String,
        package: String,
        name: String,
    },

    #[error("type {type_name} embeds undefined type {name}")]
    UndefinedType { type_name: String, name: String },

    #[error("invalid recursive alias {name}")]
    AliasCycle { name: String },
}

/// Receives type errors as they are found.
pub trait ErrorSink {
    fn report(&mut self, error: CheckError);
}

/// Swallows every error. Used for lookups on code that may not type-check.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardErrors;

impl ErrorSink for DiscardErrors {
    fn report(&mut self, _error: CheckError) {}
}

/// Keeps every error in the order reported.
#[derive(Debug, Default, Clone)]
pub struct RecordErrors {
    pub errors: Vec<CheckError>,
}

impl ErrorSink for RecordErrors {
    fn report(&mut self, error: CheckError) {
        self.errors.push(error);
    }
}

/// Type information for one package.
#[derive(Debug, Default)]
pub struct TypeInfo {
    objects: Vec<Object>,
    defs: HashMap<Pos, ObjectId>,
    scope: HashMap<String, ObjectId>,
    /// Methods by the type they are declared on
    methods: HashMap<ObjectId, Vec<ObjectId>>,
}

impl TypeInfo {
    /// The object an identifier defines, if it defines one.
    pub fn lookup(&self, ident: &Ident) -> Option<ObjectId> {
        self.defs.get(&ident.pos).copied()
    }

    /// Package-level object by name.
    pub fn lookup_name(&self, name: &str) -> Option<ObjectId> {
        self.scope.get(name).copied()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    fn type_object(&self, id: ObjectId) -> Option<&TypeObject> {
        match self.object(id)? {
            Object::TypeName(obj) => Some(obj),
            _ => None,
        }
    }

    /// Local named type an expression refers to, if any.
    fn named(&self, ty: &TypeExpr) -> Option<ObjectId> {
        match ty {
            TypeExpr::Named {
                package: None,
                name,
            } => self
                .lookup_name(name)
                .filter(|&id| self.type_object(id).is_some()),
            _ => None,
        }
    }

    /// Follows aliases to the defined type they stand for. `None` for
    /// non-types, alias cycles and aliases of types this package cannot see.
    fn resolve_alias(&self, id: ObjectId) -> Option<ObjectId> {
        let mut current = id;
        for _ in 0..=self.objects.len() {
            let obj = self.type_object(current)?;
            if !obj.alias {
                return Some(current);
            }
            current = self.named(&obj.ty)?;
        }
        None
    }

    /// Underlying type expression of a named type: defined types over other
    /// local named types take on their shape.
    fn underlying(&self, id: ObjectId) -> Option<&TypeExpr> {
        let mut current = self.resolve_alias(id)?;
        for _ in 0..=self.objects.len() {
            let ty = &self.type_object(current)?.ty;
            match self.named(ty) {
                Some(next) => current = self.resolve_alias(next)?,
                None => return Some(ty),
            }
        }
        None
    }

    fn declared_methods(&self, id: ObjectId) -> impl Iterator<Item = &FuncObject> {
        self.methods
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&m| match self.object(m) {
                Some(Object::Func(func)) => Some(func),
                _ => None,
            })
    }

    fn push(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        self.defs.insert(object.pos(), id);
        self.objects.push(object);
        id
    }
}

/// Single-package checker feeding errors to `S`.
pub struct Checker<S: ErrorSink = DiscardErrors> {
    sink: S,
}

impl<S: ErrorSink> Checker<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Checks the files of one package as a unit.
    pub fn check<'f>(&mut self, files: impl IntoIterator<Item = &'f SourceFile>) -> TypeInfo {
        let mut info = TypeInfo::default();
        let mut pending = Vec::new();

        for file in files {
            for decl in &file.decls {
                match decl {
                    Decl::Gen(gen_decl) => {
                        for spec in &gen_decl.specs {
                            self.declare_spec(&mut info, spec);
                        }
                    }
                    Decl::Func(func) => match &func.recv {
                        Some(recv) => pending.push((func.name.clone(), recv.clone())),
                        None => {
                            let id = info.push(Object::Func(FuncObject {
                                name: func.name.name.clone(),
                                pos: func.name.pos,
                                receiver: None,
                            }));
                            if func.name.name != "init" {
                                self.declare(&mut info, &func.name, id);
                            }
                        }
                    },
                }
            }
        }

        for (name, recv) in pending {
            self.attach_method(&mut info, name, recv);
        }
        self.check_types(&info);
        info
    }

    fn declare_spec(&mut self, info: &mut TypeInfo, spec: &Spec) {
        match spec {
            Spec::Import(_) => {}
            Spec::Value(value) => {
                for name in &value.names {
                    let id = info.push(Object::Value(ValueObject {
                        name: name.name.clone(),
                        pos: name.pos,
                    }));
                    self.declare(info, name, id);
                }
            }
            Spec::Type(type_spec) => {
                let id = info.push(Object::TypeName(TypeObject {
                    name: type_spec.name.name.clone(),
                    pos: type_spec.name.pos,
                    ty: type_spec.ty.clone(),
                    alias: type_spec.alias,
                }));
                self.declare(info, &type_spec.name, id);
            }
        }
    }

    fn declare(&mut self, info: &mut TypeInfo, ident: &Ident, id: ObjectId) {
        if ident.name == "_" {
            return;
        }
        if info.scope.contains_key(&ident.name) {
            self.sink.report(CheckError::Redeclared {
                name: ident.name.clone(),
                line: ident.line,
            });
            return;
        }
        info.scope.insert(ident.name.clone(), id);
    }

    fn attach_method(&mut self, info: &mut TypeInfo, name: Ident, recv: ast::Receiver) {
        let receiver = if recv.pointer {
            Receiver::Pointer
        } else {
            Receiver::Value
        };
        let method = info.push(Object::Func(FuncObject {
            name: name.name.clone(),
            pos: name.pos,
            receiver: Some(receiver),
        }));

        let Some(base) = recv.base.as_deref() else {
            self.sink.report(CheckError::InvalidReceiver {
                method: name.name,
                receiver: recv.type_text,
                line: name.line,
            });
            return;
        };
        let Some(owner) = info
            .lookup_name(base)
            .and_then(|id| info.resolve_alias(id))
        else {
            self.sink.report(CheckError::UnknownReceiver {
                method: name.name,
                receiver: recv.type_text,
                line: name.line,
            });
            return;
        };
        if matches!(
            info.underlying(owner),
            Some(TypeExpr::Interface(_) | TypeExpr::Pointer(_))
        ) {
            self.sink.report(CheckError::InvalidReceiver {
                method: name.name,
                receiver: recv.type_text,
                line: name.line,
            });
            return;
        }
        if name.name == "_" {
            return;
        }
        if info
            .declared_methods(owner)
            .any(|existing| existing.name == name.name)
        {
            self.sink.report(CheckError::DuplicateMethod {
                method: name.name,
                receiver: base.to_string(),
                line: name.line,
            });
            return;
        }
        info.methods.entry(owner).or_default().push(method);
    }

    /// Reports embedded types the method-set computation cannot follow.
    fn check_types(&mut self, info: &TypeInfo) {
        for (index, object) in info.objects.iter().enumerate() {
            let Object::TypeName(obj) = object else {
                continue;
            };
            if obj.alias && info.resolve_alias(ObjectId(index)).is_none() {
                if let Some(id) = info.named(&obj.ty) {
                    if info.type_object(id).is_some_and(|t| t.alias) {
                        self.sink.report(CheckError::AliasCycle {
                            name: obj.name.clone(),
                        });
                    }
                }
            }
            let embedded: Vec<&TypeExpr> = match &obj.ty {
                TypeExpr::Struct(st) => st
                    .fields
                    .iter()
                    .filter(|f| f.embedded)
                    .map(|f| f.ty.deref().0)
                    .collect(),
                TypeExpr::Interface(iface) => iface.embeds.iter().collect(),
                _ => Vec::new(),
            };
            for ty in embedded {
                match ty {
                    TypeExpr::Named {
                        package: Some(package),
                        name,
                    } => self.sink.report(CheckError::ExternalType {
                        type_name: obj.name.clone(),
                        package: package.clone(),
                        name: name.clone(),
                    }),
                    TypeExpr::Named {
                        package: None,
                        name,
                    } if info.named(ty).is_none() && !is_predeclared(name) => {
                        self.sink.report(CheckError::UndefinedType {
                            type_name: obj.name.clone(),
                            name: name.clone(),
                        })
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Default for Checker<DiscardErrors> {
    fn default() -> Self {
        Self::new(DiscardErrors)
    }
}

fn is_predeclared(name: &str) -> bool {
    matches!(
        name,
        "any"
            | "bool"
            | "byte"
            | "comparable"
            | "complex64"
            | "complex128"
            | "error"
            | "float32"
            | "float64"
            | "int"
            | "int8"
            | "int16"
            | "int32"
            | "int64"
            | "rune"
            | "string"
            | "uint"
            | "uint8"
            | "uint16"
            | "uint32"
            | "uint64"
            | "uintptr"
    )
}
