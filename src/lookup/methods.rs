//! Method set resolution
//!
//! For a matched named type, computes its method set from the package's
//! type information and finds each method's declaration by walking every
//! file of the package again. Declarations are joined to methods by the
//! exact position of their name, never by the name itself, so same-named
//! methods of different types stay apart.

use crate::checker::Receiver;
use crate::config::ExportRule;
use crate::indexing::PackageScan;
use crate::lookup::query::{OutputFilter, Query};
use crate::lookup::walker::{DeclNode, MatchedDeclaration};
use crate::parsing::ast::{Decl, Ident};
use crate::types::Pos;
use tracing::debug;

/// A method still to be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSetEntry {
    /// Position in the method set, which is sorted by name
    pub index: usize,
    /// Position of the method's name in its declaration
    pub pos: Pos,
}

pub struct MethodSetResolver {
    rule: ExportRule,
    outputs: OutputFilter,
}

impl MethodSetResolver {
    /// Methods render their documentation only.
    pub fn new(query: &Query) -> Self {
        let rule = query
            .matcher()
            .map(|m| m.export_rule())
            .unwrap_or_default();
        Self {
            rule,
            outputs: query.outputs & OutputFilter::DOC,
        }
    }

    /// Exported methods of the type named by `type_name`, in method-set
    /// order. Methods whose declarations are not in `package` are left out.
    pub fn resolve<'s>(
        &self,
        package: &'s PackageScan,
        type_name: &Ident,
    ) -> Vec<MatchedDeclaration<'s>> {
        let mut remaining = self.entries(package, type_name);
        if remaining.is_empty() {
            return Vec::new();
        }

        let mut slots: Vec<Option<MatchedDeclaration<'s>>> =
            vec![None; remaining.iter().map(|e| e.index + 1).max().unwrap_or(0)];
        'files: for file in &package.files {
            for decl in &file.file.decls {
                let Decl::Func(func) = decl else {
                    continue;
                };
                let Some(at) = remaining.iter().position(|e| e.pos == func.name.pos) else {
                    continue;
                };
                let entry = remaining.remove(at);
                let mut method = func.clone();
                method.clear_body();
                let url = match &method.recv {
                    Some(recv) => {
                        file.root
                            .method_url(file.path(), &recv.type_text, &func.name.name)
                    }
                    None => file.root.name_url(file.path(), &func.name.name),
                };
                slots[entry.index] = Some(MatchedDeclaration::new(
                    file,
                    DeclNode::Func(method),
                    &func.name,
                    url,
                    self.outputs,
                ));
                if remaining.is_empty() {
                    break 'files;
                }
            }
        }
        if !remaining.is_empty() {
            debug!(
                "{} methods of {} declared outside the scanned files",
                remaining.len(),
                type_name.name
            );
        }
        slots.into_iter().flatten().collect()
    }

    /// Value method set, or the pointer method set when that is empty,
    /// restricted to exported names.
    fn entries(&self, package: &PackageScan, type_name: &Ident) -> Vec<MethodSetEntry> {
        let info = package.type_info();
        let Some(id) = info.lookup(type_name) else {
            return Vec::new();
        };
        let mut set = info.method_set(id, Receiver::Value);
        if set.is_empty() {
            set = info.method_set(id, Receiver::Pointer);
        }
        set.iter()
            .enumerate()
            .filter(|(_, selection)| self.rule.is_exported(&selection.name))
            .map(|(index, selection)| MethodSetEntry {
                index,
                pos: selection.pos,
            })
            .collect()
    }
}
