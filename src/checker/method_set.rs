//! Method sets of named types, following Go's selector rules for a single
//! package.

use super::{ObjectId, Receiver, TypeInfo};
use crate::parsing::ast::{InterfaceType, TypeExpr};
use crate::types::Pos;
use std::collections::{HashMap, HashSet};

/// One method reachable on a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    /// Position of the method's defining identifier
    pub pos: Pos,
    /// Number of embedded fields walked through to reach it
    pub depth: usize,
    /// Whether the path to it went through a pointer
    pub indirect: bool,
}

/// Methods of a type, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
    entries: Vec<Selection>,
}

impl MethodSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.entries.iter()
    }

    fn sorted(mut entries: Vec<Selection>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a MethodSet {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TypeInfo {
    /// Method set of the named type `id` seen as `T` or `*T`.
    ///
    /// Empty for objects that are not types and for pointers to interfaces.
    pub fn method_set(&self, id: ObjectId, view: Receiver) -> MethodSet {
        let Some(named) = self.resolve_alias(id) else {
            return MethodSet::default();
        };
        match self.underlying(named) {
            Some(TypeExpr::Interface(iface)) => match view {
                Receiver::Value => MethodSet::sorted(self.interface_methods(iface, 0, false)),
                Receiver::Pointer => MethodSet::default(),
            },
            Some(_) => MethodSet::sorted(self.promoted(named, view == Receiver::Pointer)),
            None => MethodSet::default(),
        }
    }

    /// Breadth-first walk over embedded fields. A name found at one depth
    /// hides it at every deeper one; two hits at the same depth cancel out.
    fn promoted(&self, root: ObjectId, pointer: bool) -> Vec<Selection> {
        let mut result = Vec::new();
        let mut hidden: HashSet<String> = HashSet::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut level = vec![(root, pointer)];
        let mut depth = 0;

        while !level.is_empty() {
            let mut found: HashMap<String, Vec<Option<Selection>>> = HashMap::new();
            let mut next = Vec::new();

            for (id, indirect) in level {
                if !seen.insert(id) {
                    continue;
                }
                for method in self.declared_methods(id) {
                    let callable = method.receiver != Some(Receiver::Pointer) || indirect;
                    let selection = callable.then(|| Selection {
                        name: method.name.clone(),
                        pos: method.pos,
                        depth,
                        indirect,
                    });
                    found.entry(method.name.clone()).or_default().push(selection);
                }

                match self.underlying(id) {
                    Some(TypeExpr::Struct(st)) => {
                        for field in &st.fields {
                            for name in field.selector_names() {
                                found.entry(name.to_string()).or_default().push(None);
                            }
                            if !field.embedded {
                                continue;
                            }
                            let (ty, through_pointer) = field.ty.deref();
                            if let Some(embedded) =
                                self.named(ty).and_then(|e| self.resolve_alias(e))
                            {
                                next.push((embedded, indirect || through_pointer));
                            }
                        }
                    }
                    Some(TypeExpr::Interface(iface)) => {
                        for selection in self.interface_methods(iface, depth, indirect) {
                            found
                                .entry(selection.name.clone())
                                .or_default()
                                .push(Some(selection));
                        }
                    }
                    _ => {}
                }
            }

            for (name, hits) in found {
                if !hidden.insert(name) {
                    continue;
                }
                if let [Some(selection)] = hits.as_slice() {
                    result.push(selection.clone());
                }
            }
            level = next;
            depth += 1;
        }
        result
    }

    /// Explicit and embedded methods of an interface, once per name.
    fn interface_methods(
        &self,
        iface: &InterfaceType,
        depth: usize,
        indirect: bool,
    ) -> Vec<Selection> {
        let mut methods: Vec<Selection> = Vec::new();
        let mut visited = HashSet::new();
        self.collect_interface(iface, depth, indirect, &mut visited, &mut methods);
        methods
    }

    fn collect_interface(
        &self,
        iface: &InterfaceType,
        depth: usize,
        indirect: bool,
        visited: &mut HashSet<ObjectId>,
        out: &mut Vec<Selection>,
    ) {
        for method in &iface.methods {
            if out.iter().any(|s| s.name == method.name) {
                continue;
            }
            out.push(Selection {
                name: method.name.clone(),
                pos: method.pos,
                depth,
                indirect,
            });
        }
        for embed in &iface.embeds {
            let Some(id) = self.named(embed).and_then(|e| self.resolve_alias(e)) else {
                continue;
            };
            if !visited.insert(id) {
                continue;
            }
            if let Some(TypeExpr::Interface(inner)) = self.underlying(id) {
                self.collect_interface(inner, depth, indirect, visited, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::parse;
    use super::super::Checker;
    use super::*;

    fn names(info: &TypeInfo, ty: &str, view: Receiver) -> Vec<String> {
        let id = info.lookup_name(ty).unwrap();
        info.method_set(id, view)
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    #[test]
    fn pointer_receivers_only_in_pointer_view() {
        let files = parse(&[
            "package p\n\ntype T struct{}\n\nfunc (t *T) Set() {}\nfunc (t T) Get() {}\n",
        ]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "T", Receiver::Value), vec!["Get"]);
        assert_eq!(names(&info, "T", Receiver::Pointer), vec!["Get", "Set"]);
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let files = parse(&[
            "package p\n\ntype T int\n\nfunc (T) C() {}\nfunc (T) A() {}\nfunc (T) B() {}\n",
        ]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "T", Receiver::Value), vec!["A", "B", "C"]);
    }

    #[test]
    fn promotion_through_embedding() {
        let files = parse(&[
            "package p\n\ntype Inner struct{}\n\nfunc (Inner) Value() {}\nfunc (*Inner) Ptr() {}\n\ntype ByValue struct{ Inner }\ntype ByPtr struct{ *Inner }\n",
        ]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "ByValue", Receiver::Value), vec!["Value"]);
        assert_eq!(names(&info, "ByValue", Receiver::Pointer), vec!["Ptr", "Value"]);
        assert_eq!(names(&info, "ByPtr", Receiver::Value), vec!["Ptr", "Value"]);
    }

    #[test]
    fn shallower_names_shadow_and_equal_depth_collides() {
        let files = parse(&[
            "package p\n\ntype A struct{}\ntype B struct{}\n\nfunc (A) M() {}\nfunc (A) N() {}\nfunc (B) M() {}\n\ntype Both struct {\n\tA\n\tB\n}\n\ntype Outer struct {\n\tA\n\tN int\n}\n",
        ]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "Both", Receiver::Value), vec!["N"]);
        assert_eq!(names(&info, "Outer", Receiver::Value), vec!["M"]);
    }

    #[test]
    fn interfaces_include_embedded_methods() {
        let files = parse(&[
            "package p\n\ntype Reader interface{ Read() }\ntype ReadCloser interface {\n\tReader\n\tClose()\n}\n",
        ]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "ReadCloser", Receiver::Value), vec!["Close", "Read"]);
        assert!(names(&info, "ReadCloser", Receiver::Pointer).is_empty());
    }

    #[test]
    fn aliases_share_the_target_set() {
        let files = parse(&["package p\n\ntype T struct{}\ntype A = T\n\nfunc (T) M() {}\n"]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "A", Receiver::Value), vec!["M"]);
    }

    #[test]
    fn defined_types_do_not_inherit_methods() {
        let files = parse(&[
            "package p\n\ntype Inner struct{}\ntype T struct{}\n\nfunc (T) M() {}\nfunc (Inner) E() {}\n\ntype Outer struct{ Inner }\ntype U T\ntype V Outer\n",
        ]);
        let info = Checker::default().check(&files);
        assert!(names(&info, "U", Receiver::Pointer).is_empty());
        assert_eq!(names(&info, "V", Receiver::Value), vec!["E"]);
    }

    #[test]
    fn recursive_embedding_terminates() {
        let files = parse(&["package p\n\ntype T struct{ *T }\n\nfunc (*T) M() {}\n"]);
        let info = Checker::default().check(&files);
        assert_eq!(names(&info, "T", Receiver::Pointer), vec!["M"]);
    }
}
