//! Query cursor: a list of matched nodes with walk history.

use crate::cursor::PathCursor;
use crate::error::Result;
use crate::mask::KindMask;
use crate::store::PackageStore;
use crate::walk::{self, Predicate};
use gowalk_go::{Kind, Node, NodeId, NodeRef, Package, printer};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

struct Matches {
    list: Vec<(Arc<Package>, NodeId)>,
    back: Option<Arc<Matches>>,
}

/// Ordered node matches. Every query returns a new selector whose
/// [`Selector::back`] is the one it was run on.
#[derive(Clone)]
pub struct Selector {
    store: Arc<PackageStore>,
    matches: Arc<Matches>,
    stack: Vec<Arc<Matches>>,
}

impl Selector {
    /// Selector holding the package root of `import_path`.
    pub fn open(store: Arc<PackageStore>, import_path: &str) -> Result<Selector> {
        let pkg = store.open(import_path)?;
        let root = pkg.root();
        Ok(Selector {
            store,
            matches: Arc::new(Matches {
                list: vec![(pkg, root)],
                back: None,
            }),
            stack: Vec::new(),
        })
    }

    /// Selector holding the value of a path cursor.
    pub fn from_cursor(cursor: &PathCursor) -> Selector {
        Selector {
            store: Arc::clone(cursor.navigator().store()),
            matches: Arc::new(Matches {
                list: vec![(Arc::clone(cursor.package()), cursor.value())],
                back: None,
            }),
            stack: Vec::new(),
        }
    }

    /// Adds the package root of `import_path` to the held list.
    pub fn load(&self, import_path: &str) -> Result<Selector> {
        let pkg = self.store.open(import_path)?;
        let root = pkg.root();
        let mut list = self.matches.list.clone();
        list.push((pkg, root));
        Ok(self.derive(list))
    }

    fn derive(&self, list: Vec<(Arc<Package>, NodeId)>) -> Selector {
        Selector {
            store: Arc::clone(&self.store),
            matches: Arc::new(Matches {
                list,
                back: Some(Arc::clone(&self.matches)),
            }),
            stack: self.stack.clone(),
        }
    }

    pub fn store(&self) -> &Arc<PackageStore> {
        &self.store
    }

    /// Walks every held node independently and concatenates the results.
    pub fn walk(&self, mask: KindMask, predicates: &[Predicate<'_>]) -> Selector {
        let mut list = Vec::new();
        for (pkg, id) in &self.matches.list {
            let found = walk::walk(pkg.ast(), *id, mask, predicates);
            list.extend(found.into_iter().map(|n| (Arc::clone(pkg), n)));
        }
        debug!(
            "Walked {} nodes with {:?}: {} matches",
            self.matches.list.len(),
            mask,
            list.len()
        );
        self.derive(list)
    }

    /// The selector this one was derived from.
    pub fn back(&self) -> Option<Selector> {
        let back = self.matches.back.as_ref()?;
        Some(Selector {
            store: Arc::clone(&self.store),
            matches: Arc::clone(back),
            stack: self.stack.clone(),
        })
    }

    /// Saves the current matches on the checkpoint stack.
    pub fn push(&mut self) {
        self.stack.push(Arc::clone(&self.matches));
    }

    /// Restores the most recent checkpoint. Returns `false` when the stack
    /// is empty.
    pub fn pop(&mut self) -> bool {
        match self.stack.pop() {
            Some(saved) => {
                self.matches = saved;
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Matches `i..j`, clamped to bounds. `i > j` selects nothing.
    pub fn slice(&self, i: usize, j: usize) -> Selector {
        let len = self.len();
        let (i, j) = (i.min(len), j.min(len));
        let list = if i < j {
            self.matches.list[i..j].to_vec()
        } else {
            Vec::new()
        };
        self.derive(list)
    }

    pub fn first(&self) -> Selector {
        self.slice(0, 1)
    }

    pub fn len(&self) -> usize {
        self.matches.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.list.is_empty()
    }

    /// Held nodes in order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.matches
            .list
            .iter()
            .map(|(pkg, id)| pkg.ast().view(*id))
    }

    pub fn list(&self) -> &[(Arc<Package>, NodeId)] {
        &self.matches.list
    }

    pub fn kinds(&self) -> Vec<Kind> {
        self.nodes().map(|n| n.kind()).collect()
    }

    /// Source text of every held node. Packages render each of their files
    /// under a `// with <filename>:` header.
    pub fn format(&self) -> String {
        let mut out = String::new();
        for (pkg, id) in &self.matches.list {
            let ast = pkg.ast();
            match ast.node(*id) {
                Node::Package { .. } => out.push_str(&printer::render(ast, *id)),
                _ => {
                    out.push('\n');
                    out.push_str(&printer::render(ast, *id));
                    out.push('\n');
                }
            }
        }
        out
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::filter;
    use gowalk_go::GoParser;
    use std::path::Path;

    const SRC: &str = "package p\n\nconst A = 1\n\nconst (\n\tB = 2\n\tC = 3\n)\n\nfunc F() {\n\tconst D = 4\n}\n";

    fn selector() -> Selector {
        let pkg = GoParser::new()
            .parse_sources("p", Path::new("p"), [("a.go", SRC)])
            .unwrap();
        let store = Arc::new(PackageStore::new(StoreConfig::new()));
        store.insert(pkg);
        Selector::open(store, "p").unwrap()
    }

    #[test]
    fn test_walk_records_history() {
        let sel = selector();
        let decls = sel.walk(KindMask::DECL_ALL | Kind::File | Kind::Package, &[]);
        assert_eq!(decls.len(), 5);

        let file = decls.slice(1, 2);
        assert_eq!(file.kinds(), [Kind::File]);
        let only = file.walk(KindMask::DECL_ALL, &[&filter::is_const]);
        assert_eq!(only.kinds(), [Kind::GenDecl, Kind::GenDecl]);

        let back = only.back().unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.back().unwrap().len(), 5);
        assert_eq!(back.back().unwrap().back().unwrap().len(), 1);
        assert!(sel.back().is_none());
    }

    #[test]
    fn test_slice_clamps() {
        let decls = selector().walk(KindMask::DECL_ALL | Kind::File | Kind::Package, &[]);
        assert_eq!(decls.slice(1, 100).len(), 4);
        assert_eq!(decls.slice(3, 1).len(), 0);
        assert_eq!(decls.slice(9, 12).len(), 0);
        assert_eq!(decls.first().kinds(), [Kind::Package]);
        assert!(selector().slice(1, 1).is_empty());
    }

    #[test]
    fn test_push_pop() {
        let mut sel = selector();
        assert!(!sel.pop());
        sel.push();
        sel = sel.walk(KindMask::DECL_ALL | Kind::File | Kind::Package, &[&filter::is_const]);
        assert_eq!(sel.len(), 0);
        assert_eq!(sel.depth(), 1);
        assert!(sel.pop());
        assert_eq!(sel.kinds(), [Kind::Package]);
    }

    #[test]
    fn test_format() {
        let sel = selector();
        assert!(sel.format().starts_with("\n// with a.go: \npackage p"));
        let first = sel
            .walk(KindMask::of(Kind::File) | Kind::Package, &[])
            .slice(1, 2)
            .walk(KindMask::DECL_ALL, &[&filter::is_const])
            .first();
        assert_eq!(first.to_string(), "\nconst A = 1\n");
    }
}
