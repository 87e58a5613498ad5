//! Path cursors: dotted-path navigation over loaded packages.
//!
//! A [`PathCursor`] is an immutable snapshot of one resolved node plus the
//! chain of ancestors it was reached through. Every navigation step returns a
//! new cursor; a failed step returns `None`, and [`OptionCursorExt`] keeps
//! chains of steps flowing through `None` without error handling.

use crate::error::Result;
use crate::store::PackageStore;
use gowalk_go::naming::{self, COLON, DOT};
use gowalk_go::{Ast, Kind, Node, NodeId, Package, Position, printer};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Shared state of one navigation session: the store that resolves imports
/// and the package every root fallback goes back to.
pub struct Navigator {
    store: Arc<PackageStore>,
    root: Arc<Package>,
    max_depth: usize,
}

impl Navigator {
    /// Loads `import_path` and returns a cursor on its package root.
    pub fn open(store: Arc<PackageStore>, import_path: &str) -> Result<PathCursor> {
        let root = store.open(import_path)?;
        Ok(Self::with_root(store, root))
    }

    /// Navigation rooted at an already loaded package.
    pub fn with_root(store: Arc<PackageStore>, root: Arc<Package>) -> PathCursor {
        let max_depth = store.config().max_depth;
        let nav = Arc::new(Navigator {
            store,
            root,
            max_depth,
        });
        nav.root()
    }

    pub fn root(self: &Arc<Self>) -> PathCursor {
        PathCursor::package_root(Arc::clone(self), Arc::clone(&self.root), String::new())
    }

    pub fn store(&self) -> &Arc<PackageStore> {
        &self.store
    }

    pub fn root_package(&self) -> &Arc<Package> {
        &self.root
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Serializable summary of a cursor.
#[derive(Debug, Clone, Serialize)]
pub struct CursorInfo {
    pub name: String,
    pub kind: String,
    pub package: String,
    pub pos: Position,
    pub children: Vec<String>,
}

#[derive(Clone)]
pub struct PathCursor {
    nav: Arc<Navigator>,
    pkg: Arc<Package>,
    name: String,
    ident: Option<NodeId>,
    /// `trail[0]` is the value; the rest are its ancestors, innermost first.
    trail: Vec<NodeId>,
}

/// Nodes from a found value up to, not including, the scope it was found in.
type Chain = Vec<NodeId>;

impl PathCursor {
    fn package_root(nav: Arc<Navigator>, pkg: Arc<Package>, name: String) -> Self {
        let root = pkg.root();
        Self {
            nav,
            pkg,
            name,
            ident: None,
            trail: vec![root],
        }
    }

    fn descend(&self, chain: Chain, name: impl Into<String>, ident: Option<NodeId>) -> PathCursor {
        let mut trail = chain;
        trail.extend_from_slice(&self.trail);
        PathCursor {
            nav: Arc::clone(&self.nav),
            pkg: Arc::clone(&self.pkg),
            name: name.into(),
            ident,
            trail,
        }
    }

    fn home_root(&self) -> PathCursor {
        PathCursor::package_root(Arc::clone(&self.nav), Arc::clone(&self.pkg), String::new())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Display name: the segment that resolved this cursor, or the rendered
    /// type name for cursors produced by [`PathCursor::ty`].
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> NodeId {
        self.trail[0]
    }

    pub fn node(&self) -> &Node {
        self.pkg.ast().node(self.value())
    }

    pub fn kind(&self) -> Kind {
        self.node().kind()
    }

    /// Identifier the last step matched, when it matched one.
    pub fn ident(&self) -> Option<NodeId> {
        self.ident
    }

    pub fn trail(&self) -> &[NodeId] {
        &self.trail
    }

    pub fn package(&self) -> &Arc<Package> {
        &self.pkg
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.nav
    }

    pub fn ast(&self) -> &Ast {
        self.pkg.ast()
    }

    pub fn is_root(&self) -> bool {
        self.trail.len() == 1
            && self.value() == self.pkg.root()
            && Arc::ptr_eq(&self.pkg, &self.nav.root)
    }

    /// Leading documentation text. A spec alone in its declaration inherits
    /// the declaration's doc.
    pub fn doc(&self) -> String {
        let ast = self.ast();
        let group = self.node().doc().or_else(|| match self.node() {
            Node::ImportSpec { .. } | Node::ValueSpec { .. } | Node::TypeSpec { .. } => {
                match self.trail.get(1).map(|p| ast.node(*p)) {
                    Some(Node::GenDecl { doc, specs, .. }) if specs.len() == 1 => *doc,
                    _ => None,
                }
            }
            _ => None,
        });
        group
            .map(|g| printer::comment_text(ast, g))
            .unwrap_or_default()
    }

    /// Trailing line-comment text.
    pub fn comment(&self) -> String {
        self.node()
            .line_comment()
            .map(|g| printer::comment_text(self.ast(), g))
            .unwrap_or_default()
    }

    pub fn src(&self) -> String {
        printer::render(self.ast(), self.value())
    }

    pub fn pos(&self) -> Position {
        self.ast().position(self.value()).unwrap_or_default()
    }

    pub fn info(&self) -> CursorInfo {
        CursorInfo {
            name: self.name.clone(),
            kind: self.kind().name().to_string(),
            package: self.pkg.import_path().to_string(),
            pos: self.pos(),
            children: self.child_list(),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Resolves a dotted path one segment at a time.
    ///
    /// Per segment: the value's own namespace (following imports and named
    /// types), then the declared type, then the method set `Name:segment`,
    /// then the navigation root. Empty segments leave the cursor in place.
    pub fn child(&self, path: &str) -> Option<PathCursor> {
        let mut cur = self.clone();
        for seg in path.split(DOT) {
            if seg.is_empty() {
                continue;
            }
            cur = cur.resolve_segment(seg, 0, true, &mut Visited::default())?;
        }
        Some(cur)
    }

    fn resolve_segment(
        &self,
        seg: &str,
        depth: usize,
        allow_root_retry: bool,
        seen: &mut Visited,
    ) -> Option<PathCursor> {
        if depth > self.nav.max_depth {
            warn!(
                "Resolution of {:?} from {:?} exceeded depth {}",
                seg, self.name, self.nav.max_depth
            );
            return None;
        }
        if !seen.insert(&self.pkg, self.value(), seg) {
            trace!("Already expanded {:?} at {} ({:?})", seg, self.kind(), self.name);
            return None;
        }
        trace!("Resolving {:?} at {} ({:?}), depth {}", seg, self.kind(), self.name, depth);

        if let Some(found) = self.lookup(seg, depth, seen) {
            return Some(found);
        }

        if let Some(found) = self
            .ty()
            .and_then(|t| t.resolve_segment(seg, depth + 1, false, seen))
        {
            return Some(found);
        }

        if !self.name.is_empty() {
            let key = format!("{}{}{}", self.name, COLON, seg);
            if let Some(found) = self.home_root().lookup(&key, depth + 1, seen) {
                return Some(found);
            }
            if !Arc::ptr_eq(&self.pkg, &self.nav.root) {
                if let Some(found) = self.nav.root().lookup(&key, depth + 1, seen) {
                    return Some(found);
                }
            }
        }

        if allow_root_retry && !self.is_root() {
            trace!("Retrying {:?} at the navigation root", seg);
            return self.nav.root().resolve_segment(seg, depth + 1, false, seen);
        }
        None
    }

    /// Exact match inside the value's own namespace.
    fn lookup(&self, seg: &str, depth: usize, seen: &mut Visited) -> Option<PathCursor> {
        let ast = self.ast();
        match self.node() {
            Node::Package { files, .. } => files.iter().find_map(|(_, file)| match ast.node(*file) {
                Node::File { decls, .. } => self.find_decl(decls, seg, &[*file]),
                _ => None,
            }),
            Node::File { decls, .. } => self.find_decl(decls, seg, &[]),
            Node::GenDecl { specs, .. } => specs
                .iter()
                .find_map(|s| self.match_spec(*s, seg, vec![*s])),
            Node::FuncDecl { recv, ty, .. } => recv
                .and_then(|r| self.find_field(r, seg, &[r]))
                .or_else(|| self.find_signature(*ty, seg, &[*ty])),
            Node::FuncLit { ty, .. } => self.find_signature(*ty, seg, &[*ty]),
            Node::FuncType { .. } => self.find_signature(self.value(), seg, &[]),
            Node::StructType { fields: list } | Node::InterfaceType { methods: list } => {
                self.find_member(*list, seg, &[*list], depth, seen)
            }
            Node::FieldList { .. } => self.find_member(self.value(), seg, &[], depth, seen),
            Node::Ident { .. }
            | Node::SelectorExpr { .. }
            | Node::StarExpr { .. }
            | Node::ParenExpr { .. }
            | Node::IndexExpr { .. } => self
                .named_decl(depth, seen)
                .and_then(|decl| decl.resolve_segment(seg, depth + 1, false, seen)),
            _ => None,
        }
    }

    fn find_decl(&self, decls: &[NodeId], seg: &str, above: &[NodeId]) -> Option<PathCursor> {
        let ast = self.ast();
        for decl in decls {
            match ast.node(*decl) {
                Node::GenDecl { specs, .. } => {
                    for spec in specs {
                        let chain = [&[*spec, *decl][..], above].concat();
                        if let Some(found) = self.match_spec(*spec, seg, chain) {
                            return Some(found);
                        }
                    }
                }
                Node::FuncDecl { name, .. } => {
                    if naming::func_key(ast, *decl).as_deref() == Some(seg) {
                        let chain = [&[*decl][..], above].concat();
                        return Some(self.descend(chain, seg, Some(*name)));
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn match_spec(&self, spec: NodeId, seg: &str, chain: Chain) -> Option<PathCursor> {
        let ast = self.ast();
        match ast.node(spec) {
            Node::ImportSpec { .. } => {
                let name = naming::import_name(ast, spec)?;
                if name != seg || name == "_" || name == "." {
                    return None;
                }
                let path = naming::import_path(ast, spec)?;
                match self.nav.store.open(&path) {
                    Ok(pkg) => Some(PathCursor::package_root(
                        Arc::clone(&self.nav),
                        pkg,
                        seg.to_string(),
                    )),
                    Err(e) => {
                        debug!("Import {} is not loadable: {}", path, e);
                        None
                    }
                }
            }
            Node::ValueSpec { names, .. } => names
                .iter()
                .find(|n| ast.ident(**n) == Some(seg))
                .map(|n| self.descend(chain, seg, Some(*n))),
            Node::TypeSpec { name, .. } => {
                (ast.ident(*name) == Some(seg)).then(|| self.descend(chain, seg, Some(*name)))
            }
            _ => None,
        }
    }

    /// Named field of a field list. `above` runs from the list up to the value.
    fn find_field(&self, list: NodeId, seg: &str, above: &[NodeId]) -> Option<PathCursor> {
        let ast = self.ast();
        let Node::FieldList { list: fields } = ast.node(list) else {
            return None;
        };
        fields.iter().find_map(|field| match ast.node(*field) {
            Node::Field { names, .. } => names
                .iter()
                .find(|n| ast.ident(**n) == Some(seg))
                .map(|n| self.descend([&[*field][..], above].concat(), seg, Some(*n))),
            _ => None,
        })
    }

    fn find_signature(&self, func_type: NodeId, seg: &str, above: &[NodeId]) -> Option<PathCursor> {
        let Node::FuncType {
            params, results, ..
        } = self.ast().node(func_type)
        else {
            return None;
        };
        self.find_field(*params, seg, &[&[*params][..], above].concat())
            .or_else(|| results.and_then(|r| self.find_field(r, seg, &[&[r][..], above].concat())))
    }

    /// Fields by name, embedded fields by type-name suffix, then members
    /// promoted through embedded fields.
    fn find_member(
        &self,
        list: NodeId,
        seg: &str,
        above: &[NodeId],
        depth: usize,
        seen: &mut Visited,
    ) -> Option<PathCursor> {
        let ast = self.ast();
        let Node::FieldList { list: fields } = ast.node(list) else {
            return None;
        };
        let mut embedded = Vec::new();
        for field in fields {
            let Node::Field { names, ty, .. } = ast.node(*field) else {
                continue;
            };
            let chain = || [&[*field][..], above].concat();
            if names.is_empty() {
                let suffix = naming::type_name_suffix(ast, *ty);
                if suffix == seg {
                    return Some(self.descend(chain(), seg, None));
                }
                embedded.push(self.descend(chain(), suffix, None));
            } else if let Some(n) = names.iter().find(|n| ast.ident(**n) == Some(seg)) {
                return Some(self.descend(chain(), seg, Some(*n)));
            }
        }
        embedded
            .iter()
            .find_map(|e| e.resolve_segment(seg, depth + 1, false, seen))
    }

    /// Declaration a named type expression refers to.
    fn named_decl(&self, depth: usize, seen: &mut Visited) -> Option<PathCursor> {
        let ast = self.ast();
        let mut expr = self.value();
        loop {
            match ast.node(expr) {
                Node::StarExpr { x } | Node::ParenExpr { x } | Node::IndexExpr { x, .. } => expr = *x,
                _ => break,
            }
        }
        match ast.node(expr) {
            Node::Ident { name } => self.home_root().lookup(name, depth + 1, seen),
            Node::SelectorExpr { x, sel } => {
                let imported = self.home_root().lookup(ast.ident(*x)?, depth + 1, seen)?;
                if imported.kind() != Kind::Package {
                    return None;
                }
                imported.lookup(ast.ident(*sel)?, depth + 1, seen)
            }
            _ => None,
        }
    }

    /// Declared type of a spec, field or function.
    pub fn ty(&self) -> Option<PathCursor> {
        let t = match self.node() {
            Node::ValueSpec { ty, .. } => (*ty)?,
            Node::TypeSpec { ty, .. }
            | Node::Field { ty, .. }
            | Node::FuncDecl { ty, .. }
            | Node::FuncLit { ty, .. } => *ty,
            _ => return None,
        };
        Some(self.descend(vec![t], naming::type_name(self.ast(), t), None))
    }

    /// Result list of a function; the declared type for anything else.
    pub fn ret(&self) -> Option<PathCursor> {
        let (func_type, chain) = match self.node() {
            Node::FuncDecl { ty, .. } | Node::FuncLit { ty, .. } => (*ty, vec![*ty]),
            Node::FuncType { .. } => (self.value(), Vec::new()),
            _ => return self.ty(),
        };
        let Node::FuncType { results, .. } = self.ast().node(func_type) else {
            return None;
        };
        let results = (*results)?;
        Some(self.descend([vec![results], chain].concat(), "", None))
    }

    /// Statement block of a function or compound statement.
    pub fn body(&self) -> Option<PathCursor> {
        let body = match self.node() {
            Node::FuncDecl { body, .. } => (*body)?,
            Node::FuncLit { body, .. }
            | Node::IfStmt { body, .. }
            | Node::SwitchStmt { body, .. }
            | Node::TypeSwitchStmt { body, .. }
            | Node::SelectStmt { body }
            | Node::ForStmt { body, .. }
            | Node::RangeStmt { body, .. } => *body,
            _ => return None,
        };
        Some(self.descend(vec![body], "", None))
    }

    /// Local variable lookup by lexical scope, innermost first; falls back
    /// to [`PathCursor::child`].
    pub fn var(&self, name: &str) -> Option<PathCursor> {
        let ast = self.ast();
        let mut contained = None;
        for (i, scope) in self.trail.iter().enumerate() {
            if let Some((chain, ident)) = scope_binding(ast, *scope, name, contained) {
                trace!("Found {:?} in {} scope", name, ast.kind(*scope));
                let mut trail = chain;
                trail.extend_from_slice(&self.trail[i..]);
                return Some(PathCursor {
                    nav: Arc::clone(&self.nav),
                    pkg: Arc::clone(&self.pkg),
                    name: name.to_string(),
                    ident: Some(ident),
                    trail,
                });
            }
            contained = Some(*scope);
        }
        self.child(name)
    }

    /// Names one exact step can resolve, deduplicated in declaration
    /// order; the declared type's names when the value has none of its own.
    pub fn child_list(&self) -> Vec<String> {
        self.child_list_at(0)
    }

    fn child_list_at(&self, depth: usize) -> Vec<String> {
        if depth > self.nav.max_depth {
            warn!("Listing children of {:?} exceeded depth {}", self.name, self.nav.max_depth);
            return Vec::new();
        }
        let mut names = IndexSet::new();
        self.collect_names(&mut names, depth);
        if names.is_empty() {
            if let Some(t) = self.ty() {
                return t.child_list_at(depth + 1);
            }
        }
        names.into_iter().collect()
    }

    fn collect_names(&self, names: &mut IndexSet<String>, depth: usize) {
        let ast = self.ast();
        match self.node() {
            Node::Package { files, .. } => {
                for (_, file) in files {
                    if let Node::File { decls, .. } = ast.node(*file) {
                        decl_names(ast, decls, names);
                    }
                }
            }
            Node::File { decls, .. } => decl_names(ast, decls, names),
            Node::GenDecl { specs, .. } => {
                for spec in specs {
                    spec_names(ast, *spec, names);
                }
            }
            Node::FuncDecl { recv, ty, .. } => {
                if let Some(r) = recv {
                    field_names(ast, *r, names);
                }
                signature_names(ast, *ty, names);
            }
            Node::FuncLit { ty, .. } => signature_names(ast, *ty, names),
            Node::FuncType { .. } => signature_names(ast, self.value(), names),
            Node::StructType { fields: list } | Node::InterfaceType { methods: list } => {
                field_names(ast, *list, names)
            }
            Node::FieldList { .. } => field_names(ast, self.value(), names),
            Node::Ident { .. }
            | Node::SelectorExpr { .. }
            | Node::StarExpr { .. }
            | Node::ParenExpr { .. }
            | Node::IndexExpr { .. } => {
                if let Some(decl) = self.named_decl(depth, &mut Visited::default()) {
                    names.extend(decl.child_list_at(depth + 1));
                }
            }
            _ => {}
        }
    }

    /// Entries of a field list; a field with N names yields N entries.
    fn entries(&self) -> Option<(NodeId, Vec<(NodeId, Option<NodeId>)>)> {
        let ast = self.ast();
        let list = match self.node() {
            Node::FieldList { .. } => self.value(),
            Node::StructType { fields } => *fields,
            Node::InterfaceType { methods } => *methods,
            _ => return None,
        };
        let Node::FieldList { list: fields } = ast.node(list) else {
            return None;
        };
        let mut out = Vec::new();
        for field in fields {
            match ast.node(*field) {
                Node::Field { names, .. } if !names.is_empty() => {
                    out.extend(names.iter().map(|n| (*field, Some(*n))));
                }
                _ => out.push((*field, None)),
            }
        }
        Some((list, out))
    }

    /// Positional access into a field list.
    pub fn index(&self, i: usize) -> Option<PathCursor> {
        let (list, entries) = self.entries()?;
        let (field, ident) = *entries.get(i)?;
        let ast = self.ast();
        let name = match ident {
            Some(n) => ast.ident(n).unwrap_or_default().to_string(),
            None => match ast.node(field) {
                Node::Field { ty, .. } => naming::type_name_suffix(ast, *ty),
                _ => String::new(),
            },
        };
        let chain = if list == self.value() {
            vec![field]
        } else {
            vec![field, list]
        };
        Some(self.descend(chain, name, ident))
    }

    /// Number of field-list entries, or `-1` when the value is not a list.
    pub fn len(&self) -> isize {
        self.entries()
            .map_or(-1, |(_, entries)| entries.len() as isize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// `(package, node, segment)` triples already expanded during one path
/// step. Embedded and named types may form cycles; each triple is tried once.
#[derive(Default)]
struct Visited(HashSet<(usize, NodeId, String)>);

impl Visited {
    fn insert(&mut self, pkg: &Arc<Package>, node: NodeId, seg: &str) -> bool {
        self.0
            .insert((Arc::as_ptr(pkg) as usize, node, seg.to_string()))
    }
}

impl PartialEq for PathCursor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pkg, &other.pkg) && self.value() == other.value()
    }
}

impl Eq for PathCursor {}

impl fmt::Debug for PathCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathCursor")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("package", &self.pkg.import_path())
            .field("pos", &self.pos().to_string())
            .finish()
    }
}

fn decl_names(ast: &Ast, decls: &[NodeId], names: &mut IndexSet<String>) {
    for decl in decls {
        match ast.node(*decl) {
            Node::GenDecl { specs, .. } => {
                for spec in specs {
                    spec_names(ast, *spec, names);
                }
            }
            Node::FuncDecl { .. } => names.extend(naming::func_key(ast, *decl)),
            _ => {}
        }
    }
}

fn spec_names(ast: &Ast, spec: NodeId, names: &mut IndexSet<String>) {
    match ast.node(spec) {
        Node::ImportSpec { .. } => {
            if let Some(name) = naming::import_name(ast, spec) {
                if name != "_" && name != "." {
                    names.insert(name);
                }
            }
        }
        Node::ValueSpec { names: idents, .. } => {
            names.extend(idents.iter().filter_map(|n| ast.ident(*n)).map(String::from));
        }
        Node::TypeSpec { name, .. } => names.extend(ast.ident(*name).map(String::from)),
        _ => {}
    }
}

fn field_names(ast: &Ast, list: NodeId, names: &mut IndexSet<String>) {
    let Node::FieldList { list: fields } = ast.node(list) else {
        return;
    };
    for field in fields {
        if let Node::Field { names: idents, ty, .. } = ast.node(*field) {
            if idents.is_empty() {
                names.insert(naming::type_name_suffix(ast, *ty));
            } else {
                names.extend(idents.iter().filter_map(|n| ast.ident(*n)).map(String::from));
            }
        }
    }
}

fn signature_names(ast: &Ast, func_type: NodeId, names: &mut IndexSet<String>) {
    if let Node::FuncType {
        params, results, ..
    } = ast.node(func_type)
    {
        field_names(ast, *params, names);
        if let Some(r) = results {
            field_names(ast, *r, names);
        }
    }
}

// ----------------------------------------------------------------------
// Lexical scopes
// ----------------------------------------------------------------------

/// Binding of `name` declared directly by `scope`.
///
/// `contained` is the child of `scope` the search climbed out of; only
/// bindings that precede it are visible. `None` means the search starts at
/// `scope` itself.
fn scope_binding(
    ast: &Ast,
    scope: NodeId,
    name: &str,
    contained: Option<NodeId>,
) -> Option<(Chain, NodeId)> {
    let is_contained = |id: &Option<NodeId>| id.is_some() && *id == contained;
    match ast.node(scope) {
        Node::FuncDecl { recv, ty, body, .. } => recv
            .and_then(|r| field_binding(ast, r, name, vec![r]))
            .or_else(|| signature_binding(ast, *ty, name))
            .or_else(|| match (contained, body) {
                (None, Some(b)) => block_binding(ast, *b, name),
                _ => None,
            }),
        Node::FuncLit { ty, body } => signature_binding(ast, *ty, name).or_else(|| match contained {
            None => block_binding(ast, *body, name),
            Some(_) => None,
        }),
        Node::BlockStmt { list } | Node::CaseClause { body: list, .. } => {
            list_binding(ast, list, name, contained)
        }
        Node::CommClause { comm, body } => {
            let header = if is_contained(comm) {
                None
            } else {
                comm.and_then(|c| stmt_binding(ast, c, name))
            };
            header.or_else(|| list_binding(ast, body, name, contained))
        }
        Node::IfStmt { init, body, .. }
        | Node::ForStmt { init, body, .. }
        | Node::SwitchStmt { init, body, .. } => {
            let header = if is_contained(init) {
                None
            } else {
                init.and_then(|s| stmt_binding(ast, s, name))
            };
            header.or_else(|| match contained {
                None => block_binding(ast, *body, name),
                Some(_) => None,
            })
        }
        Node::TypeSwitchStmt { init, assign, body } => {
            if is_contained(init) {
                return None;
            }
            init.and_then(|s| stmt_binding(ast, s, name))
                .or_else(|| {
                    if contained == Some(*assign) {
                        None
                    } else {
                        stmt_binding(ast, *assign, name)
                    }
                })
                .or_else(|| match contained {
                    None => block_binding(ast, *body, name),
                    Some(_) => None,
                })
        }
        Node::RangeStmt {
            key,
            value,
            define,
            x,
            body,
        } => {
            let header = if *define && contained != Some(*x) {
                [key, value]
                    .into_iter()
                    .flatten()
                    .find(|id| ast.ident(**id) == Some(name))
                    .map(|id| (Vec::new(), *id))
            } else {
                None
            };
            header.or_else(|| match contained {
                None => block_binding(ast, *body, name),
                Some(_) => None,
            })
        }
        _ => None,
    }
}

fn list_binding(
    ast: &Ast,
    list: &[NodeId],
    name: &str,
    before: Option<NodeId>,
) -> Option<(Chain, NodeId)> {
    for stmt in list {
        if Some(*stmt) == before {
            break;
        }
        if let Some(found) = stmt_binding(ast, *stmt, name) {
            return Some(found);
        }
    }
    None
}

fn block_binding(ast: &Ast, block: NodeId, name: &str) -> Option<(Chain, NodeId)> {
    let Node::BlockStmt { list } = ast.node(block) else {
        return None;
    };
    let (mut chain, ident) = list_binding(ast, list, name, None)?;
    chain.push(block);
    Some((chain, ident))
}

/// `:=` assignments and local declarations.
fn stmt_binding(ast: &Ast, stmt: NodeId, name: &str) -> Option<(Chain, NodeId)> {
    match ast.node(stmt) {
        Node::AssignStmt { lhs, tok, .. } if tok == ":=" => lhs
            .iter()
            .find(|id| ast.ident(**id) == Some(name))
            .map(|id| (vec![stmt], *id)),
        Node::DeclStmt { decl } => {
            let Node::GenDecl { specs, .. } = ast.node(*decl) else {
                return None;
            };
            specs.iter().find_map(|spec| {
                let ident = match ast.node(*spec) {
                    Node::ValueSpec { names, .. } => {
                        names.iter().copied().find(|n| ast.ident(*n) == Some(name))
                    }
                    Node::TypeSpec { name: n, .. } => (ast.ident(*n) == Some(name)).then_some(*n),
                    _ => None,
                }?;
                Some((vec![*spec, *decl, stmt], ident))
            })
        }
        _ => None,
    }
}

fn field_binding(ast: &Ast, list: NodeId, name: &str, above: Chain) -> Option<(Chain, NodeId)> {
    let Node::FieldList { list: fields } = ast.node(list) else {
        return None;
    };
    fields.iter().find_map(|field| match ast.node(*field) {
        Node::Field { names, .. } => names
            .iter()
            .find(|n| ast.ident(**n) == Some(name))
            .map(|n| ([vec![*field], above.clone()].concat(), *n)),
        _ => None,
    })
}

fn signature_binding(ast: &Ast, func_type: NodeId, name: &str) -> Option<(Chain, NodeId)> {
    let Node::FuncType {
        params, results, ..
    } = ast.node(func_type)
    else {
        return None;
    };
    field_binding(ast, *params, name, vec![*params, func_type]).or_else(|| {
        results.and_then(|r| field_binding(ast, r, name, vec![r, func_type]))
    })
}

/// Absent-safe navigation on `Option<PathCursor>`.
///
/// Every step on `None` yields `None`, an empty list, or a default value.
pub trait OptionCursorExt {
    fn child(&self, path: &str) -> Option<PathCursor>;
    fn var(&self, name: &str) -> Option<PathCursor>;
    fn ty(&self) -> Option<PathCursor>;
    fn ret(&self) -> Option<PathCursor>;
    fn body(&self) -> Option<PathCursor>;
    fn index(&self, i: usize) -> Option<PathCursor>;
    fn child_list(&self) -> Vec<String>;
    fn len(&self) -> isize;
    fn name(&self) -> String;
    fn value(&self) -> Option<NodeId>;
    fn kind(&self) -> Option<Kind>;
    fn doc(&self) -> String;
    fn comment(&self) -> String;
    fn src(&self) -> String;
    fn pos(&self) -> Position;
}

impl OptionCursorExt for Option<PathCursor> {
    fn child(&self, path: &str) -> Option<PathCursor> {
        self.as_ref()?.child(path)
    }

    fn var(&self, name: &str) -> Option<PathCursor> {
        self.as_ref()?.var(name)
    }

    fn ty(&self) -> Option<PathCursor> {
        self.as_ref()?.ty()
    }

    fn ret(&self) -> Option<PathCursor> {
        self.as_ref()?.ret()
    }

    fn body(&self) -> Option<PathCursor> {
        self.as_ref()?.body()
    }

    fn index(&self, i: usize) -> Option<PathCursor> {
        self.as_ref()?.index(i)
    }

    fn child_list(&self) -> Vec<String> {
        self.as_ref().map(PathCursor::child_list).unwrap_or_default()
    }

    fn len(&self) -> isize {
        self.as_ref().map_or(-1, PathCursor::len)
    }

    fn name(&self) -> String {
        self.as_ref()
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }

    fn value(&self) -> Option<NodeId> {
        self.as_ref().map(PathCursor::value)
    }

    fn kind(&self) -> Option<Kind> {
        self.as_ref().map(PathCursor::kind)
    }

    fn doc(&self) -> String {
        self.as_ref().map(PathCursor::doc).unwrap_or_default()
    }

    fn comment(&self) -> String {
        self.as_ref().map(PathCursor::comment).unwrap_or_default()
    }

    fn src(&self) -> String {
        self.as_ref().map(PathCursor::src).unwrap_or_default()
    }

    fn pos(&self) -> Position {
        self.as_ref().map(PathCursor::pos).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use gowalk_go::GoParser;
    use std::path::Path;

    fn cursor(src: &str) -> PathCursor {
        let pkg = GoParser::new()
            .parse_sources("example.com/p", Path::new("p"), [("a.go", src)])
            .unwrap();
        let store = Arc::new(PackageStore::new(StoreConfig::new()));
        let pkg = store.insert(pkg);
        Navigator::with_root(store, pkg)
    }

    #[test]
    fn test_absent_stays_absent() {
        let none: Option<PathCursor> = None;
        assert!(none.child("a").is_none());
        assert!(none.ty().is_none());
        assert!(none.var("x").is_none());
        assert!(none.body().is_none());
        assert!(none.child_list().is_empty());
        assert_eq!(none.len(), -1);
        assert_eq!(none.src(), "");
    }

    #[test]
    fn test_empty_path_is_identity() {
        let root = cursor("package p\n");
        assert_eq!(root.child(""), Some(root.clone()));
        assert!(root.is_root());
    }

    #[test]
    fn test_cyclic_embedding_terminates() {
        let root = cursor(
            "package p\n\ntype A struct{ A; B; C }\ntype B struct{ A; B; C }\ntype C struct{ A; B; C }\n",
        );
        assert!(root.child("A.x").is_none());
        assert!(root.child("B.C.A.x").is_none());
        assert_eq!(root.child("A.B").kind(), Some(Kind::Field));
        assert_eq!(root.child("A").child_list(), ["A", "B", "C"]);

        let root = cursor(
            "package p\n\ntype A struct{ A; B }\ntype B struct{ A; B; C }\ntype C struct{ A; x int }\n",
        );
        let x = root.child("A.x").unwrap();
        assert_eq!(x.kind(), Kind::Field);
        assert_eq!(x.name(), "x");
    }

    #[test]
    fn test_plain_assignment_does_not_bind() {
        let root = cursor("package p\n\nvar g int\n\nfunc F() {\n\tg = 1\n\th := 2\n\t_ = h\n}\n");
        let f = root.child("F");
        assert_eq!(f.var("g").kind(), Some(Kind::ValueSpec));
        assert_eq!(f.var("g"), root.child("g"));
        assert_eq!(f.var("h").kind(), Some(Kind::AssignStmt));
    }

    #[test]
    fn test_func_signature_names() {
        let root = cursor("package p\n\nfunc (r *R) Do(a, b int) (err error) { return nil }\n\ntype R struct{}\n");
        let f = root.child("R:Do").unwrap();
        assert_eq!(f.child_list(), ["r", "a", "b", "err"]);
        assert_eq!(f.child("b").unwrap().kind(), Kind::Field);
        assert_eq!(f.ret().len(), 1);
    }

    #[test]
    fn test_var_climbs_to_params() {
        let root = cursor(
            "package p\n\nfunc F(xs []int) {\n\tfor i, x := range xs {\n\t\t_ = i + x\n\t}\n}\n",
        );
        let body = root.child("F").body().unwrap();
        let Node::BlockStmt { list } = body.node() else {
            panic!("expected block");
        };
        assert_eq!(body.ast().kind(list[0]), Kind::RangeStmt);
        assert_eq!(body.var("xs").kind(), Some(Kind::Field));
        assert!(body.var("x").is_none());
    }

    #[test]
    fn test_depth_limit_stops_cycles() {
        let root = cursor("package p\n\ntype A B\n\ntype B A\n");
        assert!(root.child("A").child("x").is_none());
        assert!(root.child("A").child_list().is_empty());
    }
}
