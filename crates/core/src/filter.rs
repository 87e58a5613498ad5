//! Ready-made walk predicates and the categorized child index.

use gowalk_go::ast::DeclKeyword;
use gowalk_go::naming::{self, DOT};
use gowalk_go::{Ast, Node, NodeId, NodeRef};
use indexmap::IndexMap;
use regex::Regex;

fn is_decl(n: NodeRef<'_>, keyword: DeclKeyword) -> bool {
    matches!(n.node(), Node::GenDecl { keyword: k, .. } if *k == keyword)
}

pub fn is_import(n: NodeRef<'_>) -> bool {
    is_decl(n, DeclKeyword::Import)
}

pub fn is_const(n: NodeRef<'_>) -> bool {
    is_decl(n, DeclKeyword::Const)
}

pub fn is_var(n: NodeRef<'_>) -> bool {
    is_decl(n, DeclKeyword::Var)
}

pub fn is_type(n: NodeRef<'_>) -> bool {
    is_decl(n, DeclKeyword::Type)
}

/// Accepts nodes that declare `name`, directly or through their members.
pub fn has_name(name: impl Into<String>) -> impl Fn(NodeRef<'_>) -> bool {
    let name = name.into();
    move |n| declared_names(n.ast, n.id).iter().any(|d| *d == name)
}

/// Like [`has_name`], matching declared names against a regular expression.
pub fn name_matches(pattern: Regex) -> impl Fn(NodeRef<'_>) -> bool {
    move |n| declared_names(n.ast, n.id).iter().any(|d| pattern.is_match(d))
}

/// Accepts nodes whose every declared name is exported.
pub fn is_exported(n: NodeRef<'_>) -> bool {
    let names = declared_names(n.ast, n.id);
    !names.is_empty() && names.iter().all(|d| naming::is_exported(d))
}

/// Last path element of an import with any `.ext` suffix removed.
fn import_base(ast: &Ast, spec: NodeId) -> String {
    let path = naming::import_path(ast, spec).unwrap_or_default();
    let base = path.rsplit('/').next().unwrap_or_default();
    match base.rfind('.') {
        Some(i) => base[..i].to_string(),
        None => base.to_string(),
    }
}

/// Names a node declares: identifiers, field names, spec names, function
/// names, and recursively those of groups, files and packages.
pub fn declared_names(ast: &Ast, id: NodeId) -> Vec<String> {
    let mut out = Vec::new();
    collect_names(ast, id, &mut out);
    out
}

fn collect_names(ast: &Ast, id: NodeId, out: &mut Vec<String>) {
    let Some(node) = ast.get(id) else {
        return;
    };
    match node {
        Node::Ident { name } => out.push(name.clone()),
        Node::Field { names, .. } | Node::ValueSpec { names, .. } => {
            for n in names {
                collect_names(ast, *n, out);
            }
        }
        Node::FieldList { list } => {
            for f in list {
                collect_names(ast, *f, out);
            }
        }
        Node::StructType { fields: list } | Node::InterfaceType { methods: list } => {
            collect_names(ast, *list, out)
        }
        Node::ImportSpec { name: Some(alias), .. } => collect_names(ast, *alias, out),
        Node::ImportSpec { .. } => out.push(import_base(ast, id)),
        Node::TypeSpec { name, .. } | Node::FuncDecl { name, .. } => {
            collect_names(ast, *name, out)
        }
        Node::GenDecl { specs, .. } => {
            for s in specs {
                collect_names(ast, *s, out);
            }
        }
        Node::File { decls, .. } => {
            for d in decls {
                collect_names(ast, *d, out);
            }
        }
        Node::Package { files, .. } => {
            for (_, f) in files {
                collect_names(ast, *f, out);
            }
        }
        _ => {}
    }
}

/// Maps categorized names to the nodes that declare them.
///
/// Keys are `import.X`, `var.X` (consts included), `type.X`, `func.X`,
/// `func.Recv.X` for methods, and bare names for fields.
pub fn child_index(ast: &Ast, nodes: &[NodeId]) -> IndexMap<String, NodeId> {
    let mut index = IndexMap::new();
    for id in nodes {
        index_node(ast, *id, &mut index);
    }
    index
}

fn index_node(ast: &Ast, id: NodeId, index: &mut IndexMap<String, NodeId>) {
    let Some(node) = ast.get(id) else {
        return;
    };
    match node {
        Node::Field { names, .. } => {
            for n in names {
                if let Some(name) = ast.ident(*n) {
                    index.insert(name.to_string(), id);
                }
            }
        }
        Node::FieldList { list } => {
            for f in list {
                index_node(ast, *f, index);
            }
        }
        Node::StructType { fields: list } | Node::InterfaceType { methods: list } => {
            index_node(ast, *list, index)
        }
        Node::ImportSpec { name, .. } => {
            let key = match name.and_then(|n| ast.ident(n)) {
                Some(alias) => alias.to_string(),
                None => import_base(ast, id),
            };
            index.insert(format!("import{DOT}{key}"), id);
        }
        Node::ValueSpec { names, .. } => {
            for n in names {
                if let Some(name) = ast.ident(*n) {
                    index.insert(format!("var{DOT}{name}"), id);
                }
            }
        }
        Node::TypeSpec { name, .. } => {
            if let Some(name) = ast.ident(*name) {
                index.insert(format!("type{DOT}{name}"), id);
            }
        }
        Node::GenDecl { specs, .. } => {
            for s in specs {
                index_node(ast, *s, index);
            }
        }
        Node::FuncDecl { name, .. } => {
            let Some(name) = ast.ident(*name) else {
                return;
            };
            let key = match naming::receiver_type(ast, id) {
                Some(recv) => format!("func{DOT}{recv}{DOT}{name}"),
                None => format!("func{DOT}{name}"),
            };
            index.insert(key, id);
        }
        Node::File { decls, .. } => {
            for d in decls {
                index_node(ast, *d, index);
            }
        }
        Node::Package { files, .. } => {
            for (_, f) in files {
                index_node(ast, *f, index);
            }
        }
        _ => {}
    }
}
