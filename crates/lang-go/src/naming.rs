//! Name rendering for type expressions, imports and methods.

use crate::ast::{Ast, Node, NodeId};

/// Separates a type from its members: `Type.Field`.
pub const DOT: &str = ".";
/// Separates a receiver type from its methods: `Type:Method`.
pub const COLON: &str = ":";

/// Renders the name of a type expression.
///
/// `T` → `T`, `*T` → `T`, `pkg.T` → `pkg.T`, `List[int]` → `List`.
/// Anonymous types (struct, func, map, ...) have no name and render as `""`.
pub fn type_name(ast: &Ast, expr: NodeId) -> String {
    match ast.get(expr) {
        Some(Node::Ident { name }) => name.clone(),
        Some(Node::StarExpr { x }) | Some(Node::ParenExpr { x }) => type_name(ast, *x),
        Some(Node::IndexExpr { x, .. }) => type_name(ast, *x),
        Some(Node::SelectorExpr { x, sel }) => {
            format!("{}{}{}", type_name(ast, *x), DOT, type_name(ast, *sel))
        }
        Some(Node::BasicLit { value, .. }) => value.clone(),
        _ => String::new(),
    }
}

/// Trailing component of a type name: `pkg.T` → `T`, `*T` → `T`.
///
/// This is the name an embedded field is addressed by.
pub fn type_name_suffix(ast: &Ast, expr: NodeId) -> String {
    let name = type_name(ast, expr);
    match name.find(DOT) {
        Some(i) => name[i + DOT.len()..].to_string(),
        None => name,
    }
}

/// Strips the quotes of a Go string literal (`"fmt"` or `` `fmt` ``).
pub fn unquote(lit: &str) -> &str {
    lit.trim_matches(|c| c == '"' || c == '`')
}

/// Name an import is referenced by inside the importing file.
///
/// The explicit alias wins. Otherwise the last path element, with a
/// `.vN`-style extension dropped (`gopkg.in/yaml.v2` → `yaml`) and a bare
/// major-version element skipped (`example.com/mod/v2` → `mod`).
pub fn import_name(ast: &Ast, spec: NodeId) -> Option<String> {
    let Node::ImportSpec { name, .. } = ast.get(spec)? else {
        return None;
    };
    if let Some(alias) = name.and_then(|n| ast.ident(n)) {
        return Some(alias.to_string());
    }
    Some(package_name_of(&import_path(ast, spec)?).to_string())
}

/// Unquoted path of an import spec.
pub fn import_path(ast: &Ast, spec: NodeId) -> Option<String> {
    let Node::ImportSpec { path, .. } = ast.get(spec)? else {
        return None;
    };
    match ast.get(*path)? {
        Node::BasicLit { value, .. } => Some(unquote(value).to_string()),
        _ => None,
    }
}

/// Guesses the package name from an import path.
pub fn package_name_of(path: &str) -> &str {
    let mut parts = path.rsplit('/').filter(|p| !p.is_empty());
    let mut base = parts.next().unwrap_or(path);
    if is_major_version(base) {
        if let Some(parent) = parts.next() {
            base = parent;
        }
    }
    match base.rfind('.') {
        Some(i) if i > 0 => &base[..i],
        _ => base,
    }
}

fn is_major_version(elem: &str) -> bool {
    elem.len() > 1 && elem.starts_with('v') && elem[1..].bytes().all(|b| b.is_ascii_digit())
}

/// Base type name of a method receiver (`func (l *List[T]) Push` → `List`).
///
/// `None` for plain functions and for malformed receivers with several fields.
pub fn receiver_type(ast: &Ast, func: NodeId) -> Option<String> {
    let Node::FuncDecl { recv: Some(recv), .. } = ast.get(func)? else {
        return None;
    };
    let Node::FieldList { list } = ast.get(*recv)? else {
        return None;
    };
    let [field] = list.as_slice() else {
        return None;
    };
    let Node::Field { ty, .. } = ast.get(*field)? else {
        return None;
    };
    let name = type_name(ast, *ty);
    (!name.is_empty()).then_some(name)
}

/// Key a function declaration is addressed by: `Name` or `Recv:Name`.
pub fn func_key(ast: &Ast, func: NodeId) -> Option<String> {
    let Node::FuncDecl { name, .. } = ast.get(func)? else {
        return None;
    };
    let name = ast.ident(*name)?;
    Some(match receiver_type(ast, func) {
        Some(recv) => format!("{}{}{}", recv, COLON, name),
        None => name.to_string(),
    })
}

/// Reports whether every `:`-separated part of a name starts with an
/// upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.split(COLON).all(|part| {
        part.chars()
            .next()
            .is_some_and(|c| c.is_uppercase())
    })
}
