//! Structural pre-order walk with kind pruning and predicate chains.

use crate::mask::KindMask;
use gowalk_go::{Ast, Node, NodeId, NodeRef};

/// A walk predicate. The chain is evaluated in order and stops at the first
/// `false`.
pub type Predicate<'p> = &'p dyn Fn(NodeRef<'_>) -> bool;

/// Direct children of a node in `go/ast` traversal order.
///
/// File comment lists are not children; their groups are reached through the
/// doc and line-comment slots of the nodes that own them.
pub fn children(ast: &Ast, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let Some(node) = ast.get(id) else {
        return out;
    };
    let opt = |o: &Option<NodeId>, out: &mut Vec<NodeId>| out.extend(o.iter().copied());
    match node {
        Node::Comment { .. }
        | Node::Ident { .. }
        | Node::BadExpr
        | Node::BasicLit { .. }
        | Node::BadStmt
        | Node::EmptyStmt
        | Node::BadDecl => {}
        Node::CommentGroup { list } | Node::FieldList { list } | Node::BlockStmt { list } => {
            out.extend(list)
        }
        Node::Field {
            doc,
            names,
            ty,
            tag,
            comment,
        } => {
            opt(doc, &mut out);
            out.extend(names);
            out.push(*ty);
            opt(tag, &mut out);
            opt(comment, &mut out);
        }
        Node::Ellipsis { elt } => opt(elt, &mut out),
        Node::FuncLit { ty, body } => out.extend([*ty, *body]),
        Node::CompositeLit { ty, elts } => {
            opt(ty, &mut out);
            out.extend(elts);
        }
        Node::ParenExpr { x } | Node::StarExpr { x } | Node::UnaryExpr { x, .. } => out.push(*x),
        Node::SelectorExpr { x, sel } => out.extend([*x, *sel]),
        Node::IndexExpr { x, indices } => {
            out.push(*x);
            out.extend(indices);
        }
        Node::SliceExpr { x, low, high, max } => {
            out.push(*x);
            opt(low, &mut out);
            opt(high, &mut out);
            opt(max, &mut out);
        }
        Node::TypeAssertExpr { x, ty } => {
            out.push(*x);
            opt(ty, &mut out);
        }
        Node::CallExpr { fun, args, .. } => {
            out.push(*fun);
            out.extend(args);
        }
        Node::BinaryExpr { x, y, .. } => out.extend([*x, *y]),
        Node::KeyValueExpr { key, value } => out.extend([*key, *value]),
        Node::ArrayType { len, elt } => {
            opt(len, &mut out);
            out.push(*elt);
        }
        Node::StructType { fields } => out.push(*fields),
        Node::FuncType {
            type_params,
            params,
            results,
        } => {
            opt(type_params, &mut out);
            out.push(*params);
            opt(results, &mut out);
        }
        Node::InterfaceType { methods } => out.push(*methods),
        Node::MapType { key, value } => out.extend([*key, *value]),
        Node::ChanType { value, .. } => out.push(*value),
        Node::DeclStmt { decl } => out.push(*decl),
        Node::LabeledStmt { label, stmt } => {
            out.push(*label);
            opt(stmt, &mut out);
        }
        Node::ExprStmt { x } => out.push(*x),
        Node::SendStmt { chan, value } => out.extend([*chan, *value]),
        Node::IncDecStmt { x, .. } => out.push(*x),
        Node::AssignStmt { lhs, rhs, .. } => {
            out.extend(lhs);
            out.extend(rhs);
        }
        Node::GoStmt { call } | Node::DeferStmt { call } => out.push(*call),
        Node::ReturnStmt { results } => out.extend(results),
        Node::BranchStmt { label, .. } => opt(label, &mut out),
        Node::IfStmt {
            init,
            cond,
            body,
            els,
        } => {
            opt(init, &mut out);
            out.extend([*cond, *body]);
            opt(els, &mut out);
        }
        Node::CaseClause { list, body } => {
            out.extend(list);
            out.extend(body);
        }
        Node::SwitchStmt { init, tag, body } => {
            opt(init, &mut out);
            opt(tag, &mut out);
            out.push(*body);
        }
        Node::TypeSwitchStmt { init, assign, body } => {
            opt(init, &mut out);
            out.extend([*assign, *body]);
        }
        Node::CommClause { comm, body } => {
            opt(comm, &mut out);
            out.extend(body);
        }
        Node::SelectStmt { body } => out.push(*body),
        Node::ForStmt {
            init,
            cond,
            post,
            body,
        } => {
            opt(init, &mut out);
            opt(cond, &mut out);
            opt(post, &mut out);
            out.push(*body);
        }
        Node::RangeStmt {
            key, value, x, body, ..
        } => {
            opt(key, &mut out);
            opt(value, &mut out);
            out.extend([*x, *body]);
        }
        Node::ImportSpec {
            doc,
            name,
            path,
            comment,
        } => {
            opt(doc, &mut out);
            opt(name, &mut out);
            out.push(*path);
            opt(comment, &mut out);
        }
        Node::ValueSpec {
            doc,
            names,
            ty,
            values,
            comment,
        } => {
            opt(doc, &mut out);
            out.extend(names);
            opt(ty, &mut out);
            out.extend(values);
            opt(comment, &mut out);
        }
        Node::TypeSpec {
            doc,
            name,
            type_params,
            ty,
            comment,
            ..
        } => {
            opt(doc, &mut out);
            out.push(*name);
            opt(type_params, &mut out);
            out.push(*ty);
            opt(comment, &mut out);
        }
        Node::GenDecl { doc, specs, .. } => {
            opt(doc, &mut out);
            out.extend(specs);
        }
        Node::FuncDecl {
            doc,
            recv,
            name,
            ty,
            body,
        } => {
            opt(doc, &mut out);
            opt(recv, &mut out);
            out.extend([*name, *ty]);
            opt(body, &mut out);
        }
        Node::File {
            doc, name, decls, ..
        } => {
            opt(doc, &mut out);
            out.push(*name);
            out.extend(decls);
        }
        Node::Package { files, .. } => out.extend(files.iter().map(|(_, f)| *f)),
    }
    out
}

/// Collects every node under `root` that survives the mask and the
/// predicate chain, in pre-order.
///
/// `root` is the container being searched: its children are always
/// visited, and it is reported itself only when its kind is in `mask` and
/// every predicate accepts it. Below `root`, a node whose kind is outside
/// `mask`, or that a predicate rejects, is skipped together with its whole
/// subtree.
pub fn walk(ast: &Ast, root: NodeId, mask: KindMask, predicates: &[Predicate<'_>]) -> Vec<NodeId> {
    let mut found = Vec::new();
    if ast.get(root).is_none() {
        return found;
    }
    if accepts(ast, root, mask, predicates) {
        found.push(root);
    }
    let mut stack: Vec<NodeId> = children(ast, root).into_iter().rev().collect();
    while let Some(id) = stack.pop() {
        if !accepts(ast, id, mask, predicates) {
            continue;
        }
        found.push(id);
        stack.extend(children(ast, id).into_iter().rev());
    }
    found
}

fn accepts(ast: &Ast, id: NodeId, mask: KindMask, predicates: &[Predicate<'_>]) -> bool {
    match ast.get(id) {
        Some(node) if mask.contains(node.kind()) => {
            let view = ast.view(id);
            predicates.iter().all(|p| p(view))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use gowalk_go::{GoParser, Kind, Package};
    use std::cell::Cell;
    use std::path::Path;

    const SRC: &str = r#"package p

const A = 1

var v = func() int {
	const inner = 2
	return inner
}()

type T struct{ X int }

func (t T) M() {
	const local = 3
}
"#;

    fn pkg() -> Package {
        GoParser::new()
            .parse_sources("p", Path::new("p"), [("a.go", SRC)])
            .unwrap()
    }

    #[test]
    fn test_mask_prunes_subtrees() {
        let pkg = pkg();
        let ast = pkg.ast();
        let file = pkg.files()[0].1;
        let found = walk(ast, file, KindMask::DECL_ALL, &[]);
        let kinds: Vec<Kind> = found.iter().map(|id| ast.kind(*id)).collect();
        assert_eq!(
            kinds,
            [Kind::GenDecl, Kind::GenDecl, Kind::GenDecl, Kind::FuncDecl]
        );
    }

    #[test]
    fn test_start_reported_when_enabled() {
        let pkg = pkg();
        let ast = pkg.ast();
        let file = pkg.files()[0].1;
        let found = walk(ast, file, KindMask::DECL_ALL | Kind::File, &[]);
        assert_eq!(found.len(), 5);
        assert_eq!(found[0], file);

        let from_package = walk(ast, pkg.root(), KindMask::DECL_ALL, &[]);
        assert!(from_package.is_empty());
    }

    #[test]
    fn test_const_filter_skips_bodies() {
        let pkg = pkg();
        let ast = pkg.ast();
        let file = pkg.files()[0].1;
        let consts = walk(ast, file, KindMask::DECL_ALL, &[&filter::is_const]);
        assert_eq!(consts.len(), 1);
        assert_eq!(ast.kind(consts[0]), Kind::GenDecl);
        assert!(ast.text(consts[0]).unwrap().contains("A = 1"));
    }

    #[test]
    fn test_predicates_short_circuit() {
        let pkg = pkg();
        let ast = pkg.ast();
        let calls = Cell::new(0);
        let counting = |_: NodeRef<'_>| {
            calls.set(calls.get() + 1);
            true
        };
        let found = walk(ast, pkg.root(), KindMask::AST_ALL, &[&|_| false, &counting]);
        assert!(found.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_pre_order_with_funcdecl_children() {
        let pkg = pkg();
        let ast = pkg.ast();
        let file = pkg.files()[0].1;
        let found = walk(ast, file, KindMask::AST_ALL, &[]);
        let method = found
            .iter()
            .position(|id| ast.kind(*id) == Kind::FuncDecl)
            .unwrap();
        let after: Vec<Kind> = found[method + 1..]
            .iter()
            .take(4)
            .map(|id| ast.kind(*id))
            .collect();
        // recv list, its field, receiver name, receiver type
        assert_eq!(
            after,
            [Kind::FieldList, Kind::Field, Kind::Ident, Kind::Ident]
        );
    }

    #[test]
    fn test_children_of_leaf() {
        let pkg = pkg();
        let ast = pkg.ast();
        let ident = ast
            .iter()
            .find(|(_, n)| n.kind() == Kind::Ident)
            .map(|(id, _)| id)
            .unwrap();
        assert!(children(ast, ident).is_empty());
    }
}
