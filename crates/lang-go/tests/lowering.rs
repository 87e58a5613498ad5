mod common;

use common::{decls, nodes_of, parse};
use gowalk_go::ast::{ChanDir, DeclKeyword};
use gowalk_go::naming::{func_key, import_name, type_name};
use gowalk_go::printer::comment_text;
use gowalk_go::{Kind, Node};

const SAMPLE: &str = r#"package sample

import (
	"fmt"
	str "strings"
)

// Limit bounds the walk.
const Limit = 10

var (
	a, b int
	c    = "c" // trailing
)

type Base struct{ ID int }

// Item is a list element.
type Item struct {
	Base
	*fmt.Stringer
	Name  string `json:"name"`
	X, Y  float64
	next  *Item
}

func (i *Item) Next() *Item { return i.next }

func Join(parts ...string) (out string, err error) {
	out = str.Join(parts, ",")
	return
}
"#;

#[test]
fn test_top_level_decls() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let kinds: Vec<Kind> = decls(&pkg).iter().map(|d| ast.kind(*d)).collect();
    assert_eq!(
        kinds,
        [
            Kind::GenDecl,
            Kind::GenDecl,
            Kind::GenDecl,
            Kind::GenDecl,
            Kind::GenDecl,
            Kind::FuncDecl,
            Kind::FuncDecl
        ]
    );
    let keywords: Vec<DeclKeyword> = decls(&pkg)
        .iter()
        .filter_map(|d| match ast.node(*d) {
            Node::GenDecl { keyword, .. } => Some(*keyword),
            _ => None,
        })
        .collect();
    assert_eq!(
        keywords,
        [
            DeclKeyword::Import,
            DeclKeyword::Const,
            DeclKeyword::Var,
            DeclKeyword::Type,
            DeclKeyword::Type
        ]
    );
}

#[test]
fn test_import_names() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let names: Vec<String> = nodes_of(&pkg, Kind::ImportSpec)
        .into_iter()
        .filter_map(|s| import_name(ast, s))
        .collect();
    assert_eq!(names, ["fmt", "str"]);
}

#[test]
fn test_grouped_var_specs() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let var_decl = decls(&pkg)[2];
    let Node::GenDecl { specs, .. } = ast.node(var_decl) else {
        panic!("expected GenDecl");
    };
    assert_eq!(specs.len(), 2);
    let Node::ValueSpec { names, ty, .. } = ast.node(specs[0]) else {
        panic!("expected ValueSpec");
    };
    assert_eq!(names.len(), 2);
    assert_eq!(type_name(ast, ty.unwrap()), "int");

    let Node::ValueSpec { comment, values, .. } = ast.node(specs[1]) else {
        panic!("expected ValueSpec");
    };
    assert_eq!(values.len(), 1);
    assert_eq!(comment_text(ast, comment.unwrap()), "trailing\n");
}

#[test]
fn test_doc_comments_attach() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let d = decls(&pkg);
    let const_doc = ast.node(d[1]).doc().unwrap();
    assert_eq!(comment_text(ast, const_doc), "Limit bounds the walk.\n");
    let item_doc = ast.node(d[4]).doc().unwrap();
    assert_eq!(comment_text(ast, item_doc), "Item is a list element.\n");
    assert!(ast.node(d[3]).doc().is_none());
}

#[test]
fn test_struct_fields() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let structs = nodes_of(&pkg, Kind::StructType);
    let Node::StructType { fields } = ast.node(structs[1]) else {
        panic!("expected StructType");
    };
    let Node::FieldList { list } = ast.node(*fields) else {
        panic!("expected FieldList");
    };
    assert_eq!(list.len(), 5);

    let Node::Field { names, ty, .. } = ast.node(list[0]) else {
        panic!()
    };
    assert!(names.is_empty());
    assert_eq!(type_name(ast, *ty), "Base");

    let Node::Field { names, ty, .. } = ast.node(list[1]) else {
        panic!()
    };
    assert!(names.is_empty());
    assert_eq!(ast.kind(*ty), Kind::StarExpr);
    assert_eq!(type_name(ast, *ty), "fmt.Stringer");

    let Node::Field { tag, .. } = ast.node(list[2]) else {
        panic!()
    };
    assert_eq!(ast.text(tag.unwrap()), Some("`json:\"name\"`"));

    let Node::Field { names, .. } = ast.node(list[3]) else {
        panic!()
    };
    assert_eq!(names.len(), 2);
}

#[test]
fn test_method_and_function_keys() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let keys: Vec<String> = nodes_of(&pkg, Kind::FuncDecl)
        .into_iter()
        .filter_map(|f| func_key(ast, f))
        .collect();
    assert_eq!(keys, ["Item:Next", "Join"]);
}

#[test]
fn test_variadic_and_named_results() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let join = decls(&pkg)[6];
    let Node::FuncDecl { ty, .. } = ast.node(join) else {
        panic!()
    };
    let Node::FuncType {
        params, results, ..
    } = ast.node(*ty)
    else {
        panic!()
    };
    let Node::FieldList { list } = ast.node(*params) else {
        panic!()
    };
    let Node::Field { ty: param_ty, .. } = ast.node(list[0]) else {
        panic!()
    };
    assert_eq!(ast.kind(*param_ty), Kind::Ellipsis);
    let Node::FieldList { list } = ast.node(results.unwrap()) else {
        panic!()
    };
    assert_eq!(list.len(), 2);
}

#[test]
fn test_statements_lower() {
    let pkg = parse(
        r#"package p

func f(ch chan<- int, xs []int) {
	n := 0
	for i, x := range xs {
		n += i * x
	}
	switch v := any(n).(type) {
	case int:
		_ = v
	default:
	}
	select {
	case ch <- n:
	default:
	}
	if err := g(); err != nil {
		return
	}
	for j := 0; j < 3; j++ {
		defer g()
	}
}

func g() error { return nil }
"#,
    );
    let ast = pkg.ast();
    for kind in [
        Kind::RangeStmt,
        Kind::TypeSwitchStmt,
        Kind::SelectStmt,
        Kind::CommClause,
        Kind::IfStmt,
        Kind::ForStmt,
        Kind::IncDecStmt,
        Kind::DeferStmt,
        Kind::SendStmt,
    ] {
        assert!(!nodes_of(&pkg, kind).is_empty(), "missing {kind}");
    }

    let range = nodes_of(&pkg, Kind::RangeStmt)[0];
    let Node::RangeStmt {
        key, value, define, ..
    } = ast.node(range)
    else {
        panic!()
    };
    assert!(*define);
    assert_eq!(ast.ident(key.unwrap()), Some("i"));
    assert_eq!(ast.ident(value.unwrap()), Some("x"));

    let chan = nodes_of(&pkg, Kind::ChanType)[0];
    let Node::ChanType { dir, .. } = ast.node(chan) else {
        panic!()
    };
    assert_eq!(*dir, ChanDir::Send);

    let defines = nodes_of(&pkg, Kind::AssignStmt)
        .into_iter()
        .filter(|a| matches!(ast.node(*a), Node::AssignStmt { tok, .. } if tok == ":="))
        .count();
    // n, v (type switch alias), err, j
    assert_eq!(defines, 4);
}

#[test]
fn test_positions_are_one_based() {
    let pkg = parse(SAMPLE);
    let ast = pkg.ast();
    let join = decls(&pkg)[6];
    let pos = ast.position(join).unwrap();
    assert_eq!(pos.line, 29);
    assert_eq!(pos.column, 1);
    assert!(pos.filename.ends_with("a.go"));
}
