//! Lowering of tree-sitter-go concrete syntax into the `go/ast`-shaped arena.
//!
//! Unknown or erroneous tree-sitter nodes become `BadExpr`, `BadStmt` or
//! `BadDecl`, so every produced tree is well formed.

use crate::ast::{Ast, BranchKind, ChanDir, DeclKeyword, LitKind, Node, NodeId};
use crate::source::{FileId, Span};
use std::collections::HashMap;
use tree_sitter::Node as TsNode;

const COMMENT: &str = "comment";

pub(crate) struct Converter<'a> {
    ast: &'a mut Ast,
    file: FileId,
    src: &'a str,
    comments: HashMap<usize, NodeId>,
}

fn named<'t>(n: TsNode<'t>) -> Vec<TsNode<'t>> {
    let mut cursor = n.walk();
    n.named_children(&mut cursor)
        .filter(|c| c.kind() != COMMENT)
        .collect()
}

fn by_field<'t>(n: TsNode<'t>, field: &str) -> Vec<TsNode<'t>> {
    let mut cursor = n.walk();
    n.children_by_field_name(field, &mut cursor).collect()
}

fn token<'t>(n: TsNode<'t>, kind: &str) -> Option<TsNode<'t>> {
    let mut cursor = n.walk();
    let found = n.children(&mut cursor).find(|c| !c.is_named() && c.kind() == kind);
    found
}

fn span_of(n: TsNode<'_>) -> Span {
    Span::new(n.start_byte(), n.end_byte())
}

fn is_terminator(n: TsNode<'_>) -> bool {
    !n.is_named() && matches!(n.kind(), "\n" | ";")
}

impl<'a> Converter<'a> {
    pub(crate) fn new(ast: &'a mut Ast, file: FileId, src: &'a str) -> Self {
        Self {
            ast,
            file,
            src,
            comments: HashMap::new(),
        }
    }

    fn text(&self, n: TsNode<'_>) -> &'a str {
        n.utf8_text(self.src.as_bytes()).unwrap_or_default()
    }

    fn alloc(&mut self, node: Node, n: TsNode<'_>) -> NodeId {
        self.alloc_span(node, span_of(n))
    }

    fn alloc_span(&mut self, node: Node, span: Span) -> NodeId {
        self.ast.alloc(node, span, Some(self.file))
    }

    fn ident(&mut self, n: TsNode<'_>) -> NodeId {
        let name = self.text(n).to_string();
        self.alloc(Node::Ident { name }, n)
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    fn comment(&mut self, n: TsNode<'_>) -> NodeId {
        if let Some(id) = self.comments.get(&n.start_byte()) {
            return *id;
        }
        let text = self.text(n).to_string();
        let id = self.alloc(Node::Comment { text }, n);
        self.comments.insert(n.start_byte(), id);
        id
    }

    fn comment_group(&mut self, list: &[TsNode<'_>]) -> Option<NodeId> {
        let (first, last) = (list.first()?, list.last()?);
        let span = span_of(*first).cover(span_of(*last));
        let list = list.iter().map(|c| self.comment(*c)).collect();
        Some(self.alloc_span(Node::CommentGroup { list }, span))
    }

    /// Comments on the lines directly above `n`, not separated by a blank line
    /// and not trailing other code.
    fn doc(&mut self, n: TsNode<'_>) -> Option<NodeId> {
        let mut group = Vec::new();
        let mut expected_row = n.start_position().row;
        let mut cur = n.prev_sibling();
        while let Some(p) = cur {
            if is_terminator(p) {
                cur = p.prev_sibling();
                continue;
            }
            if p.kind() != COMMENT || p.end_position().row + 1 != expected_row {
                break;
            }
            let trails_code = p.prev_sibling().is_some_and(|q| {
                !is_terminator(q) && q.kind() != COMMENT && q.end_position().row == p.start_position().row
            });
            if trails_code {
                break;
            }
            expected_row = p.start_position().row;
            group.push(p);
            cur = p.prev_sibling();
        }
        group.reverse();
        self.comment_group(&group)
    }

    /// Comment starting on the line where `n` ends.
    fn line_comment(&mut self, n: TsNode<'_>) -> Option<NodeId> {
        let row = n.end_position().row;
        let next = n
            .next_sibling()
            .or_else(|| n.parent().and_then(|p| p.next_sibling()))?;
        if next.kind() == COMMENT && next.start_position().row == row {
            self.comment_group(&[next])
        } else {
            None
        }
    }

    fn all_comments(&mut self, root: TsNode<'_>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = root.walk();
        let mut descend = true;
        loop {
            if descend && cursor.goto_first_child() {
                descend = true;
            } else if cursor.goto_next_sibling() {
                descend = true;
            } else if cursor.goto_parent() {
                descend = false;
                continue;
            } else {
                break;
            }
            let node = cursor.node();
            if node.kind() == COMMENT {
                out.push(self.comment(node));
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Files and declarations
    // ------------------------------------------------------------------

    pub(crate) fn file(&mut self, root: TsNode<'_>) -> NodeId {
        let mut doc = None;
        let mut name = None;
        let mut decls = Vec::new();
        for child in named(root) {
            match child.kind() {
                "package_clause" => {
                    doc = self.doc(child);
                    name = named(child).first().map(|id| self.ident(*id));
                }
                "import_declaration" => decls.push(self.gen_decl(child, DeclKeyword::Import)),
                "const_declaration" => decls.push(self.gen_decl(child, DeclKeyword::Const)),
                "var_declaration" => decls.push(self.gen_decl(child, DeclKeyword::Var)),
                "type_declaration" => decls.push(self.gen_decl(child, DeclKeyword::Type)),
                "function_declaration" | "method_declaration" => {
                    decls.push(self.func_decl(child))
                }
                _ => decls.push(self.alloc(Node::BadDecl, child)),
            }
        }
        let name = name.unwrap_or_else(|| {
            self.alloc_span(Node::Ident { name: String::new() }, Span::default())
        });
        let comments = self.all_comments(root);
        self.alloc_span(
            Node::File {
                doc,
                name,
                decls,
                comments,
            },
            Span::new(0, self.src.len()),
        )
    }

    fn gen_decl(&mut self, n: TsNode<'_>, keyword: DeclKeyword) -> NodeId {
        let doc = self.doc(n);
        let mut specs = Vec::new();
        self.collect_specs(n, &mut specs);
        self.alloc(Node::GenDecl { doc, keyword, specs }, n)
    }

    fn collect_specs(&mut self, n: TsNode<'_>, specs: &mut Vec<NodeId>) {
        for child in named(n) {
            match child.kind() {
                "import_spec" => specs.push(self.import_spec(child)),
                "const_spec" | "var_spec" => specs.push(self.value_spec(child)),
                "type_spec" => specs.push(self.type_spec(child, false)),
                "type_alias" => specs.push(self.type_spec(child, true)),
                "import_spec_list" | "var_spec_list" | "const_spec_list" | "type_spec_list" => {
                    self.collect_specs(child, specs)
                }
                _ => {}
            }
        }
    }

    fn import_spec(&mut self, n: TsNode<'_>) -> NodeId {
        let doc = self.doc(n);
        let name = n.child_by_field_name("name").map(|c| self.ident(c));
        let path = match n.child_by_field_name("path") {
            Some(p) => self.string_lit(p),
            None => self.alloc(Node::BadExpr, n),
        };
        let comment = self.line_comment(n);
        self.alloc(
            Node::ImportSpec {
                doc,
                name,
                path,
                comment,
            },
            n,
        )
    }

    fn value_spec(&mut self, n: TsNode<'_>) -> NodeId {
        let doc = self.doc(n);
        let names = by_field(n, "name")
            .into_iter()
            .map(|c| self.ident(c))
            .collect();
        let ty = n.child_by_field_name("type").map(|t| self.type_expr(t));
        let values = self.expr_list(n.child_by_field_name("value"));
        let comment = self.line_comment(n);
        self.alloc(
            Node::ValueSpec {
                doc,
                names,
                ty,
                values,
                comment,
            },
            n,
        )
    }

    fn type_spec(&mut self, n: TsNode<'_>, assign: bool) -> NodeId {
        let doc = self.doc(n);
        let name = match n.child_by_field_name("name") {
            Some(c) => self.ident(c),
            None => self.alloc(Node::BadExpr, n),
        };
        let type_params = n
            .child_by_field_name("type_parameters")
            .map(|p| self.field_list(p));
        let ty = match n.child_by_field_name("type") {
            Some(t) => self.type_expr(t),
            None => self.alloc(Node::BadExpr, n),
        };
        let comment = self.line_comment(n);
        self.alloc(
            Node::TypeSpec {
                doc,
                name,
                type_params,
                assign,
                ty,
                comment,
            },
            n,
        )
    }

    fn func_decl(&mut self, n: TsNode<'_>) -> NodeId {
        let doc = self.doc(n);
        let recv = n.child_by_field_name("receiver").map(|r| self.field_list(r));
        let name = match n.child_by_field_name("name") {
            Some(c) => self.ident(c),
            None => self.alloc(Node::BadExpr, n),
        };
        let ty = self.signature(n, n.start_byte());
        let body = n.child_by_field_name("body").map(|b| self.block(b));
        self.alloc(
            Node::FuncDecl {
                doc,
                recv,
                name,
                ty,
                body,
            },
            n,
        )
    }

    /// Builds the `FuncType` of a function declaration, literal or type.
    fn signature(&mut self, n: TsNode<'_>, start: usize) -> NodeId {
        let type_params = n
            .child_by_field_name("type_parameters")
            .map(|p| self.field_list(p));
        let params_node = n.child_by_field_name("parameters");
        let params = match params_node {
            Some(p) => self.field_list(p),
            None => self.alloc_span(Node::FieldList { list: Vec::new() }, span_of(n)),
        };
        let result_node = n.child_by_field_name("result");
        let results = result_node.map(|r| self.results(r));
        let end = result_node
            .or(params_node)
            .map(|r| r.end_byte())
            .unwrap_or_else(|| n.end_byte());
        self.alloc_span(
            Node::FuncType {
                type_params,
                params,
                results,
            },
            Span::new(start, end),
        )
    }

    fn results(&mut self, n: TsNode<'_>) -> NodeId {
        if n.kind() == "parameter_list" {
            return self.field_list(n);
        }
        let ty = self.type_expr(n);
        let field = self.alloc(
            Node::Field {
                doc: None,
                names: Vec::new(),
                ty,
                tag: None,
                comment: None,
            },
            n,
        );
        self.alloc(Node::FieldList { list: vec![field] }, n)
    }

    /// Parameter lists, type parameter lists and receivers.
    fn field_list(&mut self, n: TsNode<'_>) -> NodeId {
        let mut list = Vec::new();
        for child in named(n) {
            let names: Vec<NodeId> = by_field(child, "name")
                .into_iter()
                .map(|c| self.ident(c))
                .collect();
            let ty = match child.kind() {
                "variadic_parameter_declaration" => {
                    let elt = child.child_by_field_name("type").map(|t| self.type_expr(t));
                    let start = token(child, "...").map_or(child.start_byte(), |t| t.start_byte());
                    self.alloc_span(Node::Ellipsis { elt }, Span::new(start, child.end_byte()))
                }
                "parameter_declaration" | "type_parameter_declaration" => {
                    match child.child_by_field_name("type") {
                        Some(t) => self.type_expr(t),
                        None => self.alloc(Node::BadExpr, child),
                    }
                }
                _ => self.alloc(Node::BadExpr, child),
            };
            list.push(self.alloc(
                Node::Field {
                    doc: None,
                    names,
                    ty,
                    tag: None,
                    comment: None,
                },
                child,
            ));
        }
        self.alloc(Node::FieldList { list }, n)
    }

    fn struct_fields(&mut self, n: TsNode<'_>) -> NodeId {
        let mut list = Vec::new();
        for child in named(n) {
            if child.kind() != "field_declaration" {
                continue;
            }
            let doc = self.doc(child);
            let names: Vec<NodeId> = by_field(child, "name")
                .into_iter()
                .map(|c| self.ident(c))
                .collect();
            let ty = match child.child_by_field_name("type") {
                Some(t) if names.is_empty() => {
                    let inner = self.type_expr(t);
                    match token(child, "*") {
                        Some(star) => self.alloc_span(
                            Node::StarExpr { x: inner },
                            Span::new(star.start_byte(), t.end_byte()),
                        ),
                        None => inner,
                    }
                }
                Some(t) => self.type_expr(t),
                None => self.alloc(Node::BadExpr, child),
            };
            let tag = child.child_by_field_name("tag").map(|t| self.string_lit(t));
            let comment = self.line_comment(child);
            list.push(self.alloc(
                Node::Field {
                    doc,
                    names,
                    ty,
                    tag,
                    comment,
                },
                child,
            ));
        }
        self.alloc(Node::FieldList { list }, n)
    }

    fn interface_elems(&mut self, n: TsNode<'_>, list: &mut Vec<NodeId>) {
        for child in named(n) {
            match child.kind() {
                "method_elem" | "method_spec" => {
                    let doc = self.doc(child);
                    let names = child
                        .child_by_field_name("name")
                        .map(|c| self.ident(c))
                        .into_iter()
                        .collect();
                    let start = child
                        .child_by_field_name("parameters")
                        .map_or(child.start_byte(), |p| p.start_byte());
                    let ty = self.signature(child, start);
                    let comment = self.line_comment(child);
                    list.push(self.alloc(
                        Node::Field {
                            doc,
                            names,
                            ty,
                            tag: None,
                            comment,
                        },
                        child,
                    ));
                }
                "method_spec_list" => self.interface_elems(child, list),
                _ => {
                    let ty = self.type_expr(child);
                    list.push(self.alloc(
                        Node::Field {
                            doc: None,
                            names: Vec::new(),
                            ty,
                            tag: None,
                            comment: None,
                        },
                        child,
                    ));
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn type_expr(&mut self, n: TsNode<'_>) -> NodeId {
        match n.kind() {
            "type_identifier" | "identifier" | "package_identifier" | "field_identifier" => {
                self.ident(n)
            }
            "qualified_type" => {
                let x = match n.child_by_field_name("package") {
                    Some(p) => self.ident(p),
                    None => self.alloc(Node::BadExpr, n),
                };
                let sel = match n.child_by_field_name("name") {
                    Some(s) => self.ident(s),
                    None => self.alloc(Node::BadExpr, n),
                };
                self.alloc(Node::SelectorExpr { x, sel }, n)
            }
            "generic_type" => {
                let x = match n.child_by_field_name("type") {
                    Some(t) => self.type_expr(t),
                    None => self.alloc(Node::BadExpr, n),
                };
                let indices = n
                    .child_by_field_name("type_arguments")
                    .map(|args| named(args).into_iter().map(|a| self.type_expr(a)).collect())
                    .unwrap_or_default();
                self.alloc(Node::IndexExpr { x, indices }, n)
            }
            "pointer_type" => {
                let x = self.first_type(n);
                self.alloc(Node::StarExpr { x }, n)
            }
            "parenthesized_type" => {
                let x = self.first_type(n);
                self.alloc(Node::ParenExpr { x }, n)
            }
            "struct_type" => {
                let fields = match named(n).into_iter().find(|c| c.kind() == "field_declaration_list") {
                    Some(list) => self.struct_fields(list),
                    None => self.alloc(Node::FieldList { list: Vec::new() }, n),
                };
                self.alloc(Node::StructType { fields }, n)
            }
            "interface_type" => {
                let mut list = Vec::new();
                self.interface_elems(n, &mut list);
                let methods = self.alloc(Node::FieldList { list }, n);
                self.alloc(Node::InterfaceType { methods }, n)
            }
            "array_type" => {
                let len = n.child_by_field_name("length").map(|l| self.expr(l));
                let elt = self.field_type(n, "element");
                self.alloc(Node::ArrayType { len, elt }, n)
            }
            "implicit_length_array_type" => {
                let len = token(n, "...")
                    .map(|t| self.alloc(Node::Ellipsis { elt: None }, t));
                let elt = self.field_type(n, "element");
                self.alloc(Node::ArrayType { len, elt }, n)
            }
            "slice_type" => {
                let elt = self.field_type(n, "element");
                self.alloc(Node::ArrayType { len: None, elt }, n)
            }
            "map_type" => {
                let key = self.field_type(n, "key");
                let value = self.field_type(n, "value");
                self.alloc(Node::MapType { key, value }, n)
            }
            "channel_type" => {
                let dir = self.chan_dir(n);
                let value = self.field_type(n, "value");
                self.alloc(Node::ChanType { dir, value }, n)
            }
            "function_type" => self.signature(n, n.start_byte()),
            "type_elem" | "type_constraint" | "constraint_elem" => {
                let parts = named(n);
                match parts.as_slice() {
                    [single] => self.type_expr(*single),
                    _ => self.union(n, &parts),
                }
            }
            "negated_type" => {
                let x = self.first_type(n);
                self.alloc(
                    Node::UnaryExpr {
                        op: "~".to_string(),
                        x,
                    },
                    n,
                )
            }
            _ => self.expr(n),
        }
    }

    fn first_type(&mut self, n: TsNode<'_>) -> NodeId {
        match named(n).first() {
            Some(c) => self.type_expr(*c),
            None => self.alloc(Node::BadExpr, n),
        }
    }

    fn field_type(&mut self, n: TsNode<'_>, field: &str) -> NodeId {
        match n.child_by_field_name(field) {
            Some(t) => self.type_expr(t),
            None => self.alloc(Node::BadExpr, n),
        }
    }

    /// `A | B | C` as a left-associative chain of binary expressions.
    fn union(&mut self, n: TsNode<'_>, parts: &[TsNode<'_>]) -> NodeId {
        let Some((first, rest)) = parts.split_first() else {
            return self.alloc(Node::BadExpr, n);
        };
        let mut acc = self.type_expr(*first);
        let mut span = span_of(*first);
        for part in rest {
            let y = self.type_expr(*part);
            span = span.cover(span_of(*part));
            acc = self.alloc_span(
                Node::BinaryExpr {
                    x: acc,
                    op: "|".to_string(),
                    y,
                },
                span,
            );
        }
        acc
    }

    fn chan_dir(&self, n: TsNode<'_>) -> ChanDir {
        let mut cursor = n.walk();
        let tokens: Vec<&str> = n
            .children(&mut cursor)
            .filter(|c| !c.is_named())
            .map(|c| c.kind())
            .collect();
        match tokens.as_slice() {
            ["<-", "chan", ..] => ChanDir::Recv,
            ["chan", "<-", ..] => ChanDir::Send,
            _ => ChanDir::Both,
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn string_lit(&mut self, n: TsNode<'_>) -> NodeId {
        let value = self.text(n).to_string();
        self.alloc(
            Node::BasicLit {
                kind: LitKind::String,
                value,
            },
            n,
        )
    }

    fn basic_lit(&mut self, n: TsNode<'_>, kind: LitKind) -> NodeId {
        let value = self.text(n).to_string();
        self.alloc(Node::BasicLit { kind, value }, n)
    }

    fn expr_list(&mut self, n: Option<TsNode<'_>>) -> Vec<NodeId> {
        match n {
            None => Vec::new(),
            Some(list) if list.kind() == "expression_list" => {
                named(list).into_iter().map(|e| self.expr(e)).collect()
            }
            Some(single) => vec![self.expr(single)],
        }
    }

    fn field_expr(&mut self, n: TsNode<'_>, field: &str) -> NodeId {
        match n.child_by_field_name(field) {
            Some(e) => self.expr(e),
            None => self.alloc(Node::BadExpr, n),
        }
    }

    fn first_expr(&mut self, n: TsNode<'_>) -> NodeId {
        match named(n).first() {
            Some(e) => self.expr(*e),
            None => self.alloc(Node::BadExpr, n),
        }
    }

    fn expr(&mut self, n: TsNode<'_>) -> NodeId {
        match n.kind() {
            "identifier" | "field_identifier" | "package_identifier" | "type_identifier"
            | "label_name" | "blank_identifier" | "nil" | "true" | "false" | "iota" => {
                self.ident(n)
            }
            "int_literal" => self.basic_lit(n, LitKind::Int),
            "float_literal" => self.basic_lit(n, LitKind::Float),
            "imaginary_literal" => self.basic_lit(n, LitKind::Imag),
            "rune_literal" => self.basic_lit(n, LitKind::Char),
            "interpreted_string_literal" | "raw_string_literal" => self.string_lit(n),
            "parenthesized_expression" => {
                let x = self.first_expr(n);
                self.alloc(Node::ParenExpr { x }, n)
            }
            "selector_expression" => {
                let x = self.field_expr(n, "operand");
                let sel = match n.child_by_field_name("field") {
                    Some(f) => self.ident(f),
                    None => self.alloc(Node::BadExpr, n),
                };
                self.alloc(Node::SelectorExpr { x, sel }, n)
            }
            "index_expression" => {
                let x = self.field_expr(n, "operand");
                let indices = by_field(n, "index")
                    .into_iter()
                    .map(|i| self.expr(i))
                    .collect();
                self.alloc(Node::IndexExpr { x, indices }, n)
            }
            "slice_expression" => {
                let x = self.field_expr(n, "operand");
                let low = n.child_by_field_name("start").map(|e| self.expr(e));
                let high = n.child_by_field_name("end").map(|e| self.expr(e));
                let max = n.child_by_field_name("capacity").map(|e| self.expr(e));
                self.alloc(Node::SliceExpr { x, low, high, max }, n)
            }
            "type_assertion_expression" => {
                let x = self.field_expr(n, "operand");
                let ty = n.child_by_field_name("type").map(|t| self.type_expr(t));
                self.alloc(Node::TypeAssertExpr { x, ty }, n)
            }
            "call_expression" => self.call(n),
            "type_conversion_expression" => {
                let fun = self.field_type(n, "type");
                let args = vec![self.field_expr(n, "operand")];
                self.alloc(
                    Node::CallExpr {
                        fun,
                        args,
                        ellipsis: false,
                    },
                    n,
                )
            }
            "type_instantiation_expression" => {
                let x = self.field_type(n, "type");
                let indices = named(n)
                    .into_iter()
                    .skip(1)
                    .map(|t| self.type_expr(t))
                    .collect();
                self.alloc(Node::IndexExpr { x, indices }, n)
            }
            "unary_expression" => {
                let op = n
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default();
                let x = self.field_expr(n, "operand");
                self.alloc(Node::UnaryExpr { op, x }, n)
            }
            "binary_expression" => {
                let x = self.field_expr(n, "left");
                let op = n
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default();
                let y = self.field_expr(n, "right");
                self.alloc(Node::BinaryExpr { x, op, y }, n)
            }
            "composite_literal" => {
                let ty = n.child_by_field_name("type").map(|t| self.type_expr(t));
                let elts = n
                    .child_by_field_name("body")
                    .map(|b| self.literal_elems(b))
                    .unwrap_or_default();
                self.alloc(Node::CompositeLit { ty, elts }, n)
            }
            "literal_value" => {
                let elts = self.literal_elems(n);
                self.alloc(Node::CompositeLit { ty: None, elts }, n)
            }
            "literal_element" => self.first_expr(n),
            "keyed_element" => {
                let parts = named(n);
                let key = n.child_by_field_name("key").or_else(|| parts.first().copied());
                let value = n.child_by_field_name("value").or_else(|| parts.get(1).copied());
                let key = match key {
                    Some(k) => self.expr(k),
                    None => self.alloc(Node::BadExpr, n),
                };
                let value = match value {
                    Some(v) => self.expr(v),
                    None => self.alloc(Node::BadExpr, n),
                };
                self.alloc(Node::KeyValueExpr { key, value }, n)
            }
            "func_literal" => {
                let ty = self.signature(n, n.start_byte());
                let body = match n.child_by_field_name("body") {
                    Some(b) => self.block(b),
                    None => self.alloc(Node::BlockStmt { list: Vec::new() }, n),
                };
                self.alloc(Node::FuncLit { ty, body }, n)
            }
            "variadic_argument" => self.first_expr(n),
            "expression_list" => self.first_expr(n),
            "qualified_type" | "generic_type" | "pointer_type" | "parenthesized_type"
            | "struct_type" | "interface_type" | "array_type" | "implicit_length_array_type"
            | "slice_type" | "map_type" | "channel_type" | "function_type" | "negated_type" => {
                self.type_expr(n)
            }
            _ => self.alloc(Node::BadExpr, n),
        }
    }

    fn call(&mut self, n: TsNode<'_>) -> NodeId {
        let mut fun = self.field_expr(n, "function");
        if let Some(targs) = n.child_by_field_name("type_arguments") {
            let indices = named(targs).into_iter().map(|t| self.type_expr(t)).collect();
            let span = Span::new(n.start_byte(), targs.end_byte());
            fun = self.alloc_span(Node::IndexExpr { x: fun, indices }, span);
        }
        let mut args = Vec::new();
        let mut ellipsis = false;
        if let Some(list) = n.child_by_field_name("arguments") {
            for arg in named(list) {
                if arg.kind() == "variadic_argument" {
                    ellipsis = true;
                }
                args.push(self.expr(arg));
            }
        }
        self.alloc(
            Node::CallExpr {
                fun,
                args,
                ellipsis,
            },
            n,
        )
    }

    fn literal_elems(&mut self, n: TsNode<'_>) -> Vec<NodeId> {
        named(n).into_iter().map(|e| self.expr(e)).collect()
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn block(&mut self, n: TsNode<'_>) -> NodeId {
        let list = self.stmt_list(n);
        self.alloc(Node::BlockStmt { list }, n)
    }

    /// Statements directly inside `n`, flattening a `statement_list` wrapper
    /// and skipping children bound to a grammar field (case values, headers).
    fn stmt_list(&mut self, n: TsNode<'_>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = n.walk();
        if !cursor.goto_first_child() {
            return out;
        }
        let mut pending = Vec::new();
        loop {
            let child = cursor.node();
            if child.is_named() && child.kind() != COMMENT && cursor.field_name().is_none() {
                pending.push(child);
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        for child in pending {
            if child.kind() == "statement_list" {
                for inner in named(child) {
                    out.push(self.stmt(inner));
                }
            } else {
                out.push(self.stmt(child));
            }
        }
        out
    }

    fn opt_stmt(&mut self, n: Option<TsNode<'_>>) -> Option<NodeId> {
        n.map(|s| self.stmt(s))
    }

    fn stmt(&mut self, n: TsNode<'_>) -> NodeId {
        match n.kind() {
            "expression_statement" => {
                let x = self.first_expr(n);
                self.alloc(Node::ExprStmt { x }, n)
            }
            "send_statement" => {
                let chan = self.field_expr(n, "channel");
                let value = self.field_expr(n, "value");
                self.alloc(Node::SendStmt { chan, value }, n)
            }
            "inc_statement" | "dec_statement" => {
                let x = self.first_expr(n);
                let inc = n.kind() == "inc_statement";
                self.alloc(Node::IncDecStmt { x, inc }, n)
            }
            "assignment_statement" => {
                let lhs = self.expr_list(n.child_by_field_name("left"));
                let tok = n
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_else(|| "=".to_string());
                let rhs = self.expr_list(n.child_by_field_name("right"));
                self.alloc(Node::AssignStmt { lhs, tok, rhs }, n)
            }
            "short_var_declaration" => {
                let lhs = self.expr_list(n.child_by_field_name("left"));
                let rhs = self.expr_list(n.child_by_field_name("right"));
                self.alloc(
                    Node::AssignStmt {
                        lhs,
                        tok: ":=".to_string(),
                        rhs,
                    },
                    n,
                )
            }
            "receive_statement" => {
                let rhs = vec![self.field_expr(n, "right")];
                match n.child_by_field_name("left") {
                    Some(left) => {
                        let lhs = self.expr_list(Some(left));
                        let tok = if token(n, ":=").is_some() { ":=" } else { "=" };
                        self.alloc(
                            Node::AssignStmt {
                                lhs,
                                tok: tok.to_string(),
                                rhs,
                            },
                            n,
                        )
                    }
                    None => self.alloc(Node::ExprStmt { x: rhs[0] }, n),
                }
            }
            "var_declaration" | "const_declaration" | "type_declaration" => {
                let keyword = match n.kind() {
                    "var_declaration" => DeclKeyword::Var,
                    "const_declaration" => DeclKeyword::Const,
                    _ => DeclKeyword::Type,
                };
                let decl = self.gen_decl(n, keyword);
                self.alloc(Node::DeclStmt { decl }, n)
            }
            "return_statement" => {
                let results = self.expr_list(named(n).first().copied());
                self.alloc(Node::ReturnStmt { results }, n)
            }
            "go_statement" => {
                let call = self.first_expr(n);
                self.alloc(Node::GoStmt { call }, n)
            }
            "defer_statement" => {
                let call = self.first_expr(n);
                self.alloc(Node::DeferStmt { call }, n)
            }
            "if_statement" => {
                let init = self.opt_stmt(n.child_by_field_name("initializer"));
                let cond = self.field_expr(n, "condition");
                let body = match n.child_by_field_name("consequence") {
                    Some(b) => self.block(b),
                    None => self.alloc(Node::BlockStmt { list: Vec::new() }, n),
                };
                let els = self.opt_stmt(n.child_by_field_name("alternative"));
                self.alloc(
                    Node::IfStmt {
                        init,
                        cond,
                        body,
                        els,
                    },
                    n,
                )
            }
            "for_statement" => self.for_stmt(n),
            "expression_switch_statement" => {
                let init = self.opt_stmt(n.child_by_field_name("initializer"));
                let tag = n.child_by_field_name("value").map(|v| self.expr(v));
                let body = self.case_block(n);
                self.alloc(Node::SwitchStmt { init, tag, body }, n)
            }
            "type_switch_statement" => {
                let init = self.opt_stmt(n.child_by_field_name("initializer"));
                let assign = self.type_switch_guard(n);
                let body = self.case_block(n);
                self.alloc(Node::TypeSwitchStmt { init, assign, body }, n)
            }
            "select_statement" => {
                let body = self.case_block(n);
                self.alloc(Node::SelectStmt { body }, n)
            }
            "labeled_statement" => {
                let label_node = n
                    .child_by_field_name("label")
                    .or_else(|| named(n).into_iter().find(|c| c.kind() == "label_name"));
                let label = match label_node {
                    Some(l) => self.ident(l),
                    None => self.alloc(Node::BadExpr, n),
                };
                let inner = named(n)
                    .into_iter()
                    .find(|c| Some(c.id()) != label_node.map(|l| l.id()));
                let stmt = self.opt_stmt(inner);
                self.alloc(Node::LabeledStmt { label, stmt }, n)
            }
            "break_statement" => self.branch(n, BranchKind::Break),
            "continue_statement" => self.branch(n, BranchKind::Continue),
            "goto_statement" => self.branch(n, BranchKind::Goto),
            "fallthrough_statement" => self.branch(n, BranchKind::Fallthrough),
            "block" => self.block(n),
            "empty_statement" => self.alloc(Node::EmptyStmt, n),
            _ => self.alloc(Node::BadStmt, n),
        }
    }

    fn branch(&mut self, n: TsNode<'_>, tok: BranchKind) -> NodeId {
        let label = named(n).first().map(|l| self.ident(*l));
        self.alloc(Node::BranchStmt { tok, label }, n)
    }

    fn for_stmt(&mut self, n: TsNode<'_>) -> NodeId {
        let body_node = n.child_by_field_name("body");
        let header = named(n)
            .into_iter()
            .find(|c| Some(c.id()) != body_node.map(|b| b.id()));
        let body = match body_node {
            Some(b) => self.block(b),
            None => self.alloc(Node::BlockStmt { list: Vec::new() }, n),
        };
        match header {
            Some(h) if h.kind() == "range_clause" => {
                let left = h
                    .child_by_field_name("left")
                    .map(named)
                    .unwrap_or_default();
                let key = left.first().map(|k| self.expr(*k));
                let value = left.get(1).map(|v| self.expr(*v));
                let define = token(h, ":=").is_some();
                let x = self.field_expr(h, "right");
                self.alloc(
                    Node::RangeStmt {
                        key,
                        value,
                        define,
                        x,
                        body,
                    },
                    n,
                )
            }
            Some(h) if h.kind() == "for_clause" => {
                let init = self.opt_stmt(h.child_by_field_name("initializer"));
                let cond = h.child_by_field_name("condition").map(|c| self.expr(c));
                let post = self.opt_stmt(h.child_by_field_name("update"));
                self.alloc(
                    Node::ForStmt {
                        init,
                        cond,
                        post,
                        body,
                    },
                    n,
                )
            }
            Some(cond) => {
                let cond = Some(self.expr(cond));
                self.alloc(
                    Node::ForStmt {
                        init: None,
                        cond,
                        post: None,
                        body,
                    },
                    n,
                )
            }
            None => self.alloc(
                Node::ForStmt {
                    init: None,
                    cond: None,
                    post: None,
                    body,
                },
                n,
            ),
        }
    }

    /// `x := y.(type)` or `y.(type)` of a type switch header.
    fn type_switch_guard(&mut self, n: TsNode<'_>) -> NodeId {
        let value = n.child_by_field_name("value");
        let alias = n.child_by_field_name("alias");
        let start = alias.or(value).map_or(n.start_byte(), |s| s.start_byte());
        let end = {
            let mut cursor = n.walk();
            let mut end = value.map_or(n.end_byte(), |v| v.end_byte());
            for c in n.children(&mut cursor) {
                if c.kind() == "{" {
                    break;
                }
                if c.kind() == ")" {
                    end = c.end_byte();
                }
            }
            end
        };
        let x = match value {
            Some(v) => self.expr(v),
            None => self.alloc(Node::BadExpr, n),
        };
        let span = Span::new(start, end);
        let assert = self.alloc_span(Node::TypeAssertExpr { x, ty: None }, span);
        match alias {
            Some(a) => {
                let lhs = self.expr_list(Some(a));
                self.alloc_span(
                    Node::AssignStmt {
                        lhs,
                        tok: ":=".to_string(),
                        rhs: vec![assert],
                    },
                    span,
                )
            }
            None => self.alloc_span(Node::ExprStmt { x: assert }, span),
        }
    }

    /// Clauses of a switch or select statement, wrapped in a block.
    fn case_block(&mut self, n: TsNode<'_>) -> NodeId {
        let start = token(n, "{").map_or(n.start_byte(), |t| t.start_byte());
        let mut list = Vec::new();
        for clause in named(n) {
            match clause.kind() {
                "expression_case" => {
                    let values = self.expr_list(clause.child_by_field_name("value"));
                    let body = self.stmt_list(clause);
                    list.push(self.alloc(Node::CaseClause { list: values, body }, clause));
                }
                "type_case" => {
                    let types = by_field(clause, "type")
                        .into_iter()
                        .map(|t| self.type_expr(t))
                        .collect();
                    let body = self.stmt_list(clause);
                    list.push(self.alloc(Node::CaseClause { list: types, body }, clause));
                }
                "communication_case" => {
                    let comm = self.opt_stmt(clause.child_by_field_name("communication"));
                    let body = self.stmt_list(clause);
                    list.push(self.alloc(Node::CommClause { comm, body }, clause));
                }
                "default_case" => {
                    let body = self.stmt_list(clause);
                    let node = if n.kind() == "select_statement" {
                        Node::CommClause { comm: None, body }
                    } else {
                        Node::CaseClause {
                            list: Vec::new(),
                            body,
                        }
                    };
                    list.push(self.alloc(node, clause));
                }
                _ => {}
            }
        }
        self.alloc_span(Node::BlockStmt { list }, Span::new(start, n.end_byte()))
    }
}
