//! Arena-allocated Go syntax tree.
//!
//! Every node of a package lives in one [`Ast`] and is addressed by a
//! [`NodeId`]. Node shapes follow `go/ast`; child references are ids into the
//! same arena, so a tree can be shared read-only by any number of cursors.

use crate::kind::Kind;
use crate::source::{FileId, Position, SourceText, Span};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// Keyword introducing a grouped declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKeyword {
    Import,
    Const,
    Var,
    Type,
}

impl DeclKeyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeclKeyword::Import => "import",
            DeclKeyword::Const => "const",
            DeclKeyword::Var => "var",
            DeclKeyword::Type => "type",
        }
    }
}

impl fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

/// A syntax node. One variant per [`Kind`].
#[derive(Debug, Clone)]
pub enum Node {
    Comment {
        text: String,
    },
    CommentGroup {
        list: Vec<NodeId>,
    },
    /// `names` is empty for an embedded field.
    Field {
        doc: Option<NodeId>,
        names: Vec<NodeId>,
        ty: NodeId,
        tag: Option<NodeId>,
        comment: Option<NodeId>,
    },
    FieldList {
        list: Vec<NodeId>,
    },

    Ident {
        name: String,
    },
    BadExpr,
    BasicLit {
        kind: LitKind,
        value: String,
    },
    Ellipsis {
        elt: Option<NodeId>,
    },
    FuncLit {
        ty: NodeId,
        body: NodeId,
    },
    CompositeLit {
        ty: Option<NodeId>,
        elts: Vec<NodeId>,
    },
    ParenExpr {
        x: NodeId,
    },
    SelectorExpr {
        x: NodeId,
        sel: NodeId,
    },
    /// Also covers generic instantiation with several type arguments.
    IndexExpr {
        x: NodeId,
        indices: Vec<NodeId>,
    },
    SliceExpr {
        x: NodeId,
        low: Option<NodeId>,
        high: Option<NodeId>,
        max: Option<NodeId>,
    },
    /// `ty` is `None` for the `x.(type)` form of a type switch.
    TypeAssertExpr {
        x: NodeId,
        ty: Option<NodeId>,
    },
    CallExpr {
        fun: NodeId,
        args: Vec<NodeId>,
        ellipsis: bool,
    },
    StarExpr {
        x: NodeId,
    },
    UnaryExpr {
        op: String,
        x: NodeId,
    },
    BinaryExpr {
        x: NodeId,
        op: String,
        y: NodeId,
    },
    KeyValueExpr {
        key: NodeId,
        value: NodeId,
    },

    /// Slice types have no `len`; `[...]T` arrays carry an `Ellipsis` length.
    ArrayType {
        len: Option<NodeId>,
        elt: NodeId,
    },
    StructType {
        fields: NodeId,
    },
    FuncType {
        type_params: Option<NodeId>,
        params: NodeId,
        results: Option<NodeId>,
    },
    InterfaceType {
        methods: NodeId,
    },
    MapType {
        key: NodeId,
        value: NodeId,
    },
    ChanType {
        dir: ChanDir,
        value: NodeId,
    },

    BadStmt,
    DeclStmt {
        decl: NodeId,
    },
    EmptyStmt,
    LabeledStmt {
        label: NodeId,
        stmt: Option<NodeId>,
    },
    ExprStmt {
        x: NodeId,
    },
    SendStmt {
        chan: NodeId,
        value: NodeId,
    },
    IncDecStmt {
        x: NodeId,
        inc: bool,
    },
    AssignStmt {
        lhs: Vec<NodeId>,
        tok: String,
        rhs: Vec<NodeId>,
    },
    GoStmt {
        call: NodeId,
    },
    DeferStmt {
        call: NodeId,
    },
    ReturnStmt {
        results: Vec<NodeId>,
    },
    BranchStmt {
        tok: BranchKind,
        label: Option<NodeId>,
    },
    BlockStmt {
        list: Vec<NodeId>,
    },
    IfStmt {
        init: Option<NodeId>,
        cond: NodeId,
        body: NodeId,
        els: Option<NodeId>,
    },
    /// `list` is empty for the `default` clause.
    CaseClause {
        list: Vec<NodeId>,
        body: Vec<NodeId>,
    },
    SwitchStmt {
        init: Option<NodeId>,
        tag: Option<NodeId>,
        body: NodeId,
    },
    TypeSwitchStmt {
        init: Option<NodeId>,
        assign: NodeId,
        body: NodeId,
    },
    /// `comm` is `None` for the `default` clause.
    CommClause {
        comm: Option<NodeId>,
        body: Vec<NodeId>,
    },
    SelectStmt {
        body: NodeId,
    },
    ForStmt {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    RangeStmt {
        key: Option<NodeId>,
        value: Option<NodeId>,
        define: bool,
        x: NodeId,
        body: NodeId,
    },

    ImportSpec {
        doc: Option<NodeId>,
        name: Option<NodeId>,
        path: NodeId,
        comment: Option<NodeId>,
    },
    ValueSpec {
        doc: Option<NodeId>,
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        values: Vec<NodeId>,
        comment: Option<NodeId>,
    },
    TypeSpec {
        doc: Option<NodeId>,
        name: NodeId,
        type_params: Option<NodeId>,
        assign: bool,
        ty: NodeId,
        comment: Option<NodeId>,
    },

    BadDecl,
    GenDecl {
        doc: Option<NodeId>,
        keyword: DeclKeyword,
        specs: Vec<NodeId>,
    },
    FuncDecl {
        doc: Option<NodeId>,
        recv: Option<NodeId>,
        name: NodeId,
        ty: NodeId,
        body: Option<NodeId>,
    },

    File {
        doc: Option<NodeId>,
        name: NodeId,
        decls: Vec<NodeId>,
        comments: Vec<NodeId>,
    },
    /// Files are kept in lexicographic filename order.
    Package {
        name: String,
        files: Vec<(String, NodeId)>,
    },
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Comment { .. } => Kind::Comment,
            Node::CommentGroup { .. } => Kind::CommentGroup,
            Node::Field { .. } => Kind::Field,
            Node::FieldList { .. } => Kind::FieldList,
            Node::Ident { .. } => Kind::Ident,
            Node::BadExpr => Kind::BadExpr,
            Node::BasicLit { .. } => Kind::BasicLit,
            Node::Ellipsis { .. } => Kind::Ellipsis,
            Node::FuncLit { .. } => Kind::FuncLit,
            Node::CompositeLit { .. } => Kind::CompositeLit,
            Node::ParenExpr { .. } => Kind::ParenExpr,
            Node::SelectorExpr { .. } => Kind::SelectorExpr,
            Node::IndexExpr { .. } => Kind::IndexExpr,
            Node::SliceExpr { .. } => Kind::SliceExpr,
            Node::TypeAssertExpr { .. } => Kind::TypeAssertExpr,
            Node::CallExpr { .. } => Kind::CallExpr,
            Node::StarExpr { .. } => Kind::StarExpr,
            Node::UnaryExpr { .. } => Kind::UnaryExpr,
            Node::BinaryExpr { .. } => Kind::BinaryExpr,
            Node::KeyValueExpr { .. } => Kind::KeyValueExpr,
            Node::ArrayType { .. } => Kind::ArrayType,
            Node::StructType { .. } => Kind::StructType,
            Node::FuncType { .. } => Kind::FuncType,
            Node::InterfaceType { .. } => Kind::InterfaceType,
            Node::MapType { .. } => Kind::MapType,
            Node::ChanType { .. } => Kind::ChanType,
            Node::BadStmt => Kind::BadStmt,
            Node::DeclStmt { .. } => Kind::DeclStmt,
            Node::EmptyStmt => Kind::EmptyStmt,
            Node::LabeledStmt { .. } => Kind::LabeledStmt,
            Node::ExprStmt { .. } => Kind::ExprStmt,
            Node::SendStmt { .. } => Kind::SendStmt,
            Node::IncDecStmt { .. } => Kind::IncDecStmt,
            Node::AssignStmt { .. } => Kind::AssignStmt,
            Node::GoStmt { .. } => Kind::GoStmt,
            Node::DeferStmt { .. } => Kind::DeferStmt,
            Node::ReturnStmt { .. } => Kind::ReturnStmt,
            Node::BranchStmt { .. } => Kind::BranchStmt,
            Node::BlockStmt { .. } => Kind::BlockStmt,
            Node::IfStmt { .. } => Kind::IfStmt,
            Node::CaseClause { .. } => Kind::CaseClause,
            Node::SwitchStmt { .. } => Kind::SwitchStmt,
            Node::TypeSwitchStmt { .. } => Kind::TypeSwitchStmt,
            Node::CommClause { .. } => Kind::CommClause,
            Node::SelectStmt { .. } => Kind::SelectStmt,
            Node::ForStmt { .. } => Kind::ForStmt,
            Node::RangeStmt { .. } => Kind::RangeStmt,
            Node::ImportSpec { .. } => Kind::ImportSpec,
            Node::ValueSpec { .. } => Kind::ValueSpec,
            Node::TypeSpec { .. } => Kind::TypeSpec,
            Node::BadDecl => Kind::BadDecl,
            Node::GenDecl { .. } => Kind::GenDecl,
            Node::FuncDecl { .. } => Kind::FuncDecl,
            Node::File { .. } => Kind::File,
            Node::Package { .. } => Kind::Package,
        }
    }

    /// Leading documentation group, for the kinds that carry one.
    pub fn doc(&self) -> Option<NodeId> {
        match self {
            Node::Field { doc, .. }
            | Node::ImportSpec { doc, .. }
            | Node::ValueSpec { doc, .. }
            | Node::TypeSpec { doc, .. }
            | Node::GenDecl { doc, .. }
            | Node::FuncDecl { doc, .. }
            | Node::File { doc, .. } => *doc,
            _ => None,
        }
    }

    /// Trailing same-line comment group.
    pub fn line_comment(&self) -> Option<NodeId> {
        match self {
            Node::Field { comment, .. }
            | Node::ImportSpec { comment, .. }
            | Node::ValueSpec { comment, .. }
            | Node::TypeSpec { comment, .. } => *comment,
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    span: Span,
    file: Option<FileId>,
}

/// Owner of every node and source text of one package.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Entry>,
    files: Vec<SourceText>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, source: SourceText) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(source);
        id
    }

    pub fn alloc(&mut self, node: Node, span: Span, file: Option<FileId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Entry { node, span, file });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).map(|e| &e.node)
    }

    /// # Panics
    /// If `id` does not belong to this arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()].node
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).kind()
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Every node in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i as u32), &e.node))
    }

    pub fn files(&self) -> &[SourceText] {
        &self.files
    }

    pub fn source(&self, file: FileId) -> &SourceText {
        &self.files[file.index()]
    }

    pub fn file_of(&self, id: NodeId) -> Option<&SourceText> {
        self.nodes
            .get(id.index())
            .and_then(|e| e.file)
            .map(|f| self.source(f))
    }

    /// Literal source text covered by a node. `None` for synthetic nodes.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        let file = self.file_of(id)?;
        file.slice(self.span(id))
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        let file = self.file_of(id)?;
        Some(file.position(self.span(id).start))
    }

    /// Name of an `Ident` node.
    pub fn ident(&self, id: NodeId) -> Option<&str> {
        match self.get(id)? {
            Node::Ident { name } => Some(name),
            _ => None,
        }
    }

    pub fn view(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { ast: self, id }
    }
}

/// Borrowed view of one node, handed to walk predicates.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub ast: &'a Ast,
    pub id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn node(&self) -> &'a Node {
        self.ast.node(self.id)
    }

    pub fn kind(&self) -> Kind {
        self.ast.kind(self.id)
    }

    pub fn text(&self) -> Option<&'a str> {
        self.ast.text(self.id)
    }

    pub fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { ast: self.ast, id }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind(), self.id.index())
    }
}

/// One parsed directory: an arena plus its `Package` root node.
#[derive(Debug, Clone)]
pub struct Package {
    import_path: String,
    dir: PathBuf,
    ast: Ast,
    root: NodeId,
}

impl Package {
    pub fn new(import_path: impl Into<String>, dir: impl Into<PathBuf>, ast: Ast, root: NodeId) -> Self {
        Self {
            import_path: import_path.into(),
            dir: dir.into(),
            ast,
            root,
        }
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Package clause name.
    pub fn name(&self) -> &str {
        match self.ast.node(self.root) {
            Node::Package { name, .. } => name,
            _ => "",
        }
    }

    /// `(filename, File node)` pairs in lexicographic order.
    pub fn files(&self) -> &[(String, NodeId)] {
        match self.ast.node(self.root) {
            Node::Package { files, .. } => files,
            _ => &[],
        }
    }

    /// Looks a file up by bare name or by full path.
    pub fn file(&self, name: &str) -> Option<NodeId> {
        self.files()
            .iter()
            .find(|(n, id)| {
                n == name
                    || self
                        .ast
                        .file_of(*id)
                        .is_some_and(|s| s.path() == Path::new(name))
            })
            .map(|(_, id)| *id)
    }
}
