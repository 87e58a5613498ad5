use serde::{Deserialize, Serialize};
use std::fmt;

/// Grammatical category of a syntax node.
///
/// The set is closed: every `Node` variant maps to exactly one `Kind`, and the
/// discriminant doubles as the bit position inside a kind mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Kind {
    // Comments and fields
    Comment,
    CommentGroup,
    Field,
    FieldList,

    // Expressions
    Ident,
    BadExpr,
    BasicLit,
    Ellipsis,
    FuncLit,
    CompositeLit,
    ParenExpr,
    SelectorExpr,
    IndexExpr,
    SliceExpr,
    TypeAssertExpr,
    CallExpr,
    StarExpr,
    UnaryExpr,
    BinaryExpr,
    KeyValueExpr,

    // Types
    ArrayType,
    StructType,
    FuncType,
    InterfaceType,
    MapType,
    ChanType,

    // Statements
    BadStmt,
    DeclStmt,
    EmptyStmt,
    LabeledStmt,
    ExprStmt,
    SendStmt,
    IncDecStmt,
    AssignStmt,
    GoStmt,
    DeferStmt,
    ReturnStmt,
    BranchStmt,
    BlockStmt,
    IfStmt,
    CaseClause,
    SwitchStmt,
    TypeSwitchStmt,
    CommClause,
    SelectStmt,
    ForStmt,
    RangeStmt,

    // Specs
    ImportSpec,
    ValueSpec,
    TypeSpec,

    // Declarations
    BadDecl,
    GenDecl,
    FuncDecl,

    // Files and packages
    File,
    Package,
}

impl Kind {
    pub const COUNT: usize = 55;

    pub const ALL: [Kind; Kind::COUNT] = [
        Kind::Comment,
        Kind::CommentGroup,
        Kind::Field,
        Kind::FieldList,
        Kind::Ident,
        Kind::BadExpr,
        Kind::BasicLit,
        Kind::Ellipsis,
        Kind::FuncLit,
        Kind::CompositeLit,
        Kind::ParenExpr,
        Kind::SelectorExpr,
        Kind::IndexExpr,
        Kind::SliceExpr,
        Kind::TypeAssertExpr,
        Kind::CallExpr,
        Kind::StarExpr,
        Kind::UnaryExpr,
        Kind::BinaryExpr,
        Kind::KeyValueExpr,
        Kind::ArrayType,
        Kind::StructType,
        Kind::FuncType,
        Kind::InterfaceType,
        Kind::MapType,
        Kind::ChanType,
        Kind::BadStmt,
        Kind::DeclStmt,
        Kind::EmptyStmt,
        Kind::LabeledStmt,
        Kind::ExprStmt,
        Kind::SendStmt,
        Kind::IncDecStmt,
        Kind::AssignStmt,
        Kind::GoStmt,
        Kind::DeferStmt,
        Kind::ReturnStmt,
        Kind::BranchStmt,
        Kind::BlockStmt,
        Kind::IfStmt,
        Kind::CaseClause,
        Kind::SwitchStmt,
        Kind::TypeSwitchStmt,
        Kind::CommClause,
        Kind::SelectStmt,
        Kind::ForStmt,
        Kind::RangeStmt,
        Kind::ImportSpec,
        Kind::ValueSpec,
        Kind::TypeSpec,
        Kind::BadDecl,
        Kind::GenDecl,
        Kind::FuncDecl,
        Kind::File,
        Kind::Package,
    ];

    /// Position of this kind inside [`Kind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Comment => "Comment",
            Kind::CommentGroup => "CommentGroup",
            Kind::Field => "Field",
            Kind::FieldList => "FieldList",
            Kind::Ident => "Ident",
            Kind::BadExpr => "BadExpr",
            Kind::BasicLit => "BasicLit",
            Kind::Ellipsis => "Ellipsis",
            Kind::FuncLit => "FuncLit",
            Kind::CompositeLit => "CompositeLit",
            Kind::ParenExpr => "ParenExpr",
            Kind::SelectorExpr => "SelectorExpr",
            Kind::IndexExpr => "IndexExpr",
            Kind::SliceExpr => "SliceExpr",
            Kind::TypeAssertExpr => "TypeAssertExpr",
            Kind::CallExpr => "CallExpr",
            Kind::StarExpr => "StarExpr",
            Kind::UnaryExpr => "UnaryExpr",
            Kind::BinaryExpr => "BinaryExpr",
            Kind::KeyValueExpr => "KeyValueExpr",
            Kind::ArrayType => "ArrayType",
            Kind::StructType => "StructType",
            Kind::FuncType => "FuncType",
            Kind::InterfaceType => "InterfaceType",
            Kind::MapType => "MapType",
            Kind::ChanType => "ChanType",
            Kind::BadStmt => "BadStmt",
            Kind::DeclStmt => "DeclStmt",
            Kind::EmptyStmt => "EmptyStmt",
            Kind::LabeledStmt => "LabeledStmt",
            Kind::ExprStmt => "ExprStmt",
            Kind::SendStmt => "SendStmt",
            Kind::IncDecStmt => "IncDecStmt",
            Kind::AssignStmt => "AssignStmt",
            Kind::GoStmt => "GoStmt",
            Kind::DeferStmt => "DeferStmt",
            Kind::ReturnStmt => "ReturnStmt",
            Kind::BranchStmt => "BranchStmt",
            Kind::BlockStmt => "BlockStmt",
            Kind::IfStmt => "IfStmt",
            Kind::CaseClause => "CaseClause",
            Kind::SwitchStmt => "SwitchStmt",
            Kind::TypeSwitchStmt => "TypeSwitchStmt",
            Kind::CommClause => "CommClause",
            Kind::SelectStmt => "SelectStmt",
            Kind::ForStmt => "ForStmt",
            Kind::RangeStmt => "RangeStmt",
            Kind::ImportSpec => "ImportSpec",
            Kind::ValueSpec => "ValueSpec",
            Kind::TypeSpec => "TypeSpec",
            Kind::BadDecl => "BadDecl",
            Kind::GenDecl => "GenDecl",
            Kind::FuncDecl => "FuncDecl",
            Kind::File => "File",
            Kind::Package => "Package",
        }
    }

    /// Case-insensitive lookup by name (`"FuncDecl"`, `"funcdecl"`).
    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
