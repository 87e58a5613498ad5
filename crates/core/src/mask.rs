//! Kind masks: one bit per syntax kind plus the family unions.

use gowalk_go::Kind;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KindMask(u64);

const fn bit(kind: Kind) -> u64 {
    1u64 << (kind as u8)
}

const fn union(kinds: &[Kind]) -> u64 {
    let mut acc = 0;
    let mut i = 0;
    while i < kinds.len() {
        acc |= bit(kinds[i]);
        i += 1;
    }
    acc
}

impl KindMask {
    pub const NONE: KindMask = KindMask(0);

    pub const LIT_ALL: KindMask = KindMask(union(&[
        Kind::BasicLit,
        Kind::FieldList,
        Kind::Ellipsis,
        Kind::FuncLit,
        Kind::CompositeLit,
    ]));

    /// Expression kinds, including `Ident` and the literal family. Walks with
    /// this mask (or [`KindMask::AST_ALL`]) report every identifier.
    pub const EXPR_ALL: KindMask = KindMask(union(&[
        Kind::Ident,
        Kind::BadExpr,
        Kind::BasicLit,
        Kind::FieldList,
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
    ]));

    pub const TYPE_ALL: KindMask = KindMask(union(&[
        Kind::ArrayType,
        Kind::StructType,
        Kind::FuncType,
        Kind::InterfaceType,
        Kind::MapType,
        Kind::ChanType,
    ]));

    pub const STMT_ALL: KindMask = KindMask(union(&[
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
    ]));

    pub const SPEC_ALL: KindMask =
        KindMask(union(&[Kind::ImportSpec, Kind::ValueSpec, Kind::TypeSpec]));

    pub const DECL_ALL: KindMask = KindMask(union(&[Kind::BadDecl, Kind::GenDecl, Kind::FuncDecl]));

    /// Every family plus comment groups, fields, files and packages.
    ///
    /// Lone `Comment` nodes are left out; they are only reachable through
    /// their group.
    pub const AST_ALL: KindMask = KindMask(
        union(&[Kind::CommentGroup, Kind::Field, Kind::File, Kind::Package])
            | Self::EXPR_ALL.0
            | Self::TYPE_ALL.0
            | Self::STMT_ALL.0
            | Self::SPEC_ALL.0
            | Self::DECL_ALL.0,
    );

    pub const fn of(kind: Kind) -> KindMask {
        KindMask(bit(kind))
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = Kind>) -> KindMask {
        kinds.into_iter().fold(KindMask::NONE, |m, k| m | k)
    }

    #[inline]
    pub const fn contains(self, kind: Kind) -> bool {
        self.0 & bit(kind) != 0
    }

    pub const fn with(self, kind: Kind) -> KindMask {
        KindMask(self.0 | bit(kind))
    }

    pub const fn without(self, kind: Kind) -> KindMask {
        KindMask(self.0 & !bit(kind))
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn kinds(self) -> impl Iterator<Item = Kind> {
        Kind::ALL.into_iter().filter(move |k| self.contains(*k))
    }

    /// Looks a family (`"stmt"`, `"DECL_ALL"`) or a single kind name up.
    pub fn parse(name: &str) -> Option<KindMask> {
        let family = name.trim().to_ascii_lowercase();
        let family = family.strip_suffix("_all").unwrap_or(&family);
        match family {
            "lit" => Some(Self::LIT_ALL),
            "expr" => Some(Self::EXPR_ALL),
            "type" => Some(Self::TYPE_ALL),
            "stmt" => Some(Self::STMT_ALL),
            "spec" => Some(Self::SPEC_ALL),
            "decl" => Some(Self::DECL_ALL),
            "ast" | "all" => Some(Self::AST_ALL),
            _ => Kind::from_name(name.trim()).map(Self::of),
        }
    }
}

impl From<Kind> for KindMask {
    fn from(kind: Kind) -> Self {
        KindMask::of(kind)
    }
}

impl BitOr for KindMask {
    type Output = KindMask;
    fn bitor(self, rhs: KindMask) -> KindMask {
        KindMask(self.0 | rhs.0)
    }
}

impl BitOr<Kind> for KindMask {
    type Output = KindMask;
    fn bitor(self, rhs: Kind) -> KindMask {
        self.with(rhs)
    }
}

impl BitOrAssign for KindMask {
    fn bitor_assign(&mut self, rhs: KindMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for KindMask {
    type Output = KindMask;
    fn bitand(self, rhs: KindMask) -> KindMask {
        KindMask(self.0 & rhs.0)
    }
}

impl Not for KindMask {
    type Output = KindMask;
    fn not(self) -> KindMask {
        KindMask(!self.0 & union(&Kind::ALL))
    }
}

impl fmt::Debug for KindMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_are_disjoint_where_expected() {
        assert!((KindMask::STMT_ALL & KindMask::DECL_ALL).is_empty());
        assert!((KindMask::SPEC_ALL & KindMask::EXPR_ALL).is_empty());
        assert!(KindMask::EXPR_ALL.contains(Kind::FieldList));
        assert!(KindMask::LIT_ALL.contains(Kind::FuncLit));
        assert!(!KindMask::LIT_ALL.contains(Kind::Ident));
    }

    #[test]
    fn test_ast_all() {
        assert!(KindMask::AST_ALL.contains(Kind::Package));
        assert!(KindMask::AST_ALL.contains(Kind::File));
        assert!(KindMask::AST_ALL.contains(Kind::RangeStmt));
        assert!(!KindMask::AST_ALL.contains(Kind::Comment));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(KindMask::parse("decl"), Some(KindMask::DECL_ALL));
        assert_eq!(KindMask::parse("STMT_ALL"), Some(KindMask::STMT_ALL));
        assert_eq!(KindMask::parse("FuncDecl"), Some(KindMask::of(Kind::FuncDecl)));
        assert_eq!(KindMask::parse("nope"), None);
    }

    #[test]
    fn test_not_stays_in_range() {
        let all = !KindMask::NONE;
        assert_eq!(all.kinds().count(), Kind::COUNT);
        assert!(!(!KindMask::of(Kind::File)).contains(Kind::File));
    }
}
