//! Go syntax trees for gowalk.
//!
//! Source files are parsed with tree-sitter-go and lowered into an arena of
//! `go/ast`-shaped nodes, one [`Package`] per directory.

pub mod ast;
pub mod error;
pub mod kind;
pub mod naming;
pub mod parser;
pub mod printer;
pub mod source;

pub use ast::{Ast, DeclKeyword, Node, NodeId, NodeRef, Package};
pub use error::{ParseError, Result};
pub use kind::Kind;
pub use parser::{DirParser, GoParser};
pub use source::{Position, SourceText, Span};
