use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to load Go grammar: {0}")]
    Language(String),
    #[error("{file}:{line}:{column}: syntax error")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
    },
    #[error("no buildable Go source files in {0}")]
    NoSourceFiles(PathBuf),
    #[error("tree-sitter produced no tree for {0}")]
    NoTree(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;
