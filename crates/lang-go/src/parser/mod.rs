//! tree-sitter based loader for Go packages.

mod convert;

use crate::ast::{Ast, Node, Package};
use crate::error::{ParseError, Result};
use crate::source::{SourceText, Span};
use convert::Converter;
use once_cell::sync::Lazy;
use std::path::Path;
use tracing::{debug, trace};
use tree_sitter::{Language, Parser, Tree};

static GO_LANGUAGE: Lazy<Language> = Lazy::new(|| tree_sitter_go::LANGUAGE.into());

/// Loads every eligible source file of one directory into a [`Package`].
///
/// The store owns a boxed implementation, so tests can substitute a parser
/// that counts or fails on demand.
pub trait DirParser: Send + Sync {
    /// `filter` receives bare file names and returns `false` for files to skip.
    fn parse_dir(
        &self,
        import_path: &str,
        dir: &Path,
        filter: &dyn Fn(&str) -> bool,
    ) -> Result<Package>;
}

/// A Go file as seen by the directory scan: visible and ending in `.go`.
pub fn is_go_source(name: &str) -> bool {
    name.ends_with(".go") && !name.starts_with('.') && !name.starts_with('_')
}

#[derive(Debug, Clone, Default)]
pub struct GoParser {
    allow_syntax_errors: bool,
}

impl GoParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps files that contain syntax errors; broken regions become `Bad*` nodes.
    pub fn allow_syntax_errors(mut self, allow: bool) -> Self {
        self.allow_syntax_errors = allow;
        self
    }

    pub fn language() -> &'static Language {
        &GO_LANGUAGE
    }

    /// Builds a package from in-memory sources, ordered by file name.
    ///
    /// `dir` is only recorded; nothing is read from disk.
    pub fn parse_sources<I, N, S>(&self, import_path: &str, dir: &Path, sources: I) -> Result<Package>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut sources: Vec<(String, String)> = sources
            .into_iter()
            .map(|(n, s)| (n.into(), s.into()))
            .collect();
        if sources.is_empty() {
            return Err(ParseError::NoSourceFiles(dir.to_path_buf()));
        }
        sources.sort_by(|a, b| a.0.cmp(&b.0));

        let mut parser = Parser::new();
        parser
            .set_language(Self::language())
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let mut ast = Ast::new();
        let mut files = Vec::with_capacity(sources.len());
        let mut package_name = String::new();
        for (name, text) in sources {
            let tree = parser
                .parse(&text, None)
                .ok_or_else(|| ParseError::NoTree(name.clone()))?;
            if !self.allow_syntax_errors {
                check_syntax(&tree, &name, dir)?;
            }
            let file_id = ast.add_file(SourceText::new(name.clone(), dir.join(&name), text.clone()));
            let file = Converter::new(&mut ast, file_id, &text).file(tree.root_node());
            if package_name.is_empty() {
                if let Some(Node::File { name: ident, .. }) = ast.get(file) {
                    package_name = ast.ident(*ident).unwrap_or_default().to_string();
                }
            }
            trace!("Converted {} ({} nodes so far)", name, ast.len());
            files.push((name, file));
        }

        let count = files.len();
        let root = ast.alloc(
            Node::Package {
                name: package_name,
                files,
            },
            Span::default(),
            None,
        );
        debug!("Parsed package {} with {} files", import_path, count);
        Ok(Package::new(import_path, dir, ast, root))
    }
}

impl DirParser for GoParser {
    fn parse_dir(
        &self,
        import_path: &str,
        dir: &Path,
        filter: &dyn Fn(&str) -> bool,
    ) -> Result<Package> {
        let mut sources = Vec::new();
        for entry in walkdir::WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_go_source(&name) || !filter(&name) {
                trace!("Skipping {}", name);
                continue;
            }
            let text = std::fs::read_to_string(entry.path())?;
            sources.push((name, text));
        }
        self.parse_sources(import_path, dir, sources)
    }
}

fn check_syntax(tree: &Tree, name: &str, dir: &Path) -> Result<()> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }
    let mut cursor = root.walk();
    let mut found = None;
    'walk: loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            found = Some(node);
            break;
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
    let point = found.map(|n| n.start_position()).unwrap_or_default();
    Err(ParseError::Syntax {
        file: dir.join(name).to_string_lossy().into_owned(),
        line: point.row + 1,
        column: point.column + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    fn parse(src: &str) -> Package {
        GoParser::new()
            .parse_sources("example.com/p", Path::new("p"), [("a.go", src)])
            .unwrap()
    }

    #[test]
    fn test_is_go_source() {
        assert!(is_go_source("walk.go"));
        assert!(is_go_source("walk_test.go"));
        assert!(!is_go_source(".hidden.go"));
        assert!(!is_go_source("_skip.go"));
        assert!(!is_go_source("README.md"));
    }

    #[test]
    fn test_package_root() {
        let pkg = parse("package p\n\nfunc F() {}\n");
        assert_eq!(pkg.name(), "p");
        assert_eq!(pkg.ast().kind(pkg.root()), Kind::Package);
        assert_eq!(pkg.files().len(), 1);
        assert_eq!(pkg.files()[0].0, "a.go");
    }

    #[test]
    fn test_files_sorted_by_name() {
        let pkg = GoParser::new()
            .parse_sources(
                "p",
                Path::new("p"),
                [("z.go", "package p\n"), ("a.go", "package p\n"), ("m.go", "package p\n")],
            )
            .unwrap();
        let names: Vec<_> = pkg.files().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["a.go", "m.go", "z.go"]);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = GoParser::new()
            .parse_sources("p", Path::new("p"), [("bad.go", "package p\n\nfunc {\n")])
            .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_syntax_error_tolerated_when_allowed() {
        let pkg = GoParser::new()
            .allow_syntax_errors(true)
            .parse_sources("p", Path::new("p"), [("bad.go", "package p\n\nfunc {\n")])
            .unwrap();
        assert_eq!(pkg.name(), "p");
    }

    #[test]
    fn test_no_sources() {
        let none: [(&str, &str); 0] = [];
        let err = GoParser::new()
            .parse_sources("p", Path::new("p"), none)
            .unwrap_err();
        assert!(matches!(err, ParseError::NoSourceFiles(_)));
    }
}
