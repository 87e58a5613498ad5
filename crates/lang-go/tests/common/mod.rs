use gowalk_go::{GoParser, Kind, Node, NodeId, Package};
use std::path::Path;

pub fn parse(src: &str) -> Package {
    parse_files(&[("a.go", src)])
}

pub fn parse_files(files: &[(&str, &str)]) -> Package {
    GoParser::new()
        .parse_sources("example.com/p", Path::new("p"), files.iter().copied())
        .expect("fixture should parse")
}

/// All nodes of one kind, in allocation order.
#[allow(dead_code)]
pub fn nodes_of(pkg: &Package, kind: Kind) -> Vec<NodeId> {
    pkg.ast()
        .iter()
        .filter(|(_, n)| n.kind() == kind)
        .map(|(id, _)| id)
        .collect()
}

/// Top-level declarations of the first file.
#[allow(dead_code)]
pub fn decls(pkg: &Package) -> Vec<NodeId> {
    let file = pkg.files()[0].1;
    match pkg.ast().node(file) {
        Node::File { decls, .. } => decls.clone(),
        _ => Vec::new(),
    }
}
