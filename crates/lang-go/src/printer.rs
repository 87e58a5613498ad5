//! Source rendering for nodes and comment groups.

use crate::ast::{Ast, Node, NodeId};

/// Literal source text of a node.
///
/// A `Package` renders every file in order, each prefixed by a
/// `// with <filename>:` header line. Synthetic nodes render as `""`.
pub fn render(ast: &Ast, id: NodeId) -> String {
    match ast.get(id) {
        Some(Node::Package { files, .. }) => {
            let mut out = String::new();
            for (name, file) in files {
                out.push_str("\n// with ");
                out.push_str(name);
                out.push_str(": \n");
                out.push_str(ast.text(*file).unwrap_or_default());
            }
            out
        }
        Some(_) => ast.text(id).unwrap_or_default().to_string(),
        None => String::new(),
    }
}

/// Text of a comment group with comment markers removed.
///
/// Leading and trailing blank lines are dropped, runs of blank lines collapse
/// into one, and a non-empty result ends in a newline.
pub fn comment_text(ast: &Ast, group: NodeId) -> String {
    let Some(Node::CommentGroup { list }) = ast.get(group) else {
        return String::new();
    };
    let mut lines: Vec<String> = Vec::new();
    for comment in list {
        let Some(Node::Comment { text }) = ast.get(*comment) else {
            continue;
        };
        if let Some(rest) = text.strip_prefix("//") {
            lines.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
        } else {
            let body = text
                .strip_prefix("/*")
                .and_then(|t| t.strip_suffix("*/"))
                .unwrap_or(text);
            lines.extend(body.lines().map(str::to_string));
        }
    }

    let mut out: Vec<&str> = Vec::new();
    for line in &lines {
        let line = line.trim_end();
        if line.is_empty() && out.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    if out.is_empty() {
        return String::new();
    }
    let mut text = out.join("\n");
    text.push('\n');
    text
}
