use crate::resolve;
use gowalk_core::{OptionCursorExt, PathCursor};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct ChildRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Position")]
    pos: String,
}

pub fn run(root: &PathCursor, path: &str) -> anyhow::Result<()> {
    let cursor = resolve(root, path)?;
    let rows: Vec<ChildRow> = cursor
        .child_list()
        .into_iter()
        .map(|name| {
            let child = cursor.child(&name);
            ChildRow {
                kind: child.kind().map(|k| k.to_string()).unwrap_or_default(),
                pos: child.pos().to_string(),
                name,
            }
        })
        .collect();

    if rows.is_empty() {
        println!("{} has no children", cursor.kind());
    } else {
        println!("{}", Table::new(&rows).with(Style::psql()));
    }
    Ok(())
}
