use crate::{resolve, resolve_var};
use anyhow::anyhow;
use gowalk_core::PathCursor;

pub fn src(root: &PathCursor, path: &str, var: Option<&str>, ty: bool) -> anyhow::Result<()> {
    let mut cursor = match var {
        Some(name) => resolve_var(root, path, name)?,
        None => resolve(root, path)?,
    };
    if ty {
        cursor = cursor
            .ty()
            .ok_or_else(|| anyhow!("{} has no declared type", cursor.name()))?;
    }
    println!("{}", cursor.src());
    Ok(())
}

pub fn pos(root: &PathCursor, path: &str, json: bool) -> anyhow::Result<()> {
    let cursor = resolve(root, path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&cursor.info())?);
    } else {
        println!("{}", cursor.pos());
    }
    Ok(())
}
