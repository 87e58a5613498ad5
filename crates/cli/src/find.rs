use crate::resolve;
use anyhow::anyhow;
use gowalk_core::filter::has_name;
use gowalk_core::{Kind, KindMask, PathCursor, Predicate, Selector};
use tracing::info;

pub fn run(
    root: &PathCursor,
    path: &str,
    kinds: &[String],
    name: Option<String>,
    first: bool,
) -> anyhow::Result<()> {
    let mask = parse_mask(kinds)?;
    let start = resolve(root, path)?;

    let named = name.map(|n| has_name(n));
    let mut predicates: Vec<Predicate<'_>> = Vec::new();
    if let Some(p) = &named {
        predicates.push(p);
    }

    let mut scope = Selector::from_cursor(&start);
    if start.kind() == Kind::Package {
        // Search inside each file so `--kind decl` works from the package.
        scope = scope
            .walk(KindMask::of(Kind::Package) | Kind::File, &[])
            .slice(1, usize::MAX);
    }
    let mut found = scope.walk(mask, &predicates);
    if first {
        found = found.first();
    }
    info!("find matched {} nodes", found.len());
    print!("{}", found);
    Ok(())
}

fn parse_mask(kinds: &[String]) -> anyhow::Result<KindMask> {
    if kinds.is_empty() {
        return Ok(KindMask::AST_ALL);
    }
    kinds.iter().try_fold(KindMask::NONE, |mask, k| {
        KindMask::parse(k)
            .map(|m| mask | m)
            .ok_or_else(|| anyhow!("unknown kind or family: {}", k))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mask() {
        assert_eq!(parse_mask(&[]).unwrap(), KindMask::AST_ALL);
        let mask = parse_mask(&["decl".into(), "File".into()]).unwrap();
        assert!(mask.contains(Kind::GenDecl));
        assert!(mask.contains(Kind::File));
        assert!(!mask.contains(Kind::Ident));
        assert!(parse_mask(&["nonsense".into()]).is_err());
    }
}
