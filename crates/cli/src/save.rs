use gowalk_core::{CommandFormatter, Formatter, NoopFormatter, PackageStore};
use std::path::Path;

pub fn run(store: &PackageStore, file: &Path, formatter: &str) -> anyhow::Result<()> {
    let formatter: Box<dyn Formatter> = match formatter {
        "goimports" => Box::new(CommandFormatter::goimports()),
        "none" => Box::new(NoopFormatter),
        _ => Box::new(CommandFormatter::gofmt()),
    };
    store.save(file, formatter.as_ref())?;
    println!("saved {}", file.display());
    Ok(())
}
