mod children;
mod find;
mod save;
mod show;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use gowalk_core::{Navigator, PackageStore, PathCursor, RootDiscoverer, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "gowalk",
    version,
    about = "Navigate and query Go source trees by dotted path",
    long_about = "gowalk loads Go packages by import path from the discovered source roots \
                  ($GOPATH/src, $GOROOT/src, vendor and parent directories) and resolves \
                  dotted paths such as `Store.Items` or `Store:Add` to declarations."
)]
pub struct Cli {
    /// Source root searched before the discovered ones (repeatable)
    #[arg(long = "root", value_name = "DIR", global = true)]
    pub roots: Vec<PathBuf>,

    /// Additional file-name suffix to skip when parsing (repeatable)
    #[arg(long = "exclude", value_name = "SUFFIX", global = true)]
    pub excludes: Vec<String>,

    /// Load files that contain syntax errors
    #[arg(long, global = true)]
    pub allow_syntax_errors: bool,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Import path of the package to open
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the source text of a path
    Src {
        /// Dotted path, e.g. `Store.Items` or `Store:Add`
        #[arg(value_name = "PATH", default_value = "")]
        path: String,

        /// Resolve a local variable from the path's scope
        #[arg(long, value_name = "NAME")]
        var: Option<String>,

        /// Print the declared type instead of the declaration
        #[arg(long = "type")]
        ty: bool,
    },
    /// Print the source position of a path
    Pos {
        #[arg(value_name = "PATH", default_value = "")]
        path: String,

        /// Print a JSON summary instead of `file:line:column`
        #[arg(long)]
        json: bool,
    },
    /// List the names reachable from a path
    Children {
        #[arg(value_name = "PATH", default_value = "")]
        path: String,
    },
    /// Walk the package and print every match
    #[command(
        long_about = "Walks the tree below PATH (the package by default). The walk only enters \
                            nodes of the given kinds or families (lit, expr, type, stmt, spec, decl, \
                            ast); a subtree whose root is excluded is skipped entirely."
    )]
    Find {
        /// Kind or family the walk may enter (repeatable, default `ast`)
        #[arg(long = "kind", value_name = "KIND")]
        kinds: Vec<String>,

        /// Keep only nodes that declare this name
        #[arg(long)]
        name: Option<String>,

        /// Start the walk at this path
        #[arg(long, value_name = "PATH", default_value = "")]
        path: String,

        /// Print only the first match
        #[arg(long)]
        first: bool,
    },
    /// Rewrite a loaded file through a formatter
    Save {
        /// File name or path inside the package
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, default_value = "gofmt", value_parser = ["gofmt", "goimports", "none"])]
        formatter: String,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = gowalk_core::logging::init_logging("cli", cli.verbose);

    let store = Arc::new(PackageStore::new(store_config(&cli)));
    let root = Navigator::open(Arc::clone(&store), &cli.package)
        .with_context(|| format!("cannot open {}", cli.package))?;

    match cli.command {
        Commands::Src { path, var, ty } => show::src(&root, &path, var.as_deref(), ty),
        Commands::Pos { path, json } => show::pos(&root, &path, json),
        Commands::Children { path } => children::run(&root, &path),
        Commands::Find {
            kinds,
            name,
            path,
            first,
        } => find::run(&root, &path, &kinds, name, first),
        Commands::Save { file, formatter } => save::run(&store, &file, &formatter),
    }
}

fn store_config(cli: &Cli) -> StoreConfig {
    let mut config = StoreConfig::new()
        .with_roots(cli.roots.iter().cloned())
        .with_roots(RootDiscoverer::new().roots().iter().cloned())
        .with_env()
        .allow_syntax_errors(cli.allow_syntax_errors);
    for suffix in &cli.excludes {
        config = config.exclude_suffix(suffix.clone());
    }
    config
}

/// Resolves `path` below the package root; absent paths are errors.
pub(crate) fn resolve(root: &PathCursor, path: &str) -> anyhow::Result<PathCursor> {
    root.child(path)
        .ok_or_else(|| anyhow!("{}: no such path in {}", path, root.package().import_path()))
}

/// Like [`resolve`], then a local variable lookup from there.
pub(crate) fn resolve_var(root: &PathCursor, path: &str, var: &str) -> anyhow::Result<PathCursor> {
    resolve(root, path)?
        .var(var)
        .ok_or_else(|| anyhow!("{}: no variable {} in scope", path, var))
}
