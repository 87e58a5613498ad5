//! Store configuration and source-root discovery.
//!
//! Roots are searched in order when an import path is opened:
//! - `./`, `./vendor`
//! - `../`, `../src`, `../../`, `../../src`
//! - every `$GOPATH` entry joined with `src` (`~/go` when unset)
//! - `$GOROOT/src`

use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_EXCLUDE: &str = "_test.go";

pub const ENV_MAX_DEPTH: &str = "GOWALK_MAX_DEPTH";
pub const ENV_EXCLUDE: &str = "GOWALK_EXCLUDE";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Candidate directories, each joined with the import path.
    pub roots: Vec<PathBuf>,
    /// Files whose name ends with one of these suffixes are not parsed.
    pub exclude_suffixes: Vec<String>,
    /// Bound on nested resolution steps of one cursor query.
    pub max_depth: usize,
    pub allow_syntax_errors: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            exclude_suffixes: vec![DEFAULT_EXCLUDE.to_string()],
            max_depth: DEFAULT_MAX_DEPTH,
            allow_syntax_errors: false,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovered roots plus environment overrides.
    pub fn discover() -> Self {
        let config = Self {
            roots: RootDiscoverer::new().roots().to_vec(),
            ..Self::default()
        };
        config.with_env()
    }

    /// Applies `GOWALK_MAX_DEPTH` and `GOWALK_EXCLUDE` when set.
    pub fn with_env(mut self) -> Self {
        if let Some(depth) = std::env::var(ENV_MAX_DEPTH)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
        {
            self.max_depth = depth;
        }
        if let Ok(exclude) = std::env::var(ENV_EXCLUDE) {
            self.exclude_suffixes = exclude
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    pub fn exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exclude_suffixes.push(suffix.into());
        self
    }

    pub fn without_excludes(mut self) -> Self {
        self.exclude_suffixes.clear();
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn allow_syntax_errors(mut self, allow: bool) -> Self {
        self.allow_syntax_errors = allow;
        self
    }

    /// `true` when a file name survives the exclusion list.
    pub fn accepts(&self, file_name: &str) -> bool {
        !self
            .exclude_suffixes
            .iter()
            .any(|s| file_name.ends_with(s.as_str()))
    }
}

/// Finds the directories Go import paths may live under.
pub struct RootDiscoverer {
    roots: Vec<PathBuf>,
}

impl RootDiscoverer {
    pub fn new() -> Self {
        let gopath = std::env::var_os("GOPATH");
        let goroot = std::env::var_os("GOROOT");
        Self::from_env(gopath.as_deref().map(Path::new), goroot.as_deref().map(Path::new))
    }

    /// Discovery with explicit `GOPATH` / `GOROOT` values.
    pub fn from_env(gopath: Option<&Path>, goroot: Option<&Path>) -> Self {
        let mut candidates: Vec<PathBuf> = ["./", "./vendor", "../", "../src", "../../", "../../src"]
            .iter()
            .map(PathBuf::from)
            .collect();

        match gopath {
            Some(list) => {
                candidates.extend(std::env::split_paths(list).map(|p| p.join("src")));
            }
            None => {
                if let Some(home) = dirs::home_dir() {
                    candidates.push(home.join("go").join("src"));
                }
            }
        }

        if let Some(goroot) = goroot {
            candidates.push(goroot.join("src"));
        }

        let roots = Self::clean(candidates);
        debug!("Discovered {} source roots", roots.len());
        Self { roots }
    }

    /// Normalizes, deduplicates and keeps existing directories, preserving order.
    fn clean(candidates: Vec<PathBuf>) -> Vec<PathBuf> {
        let unique: IndexSet<PathBuf> = candidates
            .into_iter()
            .map(|p| p.components().collect::<PathBuf>())
            .collect();
        unique.into_iter().filter(|p| p.is_dir()).collect()
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl Default for RootDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}
