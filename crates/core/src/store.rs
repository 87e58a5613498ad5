//! Lazily populated cache of parsed packages, keyed by import path.

use crate::config::StoreConfig;
use crate::error::{GowalkError, Result};
use crate::format::Formatter;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use gowalk_go::{DirParser, GoParser, NodeId, Package, printer};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Shared package cache. Each import path is parsed at most once.
pub struct PackageStore {
    config: StoreConfig,
    parser: Box<dyn DirParser>,
    cache: DashMap<String, Arc<Package>>,
    parse_count: AtomicUsize,
}

impl PackageStore {
    pub fn new(config: StoreConfig) -> Self {
        let parser = GoParser::new().allow_syntax_errors(config.allow_syntax_errors);
        Self::with_parser(config, Box::new(parser))
    }

    pub fn with_parser(config: StoreConfig, parser: Box<dyn DirParser>) -> Self {
        Self {
            config,
            parser,
            cache: DashMap::new(),
            parse_count: AtomicUsize::new(0),
        }
    }

    /// Store over the discovered source roots.
    pub fn discover() -> Self {
        Self::new(StoreConfig::discover())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of directory parses performed so far.
    pub fn parse_count(&self) -> usize {
        self.parse_count.load(Ordering::Relaxed)
    }

    /// Returns the cached package or parses it from the first root that
    /// yields one. When every root fails the first failure is reported.
    pub fn open(&self, import_path: &str) -> Result<Arc<Package>> {
        if let Some(pkg) = self.cache.get(import_path) {
            debug!("Cache hit for {}", import_path);
            return Ok(Arc::clone(pkg.value()));
        }

        match self.cache.entry(import_path.to_string()) {
            Entry::Occupied(e) => Ok(Arc::clone(e.get())),
            Entry::Vacant(slot) => {
                let pkg = Arc::new(self.parse_from_roots(import_path)?);
                slot.insert(Arc::clone(&pkg));
                Ok(pkg)
            }
        }
    }

    fn parse_from_roots(&self, import_path: &str) -> Result<Package> {
        let filter = |name: &str| self.config.accepts(name);
        let mut first: Option<GowalkError> = None;
        for root in &self.config.roots {
            let dir = root.join(import_path);
            self.parse_count.fetch_add(1, Ordering::Relaxed);
            match self.parser.parse_dir(import_path, &dir, &filter) {
                Ok(pkg) => {
                    info!(
                        "Loaded {} from {} ({} files)",
                        import_path,
                        dir.display(),
                        pkg.files().len()
                    );
                    return Ok(pkg);
                }
                Err(e) => {
                    warn!("Cannot load {} from {}: {}", import_path, dir.display(), e);
                    if first.is_none() {
                        first = Some(e.into());
                    }
                }
            }
        }
        let cause = first.unwrap_or_else(|| GowalkError::Internal("no source roots configured".into()));
        Err(GowalkError::load(import_path, cause))
    }

    /// Cached package, without loading.
    pub fn get(&self, import_path: &str) -> Option<Arc<Package>> {
        self.cache.get(import_path).map(|p| Arc::clone(p.value()))
    }

    pub fn contains(&self, import_path: &str) -> bool {
        self.cache.contains_key(import_path)
    }

    /// Seeds the cache with an already built package, replacing any entry
    /// under the same import path.
    pub fn insert(&self, package: Package) -> Arc<Package> {
        let pkg = Arc::new(package);
        self.cache
            .insert(pkg.import_path().to_string(), Arc::clone(&pkg));
        pkg
    }

    /// Loaded packages ordered by import path.
    pub fn packages(&self) -> Vec<Arc<Package>> {
        let mut all: Vec<Arc<Package>> = self.cache.iter().map(|e| Arc::clone(e.value())).collect();
        all.sort_by(|a, b| a.import_path().cmp(b.import_path()));
        all
    }

    /// Finds a loaded file by its path (or bare name) and returns its
    /// package with the `File` node.
    pub fn find_file(&self, file: &Path) -> Option<(Arc<Package>, NodeId)> {
        let name = file.to_string_lossy();
        self.packages()
            .into_iter()
            .find_map(|pkg| pkg.file(&name).map(|id| (Arc::clone(&pkg), id)))
    }

    /// Regenerates a loaded file through `formatter` and writes it back.
    pub fn save(&self, file: &Path, formatter: &dyn Formatter) -> Result<()> {
        let (pkg, id) = self
            .find_file(file)
            .ok_or_else(|| GowalkError::UnknownFile(file.display().to_string()))?;
        let src = printer::render(pkg.ast(), id);
        let formatted = formatter.format(&src)?;
        let target = pkg
            .ast()
            .file_of(id)
            .map(|s| s.path().to_path_buf())
            .unwrap_or_else(|| file.to_path_buf());
        std::fs::write(&target, formatted)?;
        info!("Saved {}", target.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gowalk_go::ParseError;

    struct FailingParser;

    impl DirParser for FailingParser {
        fn parse_dir(
            &self,
            _import_path: &str,
            dir: &Path,
            _filter: &dyn Fn(&str) -> bool,
        ) -> gowalk_go::Result<Package> {
            Err(ParseError::NoSourceFiles(dir.to_path_buf()))
        }
    }

    #[test]
    fn test_first_error_wins() {
        let config = StoreConfig::new().with_roots(["first", "second"]);
        let store = PackageStore::with_parser(config, Box::new(FailingParser));
        let err = store.open("x/y").unwrap_err();
        let GowalkError::Load { import_path, source } = err else {
            panic!("expected load error");
        };
        assert_eq!(import_path, "x/y");
        match *source {
            GowalkError::Parsing(ParseError::NoSourceFiles(dir)) => {
                assert_eq!(dir, Path::new("first").join("x/y"));
            }
            other => panic!("unexpected cause {other:?}"),
        }
        assert_eq!(store.parse_count(), 2);
        assert!(!store.contains("x/y"));
    }

    #[test]
    fn test_no_roots() {
        let store = PackageStore::new(StoreConfig::new());
        assert!(matches!(store.open("fmt"), Err(GowalkError::Load { .. })));
    }

    #[test]
    fn test_insert_seeds_cache() {
        let pkg = GoParser::new()
            .parse_sources("seeded", Path::new("seeded"), [("a.go", "package seeded\n")])
            .unwrap();
        let store = PackageStore::new(StoreConfig::new());
        store.insert(pkg);
        let opened = store.open("seeded").unwrap();
        assert_eq!(opened.name(), "seeded");
        assert_eq!(store.parse_count(), 0);
    }
}
