mod common;

use common::{Fixture, ITEM_GO, MONEY, SHOP, write_package};
use gowalk_core::{
    Formatter, GowalkError, Kind, NoopFormatter, PackageStore, Result, StoreConfig,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_open_twice_parses_once() {
    let fx = Fixture::new();
    let first = fx.store.open(SHOP).unwrap();
    let second = fx.store.open(SHOP).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(fx.store.parse_count(), 1);
    assert!(fx.store.contains(SHOP));
    assert!(!fx.store.contains(MONEY));
}

#[test]
fn test_concurrent_open_parses_once() {
    let fx = Fixture::new();
    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| fx.store.open(SHOP).unwrap());
        }
    });
    assert_eq!(fx.store.parse_count(), 1);
}

#[test]
fn test_files_sorted_and_tests_excluded() {
    let fx = Fixture::new();
    let pkg = fx.store.open(SHOP).unwrap();
    let names: Vec<&str> = pkg.files().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["item.go", "shop.go"]);
    assert_eq!(pkg.name(), "shop");

    let all = PackageStore::new(StoreConfig::new().with_root(fx.root()).without_excludes());
    let pkg = all.open(SHOP).unwrap();
    assert_eq!(pkg.files().len(), 3);
}

#[test]
fn test_first_root_that_parses_wins() {
    let empty = tempdir().unwrap();
    let fx = Fixture::new();
    fs::create_dir_all(empty.path().join(SHOP)).unwrap();

    let store = PackageStore::new(
        StoreConfig::new()
            .with_root(empty.path())
            .with_root(fx.root()),
    );
    let pkg = store.open(SHOP).unwrap();
    assert_eq!(pkg.dir(), fx.root().join(SHOP));
    assert_eq!(store.parse_count(), 2);
}

#[test]
fn test_load_failure_reports_first_root() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    let store = PackageStore::new(StoreConfig::new().with_root(a.path()).with_root(b.path()));

    let err = store.open("example.com/nowhere").unwrap_err();
    let GowalkError::Load { import_path, source } = err else {
        panic!("expected a load failure");
    };
    assert_eq!(import_path, "example.com/nowhere");
    let message = source.to_string();
    assert!(
        message.contains(&a.path().display().to_string()),
        "unexpected cause: {message}"
    );
    assert_eq!(store.parse_count(), 2);
    assert!(!store.contains("example.com/nowhere"));
}

#[test]
fn test_syntax_errors() {
    let dir = tempdir().unwrap();
    write_package(dir.path(), "broken", &[("a.go", "package broken\n\nfunc F( {\n")]);

    let strict = PackageStore::new(StoreConfig::new().with_root(dir.path()));
    assert!(matches!(strict.open("broken"), Err(GowalkError::Load { .. })));

    let lenient = PackageStore::new(
        StoreConfig::new()
            .with_root(dir.path())
            .allow_syntax_errors(true),
    );
    let pkg = lenient.open("broken").unwrap();
    assert_eq!(pkg.ast().kind(pkg.root()), Kind::Package);
}

#[test]
fn test_find_file() {
    let fx = Fixture::new();
    fx.store.open(SHOP).unwrap();
    let (pkg, file) = fx.store.find_file(Path::new("item.go")).unwrap();
    assert_eq!(pkg.import_path(), SHOP);
    assert_eq!(pkg.ast().kind(file), Kind::File);

    let full = fx.root().join(SHOP).join("shop.go");
    assert!(fx.store.find_file(&full).is_some());
    assert!(fx.store.find_file(Path::new("money.go")).is_none());
}

struct Annotate;

impl Formatter for Annotate {
    fn format(&self, src: &str) -> Result<String> {
        Ok(src.replace("package shop", "package shop // formatted"))
    }
}

#[test]
fn test_save_through_formatter() {
    let fx = Fixture::new();
    fx.store.open(SHOP).unwrap();
    let path = fx.root().join(SHOP).join("item.go");

    fx.store.save(Path::new("item.go"), &NoopFormatter).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), ITEM_GO);

    fx.store.save(&path, &Annotate).unwrap();
    let saved = fs::read_to_string(&path).unwrap();
    assert!(saved.starts_with("package shop // formatted\n"));
    assert!(!fs::read_to_string(fx.root().join(SHOP).join("shop.go")).unwrap().contains("formatted"));
}

#[test]
fn test_save_unknown_file() {
    let fx = Fixture::new();
    let err = fx.store.save(Path::new("nope.go"), &NoopFormatter).unwrap_err();
    assert!(matches!(err, GowalkError::UnknownFile(_)));
}
