#![allow(dead_code)]

use gowalk_core::{Navigator, PackageStore, PathCursor, StoreConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

pub const SHOP: &str = "example.com/shop";
pub const MONEY: &str = "example.com/money";

pub const SHOP_GO: &str = r#"// Package shop sells things.
package shop

import (
	"example.com/money"
	"fmt"
)

// Limits of the shop.
const (
	MaxItems     = 10
	MinItems int = 1 // at least one
)

var (
	Default, Backup Store
)

// Base carries identity.
type Base struct {
	ID   string
	Tags []string
}

// Describe explains the base.
func (b *Base) Describe() string { return b.ID }

// Store holds items.
type Store struct {
	Base
	Items       []*Item
	Till        money.Amount
	name, owner string
}

// Add appends an item.
func (s *Store) Add(it *Item) (n int, err error) {
	total := len(s.Items)
	if extra := total + 1; extra > MaxItems {
		return total, fmt.Errorf("full")
	}
	for i, x := range s.Items {
		_, _ = i, x
	}
	var last *Item = it
	s.Items = append(s.Items, last)
	return len(s.Items), nil
}

func Open(name string) *Store {
	const prefix = "shop:"
	handler := func(code int) bool { return code > 0 }
	_ = handler
	return &Store{name: prefix + name}
}
"#;

pub const ITEM_GO: &str = r#"package shop

import "example.com/money"

type Item struct {
	Name  string
	Price money.Amount
}
"#;

pub const ITEM_TEST_GO: &str = r#"package shop

func helperOnlyInTests() {}
"#;

pub const MONEY_GO: &str = r#"package money

// Amount is a value in cents.
type Amount struct {
	Cents    int64
	Currency string
}

func (a Amount) String() string { return a.Currency }
"#;

pub fn write_package(root: &Path, import_path: &str, files: &[(&str, &str)]) {
    let dir = root.join(import_path);
    fs::create_dir_all(&dir).unwrap();
    for (name, src) in files {
        fs::write(dir.join(name), src).unwrap();
    }
}

/// A source root holding the shop and money packages.
pub struct Fixture {
    pub dir: TempDir,
    pub store: Arc<PackageStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        write_package(
            dir.path(),
            SHOP,
            &[
                ("shop.go", SHOP_GO),
                ("item.go", ITEM_GO),
                ("item_test.go", ITEM_TEST_GO),
            ],
        );
        write_package(dir.path(), MONEY, &[("money.go", MONEY_GO)]);
        let store = Arc::new(PackageStore::new(StoreConfig::new().with_root(dir.path())));
        Self { dir, store }
    }

    pub fn shop(&self) -> PathCursor {
        Navigator::open(Arc::clone(&self.store), SHOP).unwrap()
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}
