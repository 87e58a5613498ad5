//! Path and query navigation over parsed Go packages.
//!
//! [`PackageStore`] loads and caches packages by import path,
//! [`Navigator`] resolves dotted paths into [`PathCursor`]s, and
//! [`Selector`] runs kind-masked walks with predicate chains.

pub mod config;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod format;
pub mod logging;
pub mod mask;
pub mod selector;
pub mod store;
pub mod walk;

pub use config::{RootDiscoverer, StoreConfig};
pub use cursor::{CursorInfo, Navigator, OptionCursorExt, PathCursor};
pub use error::{GowalkError, Result};
pub use format::{CommandFormatter, Formatter, NoopFormatter};
pub use mask::KindMask;
pub use selector::Selector;
pub use store::PackageStore;
pub use walk::{Predicate, walk};

pub use gowalk_go::{Kind, Node, NodeId, NodeRef, Package, Position};
