//! Alias resolution
//!
//! Maintains the table mapping short package aliases to canonical package
//! names. Aliases come from two sources: the version catalog's split
//! packages, and per-manifest `aliases` declarations. Registration is an
//! ordered merge where later entries silently overwrite earlier ones, so the
//! final table depends on input order.

use indexmap::IndexMap;

use crate::catalog::VersionCatalog;
use crate::natsort;

/// Namespace whose packages get a derived short alias.
pub const CORE_NAMESPACE: &str = "larder/";

/// Packages with this suffix are meta-packages and never get a derived alias.
pub const META_PACKAGE_SUFFIX: &str = "-pack";

/// Alias -> canonical package name, in registration order until sorted.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: IndexMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one alias for a package, along with its hyphen-free form.
    /// Later registrations overwrite earlier ones for the same key.
    pub fn register(&mut self, alias: &str, package: &str) {
        self.entries.insert(alias.to_string(), package.to_string());
        self.entries.insert(alias.replace('-', ""), package.to_string());
    }

    /// Register the short alias derived from a core-namespace package name.
    /// Meta-packages and packages outside the namespace contribute nothing.
    pub fn register_derived(&mut self, package: &str) {
        if let Some(short) = derived_alias(package) {
            self.register(short, package);
        }
    }

    /// Seed the table from the catalog's split packages.
    pub fn seed_from_catalog(&mut self, catalog: &VersionCatalog) {
        for package in catalog.split_packages() {
            self.register_derived(package);
        }
    }

    /// Resolve an alias to its canonical package name.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Sort the table's keys in place with the natural comparator.
    pub fn sort_natural(&mut self) {
        natsort::sort_keys(&mut self.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the table, yielding the underlying ordered map.
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.entries
    }
}

/// The short alias for a core-namespace, non-meta package, if any.
fn derived_alias(package: &str) -> Option<&str> {
    if package.ends_with(META_PACKAGE_SUFFIX) {
        return None;
    }
    package.strip_prefix(CORE_NAMESPACE)
}
