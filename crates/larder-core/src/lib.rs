//! Larder Core - the recipe endpoint generation pipeline
//!
//! This crate turns a flat listing of versioned recipe directories into a
//! published endpoint consumable by a package-installation client:
//! - `aliases`: short-name resolution for packages
//! - `catalog`: the optional version catalog used as an alias seed
//! - `manifest`: `manifest.json` handling
//! - `packager`: per-version artifact packaging
//! - `links`: host-specific URL templates
//! - `index`: the run driver and global `index.json`
//!
//! The whole run is single-threaded and synchronous: one sequential fold
//! over the input, recomputed from scratch every time.

pub mod aliases;
pub mod catalog;
pub mod error;
pub mod index;
pub mod links;
pub mod manifest;
pub mod natsort;
pub mod packager;

pub use aliases::AliasTable;
pub use catalog::VersionCatalog;
pub use error::{CoreError, Result};
pub use index::{GenerateOptions, GlobalIndex, RecipeRecord, Summary, generate};
pub use links::{Links, RepositoryHost};
pub use manifest::Manifest;
pub use packager::{FileContents, FileEntry, package_recipe};
