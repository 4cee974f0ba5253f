//! Index building
//!
//! Drives a generation run: a strict sequential fold over the input records,
//! one recipe packaged per record, with aliases, versions, and conflicts
//! accumulated along the way and rendered into the global `index.json` at
//! the end. Any malformed record, unreadable manifest, or write failure
//! aborts the whole run; a missing manifest or an aliases-only manifest is
//! the only thing skipped silently.

use std::io::BufRead;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::aliases::AliasTable;
use crate::catalog::VersionCatalog;
use crate::error::{CoreError, Result};
use crate::links::{Links, RepositoryHost};
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::natsort;
use crate::packager;

/// One input record: a tree reference plus a `package/version` path.
///
/// The input format matches a recursive tree listing
/// (`<mode> <type> <tree-sha>\t<path>`); only the third space-delimited
/// token and the path are used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub tree_ref: String,
    pub package: String,
    pub version: String,
}

impl RecipeRecord {
    /// Parse one input line. Anything without the expected tab/space
    /// structure is fatal.
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = || CoreError::MalformedRecord {
            line: line.to_string(),
        };

        let trimmed = line.trim();
        let (descriptor, path) = trimmed.split_once('\t').ok_or_else(malformed)?;
        let tree_ref = descriptor.split(' ').nth(2).ok_or_else(malformed)?;
        let (package, version) = path.rsplit_once('/').ok_or_else(malformed)?;

        Ok(Self {
            tree_ref: tree_ref.to_string(),
            package: package.to_string(),
            version: version.to_string(),
        })
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Repository identifier: `owner/repo` or a full URL.
    pub repository: String,
    /// Branch holding the recipe sources.
    pub source_branch: String,
    /// Branch the generated endpoint is published on.
    pub endpoint_branch: String,
    /// Directory the recipe trees live under.
    pub root: PathBuf,
    /// Directory artifacts and `index.json` are written to.
    pub output_dir: PathBuf,
    /// Optional version catalog used to seed aliases and re-emitted verbatim.
    pub catalog: Option<VersionCatalog>,
    /// Marks the index as community-contributed.
    pub contrib: bool,
}

/// Counters reported after a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    /// Input records consumed.
    pub records: usize,
    /// Recipes packaged into artifacts.
    pub packaged: usize,
    /// Records skipped (missing manifest or empty after alias extraction).
    pub skipped: usize,
}

/// The aggregate document written to `index.json`.
#[derive(Debug, Serialize)]
pub struct GlobalIndex {
    pub aliases: IndexMap<String, String>,
    pub recipes: IndexMap<String, Vec<String>>,
    #[serde(rename = "recipe-conflicts")]
    pub conflicts: IndexMap<String, IndexMap<String, IndexMap<String, Value>>>,
    pub versions: Value,
    pub branch: String,
    pub is_contrib: bool,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Run the full pipeline over `input`, writing per-recipe artifacts and the
/// global index into `options.output_dir`.
pub fn generate(input: impl BufRead, options: &GenerateOptions) -> Result<Summary> {
    let mut builder = IndexBuilder::new();
    if let Some(catalog) = &options.catalog {
        builder.aliases.seed_from_catalog(catalog);
    }

    let mut summary = Summary::default();
    for line in input.lines() {
        let line = line.map_err(CoreError::Io)?;
        summary.records += 1;

        let record = RecipeRecord::parse(&line)?;
        if builder.process(&record, options)? {
            summary.packaged += 1;
        } else {
            summary.skipped += 1;
        }
    }

    let index = builder.finish(options);
    let json = packager::to_pretty_json(&index)?;
    std::fs::write(options.output_dir.join("index.json"), json)?;

    Ok(summary)
}

/// Aggregation state for a run.
#[derive(Debug, Default)]
struct IndexBuilder {
    aliases: AliasTable,
    recipes: IndexMap<String, Vec<String>>,
    conflicts: IndexMap<String, IndexMap<String, IndexMap<String, Value>>>,
}

impl IndexBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Handle one record: resolve aliases, package the recipe, and fold the
    /// result into the tables. Returns whether an artifact was written.
    fn process(&mut self, record: &RecipeRecord, options: &GenerateOptions) -> Result<bool> {
        let manifest_path = options
            .root
            .join(&record.package)
            .join(&record.version)
            .join(MANIFEST_FILE);
        if !manifest_path.exists() {
            tracing::debug!(
                package = %record.package,
                version = %record.version,
                "no manifest, skipping"
            );
            return Ok(false);
        }

        let mut manifest = Manifest::load(&manifest_path)?;

        for alias in manifest.aliases() {
            self.aliases.register(&alias, &record.package);
        }
        self.aliases.register_derived(&record.package);

        let packaged = packager::package_recipe(
            &options.root,
            &record.package,
            &record.version,
            &mut manifest,
            &record.tree_ref,
            &options.output_dir,
        )?;
        if !packaged {
            return Ok(false);
        }

        let versions = self.recipes.entry(record.package.clone()).or_default();
        versions.push(record.version.clone());
        versions.sort_by(|a, b| natsort::compare(a, b));

        if let Some(conflicts) = manifest.conflicts() {
            let per_package = self.conflicts.entry(record.package.clone()).or_default();
            per_package.insert(record.version.clone(), conflicts);
            natsort::sort_keys(per_package);
        }

        Ok(true)
    }

    /// Render the final index document, sorting every table naturally.
    fn finish(mut self, options: &GenerateOptions) -> GlobalIndex {
        self.aliases.sort_natural();
        natsort::sort_keys(&mut self.recipes);
        natsort::sort_keys(&mut self.conflicts);

        // With no catalog the key still serializes, as an empty object.
        let versions = options
            .catalog
            .as_ref()
            .map(|catalog| catalog.raw().clone())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        GlobalIndex {
            aliases: self.aliases.into_inner(),
            recipes: self.recipes,
            conflicts: self.conflicts,
            versions,
            branch: options.source_branch.clone(),
            is_contrib: options.contrib,
            links: RepositoryHost::detect(&options.repository)
                .links(&options.source_branch, &options.endpoint_branch),
        }
    }
}
