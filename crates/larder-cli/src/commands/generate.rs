//! Generate command - build the endpoint files from a recipe listing

use console::style;
use larder_core::{GenerateOptions, VersionCatalog};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

pub fn run(
    repository: &str,
    source_branch: &str,
    endpoint_branch: &str,
    output_dir: &Path,
    versions_json: Option<&Path>,
    contrib: bool,
) -> Result<()> {
    let catalog = match versions_json {
        Some(path) => Some(VersionCatalog::load(path).into_diagnostic()?),
        None => None,
    };

    let options = GenerateOptions {
        repository: repository.to_string(),
        source_branch: source_branch.to_string(),
        endpoint_branch: endpoint_branch.to_string(),
        root: PathBuf::from("."),
        output_dir: output_dir.to_path_buf(),
        catalog,
        contrib,
    };

    let stdin = std::io::stdin();
    let summary = larder_core::generate(stdin.lock(), &options).into_diagnostic()?;

    println!(
        "{} {} recipe(s) from {} record(s)",
        style("Packaged").green().bold(),
        summary.packaged,
        summary.records
    );
    if summary.skipped > 0 {
        println!(
            "  {} {} record(s) without a usable manifest",
            style("Skipped").dim(),
            summary.skipped
        );
    }
    println!(
        "  {} {}",
        style("Index").cyan().bold(),
        output_dir.join("index.json").display()
    );

    Ok(())
}
