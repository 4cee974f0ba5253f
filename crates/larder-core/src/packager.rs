//! Recipe packaging
//!
//! Turns one (package, version) recipe directory into a self-contained JSON
//! artifact bundling the manifest and every supporting file. Two specially
//! named files are folded into manifest fields instead of the file list, and
//! the artifact is written twice: once under a stable name keyed by version,
//! once under `archived/` keyed by tree reference.

use base64::Engine as _;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::Result;
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::natsort;

/// Post-install transcript, folded into the manifest as `post-install-output`.
pub const POST_INSTALL_FILE: &str = "post-install.txt";

/// Build recipe, folded into the manifest as `makefile`.
pub const MAKEFILE_FILE: &str = "Makefile";

/// One packaged file from a recipe version directory.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub contents: FileContents,
    pub executable: bool,
}

/// File payload: a line sequence for UTF-8 text, base64 for anything else.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FileContents {
    Text(Vec<String>),
    Binary(String),
}

impl FileContents {
    /// Classify raw bytes. Binary detection is simply the UTF-8 validity
    /// test; text is split on `\n` with separators dropped, so a trailing
    /// newline yields a final empty line and joining with `\n` reproduces
    /// the bytes exactly.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text.split('\n').map(str::to_string).collect()),
            Err(invalid) => Self::Binary(
                base64::engine::general_purpose::STANDARD.encode(invalid.as_bytes()),
            ),
        }
    }
}

#[derive(Serialize)]
struct Artifact<'a> {
    manifests: IndexMap<&'a str, ArtifactEntry<'a>>,
}

#[derive(Serialize)]
struct ArtifactEntry<'a> {
    manifest: &'a Manifest,
    files: &'a IndexMap<String, FileEntry>,
    #[serde(rename = "ref")]
    tree_ref: &'a str,
}

/// Package one recipe version rooted at `root/<package>/<version>`.
///
/// Returns `Ok(false)` when the manifest has no keys left after alias
/// extraction; the recipe is dropped without error and nothing is written.
/// Filesystem and serialization failures are fatal.
pub fn package_recipe(
    root: &Path,
    package: &str,
    version: &str,
    manifest: &mut Manifest,
    tree_ref: &str,
    output_dir: &Path,
) -> Result<bool> {
    manifest.take_aliases();

    let recipe_dir = root.join(package).join(version);
    let mut files: IndexMap<String, FileEntry> = IndexMap::new();

    for entry in WalkDir::new(&recipe_dir).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = match entry.path().strip_prefix(&recipe_dir) {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(_) => continue,
        };

        if relative == MANIFEST_FILE {
            continue;
        }
        if relative == POST_INSTALL_FILE {
            manifest.set_lines("post-install-output", read_transcript(entry.path())?);
            continue;
        }
        if relative == MAKEFILE_FILE {
            manifest.set_lines("makefile", read_transcript(entry.path())?);
            continue;
        }

        let bytes = std::fs::read(entry.path())?;
        let executable = entry
            .metadata()
            .map(|metadata| is_executable(&metadata))
            .unwrap_or(false);

        files.insert(
            relative,
            FileEntry {
                contents: FileContents::from_bytes(bytes),
                executable,
            },
        );
    }

    if manifest.is_empty() {
        tracing::debug!(package, version, "manifest empty after alias extraction, skipping");
        return Ok(false);
    }

    natsort::sort_keys(&mut files);

    let mut manifests = IndexMap::new();
    manifests.insert(
        package,
        ArtifactEntry {
            manifest,
            files: &files,
            tree_ref,
        },
    );
    let json = to_pretty_json(&Artifact { manifests })?;

    let dotted = package.replace('/', ".");
    let stable_path = output_dir.join(format!("{}.{}.json", dotted, version));
    std::fs::write(&stable_path, &json)?;

    let archive_dir = output_dir.join("archived").join(&dotted);
    std::fs::create_dir_all(&archive_dir)?;
    std::fs::write(archive_dir.join(format!("{}.json", tree_ref)), &json)?;

    tracing::debug!(package, version, tree_ref, "packaged recipe");
    Ok(true)
}

/// Pretty-printed JSON with a trailing newline, slashes unescaped.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Read a special file as lines: carriage returns dropped, trailing
/// newlines trimmed, then split on `\n`.
fn read_transcript(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes).replace('\r', "");
    let text = text.trim_end_matches('\n');
    Ok(text.split('\n').map(str::to_string).collect())
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}
