// src/manifest/loader.rs

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{MatrixError, Result};
use crate::manifest::model::ManifestFile;
use crate::manifest::validate::validate_manifest;

/// Environment variable naming the manifest when `--matrix` is not given.
pub const MANIFEST_ENV: &str = "MATRIX_RUNNER_FILE";

/// Manifest looked up in the working directory by default.
pub const DEFAULT_MANIFEST: &str = "Matrix.toml";

/// Load a manifest and return the raw `ManifestFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ManifestFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        MatrixError::ManifestError(format!("cannot read manifest {}: {e}", path.display()))
    })?;
    parse_manifest(&contents)
}

/// Parse manifest text.
pub fn parse_manifest(contents: &str) -> Result<ManifestFile> {
    Ok(toml::from_str(contents)?)
}

/// Load a manifest from `path` and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ManifestFile> {
    let path = path.as_ref();
    let manifest = load_from_path(path)?;
    validate_manifest(&manifest)?;
    debug!(
        path = %path.display(),
        axes = manifest.axes.len(),
        actions = manifest.actions.len(),
        filters = manifest.filters.len(),
        "loaded manifest"
    );
    Ok(manifest)
}

/// Resolve the manifest path.
///
/// The manifest defines the command line, so `--matrix PATH` /
/// `--matrix=PATH` is picked out of `argv` before the full parse. Then
/// `$MATRIX_RUNNER_FILE`, then `Matrix.toml`.
pub fn manifest_path(argv: &[OsString], env_value: Option<OsString>) -> PathBuf {
    let mut args = argv.iter();
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "--matrix" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
            break;
        }
        if let Some(path) = arg.to_str().and_then(|s| s.strip_prefix("--matrix=")) {
            return PathBuf::from(path);
        }
    }
    env_value
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST))
}
