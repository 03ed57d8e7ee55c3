// src/manifest/validate.rs

use std::collections::{BTreeMap, HashSet};

use crate::errors::{MatrixError, Result};
use crate::manifest::model::ManifestFile;
use crate::manifest::template::Template;
use crate::model::compile_pattern;

/// Semantic checks on a loaded manifest.
///
/// This checks:
/// - there is at least one axis and one action
/// - every `abbrev` is exactly one character
/// - every action has at least one step and every step a non-empty `run`
/// - every `when` / `exclude` key and `{placeholder}` names a declared axis
/// - every pattern compiles and every template parses
///
/// Duplicate names, reserved names and alias clashes are rejected later by
/// the runner's registration.
pub fn validate_manifest(manifest: &ManifestFile) -> Result<()> {
    ensure_not_empty(manifest)?;

    let axes: HashSet<&str> = manifest.axes.iter().map(|a| a.name.as_str()).collect();

    for axis in &manifest.axes {
        if axis.abbrev.chars().count() != 1 {
            return Err(MatrixError::ManifestError(format!(
                "axis '{}' must have a single-character abbrev (got '{}')",
                axis.name, axis.abbrev
            )));
        }
    }

    for action in &manifest.actions {
        let context = format!("action '{}'", action.name);
        if action.steps.is_empty() {
            return Err(MatrixError::ManifestError(format!(
                "{context} must declare at least one [[action.step]]"
            )));
        }
        validate_patterns(&axes, &action.when, &context)?;

        for (i, step) in action.steps.iter().enumerate() {
            let context = format!("step {} of action '{}'", i + 1, action.name);
            if step.run.is_empty() || step.run.iter().all(|arg| arg.trim().is_empty()) {
                return Err(MatrixError::ManifestError(format!(
                    "{context} has an empty `run`"
                )));
            }
            if step.exit_codes.as_ref().is_some_and(Vec::is_empty) {
                return Err(MatrixError::ManifestError(format!(
                    "{context} accepts no exit code"
                )));
            }
            validate_patterns(&axes, &step.when, &context)?;
            for arg in &step.run {
                let template = Template::parse(arg)?;
                if let Some(unknown) = template.placeholders().find(|p| !axes.contains(p)) {
                    return Err(MatrixError::ManifestError(format!(
                        "{context} references unknown axis '{{{unknown}}}'"
                    )));
                }
            }
        }
    }

    for (i, filter) in manifest.filters.iter().enumerate() {
        let context = match &filter.name {
            Some(name) => format!("filter '{name}'"),
            None => format!("filter #{}", i + 1),
        };
        if filter.exclude.is_empty() {
            return Err(MatrixError::ManifestError(format!(
                "{context} has an empty `exclude`"
            )));
        }
        validate_patterns(&axes, &filter.exclude, &context)?;
    }

    Ok(())
}

fn ensure_not_empty(manifest: &ManifestFile) -> Result<()> {
    if manifest.axes.is_empty() {
        return Err(MatrixError::ManifestError(
            "manifest must contain at least one [[axis]]".to_string(),
        ));
    }
    if manifest.actions.is_empty() {
        return Err(MatrixError::ManifestError(
            "manifest must contain at least one [[action]]".to_string(),
        ));
    }
    Ok(())
}

fn validate_patterns(
    axes: &HashSet<&str>,
    patterns: &BTreeMap<String, String>,
    context: &str,
) -> Result<()> {
    for (axis, pattern) in patterns {
        if !axes.contains(axis.as_str()) {
            return Err(MatrixError::ManifestError(format!(
                "{context} matches on unknown axis '{axis}'"
            )));
        }
        compile_pattern(pattern)?;
    }
    Ok(())
}
