// src/manifest/build.rs

//! Turn a validated manifest into registrations on a [`Runner`].

use std::collections::BTreeMap;

use crate::errors::{MatrixError, Result};
use crate::manifest::model::{ActionSpec, AxisSpec, FilterSpec, ManifestFile};
use crate::manifest::template::{Guard, StepTemplate, Template, TemplateAction};
use crate::matrix::Filter;
use crate::model::{Action, Axis, AxisValue, compile_pattern};
use crate::runner::Runner;

/// Register every axis, action and filter of `manifest` on `runner`.
///
/// Expects a manifest that passed
/// [`validate_manifest`](crate::manifest::validate_manifest).
pub fn register(runner: &mut Runner, manifest: &ManifestFile) -> Result<()> {
    let axes = manifest
        .axes
        .iter()
        .map(axis_from_spec)
        .collect::<Result<Vec<_>>>()?;
    runner.add_axes(axes)?;

    let actions = manifest
        .actions
        .iter()
        .map(action_from_spec)
        .collect::<Result<Vec<_>>>()?;
    runner.add_actions(actions)?;

    for (i, spec) in manifest.filters.iter().enumerate() {
        runner.add_filter(filter_from_spec(i, spec)?);
    }

    runner.accept_matrix_option();
    Ok(())
}

impl Runner {
    /// Register the contents of a validated manifest.
    pub fn with_manifest(mut self, manifest: &ManifestFile) -> Result<Self> {
        register(&mut self, manifest)?;
        Ok(self)
    }
}

fn axis_from_spec(spec: &AxisSpec) -> Result<Axis> {
    let mut chars = spec.abbrev.chars();
    let abbrev = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(MatrixError::ManifestError(format!(
                "axis '{}' must have a single-character abbrev",
                spec.name
            )));
        }
    };
    let values = spec
        .values
        .iter()
        .map(|v| AxisValue::new(v.name.clone(), v.aliases.iter().cloned()));
    Ok(Axis::new(spec.name.clone(), abbrev, spec.desc.clone(), values))
}

fn guard(patterns: &BTreeMap<String, String>) -> Result<Guard> {
    let compiled = patterns
        .iter()
        .map(|(axis, pattern)| Ok((axis.clone(), compile_pattern(pattern)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Guard::new(compiled))
}

fn action_from_spec(spec: &ActionSpec) -> Result<Action> {
    let steps = spec
        .steps
        .iter()
        .map(|step| {
            Ok(StepTemplate {
                argv: step
                    .run
                    .iter()
                    .map(|arg| Template::parse(arg))
                    .collect::<Result<Vec<_>>>()?,
                shell: step.shell,
                exit_codes: step.exit_codes.clone().unwrap_or_else(|| vec![0]),
                when: guard(&step.when)?,
                continue_on_failure: step.continue_on_failure,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let logic = TemplateAction::new(spec.name.clone(), guard(&spec.when)?, steps);
    Ok(Action::new(spec.name.clone(), spec.desc.clone(), logic))
}

fn filter_from_spec(index: usize, spec: &FilterSpec) -> Result<Filter> {
    let name = spec
        .name
        .clone()
        .unwrap_or_else(|| format!("filter-{}", index + 1));
    let exclude = guard(&spec.exclude)?;
    Ok(Filter::exclude(name, move |config| Ok(exclude.matches(config))))
}
