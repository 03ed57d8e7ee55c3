// src/matrix/mod.rs

//! Combination engine.
//!
//! Turns per-axis selections into the list of [`Config`]s to run:
//!
//! - [`product`] enumerates the full Cartesian product;
//! - [`pairwise`] builds a reduced 2-way covering array;
//! - [`filter`] drops the configs the caller declared invalid.
//!
//! Everything here is pure and synchronous.

pub mod filter;
pub mod pairwise;
pub mod product;

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::errors::Result;
use crate::model::{Assignment, Axis, AxisValue, Config};

pub use filter::{Filter, FilterChain};

/// How the selected values are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every combination.
    #[default]
    Full,
    /// Every pair of values of two different axes at least once.
    Pairwise,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Mode::Full),
            "pairwise" => Ok(Mode::Pairwise),
            other => Err(format!(
                "invalid combination mode: {other} (expected \"full\" or \"pairwise\")"
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => f.write_str("full"),
            Mode::Pairwise => f.write_str("pairwise"),
        }
    }
}

/// The values selected for one axis, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub axis: String,
    pub values: Vec<AxisValue>,
}

impl Selection {
    /// Select `values`, dropping repeats (first occurrence wins).
    pub fn new(axis: impl Into<String>, values: impl IntoIterator<Item = AxisValue>) -> Self {
        let mut unique: Vec<AxisValue> = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Self {
            axis: axis.into(),
            values: unique,
        }
    }

    /// Select every declared value of `axis`, in declared order.
    pub fn all(axis: &Axis) -> Self {
        Self::new(axis.name(), axis.values().iter().cloned())
    }
}

/// Combine the selections into configs (before filtering).
pub fn combine(selections: &[Selection], mode: Mode) -> Vec<Config> {
    let sizes: Vec<usize> = selections.iter().map(|s| s.values.len()).collect();
    let rows = match mode {
        Mode::Full => product::product_rows(&sizes),
        Mode::Pairwise => pairwise::covering_rows(&sizes),
    };

    rows.into_iter()
        .map(|row| {
            let assignments = selections
                .iter()
                .zip(row)
                .map(|(selection, index)| Assignment {
                    axis: selection.axis.clone(),
                    value: selection.values[index].clone(),
                })
                .collect();
            Config::new(assignments)
        })
        .collect()
}

/// Combine the selections and keep only the configs every filter accepts.
pub fn expand(selections: &[Selection], mode: Mode, filters: &FilterChain) -> Result<Vec<Config>> {
    let configs = combine(selections, mode);
    let generated = configs.len();
    let kept = filters.apply(configs)?;
    info!(
        %mode,
        generated,
        eligible = kept.len(),
        "expanded configuration matrix"
    );
    Ok(kept)
}
