// src/manifest/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::Token;

/// A matrix manifest as read from TOML.
///
/// ```toml
/// [[axis]]
/// name = "compiler"
/// abbrev = "c"
/// desc = "Compiler"
/// values = [
///   { name = "GCC", aliases = ["gcc"] },
///   { name = "CLANG", aliases = ["clang"] },
/// ]
///
/// [[action]]
/// name = "build"
/// desc = "Build the project"
///
/// [[action.step]]
/// run = ["make", "CC={compiler}"]
///
/// [[filter]]
/// exclude = { compiler = "clang" }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    #[serde(default, rename = "axis")]
    pub axes: Vec<AxisSpec>,

    #[serde(default, rename = "action")]
    pub actions: Vec<ActionSpec>,

    #[serde(default, rename = "filter")]
    pub filters: Vec<FilterSpec>,
}

/// `[[axis]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisSpec {
    pub name: String,

    /// Single-character short option, e.g. `"c"` for `-c`.
    pub abbrev: String,

    #[serde(default)]
    pub desc: String,

    pub values: Vec<ValueSpec>,
}

/// One value of an `[[axis]]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueSpec {
    pub name: String,

    /// Strings, integers and booleans are all accepted.
    #[serde(default)]
    pub aliases: Vec<Token>,
}

/// `[[action]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSpec {
    pub name: String,

    #[serde(default)]
    pub desc: String,

    /// Axis name -> pattern; the action only yields commands for configs
    /// matching every entry.
    #[serde(default)]
    pub when: BTreeMap<String, String>,

    #[serde(default, rename = "step")]
    pub steps: Vec<StepSpec>,
}

/// `[[action.step]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    /// Argv template; `{axis}` expands to the value label of that axis.
    pub run: Vec<String>,

    #[serde(default)]
    pub shell: bool,

    /// Accepted exit codes; `[0]` when absent.
    #[serde(default)]
    pub exit_codes: Option<Vec<i32>>,

    #[serde(default)]
    pub when: BTreeMap<String, String>,

    /// Keep running later steps when this one fails.
    #[serde(default)]
    pub continue_on_failure: bool,
}

/// `[[filter]]` entry: excludes the configs matching every pattern.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    #[serde(default)]
    pub name: Option<String>,

    pub exclude: BTreeMap<String, String>,
}
