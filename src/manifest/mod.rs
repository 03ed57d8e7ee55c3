// src/manifest/mod.rs

//! Declarative matrices read from a TOML manifest (`Matrix.toml`).
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a manifest from disk and resolve its path (`loader.rs`).
//! - Validate axis references, patterns and templates (`validate.rs`).
//! - Register the declared axes, actions and filters on a runner
//!   (`build.rs`), with step templates expanded per config (`template.rs`).

pub mod build;
pub mod loader;
pub mod model;
pub mod template;
pub mod validate;

pub use loader::{
    DEFAULT_MANIFEST, MANIFEST_ENV, load_and_validate, load_from_path, manifest_path,
    parse_manifest,
};
pub use model::{ActionSpec, AxisSpec, FilterSpec, ManifestFile, StepSpec, ValueSpec};
pub use template::{Guard, StepTemplate, Template, TemplateAction};
pub use validate::validate_manifest;
