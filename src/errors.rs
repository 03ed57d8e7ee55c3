// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Duplicate axis: {0}")]
    DuplicateAxis(String),

    #[error("Duplicate axis abbreviation '-{abbrev}' (already used by axis '{existing}')")]
    DuplicateAbbrev { abbrev: char, existing: String },

    #[error("Duplicate action: {0}")]
    DuplicateAction(String),

    #[error("Invalid axis definition: {0}")]
    InvalidAxis(String),

    #[error("Invalid action definition: {0}")]
    InvalidAction(String),

    #[error("Unknown axis: {0}")]
    UnknownAxis(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Filter '{filter}' failed for config [{config}]: {source:#}")]
    Filter {
        filter: String,
        config: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Action '{action}' failed for config [{config}]: {source:#}")]
    Action {
        action: String,
        config: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Action '{action}' produced an empty command for config [{config}]")]
    EmptyCommand { action: String, config: String },

    #[error("Manifest error: {0}")]
    ManifestError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MatrixError>;
