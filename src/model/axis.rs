// src/model/axis.rs

//! Matrix axes and their values.
//!
//! An [`Axis`] is one configuration dimension (compiler, optimisation level,
//! target...). Its values are opaque to the engine: each [`AxisValue`] is an
//! identifier plus an ordered list of alias [`Token`]s that are only ever used
//! for matching, either against a command-line token or against a pattern.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::Deserialize;

use crate::errors::{MatrixError, Result};

/// A single alias of an axis value.
///
/// Booleans render as `True` / `False` so that boolean axes can be selected
/// with those literal (case-sensitive) spellings on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Bool(true) => f.write_str("True"),
            Token::Bool(false) => f.write_str("False"),
            Token::Int(n) => write!(f, "{n}"),
            Token::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Text(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Text(s)
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Bool(b)
    }
}

impl From<i64> for Token {
    fn from(n: i64) -> Self {
        Token::Int(n)
    }
}

impl From<i32> for Token {
    fn from(n: i32) -> Self {
        Token::Int(i64::from(n))
    }
}

/// One enumerated value of an axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AxisValue {
    name: String,
    aliases: Vec<Token>,
}

impl AxisValue {
    pub fn new<I, T>(name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Token>,
    {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// Identifier of the value (e.g. `VALUE1`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[Token] {
        &self.aliases
    }

    /// Human-facing label: the first alias, or the identifier if there is none.
    pub fn label(&self) -> String {
        match self.aliases.first() {
            Some(alias) => alias.to_string(),
            None => self.name.clone(),
        }
    }

    /// Every spelling this value answers to, identifier first.
    pub fn spellings(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.clone()).chain(self.aliases.iter().map(ToString::to_string))
    }

    /// Exact match of a command-line token against the identifier or any alias.
    pub fn answers_to(&self, token: &str) -> bool {
        self.spellings().any(|s| s == token)
    }

    /// Anchored regex match over the identifier and aliases.
    pub fn is_match(&self, pattern: &Regex) -> bool {
        self.spellings().any(|s| pattern.is_match(&s))
    }

    /// Like [`AxisValue::is_match`], compiling `pattern` first.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        Ok(self.is_match(&compile_pattern(pattern)?))
    }
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Compile a value pattern, anchored at both ends.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| MatrixError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// A named configuration dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    name: String,
    abbrev: char,
    desc: String,
    values: Vec<AxisValue>,
}

impl Axis {
    pub fn new(
        name: impl Into<String>,
        abbrev: char,
        desc: impl Into<String>,
        values: impl IntoIterator<Item = AxisValue>,
    ) -> Self {
        Self {
            name: name.into(),
            abbrev,
            desc: desc.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbrev(&self) -> char {
        self.abbrev
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn values(&self) -> &[AxisValue] {
        &self.values
    }

    /// Look a value up by identifier or alias.
    pub fn value(&self, token: &str) -> Option<&AxisValue> {
        self.values.iter().find(|v| v.answers_to(token))
    }

    /// Value parser used by the CLI builder.
    pub fn parse_value(&self, token: &str) -> std::result::Result<AxisValue, String> {
        self.value(token).cloned().ok_or_else(|| {
            let known: Vec<String> = self.values.iter().map(AxisValue::label).collect();
            format!(
                "invalid value '{token}' for axis '{}' (possible values: {})",
                self.name,
                known.join(", ")
            )
        })
    }

    /// Structural checks that do not depend on other registrations.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MatrixError::InvalidAxis("axis name must not be empty".to_string()));
        }
        if self.name.starts_with('-') || self.name.contains(|c: char| c.is_whitespace() || c == '=') {
            return Err(MatrixError::InvalidAxis(format!(
                "axis name '{}' cannot be used as a long option (no leading '-', whitespace or '=')",
                self.name
            )));
        }
        if !self.abbrev.is_ascii_alphanumeric() {
            return Err(MatrixError::InvalidAxis(format!(
                "axis '{}' has invalid abbreviation '{}' (expected an ASCII letter or digit)",
                self.name, self.abbrev
            )));
        }
        if self.values.is_empty() {
            return Err(MatrixError::InvalidAxis(format!(
                "axis '{}' must declare at least one value",
                self.name
            )));
        }

        let mut names = HashSet::new();
        let mut spellings = HashSet::new();
        for value in &self.values {
            if !names.insert(value.name()) {
                return Err(MatrixError::InvalidAxis(format!(
                    "axis '{}' declares value '{}' twice",
                    self.name,
                    value.name()
                )));
            }
            // The identifier may repeat as its own alias; only cross-value
            // clashes make a token ambiguous.
            let own: HashSet<String> = value.spellings().collect();
            for spelling in own {
                if !spellings.insert(spelling.clone()) {
                    return Err(MatrixError::InvalidAxis(format!(
                        "axis '{}' has ambiguous alias '{}'",
                        self.name, spelling
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (-{})", self.name, self.abbrev)
    }
}
