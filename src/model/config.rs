// src/model/config.rs

//! A single point of the matrix.

use std::fmt;
use std::sync::Arc;

use crate::errors::{MatrixError, Result};
use crate::model::axis::AxisValue;

/// One axis assignment inside a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub axis: String,
    pub value: AxisValue,
}

/// Immutable assignment of exactly one value to every registered axis.
///
/// Assignments are kept in axis registration order. Cloning is cheap (the
/// assignments are shared), so configs are passed around by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Config {
    assignments: Arc<[Assignment]>,
}

impl Config {
    pub(crate) fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments: Arc::from(assignments),
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Value assigned to `axis`, if the axis exists.
    pub fn get(&self, axis: &str) -> Option<&AxisValue> {
        self.assignments
            .iter()
            .find(|a| a.axis == axis)
            .map(|a| &a.value)
    }

    /// Value assigned to `axis`, failing for unknown axes.
    pub fn value(&self, axis: &str) -> Result<&AxisValue> {
        self.get(axis)
            .ok_or_else(|| MatrixError::UnknownAxis(axis.to_string()))
    }

    /// Whether `axis` is set to the value identified (or aliased) by `value`.
    pub fn is(&self, axis: &str, value: &str) -> bool {
        self.get(axis).is_some_and(|v| v.answers_to(value))
    }

    /// Anchored pattern match of the value assigned to `axis`.
    pub fn matches(&self, axis: &str, pattern: &str) -> Result<bool> {
        self.value(axis)?.matches(pattern)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.assignments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", a.axis, a.value)?;
        }
        Ok(())
    }
}
