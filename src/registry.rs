// src/registry.rs

//! Insertion-ordered, name-keyed registries for axes and actions.

use std::collections::HashMap;

use crate::model::{Action, Axis};

/// Anything that is registered under a unique name.
pub trait Named {
    fn registered_name(&self) -> &str;
}

impl Named for Axis {
    fn registered_name(&self) -> &str {
        self.name()
    }
}

impl Named for Action {
    fn registered_name(&self) -> &str {
        self.name()
    }
}

/// Registry that iterates in registration order.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Named> Registry<T> {
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).and_then(|&i| self.items.get(i))
    }

    /// Position of `name` in registration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Append `item`. Callers check for duplicates first.
    pub(crate) fn insert(&mut self, item: T) {
        self.index
            .insert(item.registered_name().to_string(), self.items.len());
        self.items.push(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Named::registered_name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
