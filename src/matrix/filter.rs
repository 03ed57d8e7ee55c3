// src/matrix/filter.rs

//! Config filters.
//!
//! A [`Filter`] is a named predicate over a [`Config`]. Returning `Ok(false)`
//! rejects the config; returning an error is a fatal configuration error
//! that aborts the run (it is never treated as a rejection).

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{MatrixError, Result};
use crate::model::Config;

type Predicate = dyn Fn(&Config) -> anyhow::Result<bool> + Send + Sync;

#[derive(Clone)]
pub struct Filter {
    name: String,
    predicate: Arc<Predicate>,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Filter {
    /// Accept the configs for which `predicate` returns `true`.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Config) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Reject the configs for which `predicate` returns `true`.
    pub fn exclude<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Config) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self::new(name, move |config| predicate(config).map(|hit| !hit))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accepts(&self, config: &Config) -> Result<bool> {
        (self.predicate)(config).map_err(|source| MatrixError::Filter {
            filter: self.name.clone(),
            config: config.to_string(),
            source,
        })
    }
}

/// Ordered list of filters, combined with logical AND.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// `true` iff every filter accepts `config`; stops at the first rejection.
    pub fn accepts(&self, config: &Config) -> Result<bool> {
        for filter in &self.filters {
            if !filter.accepts(config)? {
                debug!(filter = %filter.name(), config = %config, "config rejected by filter");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Keep the accepted configs, preserving order.
    pub fn apply(&self, configs: Vec<Config>) -> Result<Vec<Config>> {
        let mut kept = Vec::with_capacity(configs.len());
        for config in configs {
            if self.accepts(&config)? {
                kept.push(config);
            }
        }
        Ok(kept)
    }
}
