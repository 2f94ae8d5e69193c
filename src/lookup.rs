//! Code description lookups.
//!
//! The codec never interprets the meaning of a code. A [`Lookup`] attached to
//! a field turns a decoded value into a human-readable description, either
//! from an in-memory table or through a caller-supplied function (for
//! example one backed by a reference-data service).

use crate::error::{EuringError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a function-backed lookup.
pub type LookupFn = dyn Fn(&str) -> Result<String> + Send + Sync;

/// A source of code descriptions.
#[derive(Clone)]
pub enum Lookup {
    /// Fixed code → description table.
    Table(IndexMap<String, String>),
    /// Arbitrary resolver.
    Function(Arc<LookupFn>),
}

impl Lookup {
    /// Build a table lookup from `(code, description)` pairs.
    pub fn table<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Lookup::Table(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap a resolver function.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Lookup::Function(Arc::new(f))
    }

    /// Describe `code`.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::Lookup`] when a table has no entry for the
    /// code, or whatever error the resolver function returns.
    pub fn describe(&self, code: &str) -> Result<String> {
        match self {
            Lookup::Table(table) => table.get(code).cloned().ok_or_else(|| {
                EuringError::Lookup(format!("Value \"{code}\" is not a valid code."))
            }),
            Lookup::Function(f) => f(code),
        }
    }
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Table(table) => f.debug_tuple("Table").field(&table.len()).finish(),
            Lookup::Function(_) => f.write_str("Function(..)"),
        }
    }
}
