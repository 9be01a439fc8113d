//! Order specification parsing and result sorting
//!
//! An order spec is a comma-separated list of `"field direction"` tokens,
//! e.g. `"CreatedAt desc,Name asc"`. Parsing is lenient: tokens that do not
//! split into exactly two parts are dropped. Directions are lower-cased and
//! kept verbatim; the store resolves them into [`SortDirection`] when the
//! query runs.

use std::cmp::Ordering;

use crate::document::{compare_values, Document};
use crate::error::{StoreError, StoreResult};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Resolves a lower-cased direction token
    pub fn parse(direction: &str) -> StoreResult<Self> {
        match direction {
            "asc" | "ascending" | "1" => Ok(Self::Asc),
            "desc" | "descending" | "-1" => Ok(Self::Desc),
            other => Err(StoreError::query_build(format!(
                "Invalid sort direction: {}",
                other
            ))),
        }
    }

    /// Applies the direction to an ascending ordering
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Ordered sort mapping, field → raw direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<(String, String)>,
}

impl SortSpec {
    /// Parses an order spec.
    ///
    /// Returns `None` for an empty spec, meaning no sort stage at all.
    pub fn parse(order_name: &str) -> Option<Self> {
        if order_name.is_empty() {
            return None;
        }

        let mut spec = Self::default();
        for token in order_name.split(',') {
            let parts: Vec<&str> = token.split(' ').collect();
            if let [field, direction] = parts.as_slice() {
                spec.set(*field, direction.to_lowercase());
            }
        }
        Some(spec)
    }

    /// Sets a key; a repeated field keeps its position and takes the new direction
    pub fn set(&mut self, field: impl Into<String>, direction: impl Into<String>) {
        let field = field.into();
        let direction = direction.into();
        match self.keys.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = direction,
            None => self.keys.push((field, direction)),
        }
    }

    /// Ascending key shorthand
    pub fn asc(mut self, field: impl Into<String>) -> Self {
        self.set(field, "asc");
        self
    }

    /// Descending key shorthand
    pub fn desc(mut self, field: impl Into<String>) -> Self {
        self.set(field, "desc");
        self
    }

    /// True when the mapping holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over (field, raw direction) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(f, d)| (f.as_str(), d.as_str()))
    }

    /// Resolves every raw direction.
    ///
    /// Fails with a query build error on the first unknown direction.
    pub fn resolve(&self) -> StoreResult<Vec<(String, SortDirection)>> {
        self.keys
            .iter()
            .map(|(field, direction)| Ok((field.clone(), SortDirection::parse(direction)?)))
            .collect()
    }
}

/// Sorts documents by resolved keys. Stable.
pub fn sort_documents(documents: &mut [Document], keys: &[(String, SortDirection)]) {
    if keys.is_empty() {
        return;
    }
    documents.sort_by(|a, b| {
        keys.iter()
            .map(|(field, direction)| direction.apply(compare_values(a.get(field), b.get(field))))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}
