//! Search condition building.
//!
//! # Design Decisions
//! - Only fields present in the search DTO become predicates
//! - Predicates combine with AND semantics
//! - Empty condition = always matches (wildcard)
//! - Text fields match case-insensitive substrings, ids match exactly

/// A single predicate over rows of type `R`.
pub trait Matcher<R>: std::fmt::Debug {
    fn matches(&self, row: &R) -> bool;
}

/// Conjunction of the predicates built from the present search fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AndCondition<P> {
    predicates: Vec<P>,
}

impl<P> Default for AndCondition<P> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<P> AndCondition<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate when the field is present; absent fields are skipped.
    pub fn and_if<T>(mut self, field: Option<T>, predicate: impl FnOnce(T) -> P) -> Self {
        if let Some(value) = field {
            self.predicates.push(predicate(value));
        }
        self
    }

    pub fn predicates(&self) -> &[P] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches<R>(&self, row: &R) -> bool
    where
        P: Matcher<R>,
    {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

/// Case-insensitive substring test.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
