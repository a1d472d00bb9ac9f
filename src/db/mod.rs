//! In-process relational store.
//!
//! # Data Flow
//! ```text
//! service
//!     → Database::read (shared lock, consistent snapshot)
//!     → Database::transaction (exclusive lock)
//!         → closure mutates a staged copy of the tables
//!         → Ok: staged copy replaces the live tables
//!         → Err: staged copy dropped, live tables untouched
//! ```
//!
//! # Design Decisions
//! - One lock for all tables so multi-table writes commit together
//! - Errors mirror what an ORM reports (missing record, unique violation)

pub mod tables;

use std::sync::{PoisonError, RwLock};

use thiserror::Error;

pub use tables::{Table, Tables};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DbError {
    #[error("record to update or delete does not exist")]
    RecordNotFound,

    #[error("unique constraint failed on {0}")]
    UniqueViolation(&'static str),
}

#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only query against a consistent view of all tables.
    pub fn read<R>(&self, query: impl FnOnce(&Tables) -> R) -> R {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        query(&tables)
    }

    /// Run `work` atomically: either every write it makes is committed or none is.
    pub fn transaction<R>(
        &self,
        work: impl FnOnce(&mut Tables) -> Result<R, DbError>,
    ) -> Result<R, DbError> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let mut staged = tables.clone();
        let out = work(&mut staged)?;
        *tables = staged;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;

    fn user(id: i64, email: &str) -> User {
        User::new(id, email.to_string(), None, None, String::new())
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let db = Database::new();
        db.transaction(|t| Ok(t.users.insert_with(|id| user(id, "a@example.com")).id))
            .unwrap();

        let result: Result<(), DbError> = db.transaction(|t| {
            t.users.insert_with(|id| user(id, "b@example.com"));
            t.stories.remove(99)?;
            Ok(())
        });

        assert_eq!(result, Err(DbError::RecordNotFound));
        assert_eq!(db.read(|t| t.users.len()), 1);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let db = Database::new();
        let first = db
            .transaction(|t| Ok(t.users.insert_with(|id| user(id, "a@example.com")).id))
            .unwrap();
        db.transaction(|t| t.users.remove(first).map(|_| ())).unwrap();
        let second = db
            .transaction(|t| Ok(t.users.insert_with(|id| user(id, "b@example.com")).id))
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }
}
