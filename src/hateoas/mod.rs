//! Hypermedia (HATEOAS) subsystem.
//!
//! # Data Flow
//! ```text
//! handler result (entity or Vec<entity>)
//!     → ResponseEnvelope::new(data)
//!     → .with_links(container links)          (assembler.rs)
//!     → .link_items(|item| per-item links)     (collections only)
//!     → serialized as { data, _links }
//! ```
//!
//! # Design Decisions
//! - Links are built from one `ApiPaths` root so they follow the configured prefix
//! - Owner-only links are a hint; handlers enforce ownership separately
//! - Envelopes are built by value, never mutated after being returned

pub mod assembler;
pub mod envelope;
pub mod link;

pub use envelope::{Linked, ResponseEnvelope};
pub use link::{api_path, create_link, ApiPaths, HttpVerb, Link};
