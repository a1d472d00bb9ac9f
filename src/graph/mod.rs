//! Graph-style read API.
//!
//! One node type, `user`, whose relations are resolved on demand:
//! ```text
//! GET {prefix}/graph/users/:id?storiesLimit=&story=&readingLists=&readingListsLimit=&readingList=
//!     → UserResolver::user(id)
//!     → stories(limit) | story(id) | readingLists(limit) (guarded) | readingList(title)
//! ```
//! Responses are raw resource shapes without links.

pub mod handlers;
pub mod resolver;

pub use handlers::routes;
pub use resolver::{UserNode, UserResolver, UserSelection};

pub const GRAPH_PATH: &str = "graph";
