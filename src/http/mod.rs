//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers: request id, trace, CORS, timeout, body limit, metrics)
//!     → request.rs (principal, query, validated body)
//!     → resource handler (story, article, user, reading_list, subscription, auth, graph)
//!     → response.rs (Location on create/update)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{ApiPath, ApiQuery, Authenticated, RequestContext, ValidJson, Validate};
pub use response::location_header;
pub use server::{AppState, HttpServer};
