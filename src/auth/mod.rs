//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! POST /auth/sign-up | /auth/sign-in
//!     → service.rs (validate, hash/verify password)
//!     → session.rs (issue opaque bearer token)
//!
//! Any request with `Authorization: Bearer <token>`
//!     → http::request::RequestContext resolves the token
//!     → Principal { id, email } or anonymous
//! ```
//!
//! # Design Decisions
//! - Tokens are opaque and expire after `auth.session_ttl_secs`
//! - Authentication only identifies the caller; ownership checks live in handlers

pub mod handlers;
pub mod password;
pub mod service;
pub mod session;

use serde::{Deserialize, Serialize};

pub use service::{AuthService, SignInDto, SignUpDto, TokenGrant};
pub use session::SessionRegistry;

pub const AUTH_PATH: &str = "auth";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub email: String,
}

impl Principal {
    pub fn owns(&self, author_id: i64) -> bool {
        self.id == author_id
    }
}
