//! Publishing API library: stories, articles, reading lists and subscriptions
//! over a versioned REST API with hypermedia links.

// Core subsystems
pub mod config;
pub mod db;
pub mod error;
pub mod hateoas;
pub mod http;
pub mod search;

// Resources
pub mod article;
pub mod auth;
pub mod graph;
pub mod reading_list;
pub mod story;
pub mod subscription;
pub mod user;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
