//! Stories: long-form posts with an optional description.
//!
//! # Data Flow
//! ```text
//! GET  /stories, POST /stories/search → service.rs (AND condition, newest first)
//!     → collection envelope, items linked individually
//! POST/PATCH/DELETE /stories[/:id]    → ownership check in handlers.rs
//!     → service.rs (transactional delete detaches reading lists)
//! ```

pub mod handlers;
pub mod model;
pub mod search;
pub mod service;

pub use handlers::routes;
pub use model::{CreateStoryDto, Story, UpdateStoryDto};
pub use search::SearchStoryDto;
pub use service::StoryService;

pub const STORY_PATH: &str = "stories";
