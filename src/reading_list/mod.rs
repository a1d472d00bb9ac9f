//! Reading lists, addressed by `(authorId, title)` and visible only to their
//! author. Routes live under `/users/:id/reading-lists`.

pub mod handlers;
pub mod model;
pub mod service;

pub use handlers::routes;
pub use model::{CreateReadingListDto, ReadingList};
pub use service::ReadingListService;

pub const READING_LIST_PATH: &str = "reading-lists";
