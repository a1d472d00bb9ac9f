//! Articles. Same lifecycle as stories, but every route requires a bearer
//! token and there is no author join.

pub mod handlers;
pub mod model;
pub mod search;
pub mod service;

pub use handlers::routes;
pub use model::{Article, CreateArticleDto, UpdateArticleDto};
pub use search::SearchArticleDto;
pub use service::ArticleService;

pub const ARTICLE_PATH: &str = "articles";
