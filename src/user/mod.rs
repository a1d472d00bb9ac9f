//! User accounts and the per-user story listing.

pub mod handlers;
pub mod model;
pub mod service;

pub use handlers::routes;
pub use model::{AuthorName, UpdateUserDto, User};
pub use service::{NewUser, UserService};

pub const USER_PATH: &str = "users";
