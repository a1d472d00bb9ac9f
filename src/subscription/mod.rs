//! Subscriptions of one user to another author.

pub mod handlers;
pub mod model;
pub mod service;

pub use handlers::routes;
pub use model::{CreateSubscriptionDto, Subscription};
pub use service::SubscriptionService;

pub const SUBSCRIPTION_PATH: &str = "subscriptions";
