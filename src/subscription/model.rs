use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::request::Validate;

/// `subscriber_id` follows the stories of `author_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub subscriber_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionDto {
    pub author_id: i64,
}

impl Validate for CreateSubscriptionDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.author_id < 1 {
            return Err(ApiError::Validation("authorId must be a positive integer".into()));
        }
        Ok(())
    }
}
