//! Story shapes and request bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::request::Validate;
use crate::user::AuthorName;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorName>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryDto {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Must match the caller when given.
    pub author_id: Option<i64>,
}

impl Validate for CreateStoryDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title should not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoryDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl Validate for UpdateStoryDto {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => {
                Err(ApiError::Validation("title should not be empty".into()))
            }
            _ => Ok(()),
        }
    }
}
