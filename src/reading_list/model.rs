use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::request::Validate;
use crate::story::Story;

/// A named, per-author collection of stories. `stories` is resolved on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingList {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingListDto {
    pub title: String,
}

impl Validate for CreateReadingListDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title should not be empty".into()));
        }
        Ok(())
    }
}
