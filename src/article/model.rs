use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::http::request::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleDto {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: Option<i64>,
}

impl Validate for CreateArticleDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title should not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleDto {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Validate for UpdateArticleDto {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => {
                Err(ApiError::Validation("title should not be empty".into()))
            }
            _ => Ok(()),
        }
    }
}
