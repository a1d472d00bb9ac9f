//! User shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::request::Validate;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub password_hash: String,
}

impl User {
    pub fn new(
        id: i64,
        email: String,
        given_name: Option<String>,
        family_name: Option<String>,
        password_hash: String,
    ) -> Self {
        Self {
            id,
            email,
            given_name,
            family_name,
            created_at: Utc::now(),
            password_hash,
        }
    }
}

/// The author fields joined onto stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorName {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl From<&User> for AuthorName {
    fn from(user: &User) -> Self {
        Self {
            given_name: user.given_name.clone(),
            family_name: user.family_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl Validate for UpdateUserDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.given_name.is_none() && self.family_name.is_none() {
            return Err(ApiError::Validation("nothing to update".into()));
        }
        Ok(())
    }
}
