use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::http::request::Validate;
use crate::user::{NewUser, User, UserService};

use super::password::{hash_password, verify_password};
use super::session::SessionRegistry;
use super::Principal;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpDto {
    pub email: String,
    pub password: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

impl Validate for SignUpDto {
    fn validate(&self) -> Result<(), ApiError> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ApiError::Validation("email must be an email".into())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInDto {
    pub email: String,
    pub password: String,
}

impl Validate for SignInDto {
    fn validate(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation("email and password are required".into()));
        }
        Ok(())
    }
}

/// Issued credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserService,
    sessions: SessionRegistry,
    min_password_len: usize,
}

impl AuthService {
    pub fn new(users: UserService, sessions: SessionRegistry, min_password_len: usize) -> Self {
        Self {
            users,
            sessions,
            min_password_len,
        }
    }

    pub fn sign_up(&self, dto: SignUpDto) -> ApiResult<TokenGrant> {
        if dto.password.chars().count() < self.min_password_len {
            return Err(ApiError::Validation(format!(
                "password must be longer than or equal to {} characters",
                self.min_password_len
            )));
        }

        let password_hash = hash_password(&dto.password)
            .map_err(|err| ApiError::Internal(format!("password hashing failed: {err}")))?;
        let user = self.users.create(NewUser {
            email: dto.email.trim().to_string(),
            given_name: dto.given_name,
            family_name: dto.family_name,
            password_hash,
        })?;
        Ok(self.grant(user))
    }

    pub fn sign_in(&self, dto: SignInDto) -> ApiResult<TokenGrant> {
        let user = self
            .users
            .find_by_email(dto.email.trim())
            .filter(|u| verify_password(&dto.password, &u.password_hash));

        match user {
            Some(user) => Ok(self.grant(user)),
            None => {
                tracing::warn!("Sign-in rejected");
                Err(ApiError::Unauthorized)
            }
        }
    }

    fn grant(&self, user: User) -> TokenGrant {
        let access_token = self.sessions.issue(Principal {
            id: user.id,
            email: user.email.clone(),
        });
        TokenGrant {
            access_token,
            token_type: "Bearer",
            expires_in: self.sessions.ttl().as_secs(),
            user,
        }
    }
}
