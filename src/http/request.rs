//! Request handling and extraction.
//!
//! # Responsibilities
//! - Resolve the bearer token into an optional `Principal`
//! - Collect query parameters into one `RequestContext` per request
//! - Deserialize and validate JSON bodies, paths and typed queries
//!
//! # Design Decisions
//! - Handlers receive the caller explicitly; nothing is read from globals
//! - Every rejection is an `ApiError` so error bodies stay uniform
//! - `Authenticated` is listed before body extractors so a missing token
//!   answers 401 before the body is looked at

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::http::server::AppState;

/// Semantic checks run after a body deserialized successfully.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn resolve_principal(parts: &Parts, state: &AppState) -> Option<Principal> {
    bearer_token(&parts.headers).and_then(|token| state.sessions.resolve(token))
}

/// Per-request metadata passed explicitly into handlers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Option<Principal>,
    pub query: HashMap<String, String>,
}

impl RequestContext {
    pub fn caller_id(&self) -> Option<i64> {
        self.principal.as_ref().map(|p| p.id)
    }

    /// `?limit=N`; absent or non-numeric values mean no limit.
    pub fn limit(&self) -> Option<usize> {
        self.query.get("limit").and_then(|v| v.trim().parse().ok())
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        Ok(Self {
            principal: resolve_principal(parts, state),
            query,
        })
    }
}

/// The caller, required. Rejects with 401 when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_principal(parts, state)
            .map(Self)
            .ok_or(ApiError::Unauthorized)
    }
}

/// JSON body that passed `Validate`.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::PayloadTooLarge
                } else {
                    ApiError::Validation(rejection.body_text())
                }
            })?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters; malformed ids answer 400.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))
    }
}

/// Typed query string.
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))
    }
}
