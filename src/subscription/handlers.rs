use axum::{
    extract::State,
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::hateoas::{assembler, ApiPaths, ResponseEnvelope};
use crate::http::request::{ApiPath, Authenticated, ValidJson};
use crate::http::response::location_header;
use crate::http::server::AppState;

use super::{CreateSubscriptionDto, Subscription, SUBSCRIPTION_PATH};

/// Routes mounted at `{base}/subscriptions`.
pub fn routes(paths: &ApiPaths) -> Router<AppState> {
    let base = paths.collection(SUBSCRIPTION_PATH);
    Router::new()
        .route("/", post(create.layer(from_fn_with_state(base, location_header))))
        .route("/{id}", get(find_one).delete(delete))
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidJson(dto): ValidJson<CreateSubscriptionDto>,
) -> ApiResult<Json<ResponseEnvelope<Subscription>>> {
    let subscription = state.subscriptions.create(principal.id, dto.author_id)?;
    let links = assembler::subscription_links(&state.paths, &subscription, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(subscription).with_links(links)))
}

/// Visible to both ends of the subscription.
pub async fn find_one(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ResponseEnvelope<Subscription>>> {
    let subscription = state.subscriptions.find_one_by_id(id)?;
    if principal.id != subscription.subscriber_id && principal.id != subscription.author_id {
        return Err(ApiError::Forbidden);
    }
    let links = assembler::subscription_links(&state.paths, &subscription, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(subscription).with_links(links)))
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    let subscription = state.subscriptions.find_one_by_id(id)?;
    if subscription.subscriber_id != principal.id {
        tracing::debug!(subscription_id = id, caller = principal.id, "Subscription delete denied");
        return Err(ApiError::Forbidden);
    }
    state.subscriptions.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
