use axum::{extract::State, routing::get, Json, Router};

use crate::error::ApiResult;
use crate::http::request::{ApiPath, ApiQuery, RequestContext};
use crate::http::server::AppState;

use super::resolver::{UserNode, UserSelection};

/// Routes mounted at `{prefix}/graph`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users/{id}", get(user))
}

pub async fn user(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(selection): ApiQuery<UserSelection>,
) -> ApiResult<Json<UserNode>> {
    let node = state.graph.resolve(id, &selection, ctx.principal.as_ref())?;
    Ok(Json(node))
}
