use axum::{extract::State, routing::post, Json, Router};

use crate::error::ApiResult;
use crate::hateoas::{assembler, ResponseEnvelope};
use crate::http::request::ValidJson;
use crate::http::server::AppState;

use super::{SignInDto, SignUpDto, TokenGrant};

/// Routes mounted at `{base}/auth`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
}

fn token_envelope(state: &AppState, grant: TokenGrant) -> Json<ResponseEnvelope<TokenGrant>> {
    let links = assembler::token_links(&state.paths, &grant.user);
    Json(ResponseEnvelope::new(grant).with_links(links))
}

pub async fn sign_up(
    State(state): State<AppState>,
    ValidJson(dto): ValidJson<SignUpDto>,
) -> ApiResult<Json<ResponseEnvelope<TokenGrant>>> {
    let grant = state.auth.sign_up(dto)?;
    Ok(token_envelope(&state, grant))
}

pub async fn sign_in(
    State(state): State<AppState>,
    ValidJson(dto): ValidJson<SignInDto>,
) -> ApiResult<Json<ResponseEnvelope<TokenGrant>>> {
    let grant = state.auth.sign_in(dto)?;
    Ok(token_envelope(&state, grant))
}
