use axum::{
    extract::State,
    handler::Handler,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::hateoas::{assembler, ApiPaths, Linked, ResponseEnvelope};
use crate::http::request::{ApiPath, Authenticated, RequestContext, ValidJson};
use crate::http::response::location_header;
use crate::http::server::AppState;
use crate::story::Story;

use super::{UpdateUserDto, User, USER_PATH};

/// Routes mounted at `{base}/users`. Reading-list routes are merged in by the
/// server.
pub fn routes(paths: &ApiPaths) -> Router<AppState> {
    let base = paths.collection(USER_PATH);
    Router::new()
        .route(
            "/{id}",
            get(find_one).patch(update.layer(from_fn_with_state(base, location_header))),
        )
        .route("/{id}/stories", get(find_stories))
        .route("/{id}/stories/{story_id}", get(find_story))
}

pub async fn find_one(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ResponseEnvelope<User>>> {
    let user = state.users.find_one_by_id(id)?;
    let links = assembler::user_links(&state.paths, &user, ctx.caller_id());
    Ok(Json(ResponseEnvelope::new(user).with_links(links)))
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
    ValidJson(dto): ValidJson<UpdateUserDto>,
) -> ApiResult<Json<ResponseEnvelope<User>>> {
    if !principal.owns(id) {
        return Err(ApiError::Forbidden);
    }
    let user = state.users.update(id, dto)?;
    let links = assembler::user_links(&state.paths, &user, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(user).with_links(links)))
}

pub async fn find_stories(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ResponseEnvelope<Vec<Linked<Story>>>>> {
    if !state.users.exists(id) {
        return Err(ApiError::NotFound);
    }
    let stories = state.stories.find_many_by_author(id, state.limit(&ctx));
    Ok(Json(
        ResponseEnvelope::new(stories)
            .with_links(assembler::user_stories_links(&state.paths, id))
            .link_items(|s| assembler::story_item_links(&state.paths, s)),
    ))
}

pub async fn find_story(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((id, story_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<ResponseEnvelope<Story>>> {
    let story = state.stories.find_one_by_author(story_id, id)?;
    let links = assembler::story_links(&state.paths, &story, ctx.caller_id());
    Ok(Json(ResponseEnvelope::new(story).with_links(links)))
}
