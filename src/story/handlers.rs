use axum::{
    extract::State,
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::hateoas::{assembler, ApiPaths, Linked, ResponseEnvelope};
use crate::http::request::{ApiPath, Authenticated, RequestContext, ValidJson};
use crate::http::response::location_header;
use crate::http::server::AppState;

use super::{CreateStoryDto, SearchStoryDto, Story, UpdateStoryDto, STORY_PATH};

/// Routes mounted at `{base}/stories`.
pub fn routes(paths: &ApiPaths) -> Router<AppState> {
    let base = paths.collection(STORY_PATH);
    Router::new()
        .route(
            "/",
            get(find_many).post(create.layer(from_fn_with_state(base.clone(), location_header))),
        )
        .route("/search", post(search))
        .route(
            "/{id}",
            get(find_one)
                .patch(update.layer(from_fn_with_state(base, location_header)))
                .delete(delete),
        )
}

pub async fn find_many(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Json<ResponseEnvelope<Vec<Linked<Story>>>> {
    let stories = state.stories.find_many(state.limit(&ctx));
    Json(
        ResponseEnvelope::new(stories)
            .with_links(assembler::story_collection_links(&state.paths))
            .link_items(|s| assembler::story_item_links(&state.paths, s)),
    )
}

pub async fn search(
    State(state): State<AppState>,
    ctx: RequestContext,
    ValidJson(dto): ValidJson<SearchStoryDto>,
) -> Json<ResponseEnvelope<Vec<Linked<Story>>>> {
    let stories = state.stories.search(&dto, state.limit(&ctx));
    Json(
        ResponseEnvelope::new(stories)
            .with_links(assembler::story_search_links(&state.paths))
            .link_items(|s| assembler::story_item_links(&state.paths, s)),
    )
}

pub async fn find_one(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ResponseEnvelope<Story>>> {
    let story = state.stories.find_one_by_id(id)?;
    let links = assembler::story_links(&state.paths, &story, ctx.caller_id());
    Ok(Json(ResponseEnvelope::new(story).with_links(links)))
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidJson(dto): ValidJson<CreateStoryDto>,
) -> ApiResult<Json<ResponseEnvelope<Story>>> {
    if dto.author_id.is_some_and(|author| !principal.owns(author)) {
        tracing::debug!(caller = principal.id, author = ?dto.author_id, "Story create for another author");
        return Err(ApiError::Forbidden);
    }

    let story = state.stories.create(principal.id, dto)?;
    let links = assembler::story_links(&state.paths, &story, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(story).with_links(links)))
}

/// Load the story and fail closed unless the caller wrote it.
fn owned_story(state: &AppState, id: i64, caller: i64) -> ApiResult<Story> {
    let story = state.stories.find_one_by_id(id)?;
    if story.author_id != caller {
        tracing::debug!(story_id = id, caller, author = story.author_id, "Story access denied");
        return Err(ApiError::Forbidden);
    }
    Ok(story)
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
    ValidJson(dto): ValidJson<UpdateStoryDto>,
) -> ApiResult<Json<ResponseEnvelope<Story>>> {
    owned_story(&state, id, principal.id)?;
    let story = state.stories.update(id, dto)?;
    let links = assembler::story_links(&state.paths, &story, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(story).with_links(links)))
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    owned_story(&state, id, principal.id)?;
    state.stories.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
