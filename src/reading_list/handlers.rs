//! Reading lists are addressed by title, so their `Location` is built here
//! rather than by the id-based interceptor.

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, put},
    Json, Router,
};

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};
use crate::hateoas::{assembler, Linked, ResponseEnvelope};
use crate::http::request::{ApiPath, Authenticated, RequestContext, ValidJson};
use crate::http::server::AppState;

use super::{CreateReadingListDto, ReadingList};

/// Routes merged into the `{base}/users` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}/reading-lists", get(find_many).post(create))
        .route("/{id}/reading-lists/{title}", get(find_one).delete(delete))
        .route(
            "/{id}/reading-lists/{title}/stories/{story_id}",
            put(add_story).delete(remove_story),
        )
}

fn ensure_self(principal: &Principal, user_id: i64) -> ApiResult<()> {
    if principal.owns(user_id) {
        Ok(())
    } else {
        tracing::debug!(caller = principal.id, user_id, "Reading list access denied");
        Err(ApiError::Forbidden)
    }
}

fn linked(state: &AppState, list: ReadingList) -> ResponseEnvelope<ReadingList> {
    let links = assembler::reading_list_links(&state.paths, &list);
    ResponseEnvelope::new(list).with_links(links)
}

pub async fn find_many(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ctx: RequestContext,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ResponseEnvelope<Vec<Linked<ReadingList>>>>> {
    ensure_self(&principal, id)?;
    let lists = state.reading_lists.find_many_by_author(id, state.limit(&ctx));
    Ok(Json(
        ResponseEnvelope::new(lists)
            .with_links(assembler::reading_list_collection_links(&state.paths, id))
            .link_items(|l| assembler::reading_list_item_links(&state.paths, l)),
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
    ValidJson(dto): ValidJson<CreateReadingListDto>,
) -> ApiResult<impl IntoResponse> {
    ensure_self(&principal, id)?;
    let list = state.reading_lists.create(id, dto)?;
    let location = assembler::reading_list_href(&state.paths, &list);
    Ok((AppendHeaders([(LOCATION, location)]), Json(linked(&state, list))))
}

pub async fn find_one(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath((id, title)): ApiPath<(i64, String)>,
) -> ApiResult<Json<ResponseEnvelope<ReadingList>>> {
    ensure_self(&principal, id)?;
    let list = state.reading_lists.find_unique(id, &title)?;
    Ok(Json(linked(&state, list)))
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath((id, title)): ApiPath<(i64, String)>,
) -> ApiResult<StatusCode> {
    ensure_self(&principal, id)?;
    state.reading_lists.delete(id, &title)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_story(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath((id, title, story_id)): ApiPath<(i64, String, i64)>,
) -> ApiResult<Json<ResponseEnvelope<ReadingList>>> {
    ensure_self(&principal, id)?;
    let list = state.reading_lists.add_story(id, &title, story_id)?;
    Ok(Json(linked(&state, list)))
}

pub async fn remove_story(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath((id, title, story_id)): ApiPath<(i64, String, i64)>,
) -> ApiResult<Json<ResponseEnvelope<ReadingList>>> {
    ensure_self(&principal, id)?;
    let list = state.reading_lists.remove_story(id, &title, story_id)?;
    Ok(Json(linked(&state, list)))
}
