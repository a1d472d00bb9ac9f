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

use super::{Article, CreateArticleDto, SearchArticleDto, UpdateArticleDto, ARTICLE_PATH};

/// Routes mounted at `{base}/articles`. Every route requires a bearer token.
pub fn routes(paths: &ApiPaths) -> Router<AppState> {
    let base = paths.collection(ARTICLE_PATH);
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
    _caller: Authenticated,
    ctx: RequestContext,
) -> Json<ResponseEnvelope<Vec<Linked<Article>>>> {
    let articles = state.articles.find_many(state.limit(&ctx));
    Json(
        ResponseEnvelope::new(articles)
            .with_links(assembler::article_collection_links(&state.paths))
            .link_items(|a| assembler::article_item_links(&state.paths, a)),
    )
}

pub async fn search(
    State(state): State<AppState>,
    _caller: Authenticated,
    ctx: RequestContext,
    ValidJson(dto): ValidJson<SearchArticleDto>,
) -> Json<ResponseEnvelope<Vec<Linked<Article>>>> {
    let articles = state.articles.search(&dto, state.limit(&ctx));
    Json(
        ResponseEnvelope::new(articles)
            .with_links(assembler::article_search_links(&state.paths))
            .link_items(|a| assembler::article_item_links(&state.paths, a)),
    )
}

pub async fn find_one(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<ResponseEnvelope<Article>>> {
    let article = state.articles.find_one_by_id(id)?;
    let links = assembler::article_links(&state.paths, &article, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(article).with_links(links)))
}

pub async fn create(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ValidJson(dto): ValidJson<CreateArticleDto>,
) -> ApiResult<Json<ResponseEnvelope<Article>>> {
    if dto.author_id.is_some_and(|author| !principal.owns(author)) {
        return Err(ApiError::Forbidden);
    }

    let article = state.articles.create(principal.id, dto)?;
    let links = assembler::article_links(&state.paths, &article, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(article).with_links(links)))
}

fn owned_article(state: &AppState, id: i64, caller: i64) -> ApiResult<Article> {
    let article = state.articles.find_one_by_id(id)?;
    if article.author_id != caller {
        tracing::debug!(article_id = id, caller, author = article.author_id, "Article access denied");
        return Err(ApiError::Forbidden);
    }
    Ok(article)
}

pub async fn update(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
    ValidJson(dto): ValidJson<UpdateArticleDto>,
) -> ApiResult<Json<ResponseEnvelope<Article>>> {
    owned_article(&state, id, principal.id)?;
    let article = state.articles.update(id, dto)?;
    let links = assembler::article_links(&state.paths, &article, Some(principal.id));
    Ok(Json(ResponseEnvelope::new(article).with_links(links)))
}

pub async fn delete(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    owned_article(&state, id, principal.id)?;
    state.articles.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
