//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build services over one shared `Database`
//! - Create the Axum Router with every resource mounted under `{prefix}/{version}`
//! - Wire up middleware (metrics, body limit, timeout with JSON 408, CORS, request ID, tracing)
//! - Serve until a shutdown signal arrives

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request,
    },
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, sync::broadcast};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::article::{self, ArticleService, ARTICLE_PATH};
use crate::auth::{self, AuthService, SessionRegistry, AUTH_PATH};
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::ApiError;
use crate::graph::{self, UserResolver, GRAPH_PATH};
use crate::hateoas::{api_path, assembler, ApiPaths, ResponseEnvelope};
use crate::http::request::RequestContext;
use crate::http::response;
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;
use crate::reading_list::{self, ReadingListService};
use crate::story::{self, StoryService, STORY_PATH};
use crate::subscription::{self, SubscriptionService, SUBSCRIPTION_PATH};
use crate::user::{self, UserService, USER_PATH};

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub paths: ApiPaths,
    pub default_limit: Option<usize>,
    pub sessions: SessionRegistry,
    pub auth: AuthService,
    pub users: UserService,
    pub stories: StoryService,
    pub articles: ArticleService,
    pub reading_lists: ReadingListService,
    pub subscriptions: SubscriptionService,
    pub graph: UserResolver,
}

impl AppState {
    pub fn new(config: &AppConfig, db: Arc<Database>) -> Self {
        let sessions = SessionRegistry::new(Duration::from_secs(config.auth.session_ttl_secs));
        let users = UserService::new(db.clone());
        let stories = StoryService::new(db.clone());
        let reading_lists = ReadingListService::new(db.clone());

        Self {
            paths: ApiPaths::new(&config.api.prefix, &config.api.version),
            default_limit: config.api.default_limit,
            auth: AuthService::new(users.clone(), sessions.clone(), config.auth.min_password_len),
            sessions,
            articles: ArticleService::new(db.clone()),
            subscriptions: SubscriptionService::new(db),
            graph: UserResolver::new(users.clone(), stories.clone(), reading_lists.clone()),
            users,
            stories,
            reading_lists,
        }
    }

    /// `?limit=N`, else the configured default.
    pub fn limit(&self, ctx: &RequestContext) -> Option<usize> {
        ctx.limit().or(self.default_limit)
    }
}

/// HTTP server for the publishing API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over an empty store.
    pub fn new(config: AppConfig) -> Self {
        Self::with_database(config, Arc::new(Database::new()))
    }

    pub fn with_database(config: AppConfig, db: Arc<Database>) -> Self {
        let state = AppState::new(&config, db);
        let router = Self::build_router(&config, state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let paths = state.paths.clone();

        let api = Router::new()
            .route("/", get(root))
            .nest(&format!("/{AUTH_PATH}"), auth::handlers::routes())
            .nest(&format!("/{STORY_PATH}"), story::routes(&paths))
            .nest(&format!("/{ARTICLE_PATH}"), article::routes(&paths))
            .nest(
                &format!("/{USER_PATH}"),
                user::routes(&paths).merge(reading_list::routes()),
            )
            .nest(&format!("/{SUBSCRIPTION_PATH}"), subscription::routes(&paths));

        let cors = if config.security.cors_allow_any {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        };

        Router::new()
            .nest(paths.base(), api)
            .nest(&api_path(&config.api.prefix, &[&GRAPH_PATH]), graph::routes())
            .fallback(not_found)
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(response::timeout_body))
            .layer(cors)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving the API without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base = %self.state.paths.base(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ApiRoot {
    name: &'static str,
    version: String,
}

async fn root(State(state): State<AppState>) -> Json<ResponseEnvelope<ApiRoot>> {
    let version = state
        .paths
        .base()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    Json(
        ResponseEnvelope::new(ApiRoot {
            name: env!("CARGO_PKG_NAME"),
            version,
        })
        .with_links(assembler::root_links(&state.paths)),
    )
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{header::LOCATION, HeaderMap, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Reply {
        status: StatusCode,
        headers: HeaderMap,
        body: Value,
    }

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply { status, headers, body }
    }

    async fn sign_up(app: &Router, email: &str) -> (String, i64) {
        let reply = send(
            app,
            Method::POST,
            "/api/v1/auth/sign-up",
            None,
            Some(json!({"email": email, "password": "password1", "givenName": "Ada"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        let token = reply.body["data"]["accessToken"].as_str().unwrap().to_string();
        let id = reply.body["data"]["user"]["id"].as_i64().unwrap();
        (token, id)
    }

    async fn create_story(app: &Router, token: &str, title: &str) -> Reply {
        send(
            app,
            Method::POST,
            "/api/v1/stories",
            Some(token),
            Some(json!({"title": title, "content": "..."})),
        )
        .await
    }

    fn rels(links: &Value) -> Vec<&str> {
        links
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["rel"].as_str().unwrap())
            .collect()
    }

    fn app() -> Router {
        HttpServer::new(AppConfig::default()).router()
    }

    #[tokio::test]
    async fn test_root_links() {
        let app = app();
        let reply = send(&app, Method::GET, "/api/v1", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["version"], "v1");
        assert_eq!(rels(&reply.body["_links"]), vec!["self", "stories", "articles", "signUp", "signIn"]);
        assert!(reply.headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_create_sets_location_from_new_id() {
        let app = app();
        let (token, author) = sign_up(&app, "ada@example.com").await;

        let reply = create_story(&app, &token, "first").await;
        assert_eq!(reply.status, StatusCode::OK);
        let id = reply.body["data"]["id"].as_i64().unwrap();
        assert_eq!(reply.headers[LOCATION], format!("/api/v1/stories/{id}"));
        assert_eq!(reply.body["data"]["authorId"], author);
        assert_eq!(rels(&reply.body["_links"]), vec!["self", "author", "update", "delete"]);
    }

    #[tokio::test]
    async fn test_create_requires_token() {
        let app = app();
        let reply = send(&app, Method::POST, "/api/v1/stories", None, Some(json!({"title": "x"}))).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.body["statusCode"], 401);
        assert!(reply.headers.get(LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_other_user_cannot_mutate() {
        let app = app();
        let (alice, _) = sign_up(&app, "alice@example.com").await;
        let (bob, _) = sign_up(&app, "bob@example.com").await;
        let id = create_story(&app, &alice, "mine").await.body["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/v1/stories/{id}");

        let patch = send(&app, Method::PATCH, &uri, Some(&bob), Some(json!({"title": "stolen"}))).await;
        assert_eq!(patch.status, StatusCode::FORBIDDEN);
        assert_eq!(patch.body["message"], "Forbidden resource");
        let delete = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(delete.status, StatusCode::FORBIDDEN);

        let reply = send(&app, Method::GET, &uri, Some(&bob), None).await;
        assert_eq!(reply.body["data"]["title"], "mine");
        assert_eq!(rels(&reply.body["_links"]), vec!["self", "author"]);

        let reply = send(&app, Method::GET, &uri, Some(&alice), None).await;
        assert_eq!(rels(&reply.body["_links"]), vec!["self", "author", "update", "delete"]);
    }

    #[tokio::test]
    async fn test_create_for_another_author_is_forbidden() {
        let app = app();
        let (token, id) = sign_up(&app, "ada@example.com").await;
        let reply = send(
            &app,
            Method::POST,
            "/api/v1/stories",
            Some(&token),
            Some(json!({"title": "x", "authorId": id + 1})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_owner_updates_and_deletes() {
        let app = app();
        let (token, _) = sign_up(&app, "ada@example.com").await;
        let id = create_story(&app, &token, "draft").await.body["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/v1/stories/{id}");

        let reply = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({"title": "final"}))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["title"], "final");
        assert_eq!(reply.headers[LOCATION], uri.as_str());

        let reply = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        let reply = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_story_is_uniform_404() {
        let app = app();
        let reply = send(&app, Method::GET, "/api/v1/stories/999", None, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(
            reply.body,
            json!({"statusCode": 404, "message": "Not Found", "error": "Not Found"})
        );

        let reply = send(&app, Method::GET, "/nowhere", None, None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body["statusCode"], 404);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = app();
        let reply = send(&app, Method::GET, "/api/v1/stories/abc", None, None).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["statusCode"], 400);
    }

    #[tokio::test]
    async fn test_collection_and_search_links() {
        let app = app();
        let (token, author) = sign_up(&app, "ada@example.com").await;
        for title in ["winter tale", "summer", "Winter again"] {
            create_story(&app, &token, title).await;
        }

        let all = send(&app, Method::GET, "/api/v1/stories", None, None).await;
        assert_eq!(rels(&all.body["_links"]), vec!["self", "search"]);
        let items = all.body["data"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["title"], "Winter again");
        assert_eq!(rels(&items[0]["_links"]), vec!["self", "author"]);
        assert_eq!(items[0]["author"]["givenName"], "Ada");

        let empty = send(&app, Method::POST, "/api/v1/stories/search", None, Some(json!({}))).await;
        assert_eq!(empty.body["data"], all.body["data"]);
        assert_eq!(rels(&empty.body["_links"]), vec!["self"]);

        let found = send(
            &app,
            Method::POST,
            "/api/v1/stories/search?limit=1",
            None,
            Some(json!({"title": "WINTER", "authorId": author})),
        )
        .await;
        let items = found.body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Winter again");

        let limited = send(&app, Method::GET, "/api/v1/stories?limit=2", None, None).await;
        assert_eq!(limited.body["data"].as_array().unwrap().len(), 2);
        let ignored = send(&app, Method::GET, "/api/v1/stories?limit=two", None, None).await;
        assert_eq!(ignored.body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_articles_require_token() {
        let app = app();
        let reply = send(&app, Method::GET, "/api/v1/articles", None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

        let (token, _) = sign_up(&app, "ada@example.com").await;
        let reply = send(
            &app,
            Method::POST,
            "/api/v1/articles",
            Some(&token),
            Some(json!({"title": "news", "content": "today"})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        let id = reply.body["data"]["id"].as_i64().unwrap();
        assert_eq!(reply.headers[LOCATION], format!("/api/v1/articles/{id}"));

        let list = send(&app, Method::GET, "/api/v1/articles", Some(&token), None).await;
        assert_eq!(list.body["data"][0]["id"], id);
    }

    #[tokio::test]
    async fn test_user_links_depend_on_caller() {
        let app = app();
        let (token, id) = sign_up(&app, "ada@example.com").await;
        let uri = format!("/api/v1/users/{id}");

        let anonymous = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(rels(&anonymous.body["_links"]), vec!["self", "stories"]);
        assert!(anonymous.body["data"].get("passwordHash").is_none());

        let own = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(rels(&own.body["_links"]), vec!["self", "stories", "readingLists", "update"]);
    }

    #[tokio::test]
    async fn test_reading_list_flow() {
        let app = app();
        let (token, id) = sign_up(&app, "ada@example.com").await;
        let (other, _) = sign_up(&app, "bob@example.com").await;
        let story = create_story(&app, &token, "keep").await.body["data"]["id"].as_i64().unwrap();
        let lists = format!("/api/v1/users/{id}/reading-lists");

        let created = send(&app, Method::POST, &lists, Some(&token), Some(json!({"title": "for later"}))).await;
        assert_eq!(created.status, StatusCode::OK);
        assert_eq!(created.headers[LOCATION], format!("{lists}/for%20later"));

        let dup = send(&app, Method::POST, &lists, Some(&token), Some(json!({"title": "for later"}))).await;
        assert_eq!(dup.status, StatusCode::CONFLICT);

        let all = send(&app, Method::GET, &lists, Some(&token), None).await;
        assert_eq!(rels(&all.body["_links"]), vec!["self"]);
        assert_eq!(rels(&all.body["data"][0]["_links"]), vec!["self", "author"]);

        let forbidden = send(&app, Method::GET, &lists, Some(&other), None).await;
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

        let added = send(
            &app,
            Method::PUT,
            &format!("{lists}/for%20later/stories/{story}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(added.status, StatusCode::OK);
        assert_eq!(added.body["data"]["stories"][0]["id"], story);

        send(&app, Method::DELETE, &format!("/api/v1/stories/{story}"), Some(&token), None).await;
        let list = send(&app, Method::GET, &format!("{lists}/for%20later"), Some(&token), None).await;
        assert_eq!(list.body["data"]["stories"], json!([]));
    }

    #[tokio::test]
    async fn test_subscriptions() {
        let app = app();
        let (alice, alice_id) = sign_up(&app, "alice@example.com").await;
        let (bob, bob_id) = sign_up(&app, "bob@example.com").await;

        let reply = send(&app, Method::POST, "/api/v1/subscriptions", Some(&alice), Some(json!({"authorId": bob_id}))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["data"]["subscriberId"], alice_id);
        let id = reply.body["data"]["id"].as_i64().unwrap();
        assert_eq!(reply.headers[LOCATION], format!("/api/v1/subscriptions/{id}"));

        let again = send(&app, Method::POST, "/api/v1/subscriptions", Some(&alice), Some(json!({"authorId": bob_id}))).await;
        assert_eq!(again.status, StatusCode::CONFLICT);

        let uri = format!("/api/v1/subscriptions/{id}");
        let denied = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(denied.status, StatusCode::FORBIDDEN);
        let deleted = send(&app, Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_graph_user_node() {
        let app = app();
        let (token, id) = sign_up(&app, "ada@example.com").await;
        create_story(&app, &token, "one").await;
        create_story(&app, &token, "two").await;

        let uri = format!("/api/graph/users/{id}?storiesLimit=1");
        let reply = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["email"], "ada@example.com");
        assert_eq!(reply.body["stories"].as_array().unwrap().len(), 1);
        assert!(reply.body.get("_links").is_none());

        let uri = format!("/api/graph/users/{id}?readingLists=true");
        let reply = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        let reply = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(reply.body["readingLists"], json!([]));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = AppConfig::default();
        config.security.max_body_size = 128;
        let app = HttpServer::new(config).router();
        let (token, _) = sign_up(&app, "ada@example.com").await;

        let reply = send(
            &app,
            Method::POST,
            "/api/v1/stories",
            Some(&token),
            Some(json!({"title": "x", "content": "y".repeat(400)})),
        )
        .await;
        assert_eq!(reply.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(reply.body["statusCode"], 413);
    }
}
