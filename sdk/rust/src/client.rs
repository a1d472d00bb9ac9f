//! Rust client for the publishing API.

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

/// One hypermedia link as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub method: String,
}

/// `{ data, _links }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(rename = "_links", default)]
    pub links: Vec<Link>,
}

impl<T> Envelope<T> {
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: Value,
}

impl TokenGrant {
    pub fn user_id(&self) -> Option<i64> {
        self.user.get("id").and_then(Value::as_i64)
    }
}

pub struct PublishingClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PublishingClient {
    /// `base_url` is the versioned API root, e.g. `http://localhost:8080/api/v1`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` on every following request.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.authorize(self.client.get(self.url(path))).send().await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Response, reqwest::Error> {
        self.authorize(self.client.post(self.url(path)).json(body)).send().await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Response, reqwest::Error> {
        self.authorize(self.client.patch(self.url(path)).json(body)).send().await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.authorize(self.client.delete(self.url(path))).send().await
    }

    /// Create an account. The returned token is not stored; see `set_token`.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Envelope<TokenGrant>, Box<dyn std::error::Error>> {
        let resp = self
            .post("auth/sign-up", &json!({ "email": email, "password": password }))
            .await?;
        decode(resp).await
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Envelope<TokenGrant>, Box<dyn std::error::Error>> {
        let resp = self
            .post("auth/sign-in", &json!({ "email": email, "password": password }))
            .await?;
        decode(resp).await
    }

    pub async fn list_stories(&self, limit: Option<usize>) -> Result<Response, reqwest::Error> {
        match limit {
            Some(limit) => self.get(&format!("stories?limit={limit}")).await,
            None => self.get("stories").await,
        }
    }

    pub async fn search_stories(&self, query: &Value) -> Result<Response, reqwest::Error> {
        self.post("stories/search", query).await
    }

    pub async fn get_story(&self, id: i64) -> Result<Response, reqwest::Error> {
        self.get(&format!("stories/{id}")).await
    }

    pub async fn create_story(&self, story: &Value) -> Result<Response, reqwest::Error> {
        self.post("stories", story).await
    }

    pub async fn update_story(&self, id: i64, changes: &Value) -> Result<Response, reqwest::Error> {
        self.patch(&format!("stories/{id}"), changes).await
    }

    pub async fn delete_story(&self, id: i64) -> Result<Response, reqwest::Error> {
        self.delete(&format!("stories/{id}")).await
    }

    pub async fn create_subscription(&self, author_id: i64) -> Result<Response, reqwest::Error> {
        self.post("subscriptions", &json!({ "authorId": author_id })).await
    }
}

/// Decode a 2xx body, or turn the status and body into an error.
pub async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Box<dyn std::error::Error>> {
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(format!("API returned error status {}: {}", status, text).into());
    }

    Ok(serde_json::from_str::<T>(&text)?)
}
