//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::time::Duration;

use publishing_api::config::AppConfig;
use publishing_api::http::HttpServer;
use publishing_api::lifecycle::Shutdown;
use publishing_sdk::PublishingClient;
use tokio::net::TcpListener;

/// A server running on an ephemeral loopback port. Stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    /// Versioned API root, e.g. `http://127.0.0.1:41234/api/v1`.
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn client(&self) -> PublishingClient {
        PublishingClient::new(&self.base_url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_server() -> TestServer {
    start_server_with(AppConfig::default()).await
}

#[allow(dead_code)]
pub async fn start_server_with(mut config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    TestServer { addr, shutdown }
}

/// Sign up `email` and return a client carrying its token, plus the user id.
#[allow(dead_code)]
pub async fn signed_in_client(server: &TestServer, email: &str) -> (PublishingClient, i64) {
    let mut client = server.client();
    let grant = client.sign_up(email, "password1").await.unwrap();
    let id = grant.data.user_id().unwrap();
    client.set_token(grant.data.access_token);
    (client, id)
}
