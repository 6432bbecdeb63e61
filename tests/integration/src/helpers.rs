//! Test helpers for integration tests
//!
//! Provides a test server running the real router over in-memory
//! repositories, and utilities for making HTTP requests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use choose_api::{base_context, create_app, run_server, AppState};
use choose_common::{
    AccountTokenConfig, AppConfig, AppSettings, CorsConfig, DatabaseConfig, Environment,
    JwtConfig, LinkConfig, MailConfig, MediaConfig, RateLimitConfig, ServerConfig,
    SnowflakeConfig,
};
use choose_core::{Notification, Notifier};
use choose_db::MemoryDatabase;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Keeps every notification so tests can follow emailed links
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Token carried by the link in the latest notification sent to `email`
    pub fn token_for(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|n| n.recipients.iter().any(|r| r == email))
            .and_then(|n| n.context.get("url").cloned())
            .and_then(|url| url.split_once("token=").map(|(_, t)| t.to_string()))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification);
        }
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub notifier: Arc<RecordingNotifier>,
    _media: TempDir,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        let media = tempfile::tempdir()?;
        let config = test_config(&media);
        let notifier = Arc::new(RecordingNotifier::default());
        let db = MemoryDatabase::new();

        let context = base_context(&config)
            .await?
            .account_repo(Arc::new(db.accounts()))
            .poll_repo(Arc::new(db.polls()))
            .option_repo(Arc::new(db.options()))
            .notifier(notifier.clone())
            .build()?;
        let app = create_app(AppState::new(context, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            run_server(app, listener).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            notifier,
            _media: media,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    async fn send(request: RequestBuilder, token: Option<&str>) -> Result<Response> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Self::send(self.client.get(self.url(path)), None).await
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Self::send(self.client.get(self.url(path)), Some(token)).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        Self::send(self.client.post(self.url(path)).json(body), None).await
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Self::send(self.client.post(self.url(path)).json(body), Some(token)).await
    }

    /// Make a PUT request with auth token
    pub async fn put_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Self::send(self.client.put(self.url(path)).json(body), Some(token)).await
    }

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Self::send(self.client.patch(self.url(path)).json(body), Some(token)).await
    }

    /// Make a DELETE request, authenticated when a token is given
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Self::send(self.client.delete(self.url(path)), token).await
    }

    /// Upload raw bytes as an image
    pub async fn upload(
        &self,
        token: Option<&str>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Response> {
        let request = self
            .client
            .post(self.url("/api/static/image"))
            .header("Content-Type", content_type)
            .body(bytes);
        Self::send(request, token).await
    }
}

/// Configuration for a server that needs no external services
pub fn test_config(media: &TempDir) -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "choose-one-test".to_string(),
            env: Environment::Development,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 1024 * 1024,
            ..ServerConfig::default()
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout_secs: 1,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 86_400,
        },
        account_tokens: AccountTokenConfig {
            secret: "integration-account-secret".to_string(),
            timeout_days: 1,
        },
        links: LinkConfig::default(),
        media: MediaConfig {
            root: media.path().display().to_string(),
            ..MediaConfig::default()
        },
        mail: MailConfig::default(),
        rate_limit: RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        },
        cors: CorsConfig::default(),
        snowflake: SnowflakeConfig::default(),
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    response.json().await.context("response body is not the expected JSON")
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
