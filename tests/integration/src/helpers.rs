//! Test helpers for integration tests
//!
//! Spawns a real server on a local port and wraps `reqwest` calls.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use be4real_api::{create_app, create_app_state, AppState};
use be4real_common::AppConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{Envelope, LoginRequest, RegisterRequest, TokenResponse, VerifyUserRequest};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state.clone())?;

        // port 0: let the OS pick
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
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

    fn with_auth(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Make a GET request, optionally authenticated
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let builder = Self::with_auth(self.client.get(self.url(path)), token);
        Ok(builder.send().await?)
    }

    /// Make a POST request with JSON body, optionally authenticated
    pub async fn post<T: Serialize>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &T,
    ) -> Result<Response> {
        let builder = Self::with_auth(self.client.post(self.url(path)), token);
        Ok(builder.json(body).send().await?)
    }

    /// Current verification code, read straight from the store
    pub async fn verification_code(&self, email: &str) -> Result<String> {
        let user = self
            .state
            .service_context()
            .user_repo()
            .find_by_email(email)
            .await?
            .context("user not stored")?;
        user.verification_code.context("no verification code")
    }

    /// Register, verify and return a bearer token
    pub async fn signup(&self, request: &RegisterRequest) -> Result<String> {
        let response = self.post("/api/auth/register", None, request).await?;
        assert_status(response, StatusCode::CREATED).await?;

        let verify = VerifyUserRequest {
            email: request.email.clone(),
            code: self.verification_code(&request.email).await?,
        };
        let response = self.post("/api/auth/verify-user", None, &verify).await?;
        let envelope: Envelope<TokenResponse> = assert_json(response, StatusCode::OK).await?;
        Ok(envelope.data.context("missing token")?.token)
    }

    /// Log in with the credentials of a registered user
    pub async fn login(&self, request: &RegisterRequest) -> Result<Response> {
        self.post("/api/auth/login", None, &LoginRequest::from_register(request))
            .await
    }
}

/// Configuration from the environment, with a fallback JWT secret
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::from_lookup(|key| {
        std::env::var(key).ok().or_else(|| match key {
            "JWT_SECRET" => Some("integration-test-secret".to_string()),
            "RATE_LIMIT_BURST" => Some("1000".to_string()),
            _ => None,
        })
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
