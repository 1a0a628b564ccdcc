//! Authenticated, stateless request/response plumbing shared by every
//! entity client.
//!
//! # Design
//! `Connection` holds only immutable configuration and a shared `Transport`.
//! Every verb goes through the same three steps:
//! `build_request` (pure: URL, query, headers, JSON body) →
//! `Transport::execute` (I/O) → `parse_response` (status check, JSON decode).
//! No retries happen here; every failure is surfaced to the caller.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::LunoConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Query};
use crate::transport::{ReqwestTransport, Transport};

/// Placeholder body type for requests that carry no payload.
pub const NO_BODY: Option<&()> = None;

/// Cheaply clonable handle to the API.
#[derive(Clone)]
pub struct Connection {
    config: Arc<LunoConfig>,
    transport: Arc<dyn Transport>,
    authorization: Arc<str>,
}

impl Connection {
    /// Connect with the default reqwest transport.
    pub fn new(config: LunoConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Connect through a caller-supplied transport.
    pub fn with_transport(mut config: LunoConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        // Literal configs skip the trim in `with_base_url`.
        let trimmed = config.base_url.trim_end_matches('/').len();
        config.base_url.truncate(trimmed);
        let credentials = format!("{}:{}", config.api_key, config.secret_key);
        let authorization = format!("Basic {}", STANDARD.encode(credentials));
        Ok(Self {
            config: Arc::new(config),
            transport,
            authorization: authorization.into(),
        })
    }

    pub fn config(&self) -> &LunoConfig {
        &self.config
    }

    /// Assemble a request without sending it.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<&B>,
    ) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut headers = vec![
            ("authorization".to_string(), self.authorization.to_string()),
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), self.config.user_agent.clone()),
        ];

        let body = match body {
            Some(body) => {
                let json = serde_json::to_string(body)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(json)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url, path),
            query,
            headers,
            body,
        })
    }

    /// Check the status and decode the body into `R`.
    pub fn parse_response<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R> {
        if !response.is_success() {
            warn!(status = response.status, "request rejected");
            return Err(ApiError::from_status(response.status, &response.body));
        }
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: Query) -> Result<R> {
        self.send(HttpMethod::Get, path, query, NO_BODY).await
    }

    #[instrument(skip(self, body, query), fields(path = %path))]
    pub async fn post<B, R>(&self, path: &str, body: Option<&B>, query: Query) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Post, path, query, body).await
    }

    #[instrument(skip(self, body, query), fields(path = %path))]
    pub async fn put<B, R>(&self, path: &str, body: &B, query: Query) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Put, path, query, Some(body)).await
    }

    #[instrument(skip(self, body, query), fields(path = %path))]
    pub async fn patch<B, R>(&self, path: &str, body: &B, query: Query) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(HttpMethod::Patch, path, query, Some(body)).await
    }

    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn delete<R: DeserializeOwned>(&self, path: &str, query: Query) -> Result<R> {
        self.send(HttpMethod::Delete, path, query, NO_BODY).await
    }

    async fn send<B, R>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<&B>,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.build_request(method, path, query, body)?;
        debug!(%method, url = %request.url, "dispatching request");
        let response = self.transport.execute(request).await?;
        self.parse_response(response)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
