//! Shared HTTP transport for OpenAI-compatible providers.
//!
//! `HttpProvider` wraps a `reqwest::Client` with pre-configured headers and
//! endpoint URL.

use anyhow::Result;
use hcore::model::Response;
use reqwest::{
    Client, Method,
    header::{self, HeaderMap, HeaderValue},
};
use serde::Serialize;

/// Shared HTTP transport for OpenAI-compatible providers.
///
/// Holds a `reqwest::Client`, pre-built headers (auth + content-type),
/// and the target endpoint URL.
#[derive(Clone)]
pub struct HttpProvider {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpProvider {
    /// Create a provider with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        Ok(Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        })
    }

    /// Send a request and deserialize the response as JSON.
    ///
    /// Non-success statuses fail with the body the service returned.
    pub async fn send(&self, body: &impl Serialize) -> Result<Response> {
        tracing::trace!("request: {}", serde_json::to_string(body)?);
        let response = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::trace!("response: {text}");
        if !status.is_success() {
            anyhow::bail!("{} returned {status}: {text}", self.endpoint);
        }

        serde_json::from_str(&text).map_err(Into::into)
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
