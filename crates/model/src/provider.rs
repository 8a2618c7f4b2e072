//! Provider implementation.
//!
//! `build_provider()` picks the endpoint and default model from the
//! `ProviderKind`; both kinds share the OpenAI-compatible transport.

use crate::{
    config::{ProviderConfig, ProviderKind},
    http::HttpProvider,
    request::Request,
};
use anyhow::Result;
use compact_str::CompactString;
use hcore::model::{Model, Response};

/// A chat completions provider.
#[derive(Clone)]
pub struct Provider {
    kind: ProviderKind,
    http: HttpProvider,
    model: CompactString,
    temperature: Option<f32>,
}

impl Provider {
    /// The provider kind.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}

/// Construct a `Provider` from config and a shared HTTP client.
pub fn build_provider(config: &ProviderConfig, client: reqwest::Client) -> Result<Provider> {
    if config.api_key.is_empty() {
        anyhow::bail!("{} is not set", config.kind.key_var());
    }

    let http = HttpProvider::bearer(client, &config.api_key, config.endpoint())?;
    Ok(Provider {
        kind: config.kind,
        http,
        model: config.model(),
        temperature: config.temperature,
    })
}

impl Model for Provider {
    async fn send(&self, request: &hcore::model::Request) -> Result<Response> {
        let body = Request::from(request.clone())
            .or_model(&self.model)
            .temperature(self.temperature);
        self.http.send(&body).await
    }

    fn active_model(&self) -> CompactString {
        self.model.clone()
    }
}
