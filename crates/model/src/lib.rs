//! Model providers for hierarch.
//!
//! Groq and OpenAI both speak the OpenAI chat completions API, so a single
//! HTTP transport and wire request serve both.

pub use config::{GROQ_ENDPOINT, OPENAI_ENDPOINT, ProviderConfig, ProviderKind};
pub use http::HttpProvider;
pub use provider::{Provider, build_provider};
pub use request::Request;
pub use reqwest::Client;

mod config;
mod http;
mod provider;
mod request;
