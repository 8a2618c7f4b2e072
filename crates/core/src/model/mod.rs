//! Model interface types and the `Model` trait.
//!
//! Shared by every provider and by the agents: `Message`, `Tool`,
//! `Request`, `Response`.

use anyhow::Result;
use compact_str::CompactString;
pub use message::{Message, Role};
pub use request::Request;
pub use response::{Choice, CompletionMeta, Delta, FinishReason, Response, Usage};
pub use tool::{FunctionCall, Tool, ToolCall, ToolChoice};

mod message;
mod request;
mod response;
mod tool;

/// A chat completion backend.
///
/// Inference lives behind this trait; agents and routers only build
/// requests and read responses. Implementations are cheap to clone and
/// shared across every agent of a system.
pub trait Model: Clone + Send + Sync {
    /// Send a chat completion request.
    fn send(&self, request: &Request) -> impl Future<Output = Result<Response>> + Send;

    /// Get the active/default model name.
    fn active_model(&self) -> CompactString;
}

/// `()` as a no-op Model for wiring tests (panics on send).
impl Model for () {
    async fn send(&self, _request: &Request) -> Result<Response> {
        panic!("NoopModel::send called, not intended for real LLM calls");
    }

    fn active_model(&self) -> CompactString {
        CompactString::new("")
    }
}
