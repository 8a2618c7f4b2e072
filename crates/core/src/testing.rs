//! Deterministic model for tests.

use crate::{
    model::{Model, Request, Response, ToolCall},
    route::ROUTE_TOOL,
};
use anyhow::Result;
use compact_str::CompactString;
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};

/// A model that replays canned responses in order and records every
/// request it receives. Clones share the same script.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    responses: Arc<Mutex<VecDeque<Response>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl ScriptedModel {
    /// Create a model with the given script.
    pub fn new(responses: impl IntoIterator<Item = Response>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    /// Append a response to the script.
    pub fn push(&self, response: Response) {
        self.responses.lock().push_back(response);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

impl Model for ScriptedModel {
    async fn send(&self, request: &Request) -> Result<Response> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }

    fn active_model(&self) -> CompactString {
        CompactString::new("scripted")
    }
}

/// A routing decision as the model would emit it.
pub fn route(next: &str) -> Response {
    call(ROUTE_TOOL, serde_json::json!({ "next": next }))
}

/// A single tool call with JSON arguments.
pub fn call(name: &str, args: serde_json::Value) -> Response {
    Response::calls(vec![ToolCall::function(
        format!("call_{name}"),
        name,
        args.to_string(),
    )])
}

/// A plain text reply.
pub fn reply(content: &str) -> Response {
    Response::text(content)
}
