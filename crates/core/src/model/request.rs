//! Chat request type

use crate::model::{Message, Tool, ToolChoice};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A chat completion request.
///
/// Contains everything needed to make one model call. Providers convert
/// this into their wire format via `From<Request>`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Request {
    /// The model to use, empty for the provider default.
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub model: CompactString,

    /// The conversation messages.
    #[serde(default)]
    pub messages: Vec<Message>,

    /// The tools available for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,

    /// Controls which tool is called by the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl Request {
    /// Create a new request for the given model.
    pub fn new(model: impl Into<CompactString>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the messages for this request.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Set the tools for this request, skipped when empty.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = (!tools.is_empty()).then_some(tools);
        self
    }

    /// Set the tool choice for this request.
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    /// Names of the tools offered by this request.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .flatten()
            .map(|tool| tool.name.as_str())
            .collect()
    }
}
