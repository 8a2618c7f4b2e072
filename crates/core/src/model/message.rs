//! Conversation messages

use crate::model::ToolCall;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A message in the conversation state
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Message {
    /// The role of the message
    pub role: Role,

    /// The author of the message, set for member replies
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub name: CompactString,

    /// The content of the message
    #[serde(default)]
    pub content: String,

    /// The tool call id
    #[serde(default, skip_serializing_if = "CompactString::is_empty")]
    pub tool_call_id: CompactString,

    /// The tool calls
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>, tool_calls: Option<&[ToolCall]>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: tool_calls.map(<[ToolCall]>::to_vec).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Create a new tool message
    pub fn tool(content: impl Into<String>, call: impl Into<CompactString>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: call.into(),
            ..Default::default()
        }
    }

    /// Create a reply authored by a roster member.
    ///
    /// Member replies are folded into the supervisor history as user
    /// messages carrying the member name, so the routing model reads them
    /// as reports rather than its own turns.
    pub fn member(name: impl Into<CompactString>, content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Whether this message was authored by the named member
    pub fn is_from(&self, name: &str) -> bool {
        self.name == name
    }
}

/// The role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
pub enum Role {
    /// The user role
    #[serde(rename = "user")]
    #[default]
    User,
    /// The assistant role
    #[serde(rename = "assistant")]
    Assistant,
    /// The system role
    #[serde(rename = "system")]
    System,
    /// The tool role
    #[serde(rename = "tool")]
    Tool,
}
