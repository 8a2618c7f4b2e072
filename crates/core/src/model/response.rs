//! Chat completion responses

use crate::model::{Message, Role, ToolCall};
use serde::Deserialize;

/// Metadata of a chat completion
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletionMeta {
    /// A unique identifier for the chat completion
    #[serde(default)]
    pub id: String,

    /// The object type
    #[serde(default)]
    pub object: String,

    /// Unix timestamp (in seconds) of when the response was created
    #[serde(default)]
    pub created: u64,

    /// The model used for the completion
    #[serde(default)]
    pub model: String,
}

/// Message content in a completion response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Delta {
    /// The role of the message author
    pub role: Option<Role>,

    /// The content of the message
    pub content: Option<String>,

    /// Tool calls made by the model
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// A chat completion response from the model
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Response {
    /// Completion metadata
    #[serde(flatten)]
    pub meta: CompletionMeta,

    /// The list of completion choices
    #[serde(default)]
    pub choices: Vec<Choice>,

    /// Token usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl Response {
    /// A response carrying a plain text reply
    pub fn text(content: impl Into<String>) -> Self {
        Self::with(Delta {
            role: Some(Role::Assistant),
            content: Some(content.into()),
            tool_calls: None,
        })
    }

    /// A response requesting the given tool calls
    pub fn calls(calls: Vec<ToolCall>) -> Self {
        Self::with(Delta {
            role: Some(Role::Assistant),
            content: None,
            tool_calls: Some(calls),
        })
    }

    fn with(message: Delta) -> Self {
        let finish_reason = if message.tool_calls.is_some() {
            FinishReason::ToolCalls
        } else {
            FinishReason::Stop
        };
        Self {
            choices: vec![Choice {
                index: 0,
                message,
                finish_reason: Some(finish_reason),
            }],
            ..Default::default()
        }
    }

    /// The assistant message of the first choice
    pub fn message(&self) -> Option<Message> {
        let choice = self.choices.first()?;
        Some(Message::assistant(
            choice.message.content.clone().unwrap_or_default(),
            choice.message.tool_calls.as_deref(),
        ))
    }

    /// Get the content of the first choice
    pub fn content(&self) -> Option<&String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
    }

    /// Get the tool calls from the response
    pub fn tool_calls(&self) -> Option<&[ToolCall]> {
        self.choices
            .first()
            .and_then(|choice| choice.message.tool_calls.as_deref())
    }
}

/// A completion choice in a non-streaming response
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The index of this choice in the list
    #[serde(default)]
    pub index: u32,

    /// The generated message
    pub message: Delta,

    /// The reason the model stopped generating
    pub finish_reason: Option<FinishReason>,
}

/// The reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished naturally
    Stop,

    /// The model hit the max token limit
    Length,

    /// Content was filtered
    ContentFilter,

    /// The model is making tool calls
    ToolCalls,

    /// Insufficient system resources
    InsufficientSystemResource,
}

/// Token usage statistics
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    pub completion_tokens: u32,

    /// Total number of tokens used
    pub total_tokens: u32,
}
