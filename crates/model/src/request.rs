//! OpenAI-compatible request body.
//!
//! Fields use `Option` + `skip_serializing_if` so unused knobs are simply
//! absent from the wire.

use hcore::model::{Message, Tool, ToolChoice};
use serde::Serialize;
use serde_json::{Value, json};

/// OpenAI-compatible chat completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The messages to send.
    pub messages: Vec<Message>,
    /// The model identifier.
    pub model: String,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Tool choice control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Value>,
}

impl Request {
    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Fill in the model when the request left it empty.
    pub fn or_model(mut self, model: &str) -> Self {
        if self.model.is_empty() {
            self.model = model.to_owned();
        }
        self
    }

    /// Set the tools for the request.
    fn with_tools(self, tools: Vec<Tool>) -> Self {
        let tools = tools
            .into_iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": json!(tool),
                })
            })
            .collect::<Vec<_>>();
        Self {
            tools: Some(json!(tools)),
            ..self
        }
    }

    /// Set the tool choice for the request.
    fn with_tool_choice(self, tool_choice: ToolChoice) -> Self {
        Self {
            tool_choice: match tool_choice {
                ToolChoice::None => Some(json!("none")),
                ToolChoice::Auto => Some(json!("auto")),
                ToolChoice::Required => Some(json!("required")),
                ToolChoice::Function(name) => Some(json!({
                    "type": "function",
                    "function": { "name": name }
                })),
            },
            ..self
        }
    }
}

impl From<hcore::model::Request> for Request {
    fn from(req: hcore::model::Request) -> Self {
        let mut wire = Self {
            messages: req.messages,
            model: req.model.to_string(),
            temperature: None,
            tool_choice: None,
            tools: None,
        };

        if let Some(tools) = req.tools {
            wire = wire.with_tools(tools);
        }
        if let Some(tool_choice) = req.tool_choice {
            wire = wire.with_tool_choice(tool_choice);
        }

        wire
    }
}
