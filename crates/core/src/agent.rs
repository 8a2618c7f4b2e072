//! Agents: one model, one tool subset and a system prompt.
//!
//! A [`Descriptor`] is pure config. [`Agent`] binds it to a model and the
//! handlers of its allowed tools, and runs the tool loop of one turn.

use crate::{
    Error, Result,
    model::{Message, Model, Request, Tool, ToolCall},
    supervisor::{Member, Step},
    toolbox::{Handler, Toolbox},
};
use async_stream::try_stream;
use compact_str::CompactString;
use futures_core::Stream;
use std::collections::BTreeMap;

/// Maximum tool rounds per agent turn.
pub const MAX_TOOL_CALLS: usize = 16;

/// Static description of an agent.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    /// Agent identifier, also its roster name.
    pub name: CompactString,
    /// Human-readable description.
    pub description: String,
    /// System prompt sent before each model request.
    pub system_prompt: String,
    /// Names of tools this agent may call.
    pub tools: Vec<CompactString>,
    /// Model identifier, the model's default when unset.
    pub model: Option<CompactString>,
}

impl Descriptor {
    /// Create a new descriptor with the given name.
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Allow a tool by name.
    pub fn tool(mut self, name: impl Into<CompactString>) -> Self {
        self.tools.push(name.into());
        self
    }

    /// Pin the model identifier.
    pub fn model(mut self, model: impl Into<CompactString>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A callable agent.
#[derive(Clone)]
pub struct Agent<M> {
    descriptor: Descriptor,
    model: M,
    tools: Vec<Tool>,
    handlers: BTreeMap<CompactString, Handler>,
    max_tool_calls: usize,
}

impl<M: Model> Agent<M> {
    /// Bind a descriptor to a model and the tools it names.
    ///
    /// Fails when a named tool is not in the toolbox.
    pub fn new(descriptor: Descriptor, model: M, toolbox: &Toolbox) -> Result<Self> {
        let mut tools = Vec::with_capacity(descriptor.tools.len());
        let mut handlers = BTreeMap::new();
        for name in &descriptor.tools {
            let Some((tool, handler)) = toolbox.resolve(name) else {
                return Err(Error::config(format!(
                    "agent '{}' uses unknown tool '{name}'",
                    descriptor.name
                )));
            };
            tools.push(tool.clone());
            handlers.insert(name.clone(), handler.clone());
        }

        Ok(Self {
            descriptor,
            model,
            tools,
            handlers,
            max_tool_calls: MAX_TOOL_CALLS,
        })
    }

    /// Set the tool round ceiling.
    pub fn max_tool_calls(mut self, limit: usize) -> Self {
        self.max_tool_calls = limit;
        self
    }

    /// The descriptor of this agent.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Run one turn over the history and return the final reply.
    ///
    /// The reply is authored by the agent. Tool results stay in the turn's
    /// scratch history and are not returned.
    pub async fn invoke(&self, history: &[Message]) -> Result<Message> {
        let name = &self.descriptor.name;
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.descriptor.system_prompt.is_empty() {
            messages.push(Message::system(&self.descriptor.system_prompt));
        }
        messages.extend_from_slice(history);

        for round in 0..=self.max_tool_calls {
            let request = self.request(messages.clone());
            let response = self.model.send(&request).await?;
            let Some(message) = response.message() else {
                return Err(anyhow::anyhow!("model returned no choices").into());
            };

            if message.tool_calls.is_empty() {
                tracing::debug!(agent = %name, round, "agent replied");
                return Ok(Message::member(name.clone(), message.content));
            }

            let handlers = self.permit(&message.tool_calls)?;
            if round == self.max_tool_calls {
                break;
            }

            let results = self.dispatch(&message.tool_calls, handlers).await;
            messages.push(message);
            messages.extend(results);
        }

        Err(Error::ToolCallLimit {
            agent: name.clone(),
            limit: self.max_tool_calls,
        })
    }

    fn request(&self, messages: Vec<Message>) -> Request {
        let model = match &self.descriptor.model {
            Some(model) => model.clone(),
            None => self.model.active_model(),
        };
        Request::new(model)
            .with_messages(messages)
            .with_tools(self.tools.clone())
    }

    /// Resolve the handler of every call, rejecting the whole batch if any
    /// call is outside the allow-list.
    fn permit(&self, calls: &[ToolCall]) -> Result<Vec<Handler>> {
        calls
            .iter()
            .map(|call| {
                self.handlers
                    .get(call.function.name.as_str())
                    .cloned()
                    .ok_or_else(|| Error::ToolNotPermitted {
                        agent: self.descriptor.name.clone(),
                        tool: call.function.name.clone(),
                    })
            })
            .collect()
    }

    /// Run tool calls in order and collect results as tool messages.
    async fn dispatch(&self, calls: &[ToolCall], handlers: Vec<Handler>) -> Vec<Message> {
        let mut results = Vec::with_capacity(calls.len());
        for (call, handler) in calls.iter().zip(handlers) {
            let name = call.function.name.as_str();
            tracing::debug!(agent = %self.descriptor.name, tool = name, "dispatch");
            let output = match handler(call.function.arguments.clone()).await {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(agent = %self.descriptor.name, tool = name, "tool failed: {e}");
                    format!("Error: {e}")
                }
            };
            results.push(Message::tool(output, call.id.clone()));
        }
        results
    }
}

impl<M: Model> Member for Agent<M> {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn act(&self, history: Vec<Message>) -> impl Stream<Item = Result<Step>> + Send + '_ {
        try_stream! {
            let message = self.invoke(&history).await?;
            yield Step::new(self.descriptor.name.clone(), message);
        }
    }
}
