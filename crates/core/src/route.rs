//! Routing decisions of a supervisor.
//!
//! Each supervisor iteration asks the model for exactly one choice out of
//! the roster plus [`FINISH`]. The choice is requested as a forced `route`
//! tool call; replies that carry the decision as JSON content are accepted
//! too. Anything outside the roster is a routing error, never a default.

use crate::{
    Error, Result,
    model::{Message, Model, Request, Response, Tool, ToolChoice},
};
use compact_str::CompactString;
use serde::Deserialize;

/// Sentinel choice that ends a supervisor loop.
pub const FINISH: &str = "FINISH";

/// Name of the tool the routing model is forced to call.
pub const ROUTE_TOOL: &str = "route";

/// One routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Hand the conversation to this roster member.
    Member(CompactString),
    /// The task is complete.
    Finish,
}

impl Route {
    /// Resolve a raw choice against the roster.
    pub fn parse(choice: &str, roster: &[CompactString]) -> Option<Self> {
        let choice = choice.trim();
        if choice == FINISH {
            return Some(Self::Finish);
        }
        roster
            .iter()
            .find(|member| member.as_str() == choice)
            .map(|member| Self::Member(member.clone()))
    }
}

#[derive(Deserialize)]
struct Decision {
    next: String,
}

/// Asks the model which roster member acts next.
#[derive(Clone)]
pub struct Router<M> {
    supervisor: CompactString,
    model: M,
    roster: Vec<CompactString>,
    prompt: String,
    tool: Tool,
}

impl<M: Model> Router<M> {
    /// Create a router for the given roster.
    pub fn new(supervisor: impl Into<CompactString>, model: M, roster: Vec<CompactString>) -> Self {
        let members = roster.join(", ");
        let prompt = format!(
            "You are a supervisor tasked with managing a conversation between the \
             following workers: {members}. Given the following user request, respond \
             with the worker to act next. Each worker will perform a task and respond \
             with their results and status. When finished, respond with {FINISH}."
        );

        let options = std::iter::once(FINISH)
            .chain(roster.iter().map(CompactString::as_str))
            .collect::<Vec<_>>();
        let tool = Tool {
            name: ROUTE_TOOL.into(),
            description: format!(
                "Worker to route to next. If no worker is needed, return {FINISH}."
            ),
            parameters: schemars::json_schema!({
                "type": "object",
                "properties": {
                    "next": {
                        "type": "string",
                        "enum": options,
                        "description": format!("Next worker to route to. Options: {}", options.join(", ")),
                    }
                },
                "required": ["next"],
            }),
            strict: false,
        };

        Self {
            supervisor: supervisor.into(),
            model,
            roster,
            prompt,
            tool,
        }
    }

    /// The system prompt sent ahead of the history.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The members this router chooses from, in order.
    pub fn roster(&self) -> &[CompactString] {
        &self.roster
    }

    /// Decide the next route for this history.
    pub async fn route(&self, history: &[Message]) -> Result<Route> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(&self.prompt));
        messages.extend_from_slice(history);

        let request = Request::new(self.model.active_model())
            .with_messages(messages)
            .with_tools(vec![self.tool.clone()])
            .with_tool_choice(ToolChoice::from(ROUTE_TOOL));
        let response = self.model.send(&request).await?;

        let choice = decision(&response).unwrap_or_default();
        Route::parse(&choice, &self.roster).ok_or_else(|| Error::Routing {
            supervisor: self.supervisor.clone(),
            target: choice,
        })
    }
}

/// Extract the raw choice from a routing response.
fn decision(response: &Response) -> Option<String> {
    if let Some(call) = response
        .tool_calls()
        .and_then(|calls| calls.iter().find(|c| c.function.name == ROUTE_TOOL))
    {
        return serde_json::from_str::<Decision>(&call.function.arguments)
            .map(|d| d.next)
            .ok();
    }

    let content = response.content()?.trim();
    match serde_json::from_str::<Decision>(content) {
        Ok(decision) => Some(decision.next),
        Err(_) => Some(content.to_owned()),
    }
}
