//! The supervisor routing loop.
//!
//! A [`Supervisor`] owns a fixed roster of [`Member`]s and a [`Router`].
//! Each iteration the router picks one member (or [`FINISH`]); the member
//! acts on the full history and its final message is appended. The loop
//! is bounded by `max_steps` routing decisions.
//!
//! [`FINISH`]: crate::route::FINISH

use crate::{
    Error, Result,
    model::{Message, Model},
    route::{FINISH, Route, Router},
};
use async_stream::try_stream;
use compact_str::CompactString;
use futures_core::Stream;
use futures_util::StreamExt;

/// Default routing ceiling of a supervisor.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// A message produced while a supervisor runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Slash-joined path of the member that produced the message.
    pub stage: CompactString,
    /// The produced message.
    pub message: Message,
    /// Whether the producing loop, or one nested in it, stopped at its step
    /// ceiling before this message.
    pub truncated: bool,
}

impl Step {
    /// Create a step.
    pub fn new(stage: impl Into<CompactString>, message: Message) -> Self {
        Self {
            stage: stage.into(),
            message,
            truncated: false,
        }
    }

    /// Mark the step as produced by an exhausted loop.
    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }
}

/// Final state of a supervisor loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// The accumulated conversation history.
    pub messages: Vec<Message>,
    /// Whether the loop, or a team it invoked, stopped at its step ceiling
    /// instead of FINISH.
    pub truncated: bool,
}

impl Outcome {
    /// The last message of the history.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the last message, empty when there is none.
    pub fn text(&self) -> &str {
        self.last().map(|m| m.content.as_str()).unwrap_or_default()
    }
}

/// An item of a supervisor stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A member produced a message.
    Step(Step),
    /// The loop ended; always the last item.
    Finish(Outcome),
}

/// Anything a supervisor can route to: an agent or a whole team.
pub trait Member: Send + Sync {
    /// Roster name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Act on the history. The last yielded step is the member's reply.
    fn act(&self, history: Vec<Message>) -> impl Stream<Item = Result<Step>> + Send + '_;
}

/// A routing loop over a fixed roster.
pub struct Supervisor<M, W> {
    name: CompactString,
    pub(crate) description: String,
    router: Router<M>,
    members: Vec<W>,
    max_steps: usize,
}

impl<M: Model, W: Member> Supervisor<M, W> {
    /// Build a supervisor over the given roster.
    ///
    /// The roster must be non-empty with unique names, none of them
    /// the finish sentinel.
    pub fn new(name: impl Into<CompactString>, model: M, members: Vec<W>) -> Result<Self> {
        let name = name.into();
        if members.is_empty() {
            return Err(Error::config(format!("supervisor '{name}' has no members")));
        }

        let mut roster: Vec<CompactString> = Vec::with_capacity(members.len());
        for member in &members {
            let member = member.name();
            if member.is_empty() || member == FINISH {
                return Err(Error::config(format!(
                    "supervisor '{name}' has an invalid member name '{member}'"
                )));
            }
            if roster.iter().any(|known| known == member) {
                return Err(Error::config(format!(
                    "supervisor '{name}' has duplicate member '{member}'"
                )));
            }
            roster.push(member.into());
        }

        Ok(Self {
            router: Router::new(name.clone(), model, roster),
            name,
            description: String::new(),
            members,
            max_steps: DEFAULT_MAX_STEPS,
        })
    }

    /// Set the routing ceiling; zero is raised to one.
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps.max(1);
        self
    }

    /// Set the description shown when this supervisor is a member.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Roster names in order.
    pub fn roster(&self) -> &[CompactString] {
        self.router.roster()
    }

    /// Look up a member by name.
    pub fn member(&self, name: &str) -> Option<&W> {
        self.members.iter().find(|member| member.name() == name)
    }

    /// Run the loop, yielding every produced message and then the outcome.
    pub fn stream(&self, messages: Vec<Message>) -> impl Stream<Item = Result<Event>> + Send + '_ {
        try_stream! {
            let mut history = messages;
            let mut exhausted = true;
            let mut nested = false;

            for step in 0..self.max_steps {
                let route = self.router.route(&history).await?;
                tracing::debug!(supervisor = %self.name, step, ?route, "routed");
                let name = match route {
                    Route::Finish => {
                        exhausted = false;
                        break;
                    }
                    Route::Member(name) => name,
                };

                let member = self.member(&name).ok_or_else(|| Error::Routing {
                    supervisor: self.name.clone(),
                    target: name.to_string(),
                })?;

                let mut reply = None;
                let steps = member.act(history.clone());
                futures_util::pin_mut!(steps);
                while let Some(produced) = steps.next().await {
                    let produced = produced.map_err(|e| e.in_stage(name.clone()))?;
                    nested |= produced.truncated;
                    reply = Some(produced.message.clone());
                    yield Event::Step(produced);
                }

                if let Some(reply) = reply {
                    history.push(reply);
                }
            }

            if exhausted {
                tracing::warn!(
                    supervisor = %self.name,
                    max_steps = self.max_steps,
                    "step ceiling reached before FINISH"
                );
            }
            yield Event::Finish(Outcome {
                messages: history,
                truncated: exhausted || nested,
            });
        }
    }

    /// Run the loop to completion.
    pub async fn invoke(&self, messages: Vec<Message>) -> Result<Outcome> {
        let events = self.stream(messages);
        futures_util::pin_mut!(events);
        while let Some(event) = events.next().await {
            if let Event::Finish(outcome) = event? {
                return Ok(outcome);
            }
        }
        Err(anyhow::anyhow!("{}: loop ended without an outcome", self.name).into())
    }

    /// Supervisor name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
