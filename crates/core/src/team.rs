//! Teams: supervisors that act as members of another supervisor.
//!
//! A team receives only the latest message of the outer history as its
//! brief, runs its own loop to completion and reports back one message
//! authored by the team name. Steps of its members are forwarded with the
//! team name prefixed to their stage.

use crate::{
    Result,
    agent::Agent,
    model::{Message, Model},
    supervisor::{Event, Member, Step, Supervisor},
};
use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;

/// A supervisor over agents.
pub type Team<M> = Supervisor<M, Agent<M>>;

impl<M: Model, W: Member> Member for Supervisor<M, W> {
    fn name(&self) -> &str {
        Supervisor::name(self)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn act(&self, history: Vec<Message>) -> impl Stream<Item = Result<Step>> + Send + '_ {
        let brief: Vec<Message> = history.last().cloned().into_iter().collect();
        try_stream! {
            let team = Supervisor::name(self);
            let events = self.stream(brief);
            futures_util::pin_mut!(events);
            while let Some(event) = events.next().await {
                match event? {
                    Event::Step(step) => {
                        yield Step::new(format!("{team}/{}", step.stage), step.message)
                            .truncated(step.truncated);
                    }
                    Event::Finish(outcome) => {
                        if outcome.truncated {
                            tracing::warn!(team, "reporting back after step ceiling");
                        }
                        yield Step::new(team, Message::member(team, outcome.text()))
                            .truncated(outcome.truncated);
                    }
                }
            }
        }
    }
}
