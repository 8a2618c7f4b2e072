//! The system facade.

use crate::{
    Config,
    teams::{self, RESEARCH_TEAM, WRITING_TEAM},
};
use futures_core::Stream;
use futures_util::StreamExt;
use hcore::{Error, Event, Message, Model, Outcome, Result, Supervisor, Team};
use model::{Provider, build_provider};
use std::time::Duration;
use tempfile::TempDir;
use tools::{Client, Workspace};

/// Roster name of the top-level supervisor.
pub const SUPERVISOR: &str = "supervisor";

/// The final answer of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Content of the last message of the top-level history.
    pub text: String,
    /// Whether the top supervisor stopped at its step ceiling.
    pub truncated: bool,
    /// The full top-level history.
    pub messages: Vec<Message>,
}

impl From<Outcome> for Answer {
    fn from(outcome: Outcome) -> Self {
        Self {
            text: outcome.text().to_owned(),
            truncated: outcome.truncated,
            messages: outcome.messages,
        }
    }
}

/// The research and writing teams under one top-level supervisor.
///
/// Built once from a [`Config`]. Runs share nothing mutable, so one
/// system may serve concurrent runs.
pub struct System<M> {
    config: Config,
    top: Supervisor<M, Team<M>>,
    workspace: Workspace,
    _scratch: Option<TempDir>,
}

impl System<Provider> {
    /// Build the system with the configured HTTP provider.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = client(&config)?;
        let provider = build_provider(&config.provider()?, client.clone())
            .map_err(|e| Error::config(e.to_string()))?;
        Self::build(config, provider, client)
    }
}

fn client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::config(format!("failed to build http client: {e}")))
}

impl<M: Model> System<M> {
    /// Build the system around the given model.
    ///
    /// Provider keys are not required; the search key still is.
    pub fn with_model(config: Config, model: M) -> Result<Self> {
        config.check()?;
        let client = client(&config)?;
        Self::build(config, model, client)
    }

    fn build(config: Config, model: M, client: Client) -> Result<Self> {
        let (workspace, scratch) = match &config.workspace {
            Some(dir) => (Workspace::new(dir), None),
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("hierarch-")
                    .tempdir()
                    .map_err(|e| Error::config(format!("failed to create workspace: {e}")))?;
                (Workspace::new(dir.path()), Some(dir))
            }
        };
        tracing::debug!(workspace = %workspace.root().display(), "document workspace");

        let toolbox = teams::toolbox(&config, client, &workspace)?;
        let research = teams::research_team(&config, model.clone(), &toolbox)?;
        let writing = teams::writing_team(&config, model.clone(), &toolbox)?;
        let top = Supervisor::new(SUPERVISOR, model, vec![research, writing])?
            .max_steps(config.max_top_steps);

        Ok(Self {
            config,
            top,
            workspace,
            _scratch: scratch,
        })
    }

    /// The configuration this system was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The directory the document tools work in.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Look up a team by roster name.
    pub fn team(&self, name: &str) -> Option<&Team<M>> {
        self.top.member(name)
    }

    /// The research team.
    pub fn research_team(&self) -> Result<&Team<M>> {
        self.require(RESEARCH_TEAM)
    }

    /// The writing team.
    pub fn writing_team(&self) -> Result<&Team<M>> {
        self.require(WRITING_TEAM)
    }

    fn require(&self, name: &str) -> Result<&Team<M>> {
        self.team(name)
            .ok_or_else(|| Error::config(format!("no team named '{name}'")))
    }

    /// Stream every message produced while working on the task, ending
    /// with the outcome of the top supervisor.
    pub fn stream(&self, task: String) -> impl Stream<Item = Result<Event>> + Send + '_ {
        self.top.stream(vec![Message::user(task)])
    }

    /// Run the task to completion.
    pub async fn run(&self, task: impl Into<String>) -> Result<Answer> {
        let events = self.stream(task.into());
        futures_util::pin_mut!(events);
        while let Some(event) = events.next().await {
            match event? {
                Event::Step(step) => {
                    tracing::info!(stage = %step.stage, "step finished");
                }
                Event::Finish(outcome) => return Ok(outcome.into()),
            }
        }
        Err(anyhow::anyhow!("run ended without an outcome").into())
    }

    /// Blocking [`run`](Self::run) on a private runtime.
    ///
    /// Must not be called from inside an async runtime.
    pub fn run_sync(&self, task: impl Into<String>) -> Result<Answer> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::External(e.into()))?;
        runtime.block_on(self.run(task))
    }
}
