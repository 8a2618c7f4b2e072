//! Command line interface

use crate::{Config, System, config};
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures_util::StreamExt;
use hcore::{Event, Message};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

/// Hierarch CLI
#[derive(Debug, Parser)]
#[command(name = "hierarch", version, about)]
pub struct App {
    /// Path to the config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (use -v, -vv, -vvv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a task through the whole hierarchy
    Run(RunCmd),

    /// Run a task through a single team
    Team(TeamCmd),

    /// Generate the configuration file
    Generate {
        /// Where to write it, the default config path when omitted
        path: Option<PathBuf>,
    },
}

/// Run command arguments
#[derive(Debug, Args)]
pub struct RunCmd {
    /// Print every step as it is produced
    #[arg(short, long)]
    pub stream: bool,

    /// The task to work on
    pub task: String,
}

/// Team command arguments
#[derive(Debug, Args)]
pub struct TeamCmd {
    /// The team to run
    pub name: TeamKind,

    /// The task to work on
    pub task: String,
}

/// Available teams
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TeamKind {
    /// Search and web scraping
    Research,
    /// Documents, outlines and charts
    Writing,
}

impl App {
    /// Initialize tracing subscriber based on verbosity
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let directive = match self.verbose {
                0 => "warn,hierarch=info",
                1 => "hierarch=debug,hierarch_core=debug",
                2 => "hierarch=trace,hierarch_core=trace,hierarch_tools=trace",
                3 => "debug",
                _ => "trace",
            };
            EnvFilter::new(directive)
        });

        fmt()
            .without_time()
            .with_env_filter(filter)
            .with_target(self.verbose != 0)
            .init();
    }

    /// Load the config: the given file, the default file, or the environment.
    pub fn load_config(&self) -> Result<Config> {
        dotenv::dotenv().ok();
        let path = self
            .config
            .clone()
            .or_else(|| config::default_path().filter(|p| p.exists()));

        let config = match path {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Config::load(&path)?
            }
            None => Config::from_env()?,
        };
        Ok(config)
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Command::Run(cmd) => cmd.run(System::new(self.load_config()?)?).await,
            Command::Team(cmd) => cmd.run(System::new(self.load_config()?)?).await,
            Command::Generate { path } => {
                let path = path
                    .clone()
                    .or_else(config::default_path)
                    .ok_or_else(|| anyhow::anyhow!("no config directory on this platform"))?;
                Config::template().save(&path)?;
                Ok(())
            }
        }
    }
}

impl RunCmd {
    /// Run the task and print the answer
    pub async fn run<M: hcore::Model>(&self, system: System<M>) -> Result<()> {
        if !self.stream {
            let answer = system.run(self.task.as_str()).await?;
            if answer.truncated {
                eprintln!("(stopped at the step limit)");
            }
            println!("{}", answer.text);
            return Ok(());
        }

        let mut events = std::pin::pin!(system.stream(self.task.clone()));
        while let Some(event) = events.next().await {
            match event? {
                Event::Step(step) => println!("{}: {}\n", step.stage, step.message.content),
                Event::Finish(outcome) => {
                    if outcome.truncated {
                        eprintln!("(stopped at the step limit)");
                    }
                    println!("{}", outcome.text());
                }
            }
        }
        Ok(())
    }
}

impl TeamCmd {
    /// Run the task through one team and print its reply
    pub async fn run<M: hcore::Model>(&self, system: System<M>) -> Result<()> {
        let team = match self.name {
            TeamKind::Research => system.research_team()?,
            TeamKind::Writing => system.writing_team()?,
        };
        let outcome = team.invoke(vec![Message::user(self.task.as_str())]).await?;
        println!("{}", outcome.text());
        Ok(())
    }
}
