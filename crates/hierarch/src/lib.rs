//! Hierarch: research and writing agent teams under a top-level supervisor.
//!
//! A [`System`] is built once from a [`Config`] and runs tasks to an
//! [`Answer`]. The top supervisor routes between the research team and
//! the writing team; each team routes between its own agents.

pub use {
    cli::{App, Command, RunCmd, TeamCmd, TeamKind},
    config::{
        Config, MODEL_VAR, PROVIDER_VAR, SEARCH_KEY_VAR, SearchConfig, default_path,
        expand_env_vars,
    },
    system::{Answer, SUPERVISOR, System},
    teams::{RESEARCH_TEAM, WRITING_TEAM},
};

mod cli;
mod config;
mod system;
pub mod teams;
