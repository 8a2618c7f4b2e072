//! Core of the hierarch supervisor hierarchy.
//!
//! Model interface types, tool adapters, agents and the supervisor routing
//! loop. Supervisors route over [`Member`]s, so a team built from agents is
//! itself a member of the top-level supervisor.

pub use {
    agent::{Agent, Descriptor, MAX_TOOL_CALLS},
    error::{Error, Result},
    model::{Message, Model, Role, Tool},
    route::{FINISH, ROUTE_TOOL, Route, Router},
    supervisor::{DEFAULT_MAX_STEPS, Event, Member, Outcome, Step, Supervisor},
    team::Team,
    toolbox::{Adapter, Handler, ToolError, Toolbox},
};

mod agent;
mod error;
pub mod model;
mod route;
mod supervisor;
mod team;
#[cfg(feature = "testing")]
pub mod testing;
mod toolbox;
