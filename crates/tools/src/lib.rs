//! Tool adapters used by the hierarch teams.
//!
//! Every adapter implements [`hcore::Adapter`]: a schema for the model and
//! an async `call` taking JSON arguments. Failures are [`ToolError`]s that
//! the calling agent reports back to its model.

pub use {
    chart::PythonRepl,
    document::{CreateOutline, EditDocument, ReadDocument, Workspace, WriteDocument},
    scrape::{Page, WebScraper, extract},
    search::{SearchResult, TAVILY_ENDPOINT, TavilySearch},
};
pub use reqwest::Client;

use hcore::ToolError;
use std::{future::Future, time::Duration};

mod chart;
mod document;
mod scrape;
mod search;

/// Default time budget of a single tool call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with outgoing tool requests.
pub const USER_AGENT: &str = "HierarchicalAgents/1.0";

/// Bound a tool future by a timeout.
async fn timed<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, ToolError>>,
) -> Result<T, ToolError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ToolError::Timeout(timeout.as_secs()))?
}

/// Map a transport failure of an external service.
fn transport(service: &str, e: reqwest::Error) -> ToolError {
    ToolError::Service {
        service: service.to_owned(),
        message: e.to_string(),
    }
}
