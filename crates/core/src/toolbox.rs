//! Tool adapters and the registry agents resolve them from.

use crate::model::Tool;
use compact_str::CompactString;
use std::{collections::BTreeMap, future::Future, pin::Pin, sync::Arc};

/// Failure of a single tool call.
///
/// Never aborts a run: the agent renders it into the tool message and the
/// model decides what to do next.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The model passed arguments the tool cannot use.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The call did not finish in time.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// The external service answered with something unreadable.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The external service reported a failure.
    #[error("{service}: {message}")]
    Service { service: String, message: String },

    /// Local file or process failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Parse JSON tool arguments into `T`
    pub fn parse<T: serde::de::DeserializeOwned>(args: &str) -> Result<T, Self> {
        serde_json::from_str(args).map_err(|e| Self::InvalidArguments(e.to_string()))
    }
}

/// An external capability exposed to agents as a named tool.
pub trait Adapter: Send + Sync + 'static {
    /// The schema advertised to the model.
    fn tool(&self) -> Tool;

    /// Run the tool with JSON encoded arguments.
    fn call(&self, args: String) -> impl Future<Output = Result<String, ToolError>> + Send;
}

/// A type-erased async tool handler.
pub type Handler = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send>>
        + Send
        + Sync,
>;

/// Named tools shared by the agents of a system.
#[derive(Clone, Default)]
pub struct Toolbox {
    tools: BTreeMap<CompactString, (Tool, Handler)>,
}

impl Toolbox {
    /// Create an empty toolbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its own tool name.
    pub fn add<A: Adapter>(&mut self, adapter: A) {
        let adapter = Arc::new(adapter);
        let tool = adapter.tool();
        self.register(tool, move |args| {
            let adapter = adapter.clone();
            async move { adapter.call(args).await }
        });
    }

    /// Register a tool with its handler.
    pub fn register<F, Fut>(&mut self, tool: Tool, handler: F)
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        let name = tool.name.clone();
        let handler: Handler = Arc::new(move |args| Box::pin(handler(args)));
        self.tools.insert(name, (tool, handler));
    }

    /// Whether a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Look up a registered tool.
    pub fn resolve(&self, name: &str) -> Option<&(Tool, Handler)> {
        self.tools.get(name)
    }

    /// Names of every registered tool.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(CompactString::as_str)
    }
}
