//! Python execution for chart generation.

use crate::{DEFAULT_TIMEOUT, document::Workspace};
use hcore::{Adapter, Tool, ToolError};
use schemars::JsonSchema;
use serde::Deserialize;
use std::time::Duration;
use tokio::process::Command;

#[derive(Deserialize, JsonSchema)]
struct ReplArgs {
    /// Python code to execute. Use print(...) to see a value.
    code: String,
}

/// The `python_repl` tool.
///
/// Runs each snippet in a fresh interpreter with the workspace as its
/// working directory, so generated charts land next to the documents.
#[derive(Debug, Clone)]
pub struct PythonRepl {
    python: String,
    workspace: Workspace,
    timeout: Duration,
}

impl PythonRepl {
    /// Tool name.
    pub const NAME: &'static str = "python_repl";

    /// Create a REPL using the given interpreter.
    pub fn new(python: impl Into<String>, workspace: Workspace) -> Self {
        Self {
            python: python.into(),
            workspace,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the time budget of a snippet.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Adapter for PythonRepl {
    fn tool(&self) -> Tool {
        Tool::of::<ReplArgs>(
            Self::NAME,
            "Execute Python code, e.g. to generate charts. Files are written to the \
             shared document workspace.",
        )
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: ReplArgs = ToolError::parse(&args)?;
        tokio::fs::create_dir_all(self.workspace.root()).await?;

        let child = Command::new(&self.python)
            .arg("-c")
            .arg(&args.code)
            .current_dir(self.workspace.root())
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| ToolError::Timeout(self.timeout.as_secs()))??;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            tracing::debug!(bytes = stdout.len(), "python snippet finished");
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(ToolError::Service {
            service: "python".into(),
            message: format!("failed to execute code ({}): {}", output.status, stderr.trim()),
        })
    }
}
