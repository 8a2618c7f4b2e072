//! Errors of the supervisor hierarchy.

use compact_str::CompactString;

/// Result alias for hierarchy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a run or a build.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration, or an invalid roster.
    #[error("config: {0}")]
    Config(String),

    /// The routing model named a target outside the roster.
    #[error("{supervisor}: routed to unknown member '{target}'")]
    Routing {
        supervisor: CompactString,
        target: String,
    },

    /// A model asked an agent to run a tool outside its allow-list.
    ///
    /// Displayed without the agent, which the enclosing stage tag names.
    #[error("tool '{tool}' is not permitted")]
    ToolNotPermitted {
        agent: CompactString,
        tool: CompactString,
    },

    /// An agent kept requesting tools past its ceiling.
    #[error("exceeded {limit} tool rounds")]
    ToolCallLimit { agent: CompactString, limit: usize },

    /// Model transport or decoding failure.
    #[error(transparent)]
    External(#[from] anyhow::Error),

    /// A member failure tagged with the member that produced it.
    #[error("{stage}: {source}")]
    Stage {
        stage: CompactString,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Build a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Tag this error with the stage it escaped from
    pub fn in_stage(self, stage: impl Into<CompactString>) -> Self {
        Self::Stage {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error under any stage tags
    pub fn root(&self) -> &Error {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_tags_nest_in_display() {
        let err = Error::ToolNotPermitted {
            agent: "search".into(),
            tool: "python_repl".into(),
        }
        .in_stage("search")
        .in_stage("research_team");

        assert_eq!(
            err.to_string(),
            "research_team: search: tool 'python_repl' is not permitted"
        );
        assert!(matches!(err.root(), Error::ToolNotPermitted { .. }));
    }
}
