//! The research and writing teams.

use crate::Config;
use hcore::{Agent, Descriptor, Model, Result, Supervisor, Team, Toolbox};
use std::time::Duration;
use tools::{
    Client, CreateOutline, EditDocument, PythonRepl, ReadDocument, TavilySearch, WebScraper,
    Workspace, WriteDocument,
};

/// Roster name of the research team.
pub const RESEARCH_TEAM: &str = "research_team";

/// Roster name of the writing team.
pub const WRITING_TEAM: &str = "writer_team";

/// Register every tool adapter of the system.
pub fn toolbox(config: &Config, client: Client, workspace: &Workspace) -> Result<Toolbox> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut toolbox = Toolbox::new();

    toolbox.add(
        TavilySearch::new(client.clone(), config.search_key()?)
            .endpoint(config.search.endpoint.clone())
            .max_results(config.search.max_results)
            .timeout(timeout),
    );
    if config.scrape_enabled {
        toolbox.add(WebScraper::new(client).timeout(timeout));
    }
    toolbox.add(CreateOutline(workspace.clone()));
    toolbox.add(ReadDocument(workspace.clone()));
    toolbox.add(WriteDocument(workspace.clone()));
    toolbox.add(EditDocument(workspace.clone()));
    toolbox.add(PythonRepl::new(config.python.clone(), workspace.clone()).timeout(timeout));
    Ok(toolbox)
}

fn agent<M: Model>(
    config: &Config,
    descriptor: Descriptor,
    model: &M,
    toolbox: &Toolbox,
) -> Result<Agent<M>> {
    Ok(Agent::new(descriptor, model.clone(), toolbox)?.max_tool_calls(config.max_tool_calls))
}

/// Search and, when enabled, web scraping.
pub fn research_team<M: Model>(config: &Config, model: M, toolbox: &Toolbox) -> Result<Team<M>> {
    let mut members = vec![agent(
        config,
        Descriptor::new("search")
            .description("Searches the web for current information.")
            .tool(TavilySearch::NAME),
        &model,
        toolbox,
    )?];

    if config.scrape_enabled {
        members.push(agent(
            config,
            Descriptor::new("web_scraper")
                .description("Reads the full content of web pages.")
                .tool(WebScraper::NAME),
            &model,
            toolbox,
        )?);
    }

    Ok(Supervisor::new(RESEARCH_TEAM, model, members)?
        .max_steps(config.max_team_steps)
        .with_description("Gathers information from the web."))
}

/// Document writing, note taking and chart generation.
pub fn writing_team<M: Model>(config: &Config, model: M, toolbox: &Toolbox) -> Result<Team<M>> {
    let members = vec![
        agent(
            config,
            Descriptor::new("doc_writer")
                .description("Writes and edits documents.")
                .system_prompt(
                    "You can read, write and edit documents based on note-taker's outlines. \
                     Don't ask follow-up questions.",
                )
                .tool(WriteDocument::NAME)
                .tool(EditDocument::NAME)
                .tool(ReadDocument::NAME),
            &model,
            toolbox,
        )?,
        agent(
            config,
            Descriptor::new("note_taker")
                .description("Creates outlines for the document writer.")
                .system_prompt(
                    "You can read documents and create outlines for the document writer. \
                     Don't ask follow-up questions.",
                )
                .tool(CreateOutline::NAME)
                .tool(ReadDocument::NAME),
            &model,
            toolbox,
        )?,
        agent(
            config,
            Descriptor::new("chart_generator")
                .description("Generates charts with Python.")
                .tool(ReadDocument::NAME)
                .tool(PythonRepl::NAME),
            &model,
            toolbox,
        )?,
    ];

    Ok(Supervisor::new(WRITING_TEAM, model, members)?
        .max_steps(config.max_team_steps)
        .with_description("Writes documents, outlines and charts from a brief."))
}
