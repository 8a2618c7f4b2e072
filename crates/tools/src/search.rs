//! Web search through the Tavily search API.

use crate::{DEFAULT_TIMEOUT, USER_AGENT, timed, transport};
use hcore::{Adapter, Tool, ToolError};
use reqwest::{Client, header};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tavily search endpoint.
pub const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

#[derive(Deserialize, JsonSchema)]
struct SearchArgs {
    /// The search query.
    query: String,
}

#[derive(Serialize)]
struct Query<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct Results {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// One search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Relevant snippet of the page.
    #[serde(default)]
    pub content: String,
}

impl SearchResult {
    /// Render results the way the search agent reads them.
    pub fn render(results: &[SearchResult]) -> String {
        if results.is_empty() {
            return "No results found.".to_owned();
        }
        results
            .iter()
            .map(|r| format!("{}\n{}\n{}", r.title, r.url, r.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// The `web_search` tool.
#[derive(Clone)]
pub struct TavilySearch {
    client: Client,
    api_key: String,
    endpoint: String,
    max_results: usize,
    timeout: Duration,
}

impl TavilySearch {
    /// Tool name.
    pub const NAME: &'static str = "web_search";

    /// Create a search adapter with the given API key.
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: TAVILY_ENDPOINT.to_owned(),
            max_results: 3,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the number of results per query.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the time budget of a call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ToolError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header(header::USER_AGENT, USER_AGENT)
            .json(&Query {
                query,
                max_results: self.max_results,
            })
            .send()
            .await
            .map_err(|e| transport("tavily", e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| transport("tavily", e))?;
        if !status.is_success() {
            return Err(ToolError::Service {
                service: "tavily".into(),
                message: format!("{status}: {text}"),
            });
        }

        let results: Results =
            serde_json::from_str(&text).map_err(|e| ToolError::Malformed(e.to_string()))?;
        Ok(results.results)
    }
}

impl Adapter for TavilySearch {
    fn tool(&self) -> Tool {
        Tool::of::<SearchArgs>(
            Self::NAME,
            "Search the web for current information. Returns the title, URL and a \
             relevant snippet of each result.",
        )
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: SearchArgs = ToolError::parse(&args)?;
        if args.query.trim().is_empty() {
            return Err(ToolError::InvalidArguments("query is empty".into()));
        }

        tracing::debug!(query = %args.query, "web search");
        let results = timed(self.timeout, self.search(&args.query)).await?;
        Ok(SearchResult::render(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_results() {
        let results: Results = serde_json::from_str(
            r#"{"query":"rust","results":[
                {"title":"Rust","url":"https://www.rust-lang.org","content":"A language","score":0.9},
                {"title":"Book","url":"https://doc.rust-lang.org/book","content":"Learn Rust"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            SearchResult::render(&results.results),
            "Rust\nhttps://www.rust-lang.org\nA language\n\nBook\nhttps://doc.rust-lang.org/book\nLearn Rust"
        );
        assert_eq!(SearchResult::render(&[]), "No results found.");
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let search = TavilySearch::new(Client::new(), "key");
        let err = search.call(r#"{"query": " "}"#.into()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
