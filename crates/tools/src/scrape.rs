//! Page fetching and text extraction.

use crate::{DEFAULT_TIMEOUT, USER_AGENT, timed, transport};
use hcore::{Adapter, Tool, ToolError};
use reqwest::{Client, header};
use schemars::JsonSchema;
use scraper::{Html, Node, Selector};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Elements whose text is never part of the page content.
const HIDDEN: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Deserialize, JsonSchema)]
struct ScrapeArgs {
    /// The URLs of the pages to scrape.
    urls: Vec<String>,
}

/// The readable parts of an HTML page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Content of the `<title>` element.
    pub title: String,
    /// Visible text, one text run per line.
    pub text: String,
}

impl Page {
    /// Render the page the way the scraper agent reads it.
    pub fn render(&self) -> String {
        format!("Document name: {}\n{}", self.title, self.text)
    }
}

/// Extract the title and visible body text of an HTML document.
pub fn extract(html: &str) -> Page {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|title| title.text().collect::<String>())
        })
        .map(|title| title.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut lines = Vec::new();
    for node in body.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    Page {
        title,
        text: lines.join("\n"),
    }
}

/// The `scrape_web` tool.
#[derive(Clone)]
pub struct WebScraper {
    client: Client,
    timeout: Duration,
}

impl WebScraper {
    /// Tool name.
    pub const NAME: &'static str = "scrape_web";

    /// Create a scraper sharing the given client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the time budget of a call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, url: Url) -> Result<Page, ToolError> {
        let response = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Service {
                service: url.to_string(),
                message: status.to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| transport(url.as_str(), e))?;
        Ok(extract(&html))
    }
}

/// Parse and check a URL the model asked for.
fn parse_url(raw: &str) -> Result<Url, ToolError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ToolError::InvalidArguments(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ToolError::InvalidArguments(format!(
            "{raw}: unsupported scheme '{scheme}'"
        ))),
    }
}

impl Adapter for WebScraper {
    fn tool(&self) -> Tool {
        Tool::of::<ScrapeArgs>(
            Self::NAME,
            "Scrape the content of web pages given their URLs.",
        )
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: ScrapeArgs = ToolError::parse(&args)?;
        if args.urls.is_empty() {
            return Err(ToolError::InvalidArguments("no urls given".into()));
        }
        let urls = args
            .urls
            .iter()
            .map(|raw| parse_url(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut pages = Vec::with_capacity(urls.len());
        for url in urls {
            tracing::debug!(%url, "scrape");
            let page = timed(self.timeout, self.fetch(url)).await?;
            pages.push(page.render());
        }
        Ok(pages.join("\n\n"))
    }
}
