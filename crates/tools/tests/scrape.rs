//! Tests for HTML extraction and the scrape tool.

use hcore::{Adapter, ToolError};
use hierarch_tools::{Client, USER_AGENT, WebScraper, extract};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>  AI Agents
      Explained </title>
    <style>body { color: red; }</style>
  </head>
  <body>
    <h1>Agents</h1>
    <script>console.log("tracking");</script>
    <p>An agent   pairs a model
       with tools.</p>
    <noscript>enable javascript</noscript>
  </body>
</html>"#;

#[test]
fn extract_title_and_visible_text() {
    let page = extract(PAGE);
    assert_eq!(page.title, "AI Agents Explained");
    assert_eq!(page.text, "Agents\nAn agent pairs a model with tools.");
    assert_eq!(
        page.render(),
        "Document name: AI Agents Explained\nAgents\nAn agent pairs a model with tools."
    );
}

#[test]
fn extract_without_title() {
    let page = extract("<p>just text</p>");
    assert_eq!(page.title, "");
    assert_eq!(page.text, "just text");
}

#[tokio::test]
async fn rejects_bad_urls() {
    let scraper = WebScraper::new(Client::new());

    let err = scraper.call(r#"{"urls": []}"#.into()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));

    let err = scraper
        .call(r#"{"urls": ["file:///etc/passwd"]}"#.into())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));

    let err = scraper
        .call(r#"{"urls": ["not a url"]}"#.into())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}

#[tokio::test]
async fn fetches_and_renders_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/agents", server.uri());
    let args = serde_json::json!({ "urls": [url, url] }).to_string();
    let output = WebScraper::new(Client::new()).call(args).await.unwrap();

    let page = extract(PAGE).render();
    assert!(page.starts_with("Document name: AI Agents Explained\n"));
    assert_eq!(output, format!("{page}\n\n{page}"));
}

#[tokio::test]
async fn failed_status_fails_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let args = serde_json::json!({
        "urls": [format!("{}/agents", server.uri()), format!("{}/missing", server.uri())]
    })
    .to_string();
    let err = WebScraper::new(Client::new()).call(args).await.unwrap_err();
    match err {
        ToolError::Service { service, message } => {
            assert!(service.ends_with("/missing"));
            assert_eq!(message, "404 Not Found");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn slow_pages_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let args = serde_json::json!({ "urls": [server.uri()] }).to_string();
    let err = WebScraper::new(Client::new())
        .timeout(Duration::from_millis(100))
        .call(args)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Timeout(_)));
}
