//! Tests for the OpenAI-compatible wire request.

use hcore::model::{Message, Request as CoreRequest, Response, Tool, ToolChoice};
use hierarch_model::Request;
use serde_json::json;

#[test]
fn tools_and_forced_choice_on_the_wire() {
    let request = CoreRequest::new("")
        .with_messages(vec![Message::system("route"), Message::member("search", "hi")])
        .with_tools(vec![Tool::of::<String>("route", "Pick the next worker")])
        .with_tool_choice(ToolChoice::from("route"));

    let wire = Request::from(request)
        .or_model("llama-3.3-70b-versatile")
        .temperature(Some(0.0));
    let body = serde_json::to_value(&wire).unwrap();

    assert_eq!(body["model"], "llama-3.3-70b-versatile");
    assert_eq!(body["temperature"], 0.0);
    assert_eq!(body["tools"][0]["type"], "function");
    assert_eq!(body["tools"][0]["function"]["name"], "route");
    assert_eq!(
        body["tool_choice"],
        json!({ "type": "function", "function": { "name": "route" } })
    );
    assert_eq!(body["messages"][1]["name"], "search");
    assert_eq!(body["messages"][1]["role"], "user");
}

#[test]
fn request_without_tools_omits_them() {
    let request = CoreRequest::new("gpt-4o").with_tools(vec![]);
    let body = serde_json::to_value(Request::from(request).or_model("ignored")).unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert!(body.get("tools").is_none());
    assert!(body.get("tool_choice").is_none());
}

#[test]
fn only_known_knobs_reach_the_wire() {
    let request = CoreRequest::new("gpt-4o")
        .with_tools(vec![Tool::of::<String>("route", "Pick the next worker")])
        .with_tool_choice(ToolChoice::Required);
    let wire = Request::from(request).temperature(Some(0.2));
    let body = serde_json::to_value(&wire).unwrap();

    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, ["messages", "model", "temperature", "tool_choice", "tools"]);
}

#[test]
fn response_with_tool_calls_decodes() {
    let raw = json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1,
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "route", "arguments": "{\"next\":\"search\"}" }
                }]
            },
            "finish_reason": "tool_calls"
        }],
        "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
    });

    let response: Response = serde_json::from_value(raw).unwrap();
    let calls = response.tool_calls().unwrap();
    assert_eq!(calls[0].function.name, "route");
    assert_eq!(calls[0].function.arguments, "{\"next\":\"search\"}");
    assert!(response.content().is_none());
    assert_eq!(response.usage.unwrap().total_tokens, 15);
}
