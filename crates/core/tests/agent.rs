//! Tests for the agent tool loop.

use hierarch_core::{
    Agent, Descriptor, Error, Member, Role, Tool, ToolError, Toolbox,
    model::ToolCall,
    testing::{ScriptedModel, call, reply},
};
use futures_util::StreamExt;
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

fn echo_tool() -> Tool {
    Tool::of::<String>("echo", "Echoes the input")
}

fn toolbox(calls: Arc<AtomicUsize>) -> Toolbox {
    let mut toolbox = Toolbox::new();
    toolbox.register(echo_tool(), move |args| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {args}"))
        }
    });
    toolbox.register(Tool::of::<String>("fail", "Always fails"), |_| async {
        Err(ToolError::Service {
            service: "fail".into(),
            message: "unavailable".into(),
        })
    });
    toolbox.register(Tool::of::<String>("secret", "Not for everyone"), |_| async {
        Ok("leaked".to_owned())
    });
    toolbox
}

fn descriptor() -> Descriptor {
    Descriptor::new("search")
        .system_prompt("You search.")
        .tool("echo")
        .tool("fail")
}

#[test]
fn unknown_tool_is_a_config_error() {
    let toolbox = Toolbox::new();
    let result = Agent::new(descriptor(), ScriptedModel::default(), &toolbox);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn plain_reply_is_authored_by_agent() {
    let model = ScriptedModel::new([reply("found it")]);
    let agent = Agent::new(descriptor(), model.clone(), &toolbox(Arc::default())).unwrap();

    let message = agent
        .invoke(&[hierarch_core::Message::user("look up rust")])
        .await
        .unwrap();
    assert_eq!(message.content, "found it");
    assert_eq!(message.name, "search");
    assert_eq!(message.role, Role::User);

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].messages[0].role, Role::System);
    assert_eq!(requests[0].tool_names(), vec!["echo", "fail"]);
}

#[tokio::test]
async fn tool_results_feed_the_next_turn() {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel::new([call("echo", json!("ping")), reply("done")]);
    let agent = Agent::new(descriptor(), model.clone(), &toolbox(calls.clone())).unwrap();

    let message = agent
        .invoke(&[hierarch_core::Message::user("go")])
        .await
        .unwrap();
    assert_eq!(message.content, "done");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second = &model.requests()[1];
    let tool = second.messages.last().unwrap();
    assert_eq!(tool.role, Role::Tool);
    assert_eq!(tool.content, "echo: \"ping\"");
    assert_eq!(tool.tool_call_id, "call_echo");
}

#[tokio::test]
async fn tool_failure_is_reported_to_the_model() {
    let model = ScriptedModel::new([call("fail", json!("x")), reply("recovered")]);
    let agent = Agent::new(descriptor(), model.clone(), &toolbox(Arc::default())).unwrap();

    let message = agent
        .invoke(&[hierarch_core::Message::user("go")])
        .await
        .unwrap();
    assert_eq!(message.content, "recovered");

    let tool = model.requests()[1].messages.last().cloned().unwrap();
    assert_eq!(tool.content, "Error: fail: unavailable");
}

#[tokio::test]
async fn disallowed_tool_never_runs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel::new([hierarch_core::model::Response::calls(vec![
        ToolCall::function("call_1", "echo", "\"a\""),
        ToolCall::function("call_2", "secret", "\"b\""),
    ])]);
    let agent = Agent::new(descriptor(), model, &toolbox(calls.clone())).unwrap();

    let err = agent
        .invoke(&[hierarch_core::Message::user("go")])
        .await
        .unwrap_err();
    match err {
        Error::ToolNotPermitted { agent, tool } => {
            assert_eq!(agent, "search");
            assert_eq!(tool, "secret");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn batched_calls_run_their_own_handlers_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel::new([
        hierarch_core::model::Response::calls(vec![
            ToolCall::function("call_1", "echo", "\"a\""),
            ToolCall::function("call_2", "fail", "\"b\""),
            ToolCall::function("call_3", "echo", "\"c\""),
        ]),
        reply("done"),
    ]);
    let agent = Agent::new(descriptor(), model.clone(), &toolbox(calls.clone())).unwrap();

    let message = agent
        .invoke(&[hierarch_core::Message::user("go")])
        .await
        .unwrap();
    assert_eq!(message.content, "done");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let requests = model.requests();
    let results: Vec<(&str, &str)> = requests[1]
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| (m.tool_call_id.as_str(), m.content.as_str()))
        .collect();
    assert_eq!(
        results,
        [
            ("call_1", "echo: \"a\""),
            ("call_2", "Error: fail: unavailable"),
            ("call_3", "echo: \"c\""),
        ]
    );
}

#[tokio::test]
async fn disallowed_tool_error_names_only_the_tool() {
    let model = ScriptedModel::new([call("secret", json!("x"))]);
    let agent = Agent::new(descriptor(), model, &toolbox(Arc::default())).unwrap();

    let err = agent
        .invoke(&[hierarch_core::Message::user("go")])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "tool 'secret' is not permitted");
}

#[tokio::test]
async fn tool_rounds_are_bounded() {
    let calls = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel::new((0..3).map(|_| call("echo", json!("again"))));
    let agent = Agent::new(descriptor(), model, &toolbox(calls.clone()))
        .unwrap()
        .max_tool_calls(2);

    let err = agent
        .invoke(&[hierarch_core::Message::user("go")])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ToolCallLimit { limit: 2, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_response_is_external() {
    let model = ScriptedModel::new([hierarch_core::model::Response::default()]);
    let agent = Agent::new(descriptor(), model, &toolbox(Arc::default())).unwrap();

    let err = agent.invoke(&[]).await.unwrap_err();
    assert!(matches!(err, Error::External(_)));
}

#[tokio::test]
async fn act_yields_one_step() {
    let model = ScriptedModel::new([reply("hi")]);
    let agent = Agent::new(descriptor(), model, &toolbox(Arc::default())).unwrap();

    let steps: Vec<_> = agent
        .act(vec![hierarch_core::Message::user("hello")])
        .collect()
        .await;
    assert_eq!(steps.len(), 1);
    let step = steps[0].as_ref().unwrap();
    assert_eq!(step.stage, "search");
    assert_eq!(step.message.content, "hi");
}
