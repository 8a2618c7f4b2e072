//! Tests for the python tool.

use hcore::{Adapter, ToolError};
use hierarch_tools::{PythonRepl, Workspace};

#[tokio::test]
async fn missing_interpreter_is_io() {
    let dir = tempfile::tempdir().unwrap();
    let repl = PythonRepl::new("hierarch-no-such-python", Workspace::new(dir.path()));

    let err = repl
        .call(r#"{"code": "print(1)"}"#.into())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Io(_)));
}

#[tokio::test]
async fn code_is_required() {
    let dir = tempfile::tempdir().unwrap();
    let repl = PythonRepl::new("python3", Workspace::new(dir.path()));

    let err = repl.call("{}".into()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}
