//! Tests for the document tools.

use hcore::{Adapter, ToolError};
use hierarch_tools::{CreateOutline, EditDocument, ReadDocument, Workspace, WriteDocument};
use serde_json::json;

fn workspace() -> (tempfile::TempDir, Workspace) {
    let dir = tempfile::tempdir().unwrap();
    let workspace = Workspace::new(dir.path());
    (dir, workspace)
}

#[tokio::test]
async fn outline_is_numbered() {
    let (dir, workspace) = workspace();
    let outline = CreateOutline(workspace);

    let result = outline
        .call(json!({ "points": ["Intro", "Agents", "Outlook"], "file_name": "outline.txt" }).to_string())
        .await
        .unwrap();
    let path = dir.path().join("outline.txt");
    assert_eq!(result, format!("Outline saved to {}", path.display()));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "1. Intro\n2. Agents\n3. Outlook\n"
    );
}

#[tokio::test]
async fn write_then_read_slices() {
    let (_dir, workspace) = workspace();
    let write = WriteDocument(workspace.clone());
    let read = ReadDocument(workspace);

    let saved = write
        .call(json!({ "content": "zero\none\ntwo\nthree", "file_name": "report.md" }).to_string())
        .await
        .unwrap();
    assert_eq!(saved, "Document saved to report.md");

    let all = read
        .call(json!({ "file_name": "report.md" }).to_string())
        .await
        .unwrap();
    assert_eq!(all, "zero\none\ntwo\nthree");

    let middle = read
        .call(json!({ "file_name": "report.md", "start": 1, "end": 3 }).to_string())
        .await
        .unwrap();
    assert_eq!(middle, "one\ntwo");

    let past_end = read
        .call(json!({ "file_name": "report.md", "start": 10 }).to_string())
        .await
        .unwrap();
    assert_eq!(past_end, "");
}

#[tokio::test]
async fn edit_inserts_lines() {
    let (dir, workspace) = workspace();
    std::fs::write(dir.path().join("draft.md"), "title\nbody\n").unwrap();
    let edit = EditDocument(workspace);

    let result = edit
        .call(json!({ "file_name": "draft.md", "inserts": { "2": "intro", "4": "end" } }).to_string())
        .await
        .unwrap();
    assert_eq!(result, "Document edited and saved to draft.md");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("draft.md")).unwrap(),
        "title\nintro\nbody\nend\n"
    );
}

#[tokio::test]
async fn edit_out_of_range_leaves_file_untouched() {
    let (dir, workspace) = workspace();
    std::fs::write(dir.path().join("draft.md"), "only\n").unwrap();
    let edit = EditDocument(workspace);

    let err = edit
        .call(json!({ "file_name": "draft.md", "inserts": { "1": "first", "5": "far" } }).to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("draft.md")).unwrap(),
        "only\n"
    );
}

#[tokio::test]
async fn paths_cannot_escape() {
    let (_dir, workspace) = workspace();
    let write = WriteDocument(workspace);

    let err = write
        .call(json!({ "content": "x", "file_name": "../outside.txt" }).to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidArguments(_)));
}

#[tokio::test]
async fn missing_document_is_io() {
    let (_dir, workspace) = workspace();
    let read = ReadDocument(workspace);

    let err = read
        .call(json!({ "file_name": "nope.md" }).to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Io(_)));
}
