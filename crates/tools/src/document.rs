//! Document tools over a scratch workspace directory.
//!
//! All file names are relative to the workspace root. Absolute paths and
//! `..` components are rejected, so tools cannot reach outside it.

use hcore::{Adapter, Tool, ToolError};
use schemars::JsonSchema;
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

/// The directory the document tools read and write.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Use the given directory as the workspace root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a file name inside the workspace.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf, ToolError> {
        let path = Path::new(file_name);
        if file_name.trim().is_empty() {
            return Err(ToolError::InvalidArguments("file name is empty".into()));
        }
        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(ToolError::InvalidArguments(format!(
                        "{file_name}: must be a relative path inside the workspace"
                    )));
                }
            }
        }
        Ok(self.root.join(path))
    }

    async fn read_lines(&self, file_name: &str) -> Result<Vec<String>, ToolError> {
        let content = tokio::fs::read_to_string(self.resolve(file_name)?).await?;
        Ok(content.lines().map(str::to_owned).collect())
    }

    async fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, ToolError> {
        let path = self.resolve(file_name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        Ok(path)
    }
}

#[derive(Deserialize, JsonSchema)]
struct OutlineArgs {
    /// List of main points for the outline.
    points: Vec<String>,
    /// The name of the file to save the outline.
    file_name: String,
}

/// The `create_outline` tool.
#[derive(Debug, Clone)]
pub struct CreateOutline(pub Workspace);

impl CreateOutline {
    /// Tool name.
    pub const NAME: &'static str = "create_outline";
}

impl Adapter for CreateOutline {
    fn tool(&self) -> Tool {
        Tool::of::<OutlineArgs>(
            Self::NAME,
            "Create a text file with the given outline points.",
        )
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: OutlineArgs = ToolError::parse(&args)?;
        let outline: String = args
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| format!("{}. {point}\n", i + 1))
            .collect();
        let path = self.0.write(&args.file_name, &outline).await?;
        Ok(format!("Outline saved to {}", path.display()))
    }
}

#[derive(Deserialize, JsonSchema)]
struct ReadArgs {
    /// File path to read the document from.
    file_name: String,
    /// The start line. Default is 0.
    #[serde(default)]
    start: Option<usize>,
    /// The end line, exclusive. Default is the end of the document.
    #[serde(default)]
    end: Option<usize>,
}

/// The `read_document` tool.
#[derive(Debug, Clone)]
pub struct ReadDocument(pub Workspace);

impl ReadDocument {
    /// Tool name.
    pub const NAME: &'static str = "read_document";
}

impl Adapter for ReadDocument {
    fn tool(&self) -> Tool {
        Tool::of::<ReadArgs>(Self::NAME, "Read the specified document.")
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: ReadArgs = ToolError::parse(&args)?;
        let lines = self.0.read_lines(&args.file_name).await?;
        let end = args.end.unwrap_or(lines.len()).min(lines.len());
        let start = args.start.unwrap_or(0).min(end);
        Ok(lines[start..end].join("\n"))
    }
}

#[derive(Deserialize, JsonSchema)]
struct WriteArgs {
    /// Text content to be written into the document.
    content: String,
    /// File path to save the document.
    file_name: String,
}

/// The `write_document` tool.
#[derive(Debug, Clone)]
pub struct WriteDocument(pub Workspace);

impl WriteDocument {
    /// Tool name.
    pub const NAME: &'static str = "write_document";
}

impl Adapter for WriteDocument {
    fn tool(&self) -> Tool {
        Tool::of::<WriteArgs>(Self::NAME, "Create and save a text document.")
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: WriteArgs = ToolError::parse(&args)?;
        self.0.write(&args.file_name, &args.content).await?;
        Ok(format!("Document saved to {}", args.file_name))
    }
}

#[derive(Deserialize, JsonSchema)]
struct EditArgs {
    /// Path of the document to be edited.
    file_name: String,
    /// Map from line number (1-indexed) to the text inserted at that line.
    inserts: BTreeMap<usize, String>,
}

/// The `edit_document` tool.
#[derive(Debug, Clone)]
pub struct EditDocument(pub Workspace);

impl EditDocument {
    /// Tool name.
    pub const NAME: &'static str = "edit_document";
}

/// Apply inserts in ascending line order. Each insert sees the lines added
/// before it; nothing is applied if any line number is out of range.
fn insert_lines(
    mut lines: Vec<String>,
    inserts: BTreeMap<usize, String>,
) -> Result<Vec<String>, ToolError> {
    for (line, text) in inserts {
        if line == 0 || line > lines.len() + 1 {
            return Err(ToolError::InvalidArguments(format!(
                "line number {line} is out of range"
            )));
        }
        lines.insert(line - 1, text);
    }
    Ok(lines)
}

impl Adapter for EditDocument {
    fn tool(&self) -> Tool {
        Tool::of::<EditArgs>(
            Self::NAME,
            "Edit a document by inserting text at specific line numbers.",
        )
    }

    async fn call(&self, args: String) -> Result<String, ToolError> {
        let args: EditArgs = ToolError::parse(&args)?;
        let lines = self.0.read_lines(&args.file_name).await?;
        let lines = insert_lines(lines, args.inserts)?;

        let mut content = lines.join("\n");
        content.push('\n');
        self.0.write(&args.file_name, &content).await?;
        Ok(format!("Document edited and saved to {}", args.file_name))
    }
}
