//! Importing a document from disk and exporting it back.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::document::RenderedLine;

/// File name every export is written under.
pub const EXPORT_FILE_NAME: &str = "splitmark-doc.md";
pub const EXPORT_MIME_TYPE: &str = "text/markdown";
/// File name the plain-text preview is printed to.
pub const PRINT_FILE_NAME: &str = "splitmark-print.txt";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file type: {0}")]
    UnsupportedExtension(String),
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
}

impl ImportError {
    /// Text for the error toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedExtension(_) => {
                "Please upload a valid Markdown (.md) or Text (.txt) file.".to_string()
            }
            Self::Read(err) => format!("Could not read file: {err}"),
        }
    }
}

#[derive(Debug, Error)]
#[error("failed to export document: {0}")]
pub struct ExportError(#[from] std::io::Error);

/// Accept only names ending in `.md` or `.txt`. The check is literal:
/// `NOTES.MD` is rejected.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedExtension`] for any other name.
pub fn validate_import_name(name: &str) -> Result<(), ImportError> {
    if name.ends_with(".md") || name.ends_with(".txt") {
        Ok(())
    } else {
        Err(ImportError::UnsupportedExtension(name.to_string()))
    }
}

/// Read a document for import. Invalid UTF-8 is replaced, not rejected.
///
/// # Errors
///
/// Returns an error for unsupported names or unreadable files. Nothing is
/// read when the name is rejected.
pub fn import_file(path: &Path) -> Result<String, ImportError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    validate_import_name(&name)?;
    let bytes = std::fs::read(path)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "document imported");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// What an export produces, independent of where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub contents: String,
}

pub fn export_artifact(document: &str) -> ExportArtifact {
    ExportArtifact {
        file_name: EXPORT_FILE_NAME,
        mime_type: EXPORT_MIME_TYPE,
        contents: document.to_string(),
    }
}

/// Write `document` to `dir/splitmark-doc.md`, replacing any previous export.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_document(dir: &Path, document: &str) -> Result<PathBuf, ExportError> {
    let artifact = export_artifact(document);
    let path = dir.join(artifact.file_name);
    std::fs::write(&path, artifact.contents.as_bytes())?;
    tracing::info!(path = %path.display(), "document exported");
    Ok(path)
}

/// Write the laid-out preview as plain text to `dir/splitmark-print.txt`.
/// Styling is dropped; box drawing and diagram cells are kept as text.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn print_preview(dir: &Path, lines: &[RenderedLine]) -> Result<PathBuf, ExportError> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.content().trim_end());
        text.push('\n');
    }
    let path = dir.join(PRINT_FILE_NAME);
    std::fs::write(&path, text)?;
    tracing::info!(path = %path.display(), lines = lines.len(), "preview printed");
    Ok(path)
}
