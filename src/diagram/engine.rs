use std::path::Path;
use std::process::{Command, Stdio};

use serde::Serialize;
use thiserror::Error;

/// Mermaid security level. Only strict mode is ever requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[default]
    Strict,
}

/// Built-in mermaid theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiagramTheme {
    Default,
    #[default]
    Neutral,
    Dark,
    Forest,
}

impl DiagramTheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Neutral => "neutral",
            Self::Dark => "dark",
            Self::Forest => "forest",
        }
    }
}

/// One render request. `source` is already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    pub render_id: String,
    pub source: String,
    pub theme: DiagramTheme,
    pub security: SecurityLevel,
}

impl DiagramRequest {
    pub fn new(render_id: impl Into<String>, source: &str, theme: DiagramTheme) -> Self {
        Self {
            render_id: render_id.into(),
            source: source.trim().to_string(),
            theme,
            security: SecurityLevel::Strict,
        }
    }
}

/// Diagram rendering failure. The display text is what the error box shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    /// The engine rejected the source (syntax error and the like).
    #[error("{0}")]
    Engine(String),
    #[error("Mermaid returned empty output")]
    EmptyOutput,
    #[error("could not run `{command}`: {reason}")]
    Spawn { command: String, reason: String },
    #[error("diagram i/o failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for DiagramError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Something that turns mermaid source into SVG.
///
/// Called from worker threads, never from the UI thread.
pub trait DiagramEngine: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`DiagramError`] when the source cannot be rendered.
    fn render(&self, request: &DiagramRequest) -> Result<String, DiagramError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MermaidConfig {
    security_level: SecurityLevel,
    theme: DiagramTheme,
    start_on_load: bool,
}

/// Renders through the mermaid CLI (`mmdc`) using temp files.
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self::new("mmdc")
    }
}

impl MermaidCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn write_inputs(dir: &Path, request: &DiagramRequest) -> Result<(), DiagramError> {
        std::fs::write(dir.join("diagram.mmd"), &request.source)?;
        let config = MermaidConfig {
            security_level: request.security,
            theme: request.theme,
            start_on_load: false,
        };
        let json = serde_json::to_vec(&config).map_err(|err| DiagramError::Io(err.to_string()))?;
        std::fs::write(dir.join("config.json"), json)?;
        Ok(())
    }
}

impl DiagramEngine for MermaidCli {
    fn render(&self, request: &DiagramRequest) -> Result<String, DiagramError> {
        let dir = tempfile::tempdir()?;
        Self::write_inputs(dir.path(), request)?;
        let output_path = dir.path().join("diagram.svg");

        let output = Command::new(&self.command)
            .arg("-i")
            .arg(dir.path().join("diagram.mmd"))
            .arg("-o")
            .arg(&output_path)
            .arg("-c")
            .arg(dir.path().join("config.json"))
            .args(["-t", request.theme.as_str()])
            .args(["-I", request.render_id.as_str()])
            .arg("-q")
            .stdin(Stdio::null())
            .output()
            .map_err(|err| DiagramError::Spawn {
                command: self.command.clone(),
                reason: err.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            return Err(DiagramError::Engine(if message.is_empty() {
                format!("{} exited with {}", self.command, output.status)
            } else {
                message.to_string()
            }));
        }

        let svg = std::fs::read_to_string(&output_path)?;
        if svg.trim().is_empty() {
            return Err(DiagramError::EmptyOutput);
        }
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_source_and_forces_strict() {
        let request =
            DiagramRequest::new("diagram-1", "\n  graph TD\n  A-->B  \n\n", DiagramTheme::Dark);
        assert_eq!(request.source, "graph TD\n  A-->B");
        assert_eq!(request.security, SecurityLevel::Strict);
    }

    #[test]
    fn test_config_serializes_mermaid_keys() {
        let config = MermaidConfig {
            security_level: SecurityLevel::Strict,
            theme: DiagramTheme::Neutral,
            start_on_load: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"securityLevel":"strict","theme":"neutral","startOnLoad":false}"#
        );
    }

    #[test]
    fn test_missing_binary_reports_spawn_error() {
        let cli = MermaidCli::new("splitmark-no-such-mmdc-binary");
        let request = DiagramRequest::new("diagram-x", "graph TD", DiagramTheme::Neutral);
        let err = cli.render(&request).unwrap_err();
        assert!(matches!(err, DiagramError::Spawn { .. }));
        assert!(err.to_string().contains("splitmark-no-such-mmdc-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_surfaces_stderr() {
        // `false` ignores its arguments and exits non-zero with no output.
        let cli = MermaidCli::new("false");
        let request = DiagramRequest::new("diagram-x", "graph TD", DiagramTheme::Neutral);
        let err = cli.render(&request).unwrap_err();
        assert!(matches!(err, DiagramError::Engine(ref msg) if msg.starts_with("false exited")));
    }
}
