use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::diagram::DiagramTheme;

/// Which panes are on screen.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Split,
    Edit,
    Preview,
}

impl ViewMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Edit => "edit",
            Self::Preview => "preview",
        }
    }

    /// Next mode for `Ctrl+\`.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Split => Self::Edit,
            Self::Edit => Self::Preview,
            Self::Preview => Self::Split,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "split" => Some(Self::Split),
            "edit" => Some(Self::Edit),
            "preview" => Some(Self::Preview),
            _ => None,
        }
    }
}

fn parse_diagram_theme(s: &str) -> Option<DiagramTheme> {
    match s {
        "default" => Some(DiagramTheme::Default),
        "neutral" => Some(DiagramTheme::Neutral),
        "dark" => Some(DiagramTheme::Dark),
        "forest" => Some(DiagramTheme::Forest),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub view: Option<ViewMode>,
    pub mermaid_command: Option<String>,
    pub diagram_theme: Option<DiagramTheme>,
    pub no_diagrams: bool,
    pub export_dir: Option<PathBuf>,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches accumulate, valued options from
    /// `other` win.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            view: other.view.or(self.view),
            mermaid_command: other
                .mermaid_command
                .clone()
                .or_else(|| self.mermaid_command.clone()),
            diagram_theme: other.diagram_theme.or(self.diagram_theme),
            no_diagrams: self.no_diagrams || other.no_diagrams,
            export_dir: other.export_dir.clone().or_else(|| self.export_dir.clone()),
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("splitmark").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("splitmark")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("splitmark").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("splitmark")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".splitmarkrc")
}

/// Read flag tokens from an rc file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# splitmark defaults (saved with --save)".to_string()];
    if let Some(view) = flags.view {
        lines.push(format!("--view {}", view.as_str()));
    }
    if let Some(command) = &flags.mermaid_command {
        lines.push(format!("--mermaid-command {command}"));
    }
    if let Some(theme) = flags.diagram_theme {
        lines.push(format!("--diagram-theme {}", theme.as_str()));
    }
    if flags.no_diagrams {
        lines.push("--no-diagrams".to_string());
    }
    if let Some(dir) = &flags.export_dir {
        lines.push(format!("--export-dir {}", dir.display()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of raw argument tokens. Unknown tokens (the file
/// argument, `--save`) are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value.to_string())),
            _ => (token, None),
        };

        match name {
            "--no-diagrams" => flags.no_diagrams = true,
            "--perf" => flags.perf = true,
            "--view" | "--mermaid-command" | "--diagram-theme" | "--export-dir"
            | "--render-debug-log" | "--log-file" => {
                let value = if inline_value.is_some() {
                    inline_value
                } else if let Some(next) = tokens.get(i + 1) {
                    i += 1;
                    Some(next.clone())
                } else {
                    None
                };
                if let Some(value) = value {
                    apply_valued_flag(&mut flags, name, value);
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: String) {
    match name {
        "--view" => flags.view = ViewMode::parse(&value),
        "--mermaid-command" => flags.mermaid_command = Some(value),
        "--diagram-theme" => flags.diagram_theme = parse_diagram_theme(&value),
        "--export-dir" => flags.export_dir = Some(PathBuf::from(value)),
        "--render-debug-log" => flags.render_debug_log = Some(PathBuf::from(value)),
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&tokens(&[
            "splitmark",
            "--view",
            "preview",
            "--no-diagrams",
            "--diagram-theme=forest",
            "--mermaid-command",
            "/opt/mmdc",
            "--render-debug-log=render.log",
            "notes.md",
        ]));
        assert_eq!(flags.view, Some(ViewMode::Preview));
        assert!(flags.no_diagrams);
        assert_eq!(flags.diagram_theme, Some(DiagramTheme::Forest));
        assert_eq!(flags.mermaid_command.as_deref(), Some("/opt/mmdc"));
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
        assert!(!flags.perf);
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--view", "sideways", "--diagram-theme"]));
        assert_eq!(flags.view, None);
        assert_eq!(flags.diagram_theme, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            perf: true,
            view: Some(ViewMode::Edit),
            export_dir: Some(PathBuf::from("out")),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_diagrams: true,
            view: Some(ViewMode::Preview),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.perf);
        assert!(merged.no_diagrams);
        assert_eq!(merged.view, Some(ViewMode::Preview));
        assert_eq!(merged.export_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_view_mode_cycles_through_all() {
        let mut mode = ViewMode::Split;
        let mut seen = Vec::new();
        for _ in 0..3 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(seen, vec![ViewMode::Edit, ViewMode::Preview, ViewMode::Split]);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".splitmarkrc");
        let flags = ConfigFlags {
            view: Some(ViewMode::Edit),
            mermaid_command: Some("mmdc".to_string()),
            diagram_theme: Some(DiagramTheme::Dark),
            no_diagrams: true,
            export_dir: Some(PathBuf::from("exports")),
            perf: true,
            render_debug_log: Some(PathBuf::from("render.log")),
            log_file: Some(PathBuf::from("splitmark.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
