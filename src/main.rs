//! splitmark - A split-pane markdown editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! splitmark
//! splitmark notes.md
//! splitmark --view preview --no-diagrams notes.md
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use splitmark::app::App;
use splitmark::config::{
    ConfigFlags, ViewMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use splitmark::diagram::{DiagramTheme, MermaidCli};
use splitmark::debug_log::{self, EventLog};

/// A split-pane markdown editor with live preview and mermaid diagrams
#[derive(Parser, Debug)]
#[command(name = "splitmark", version, about, long_about = None)]
struct Cli {
    /// Markdown or text file to open (the welcome document when omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Initial view
    #[arg(long, value_enum)]
    view: Option<ViewMode>,

    /// Command used to render mermaid diagrams
    #[arg(long, value_name = "CMD")]
    mermaid_command: Option<String>,

    /// Mermaid theme
    #[arg(long, value_enum)]
    diagram_theme: Option<DiagramTheme>,

    /// Show mermaid fences as code instead of rendering them
    #[arg(long)]
    no_diagrams: bool,

    /// Directory that Ctrl+S exports into
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Report startup, layout and diagram timings on the `perf` log target
    #[arg(long)]
    perf: bool,

    /// Write detailed render debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Write tracing output to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Install the `tracing` subscriber. With `perf`, every `perf` span reports
/// its busy and idle time when it closes.
fn init_logging(log_file: Option<&PathBuf>, perf: bool) -> Result<()> {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if perf {
        filter = filter.add_directive("perf=info".parse()?);
    }
    let span_events = if perf {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => {
            // Nothing reaches stderr while the TUI owns the screen.
            builder
                .with_writer(std::io::stderr.with_filter(|_| !splitmark::app::terminal_owned()))
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref(), effective.perf)?;

    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("SPLITMARK_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Some(path) = &render_debug_log_path {
        match EventLog::create(path) {
            Ok(log) => debug_log::install(Some(log)),
            Err(err) => tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to initialize render debug log"
            ),
        }
    }

    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let engine = effective
        .mermaid_command
        .clone()
        .map_or_else(MermaidCli::default, MermaidCli::new);

    let mut app = App::new(cli.file)
        .with_view_mode(effective.view.unwrap_or_default())
        .with_diagrams(
            !effective.no_diagrams,
            effective.diagram_theme.unwrap_or_default(),
        )
        .with_diagram_engine(Arc::new(engine))
        .with_export_dir(effective.export_dir.clone().unwrap_or_else(|| PathBuf::from(".")))
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
