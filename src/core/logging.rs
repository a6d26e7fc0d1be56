//! Logging & Diagnostics
//!
//! Sets up:
//! - Human-readable event output on stderr (stdout is left to command output)
//! - Optional daily-rolling file output, plain or JSON lines
//! - Forwarding of `log` crate records into `tracing`
//! - miette report rendering matched to the terminal

use std::fs;
use std::io;
use std::path::Path;

use is_terminal::IsTerminal;
use miette::Diagnostic;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "compendium-import.log";

// ============================================================================
// Terminal Capabilities
// ============================================================================

/// What the attached terminal can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub is_interactive: bool,
    pub colors_disabled: bool,
    pub supports_unicode: bool,
}

impl TerminalCapabilities {
    /// Detect from stderr and the environment.
    pub fn detect() -> Self {
        let term = std::env::var("TERM").ok();
        let lang = std::env::var("LANG").ok();

        Self {
            is_interactive: io::stderr().is_terminal(),
            colors_disabled: std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            supports_unicode: !term.as_deref().is_some_and(|t| t.contains("dumb"))
                && lang.as_deref().map_or(true, |l| l.contains("UTF-8") || l.contains("utf8")),
        }
    }

    pub fn should_colorize(&self) -> bool {
        self.is_interactive && !self.colors_disabled
    }
}

// ============================================================================
// Logging Initialization
// ============================================================================

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. When `config.log_dir` is
/// set, the returned `WorkerGuard` must be held until shutdown so buffered
/// file output is flushed.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let caps = TerminalCapabilities::detect();

    let (file_layer, guard) = match config.log_dir.as_deref().and_then(prepare_log_dir) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true);
            let layer = if config.json_file {
                layer
                    .json()
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .boxed()
            } else {
                layer.boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(caps.should_colorize())
        .with_target(false)
        .compact();

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
    {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // try_init already bridges `log` when tracing-subscriber carries its
    // tracing-log feature; a second install is harmless and reported as an error.
    if tracing_log::LogTracer::init().is_ok() {
        log::debug!("log records forwarded to tracing");
    }

    init_miette(caps);

    if let Some(dir) = &config.log_dir {
        log::info!(
            "Logging initialized. Writing to: {:?} (daily rolling)",
            dir.join(LOG_FILE_PREFIX)
        );
    }

    guard
}

/// `RUST_LOG` if set and valid, else `level`, else `info`.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn prepare_log_dir(dir: &Path) -> Option<&Path> {
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create logs directory {:?}: {}", dir, e);
            return None;
        }
    }
    Some(dir)
}

/// Configure miette report rendering for the detected terminal.
fn init_miette(caps: TerminalCapabilities) {
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(caps.supports_unicode)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(caps.should_colorize())
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Diagnostic Error Types
// ============================================================================

/// A file that could not be imported at all.
#[derive(Debug, Error, Diagnostic)]
#[error("Failed to import {path} as {format}: {reason}")]
#[diagnostic(code("COMPENDIUM::IMPORT_ERROR"))]
pub struct ImportError {
    pub path: String,
    pub format: String,
    pub reason: String,

    #[help]
    pub help_text: Option<String>,
}

impl ImportError {
    pub fn new(path: impl Into<String>, format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: format.into(),
            reason: reason.into(),
            help_text: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = Some(help.into());
        self
    }
}

/// A command line that names no known format.
#[derive(Debug, Error, Diagnostic)]
#[error("Unknown format: {format}")]
#[diagnostic(
    code("COMPENDIUM::UNKNOWN_FORMAT"),
    help("Expected one of: xml, open5e-monsters, open5e-spells, improved-initiative, ddb-character")
)]
pub struct UnknownFormatError {
    pub format: String,
}
