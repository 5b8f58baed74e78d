//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging with scoped filtering for debugging control
//! activation, run edits and batch updates.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=control=trace,message=debug` - scoped filtering
//! - `RUST_LOG=formdoc::format=trace` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/formdoc/logs/formdoc.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{find_control_run, ControlComponent, Element};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering (default `warn`).
/// File logging writes to `~/.config/formdoc/logs/formdoc.log` with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console goes to stderr so CLI output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "formdoc.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok();
}

/// Lightweight picture of one control run for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSnapshot {
    pub control_id: String,
    pub start: usize,
    /// One character per element: `[` prefix, `<` preText, `v` value,
    /// `_` placeholder, `o`/`x` unchecked/checked option, `>` postText,
    /// `]` postfix
    pub layout: String,
    pub code: Option<String>,
}

impl RunSnapshot {
    pub fn capture(elements: &[Element], control_id: &str, hint: usize) -> Option<Self> {
        let (start, end) = find_control_run(elements, control_id, hint)?;
        let layout = elements[start..=end]
            .iter()
            .map(|e| match e.control_component {
                Some(ControlComponent::Prefix) => '[',
                Some(ControlComponent::PreText) => '<',
                Some(ControlComponent::Value) => 'v',
                Some(ControlComponent::Placeholder) => '_',
                Some(ControlComponent::Checkbox | ControlComponent::Radio) => {
                    let checked = e
                        .checkbox
                        .as_ref()
                        .or(e.radio.as_ref())
                        .is_some_and(|s| s.value);
                    if checked {
                        'x'
                    } else {
                        'o'
                    }
                }
                Some(ControlComponent::PostText) => '>',
                Some(ControlComponent::Postfix) => ']',
                None => '?',
            })
            .collect();
        Some(Self {
            control_id: control_id.to_string(),
            start,
            code: elements[start].control.as_ref().and_then(|c| c.code.clone()),
            layout,
        })
    }

    /// Generate a diff description against the run after an edit
    pub fn diff(&self, after: Option<&RunSnapshot>) -> Option<String> {
        let Some(after) = after else {
            return Some(format!("{}: {} → removed", self.control_id, self.layout));
        };

        let mut changes = Vec::new();
        if self.start != after.start {
            changes.push(format!("start {} → {}", self.start, after.start));
        }
        if self.layout != after.layout {
            changes.push(format!("{} → {}", self.layout, after.layout));
        }
        if self.code != after.code {
            changes.push(format!("code {:?} → {:?}", self.code, after.code));
        }

        if changes.is_empty() {
            None
        } else {
            Some(format!("{}: {}", self.control_id, changes.join("; ")))
        }
    }
}
