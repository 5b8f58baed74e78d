//! Command types for the Elm-style architecture
//!
//! Commands represent side effects the host performs after an update.
//! The session has already applied history and caret changes by then.

/// What the host should do on re-render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// New caret index, when the caret moved
    pub cur_index: Option<usize>,
    /// Whether a history entry was recorded
    pub is_submit_history: bool,
    /// Whether the host should move its caret to `cur_index`
    pub is_set_cursor: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cur_index: None,
            is_submit_history: true,
            is_set_cursor: true,
        }
    }
}

impl RenderOptions {
    /// Edit at `index`: move the caret there and record history
    pub fn cursor(index: usize) -> Self {
        Self {
            cur_index: Some(index),
            ..Default::default()
        }
    }

    /// Content changed somewhere else; leave the caret alone
    pub fn detached(is_submit_history: bool) -> Self {
        Self {
            cur_index: None,
            is_submit_history,
            is_set_cursor: false,
        }
    }
}

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Repaint the document
    Render(RenderOptions),
}

impl Cmd {
    pub fn render_options(&self) -> RenderOptions {
        match self {
            Cmd::Render(options) => *options,
        }
    }
}
