//! Message types for the Elm-style architecture
//!
//! All session state changes flow through these message types.

use crate::config::EditorMode;
use crate::control::{ControlHighlight, LocationPosition};
use crate::model::{Element, PositionContext, SetPropertiesOption, SetValueOption, Zone};

/// Editing keys. Printable input arrives as [`DocumentMsg::Input`] and
/// caret movement as [`CursorMsg::SetRange`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
}

/// Caret and focus messages
#[derive(Debug, Clone, PartialEq)]
pub enum CursorMsg {
    /// Place the caret or selection in the active list
    SetRange { start_index: usize, end_index: usize },
    /// Move focus to another zone; the caret goes to its anchor
    SetZone(Zone),
    /// Move focus into a table cell, or back out of it
    SetPositionContext(PositionContext),
}

/// Content editing messages
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentMsg {
    // === Insertion ===
    /// Insert a compound element list at the selection
    InsertElementList(Vec<Element>),
    /// Insert typed or pasted text at the selection
    Input(String),

    // === Deletion ===
    /// Handle an editing key
    Keydown(Key),
    /// Delete the selection
    Cut,

    // === History ===
    Undo,
    Redo,
}

/// Control API messages
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMsg {
    /// Apply a code (select/checkbox/radio) or date to the active control
    SetSelect(String),
    /// Flip the option marker at an index of the active control
    ToggleOption(usize),
    /// Delete the run containing an index
    RemoveControl(usize),
    /// Batch value injection by id, concept id or area id
    SetValueListById(Vec<SetValueOption>),
    /// Batch property update; re-lays out every zone
    SetPropertiesListById(Vec<SetPropertiesOption>),
    /// Move the caret to a control
    LocationControl {
        control_id: String,
        position: LocationPosition,
    },
    /// Deactivate the active control
    DestroyControl,
    /// Replace the highlight rules
    SetHighlightList(Vec<ControlHighlight>),
}

/// Session-wide messages
#[derive(Debug, Clone, PartialEq)]
pub enum AppMsg {
    SetMode(EditorMode),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Cursor(CursorMsg),
    Document(DocumentMsg),
    Control(ControlMsg),
    App(AppMsg),
}
