//! Update functions for the Elm-style architecture
//!
//! All session state transformations flow through these functions.

mod app;
mod control;
mod cursor;
mod document;

use crate::commands::Cmd;
use crate::messages::Msg;
use crate::session::EditorSession;

#[cfg(debug_assertions)]
use crate::tracing::RunSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use app::update_app;
pub use control::update_control;
pub use cursor::update_cursor;
pub use document::update_document;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(session: &mut EditorSession, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(session, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(session, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(session: &mut EditorSession, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Cursor(m) => cursor::update_cursor(session, m),
        Msg::Document(m) => document::update_document(session, m),
        Msg::Control(m) => control::update_control(session, m),
        Msg::App(m) => app::update_app(session, m),
    }
}

/// Traced update wrapper (debug builds only)
///
/// Captures the active run before and after the update and logs what
/// changed, then checks the list invariants.
#[cfg(debug_assertions)]
fn update_traced(session: &mut EditorSession, msg: Msg) -> Option<Cmd> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let range_before = session.range();
    let before = session.active_control().and_then(|active| {
        RunSnapshot::capture(
            session.element_list(),
            active.control_id(),
            range_before.start_index,
        )
    });

    let result = update_inner(session, msg);

    let range_after = session.range();
    if range_before != range_after {
        debug!(target: "cursor", from = ?range_before, to = ?range_after, "range changed");
    }
    if let Some(before) = &before {
        let after = RunSnapshot::capture(
            session.element_list(),
            &before.control_id,
            before.start.min(range_after.start_index),
        );
        if let Some(diff) = before.diff(after.as_ref()) {
            debug!(target: "control", %diff, "run changed");
        }
    }

    session.assert_invariants_with_context(&msg_name);
    result
}

/// Get a display name for a message type
///
/// Uses Debug formatting to include variant names and arguments.
/// Example outputs:
/// - `Cursor::SetRange { start_index: 3, end_index: 3 }`
/// - `Document::Input("x")`
/// - `Control::DestroyControl`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Cursor(m) => format!("Cursor::{:?}", m),
        Msg::Document(m) => format!("Document::{:?}", m),
        Msg::Control(m) => format!("Control::{:?}", m),
        Msg::App(m) => format!("App::{:?}", m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EditorMode, EngineConfig};
    use crate::events::{ControlEvent, ControlState};
    use crate::messages::{AppMsg, ControlMsg, CursorMsg, DocumentMsg, Key};
    use crate::model::{ControlDescriptor, ControlType, DocumentData, Element, GetValueOption};

    fn session_with_text_control() -> EditorSession {
        let mut head = Element::control(ControlDescriptor {
            placeholder: Some("name".to_string()),
            ..ControlDescriptor::new(ControlType::Text)
        });
        head.control_id = Some("c".to_string());
        let document = DocumentData::from_main(vec![Element::text("a"), head]);
        EditorSession::with_document(document, EngineConfig::default())
    }

    // anchor, "a", prefix
    const HEAD_END: usize = 2;

    fn value_of(session: &EditorSession) -> Option<String> {
        session
            .value_by_id(&GetValueOption::by_id("c"))
            .pop()
            .and_then(|v| v.value)
    }

    #[test]
    fn test_cursor_message_activates_control() {
        let mut session = session_with_text_control();
        let head = HEAD_END;

        let cmd = update(
            &mut session,
            Msg::Cursor(CursorMsg::SetRange {
                start_index: head,
                end_index: head,
            }),
        );
        let options = cmd.unwrap().render_options();
        assert_eq!(options.cur_index, Some(head));
        assert!(!options.is_submit_history);
        assert_eq!(session.active_control().map(|a| a.control_id()), Some("c"));
        assert!(matches!(
            session.events().iter().next(),
            Some(ControlEvent::ControlChange {
                state: ControlState::Active,
                ..
            })
        ));
    }

    #[test]
    fn test_document_messages_round_trip_through_history() {
        let mut session = session_with_text_control();
        let head = HEAD_END;
        update(
            &mut session,
            Msg::Cursor(CursorMsg::SetRange {
                start_index: head,
                end_index: head,
            }),
        );

        let cmd = update(&mut session, Msg::Document(DocumentMsg::Input("kim".to_string())));
        assert!(cmd.unwrap().render_options().is_submit_history);
        assert_eq!(value_of(&session).as_deref(), Some("kim"));

        assert!(update(&mut session, Msg::Document(DocumentMsg::Undo)).is_some());
        assert_eq!(value_of(&session), None);
        assert!(update(&mut session, Msg::Document(DocumentMsg::Redo)).is_some());
        assert_eq!(value_of(&session).as_deref(), Some("kim"));
    }

    #[test]
    fn test_control_messages_dispatch() {
        let mut session = session_with_text_control();
        let head = HEAD_END;
        update(
            &mut session,
            Msg::Cursor(CursorMsg::SetRange {
                start_index: head,
                end_index: head,
            }),
        );
        update(&mut session, Msg::Control(ControlMsg::DestroyControl));
        assert!(session.active_control().is_none());

        let cmd = update(&mut session, Msg::Control(ControlMsg::RemoveControl(head)));
        assert!(cmd.is_some());
        assert!(session.element_list().iter().all(|e| e.control_id.is_none()));
    }

    #[test]
    fn test_readonly_blocks_edits() {
        let mut session = session_with_text_control();
        update(&mut session, Msg::App(AppMsg::SetMode(EditorMode::Readonly)));
        assert_eq!(session.mode(), EditorMode::Readonly);
        assert_eq!(
            update(&mut session, Msg::Document(DocumentMsg::Keydown(Key::Backspace))),
            None
        );
    }
}
