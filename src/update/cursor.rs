//! Caret and focus message handlers

use crate::commands::{Cmd, RenderOptions};
use crate::messages::CursorMsg;
use crate::session::EditorSession;

fn caret_moved(session: &EditorSession) -> Option<Cmd> {
    Some(Cmd::Render(RenderOptions {
        cur_index: Some(session.range().start_index),
        is_submit_history: false,
        is_set_cursor: true,
    }))
}

pub fn update_cursor(session: &mut EditorSession, msg: CursorMsg) -> Option<Cmd> {
    match msg {
        CursorMsg::SetRange {
            start_index,
            end_index,
        } => {
            session.set_range(start_index, end_index);
            caret_moved(session)
        }

        CursorMsg::SetZone(zone) => {
            if zone == session.zone() {
                return None;
            }
            session.set_zone(zone);
            caret_moved(session)
        }

        CursorMsg::SetPositionContext(position_context) => {
            let before = session.position_context();
            session.set_position_context(position_context);
            if session.position_context() == before {
                return None;
            }
            caret_moved(session)
        }
    }
}
