//! Session-wide message handlers

use crate::commands::{Cmd, RenderOptions};
use crate::messages::AppMsg;
use crate::session::EditorSession;

/// Handle session-wide messages
pub fn update_app(session: &mut EditorSession, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::SetMode(mode) => {
            if mode == session.mode() {
                return None;
            }
            session.set_mode(mode);
            // Mode changes repaint but never move the caret or touch history
            Some(Cmd::Render(RenderOptions::detached(false)))
        }
    }
}
