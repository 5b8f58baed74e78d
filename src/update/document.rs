//! Content editing message handlers
//!
//! Routing between the active control's behavior and plain list editing
//! happens inside the session; these handlers only unpack messages.

use crate::commands::Cmd;
use crate::messages::DocumentMsg;
use crate::session::EditorSession;

pub fn update_document(session: &mut EditorSession, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        // === Insertion ===
        DocumentMsg::InsertElementList(payload) => session.insert_element_list(payload),
        DocumentMsg::Input(text) => session.input(&text),

        // === Deletion ===
        DocumentMsg::Keydown(key) => session.keydown(key),
        DocumentMsg::Cut => session.cut(),

        // === History ===
        DocumentMsg::Undo => session.undo(),
        DocumentMsg::Redo => session.redo(),
    }
}
