//! Control API message handlers

use crate::commands::{Cmd, RenderOptions};
use crate::messages::ControlMsg;
use crate::session::EditorSession;

pub fn update_control(session: &mut EditorSession, msg: ControlMsg) -> Option<Cmd> {
    match msg {
        ControlMsg::SetSelect(code) => session.set_select(&code),
        ControlMsg::ToggleOption(index) => session.toggle_option(index),
        ControlMsg::RemoveControl(index) => session.remove_control(index),
        ControlMsg::SetValueListById(options) => session.set_value_list_by_id(options),
        ControlMsg::SetPropertiesListById(options) => session.set_properties_list_by_id(options),
        ControlMsg::LocationControl {
            control_id,
            position,
        } => session.location_control(&control_id, position),
        ControlMsg::DestroyControl => {
            session.destroy_control();
            None
        }
        ControlMsg::SetHighlightList(highlight_list) => {
            session.set_highlight_list(highlight_list);
            // Highlights are paint-only
            Some(Cmd::Render(RenderOptions::detached(false)))
        }
    }
}
