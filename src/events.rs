//! Outbound control events, queued on the session and drained by the host

use serde::Serialize;

use crate::model::ControlDescriptor;

/// Activation edge of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlState {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ControlEvent {
    /// The caret entered (`Active`) or left (`Inactive`) a control run
    ControlChange {
        state: ControlState,
        control: ControlDescriptor,
        control_id: String,
    },
    /// A run's value changed, by user edit or API call
    ControlContentChange {
        control: ControlDescriptor,
        control_id: String,
    },
}

impl ControlEvent {
    pub fn control_id(&self) -> &str {
        match self {
            ControlEvent::ControlChange { control_id, .. }
            | ControlEvent::ControlContentChange { control_id, .. } => control_id,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<ControlEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: ControlEvent) {
        tracing::debug!(target: "control", control_id = event.control_id(), ?event, "event");
        self.events.push(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ControlType;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::default();
        queue.push(ControlEvent::ControlContentChange {
            control: ControlDescriptor::new(ControlType::Text),
            control_id: "c".to_string(),
        });
        assert_eq!(queue.len(), 1);
        let events = queue.drain();
        assert_eq!(events[0].control_id(), "c");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let event = ControlEvent::ControlChange {
            state: ControlState::Inactive,
            control: ControlDescriptor::new(ControlType::Date),
            control_id: "d".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "controlChange");
        assert_eq!(json["state"], "inactive");
        assert_eq!(json["controlId"], "d");
        assert_eq!(json["control"]["type"], "date");
    }
}
