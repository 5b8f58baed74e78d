//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashSet;

use formdoc::config::EngineConfig;
use formdoc::model::{
    ControlComponent, ControlDescriptor, ControlType, DocumentData, Element, ValueSet,
};
use formdoc::EditorSession;

/// Session over a main zone holding `main`
pub fn test_session(main: Vec<Element>) -> EditorSession {
    EditorSession::with_document(DocumentData::from_main(main), EngineConfig::default())
}

/// Compound control element with a fixed id
pub fn control(id: &str, descriptor: ControlDescriptor) -> Element {
    let mut element = Element::control(descriptor);
    element.control_id = Some(id.to_string());
    element
}

pub fn text_control(id: &str, placeholder: &str) -> Element {
    control(
        id,
        ControlDescriptor {
            placeholder: Some(placeholder.to_string()),
            ..ControlDescriptor::new(ControlType::Text)
        },
    )
}

/// Option sets used across the scenarios
pub fn presence_sets() -> Vec<ValueSet> {
    vec![ValueSet::new("98175", "있음"), ValueSet::new("98176", "없음")]
}

pub fn checkbox_control(id: &str) -> Element {
    control(
        id,
        ControlDescriptor {
            value_sets: presence_sets(),
            ..ControlDescriptor::new(ControlType::Checkbox)
        },
    )
}

pub fn select_control(id: &str, code: Option<&str>) -> Element {
    control(
        id,
        ControlDescriptor {
            code: code.map(str::to_string),
            placeholder: Some("선택".to_string()),
            value_sets: presence_sets(),
            ..ControlDescriptor::new(ControlType::Select)
        },
    )
}

/// Concatenated values of the main zone
pub fn main_text(session: &EditorSession) -> String {
    session.document().main.iter().map(|e| e.value.as_str()).collect()
}

/// Component tags of the run `control_id` in `list`
pub fn run_components(list: &[Element], control_id: &str) -> Vec<ControlComponent> {
    list.iter()
        .filter(|e| e.in_control(control_id))
        .filter_map(|e| e.control_component)
        .collect()
}

/// Values of the `value` elements of a run
pub fn run_values(list: &[Element], control_id: &str) -> String {
    list.iter()
        .filter(|e| e.in_control(control_id) && e.is_component(ControlComponent::Value))
        .map(|e| e.value.as_str())
        .collect()
}

/// Clear every generated id, recursively
pub fn strip_ids(list: &mut [Element]) {
    for element in list {
        element.id = None;
        element.control_id = None;
        element.title_id = None;
        element.list_id = None;
        element.hyperlink_id = None;
        element.date_id = None;
        element.area_id = None;
        element.table_id = None;
        element.tr_id = None;
        element.td_id = None;
        if let Some(value_list) = element.value_list.as_mut() {
            strip_ids(value_list);
        }
        if let Some(value) = element.control.as_mut().and_then(|c| c.value.as_mut()) {
            strip_ids(value);
        }
        for tr in &mut element.tr_list {
            tr.id = None;
            for td in &mut tr.td_list {
                td.id = None;
                strip_ids(&mut td.value);
            }
        }
    }
}

// ========================================================================
// Flat list invariants
// ========================================================================

fn control_id_of(e: &Element) -> Option<&str> {
    e.control_id.as_deref()
}

fn title_id_of(e: &Element) -> Option<&str> {
    e.title_id.as_deref()
}

fn list_id_of(e: &Element) -> Option<&str> {
    e.list_id.as_deref()
}

fn hyperlink_id_of(e: &Element) -> Option<&str> {
    e.hyperlink_id.as_deref()
}

fn date_id_of(e: &Element) -> Option<&str> {
    e.date_id.as_deref()
}

/// Every group id forms one contiguous stretch; recurses into table cells
pub fn assert_contiguous(list: &[Element]) {
    let keys: [(&str, fn(&Element) -> Option<&str>); 5] = [
        ("control", control_id_of),
        ("title", title_id_of),
        ("list", list_id_of),
        ("hyperlink", hyperlink_id_of),
        ("date", date_id_of),
    ];
    for (name, id_of) in keys {
        let mut closed: HashSet<&str> = HashSet::new();
        let mut previous: Option<&str> = None;
        for element in list {
            let current = id_of(element);
            if current != previous {
                if let Some(id) = previous {
                    closed.insert(id);
                }
                if let Some(id) = current {
                    assert!(!closed.contains(id), "{} group {} has a gap", name, id);
                }
            }
            previous = current;
        }
    }
    for element in list {
        for td in element.tr_list.iter().flat_map(|tr| &tr.td_list) {
            assert_contiguous(&td.value);
        }
    }
}

/// Every control run opens with prefix and closes with postfix, and never
/// mixes placeholder with value elements
pub fn assert_runs_well_formed(list: &[Element]) {
    let mut i = 0;
    while i < list.len() {
        let Some(id) = list[i].control_id.as_deref() else {
            i += 1;
            continue;
        };
        let end = list[i..]
            .iter()
            .position(|e| e.control_id.as_deref() != Some(id))
            .map_or(list.len(), |n| i + n);
        let run = &list[i..end];
        assert_eq!(
            run[0].control_component,
            Some(ControlComponent::Prefix),
            "run {} does not open with a prefix",
            id
        );
        assert_eq!(
            run[run.len() - 1].control_component,
            Some(ControlComponent::Postfix),
            "run {} does not close with a postfix",
            id
        );
        let has_placeholder = run.iter().any(|e| e.is_component(ControlComponent::Placeholder));
        let has_value = run.iter().any(|e| e.is_component(ControlComponent::Value));
        assert!(
            !(has_placeholder && has_value),
            "run {} mixes placeholder and value",
            id
        );
        i = end;
    }
    for element in list {
        for td in element.tr_list.iter().flat_map(|tr| &tr.td_list) {
            assert_runs_well_formed(&td.value);
        }
    }
}

/// All flat-list invariants at once
pub fn assert_flat_invariants(list: &[Element]) {
    assert!(list.first().is_some_and(|e| e.is_zero()), "list lost its anchor");
    assert_contiguous(list);
    assert_runs_well_formed(list);
}
