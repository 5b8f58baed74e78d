//! End-to-end control scenarios driven through `update`

mod common;

use common::{
    assert_flat_invariants, checkbox_control, control, presence_sets, run_components, run_values,
    select_control, test_session, text_control,
};
use formdoc::config::EditorMode;
use formdoc::control::LocationPosition;
use formdoc::events::ControlEvent;
use formdoc::messages::{AppMsg, ControlMsg, CursorMsg, DocumentMsg, Msg};
use formdoc::model::{
    ControlComponent, ControlDescriptor, ControlProperties, ControlType, GetValueOption,
    SetPropertiesOption, SetValueOption,
};
use formdoc::update::update;
use formdoc::EditorSession;

use ControlComponent::{Placeholder, Postfix, Prefix, Value};

fn locate(session: &mut EditorSession, control_id: &str) {
    update(
        session,
        Msg::Control(ControlMsg::LocationControl {
            control_id: control_id.to_string(),
            position: LocationPosition::Inside,
        }),
    );
}

// ========================================================================
// Text control: empty -> typed
// ========================================================================

#[test]
fn test_text_control_placeholder_replaced_by_typing() {
    let mut session = test_session(vec![text_control("c1", "Name")]);
    assert_eq!(
        run_components(session.element_list(), "c1"),
        vec![Prefix, Placeholder, Placeholder, Placeholder, Placeholder, Postfix]
    );

    // anchor { N a m e }
    update(
        &mut session,
        Msg::Cursor(CursorMsg::SetRange {
            start_index: 1,
            end_index: 1,
        }),
    );
    let cmd = update(&mut session, Msg::Document(DocumentMsg::Input("Al".to_string()))).unwrap();

    assert_eq!(cmd.render_options().cur_index, Some(3));
    assert_eq!(
        run_components(session.element_list(), "c1"),
        vec![Prefix, Value, Value, Postfix]
    );
    assert_eq!(run_values(session.element_list(), "c1"), "Al");
    assert_flat_invariants(session.element_list());
}

#[test]
fn test_text_control_insert_element_list_then_type() {
    let mut session = test_session(vec![]);
    update(
        &mut session,
        Msg::Document(DocumentMsg::InsertElementList(vec![text_control("c1", "Name")])),
    );
    assert_eq!(run_components(session.element_list(), "c1").len(), 6);

    locate(&mut session, "c1");
    update(&mut session, Msg::Document(DocumentMsg::Input("Al".to_string())));
    assert_eq!(run_values(session.element_list(), "c1"), "Al");
    assert!(!run_components(session.element_list(), "c1").contains(&Placeholder));
}

// ========================================================================
// Checkbox toggle
// ========================================================================

#[test]
fn test_checkbox_code_reports_labels() {
    let mut session = test_session(vec![checkbox_control("c1")]);
    locate(&mut session, "c1");
    assert!(update(&mut session, Msg::Control(ControlMsg::SetSelect("98175".to_string()))).is_some());

    let values = session.value_by_id(&GetValueOption::by_id("c1"));
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value.as_deref(), Some("98175"));
    assert_eq!(values[0].inner_text.as_deref(), Some("있음"));
}

#[test]
fn test_checkbox_codes_follow_configured_delimiter() {
    let checkbox = control(
        "c1",
        ControlDescriptor {
            value_sets: presence_sets(),
            multi_select_delimiter: Some(";".to_string()),
            ..ControlDescriptor::new(ControlType::Checkbox)
        },
    );
    let mut session = test_session(vec![checkbox]);
    session.set_value_list_by_id(vec![SetValueOption::new(
        GetValueOption::by_id("c1"),
        "98175;98176",
    )]);

    let values = session.value_by_id(&GetValueOption::by_id("c1"));
    assert_eq!(values[0].value.as_deref(), Some("98175;98176"));
    assert_eq!(values[0].inner_text.as_deref(), Some("있음;없음"));

    // a property patch re-expands every zone from the stored code
    session.set_properties_list_by_id(vec![SetPropertiesOption {
        target: GetValueOption::by_id("c1"),
        properties: ControlProperties {
            prefix: Some("<".to_string()),
            ..Default::default()
        },
        is_submit_history: true,
    }]);
    let checked = session
        .element_list()
        .iter()
        .filter_map(|e| e.checkbox.as_ref())
        .filter(|state| state.value)
        .count();
    assert_eq!(checked, 2);

    let zipped = session.zipped();
    let code = zipped
        .main
        .iter()
        .find_map(|e| e.control.as_deref())
        .and_then(|c| c.code.clone());
    assert_eq!(code.as_deref(), Some("98175;98176"));
}

#[test]
fn test_checkbox_toggle_by_marker() {
    let mut session = test_session(vec![checkbox_control("c1")]);
    locate(&mut session, "c1");
    let marker = session
        .element_list()
        .iter()
        .rposition(|e| e.is_component(ControlComponent::Checkbox))
        .unwrap();

    update(&mut session, Msg::Control(ControlMsg::ToggleOption(marker)));
    let values = session.value_by_id(&GetValueOption::by_id("c1"));
    assert_eq!(values[0].value.as_deref(), Some("98176"));
    assert_eq!(values[0].inner_text.as_deref(), Some("없음"));
}

// ========================================================================
// Select: empty code clears
// ========================================================================

#[test]
fn test_select_empty_code_restores_placeholder() {
    let mut session = test_session(vec![select_control("c1", Some("98175"))]);
    assert_eq!(run_values(session.element_list(), "c1"), "있음");

    locate(&mut session, "c1");
    assert!(update(&mut session, Msg::Control(ControlMsg::SetSelect(String::new()))).is_some());

    assert_eq!(
        run_components(session.element_list(), "c1"),
        vec![Prefix, Placeholder, Placeholder, Postfix]
    );
    let head = session
        .element_list()
        .iter()
        .find(|e| e.in_control("c1"))
        .unwrap();
    assert_eq!(head.control.as_ref().and_then(|c| c.code.clone()), None);
    assert_eq!(
        session.value_by_id(&GetValueOption::by_id("c1"))[0].value,
        None
    );
}

// ========================================================================
// Deletion policy
// ========================================================================

#[test]
fn test_undeletable_control_survives_remove() {
    let mut element = text_control("c1", "Name");
    if let Some(control) = element.control.as_mut() {
        control.deletable = Some(false);
    }
    let mut session = test_session(vec![element]);
    let len = session.element_list().len();

    assert_eq!(update(&mut session, Msg::Control(ControlMsg::RemoveControl(1))), None);
    assert_eq!(session.element_list().len(), len);

    update(&mut session, Msg::App(AppMsg::SetMode(EditorMode::Design)));
    assert!(update(&mut session, Msg::Control(ControlMsg::RemoveControl(1))).is_some());
    assert_eq!(session.element_list().len(), 1);
}

// ========================================================================
// Batch no-op
// ========================================================================

#[test]
fn test_batch_with_unknown_id_skips_render() {
    let mut session = test_session(vec![text_control("c1", "Name")]);
    let before = session.document().clone();

    let cmd = update(
        &mut session,
        Msg::Control(ControlMsg::SetValueListById(vec![SetValueOption::new(
            GetValueOption::by_id("missing"),
            "x",
        )])),
    );

    assert_eq!(cmd, None);
    assert_eq!(session.document(), &before);
    assert!(!session.history().can_undo());
    assert!(session.events().is_empty());
}

#[test]
fn test_batch_by_concept_fills_every_match() {
    let named = |id: &str| {
        let mut element = text_control(id, "Name");
        if let Some(control) = element.control.as_mut() {
            control.concept_id = Some("name".to_string());
        }
        element
    };
    let mut session = test_session(vec![named("c1"), formdoc::Element::text(" "), named("c2")]);

    let cmd = update(
        &mut session,
        Msg::Control(ControlMsg::SetValueListById(vec![SetValueOption::new(
            GetValueOption::by_concept("name"),
            "Lee",
        )])),
    )
    .unwrap();

    assert!(!cmd.render_options().is_set_cursor);
    assert_eq!(run_values(session.element_list(), "c1"), "Lee");
    assert_eq!(run_values(session.element_list(), "c2"), "Lee");
    let events = session.drain_events();
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|e| matches!(e, ControlEvent::ControlContentChange { .. })));
    assert_flat_invariants(session.element_list());
}
