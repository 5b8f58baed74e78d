//! Checkbox control, and the option-group logic it shares with radio
//!
//! Option groups have no free text: the markers' checked state and
//! `control.code` are the value, and the labels are fixed.

use crate::messages::Key;
use crate::model::{ControlComponent, Element, OptionState, DEFAULT_DELIMITER};

use super::{
    component_at, remove_control, set_run_control, shrink_boundary, ControlBehavior,
    ControlContext, ControlRule, RunLayout,
};

/// Which marker component an option group uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OptionKind {
    Checkbox,
    Radio,
}

impl OptionKind {
    fn state(self, element: &Element) -> Option<&OptionState> {
        match self {
            OptionKind::Checkbox => element.checkbox.as_ref(),
            OptionKind::Radio => element.radio.as_ref(),
        }
    }

    fn state_mut(self, element: &mut Element) -> Option<&mut OptionState> {
        match self {
            OptionKind::Checkbox => element.checkbox.as_mut(),
            OptionKind::Radio => element.radio.as_mut(),
        }
    }

    fn component(self) -> ControlComponent {
        match self {
            OptionKind::Checkbox => ControlComponent::Checkbox,
            OptionKind::Radio => ControlComponent::Radio,
        }
    }
}

/// Label elements of the checked options
pub(crate) fn option_value(ctx: &ControlContext<'_>, control_id: &str, kind: OptionKind) -> Vec<Element> {
    let Some(layout) = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index) else {
        return Vec::new();
    };
    let mut checked = false;
    let mut labels = Vec::new();
    for element in &ctx.elements[layout.value_range()] {
        if let Some(state) = kind.state(element) {
            checked = state.value;
        } else if checked && element.is_component(ControlComponent::Value) {
            labels.push(element.clone());
        }
    }
    labels
}

/// Checked codes in marker order
fn checked_codes(ctx: &ControlContext<'_>, layout: &RunLayout, kind: OptionKind) -> Vec<String> {
    ctx.elements[layout.value_range()]
        .iter()
        .filter_map(|e| kind.state(e))
        .filter(|s| s.value)
        .map(|s| s.code.clone())
        .collect()
}

/// Check exactly the options in `codes`; a radio keeps only the first code
pub(crate) fn apply_codes(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    kind: OptionKind,
    codes: &[&str],
) -> Option<usize> {
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    let codes = match kind {
        OptionKind::Radio => &codes[..codes.len().min(1)],
        OptionKind::Checkbox => codes,
    };

    let mut flipped = false;
    for element in &mut ctx.elements[layout.value_range()] {
        if let Some(state) = kind.state_mut(element) {
            let on = codes.contains(&state.code.as_str());
            if state.value != on {
                state.value = on;
                flipped = true;
            }
        }
    }
    let selected = checked_codes(ctx, &layout, kind);
    let delimiter = ctx
        .descriptor(control_id)
        .map_or(DEFAULT_DELIMITER, |c| c.delimiter())
        .to_string();
    let code = (!selected.is_empty()).then(|| selected.join(&delimiter));
    set_run_control(ctx, control_id, |c| c.code = code);
    if flipped {
        ctx.effects.content_changed = true;
    }
    Some(ctx.range.start_index)
}

pub(crate) fn set_option_select(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    kind: OptionKind,
    code: &str,
    rule: ControlRule,
) -> Option<usize> {
    if !rule.ignore_disabled_rule && ctx.is_disabled(control_id) {
        return None;
    }
    let control = ctx.descriptor(control_id)?.clone();
    let codes = control.split_codes(code);
    apply_codes(ctx, control_id, kind, &codes)
}

/// Flip the option whose marker sits at `index`
pub(crate) fn toggle_option(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    kind: OptionKind,
    index: usize,
    rule: ControlRule,
) -> Option<usize> {
    if !rule.ignore_disabled_rule && ctx.is_disabled(control_id) {
        return None;
    }
    let marker = ctx.elements.get(index)?;
    if !marker.in_control(control_id) || !marker.is_component(kind.component()) {
        return None;
    }
    let state = kind.state(marker)?.clone();
    let layout = RunLayout::locate(ctx.elements, control_id, index)?;
    let mut codes = checked_codes(ctx, &layout, kind);
    match kind {
        OptionKind::Checkbox if state.value => codes.retain(|c| *c != state.code),
        OptionKind::Checkbox => codes.push(state.code),
        OptionKind::Radio => codes = vec![state.code],
    }
    let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
    ctx.range = crate::model::Range::collapsed(index);
    apply_codes(ctx, control_id, kind, &codes)
}

pub(crate) fn keydown_option(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    kind: OptionKind,
    key: Key,
) -> Option<usize> {
    if ctx.is_disabled(control_id) {
        return None;
    }
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    shrink_boundary(ctx, &layout);
    let range = ctx.range;
    let start = component_at(ctx.elements, range.start_index);
    let next = component_at(ctx.elements, range.end_index + 1);
    let collapsed = range.is_collapsed();
    match key {
        Key::Backspace if collapsed && start.is_some_and(|c| c.is_head() || c.is_tail()) => {
            remove_control(ctx, range.start_index)
        }
        Key::Delete if collapsed && next.is_some_and(|c| c.is_tail()) => {
            remove_control(ctx, range.start_index)
        }
        Key::Backspace | Key::Delete => apply_codes(ctx, control_id, kind, &[]),
        Key::Enter => Some(range.end_index),
    }
}

pub(crate) fn cut_option(ctx: &mut ControlContext<'_>, control_id: &str, kind: OptionKind) -> Option<usize> {
    if ctx.is_disabled(control_id) {
        return None;
    }
    if ctx.range.is_collapsed() {
        return Some(ctx.range.start_index);
    }
    apply_codes(ctx, control_id, kind, &[])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxControl {
    control_id: String,
}

impl CheckboxControl {
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
        }
    }

    /// Check exactly the delimiter-joined codes in `code`
    pub fn set_select(
        &mut self,
        code: &str,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        set_option_select(ctx, &self.control_id, OptionKind::Checkbox, code, rule)
    }

    pub fn toggle(
        &mut self,
        index: usize,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        toggle_option(ctx, &self.control_id, OptionKind::Checkbox, index, rule)
    }
}

impl ControlBehavior for CheckboxControl {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn value(&self, ctx: &ControlContext<'_>) -> Vec<Element> {
        option_value(ctx, &self.control_id, OptionKind::Checkbox)
    }

    fn set_value(
        &mut self,
        _data: Vec<Element>,
        _ctx: &mut ControlContext<'_>,
        _rule: ControlRule,
    ) -> Option<usize> {
        None
    }

    fn clear_value(&mut self, ctx: &mut ControlContext<'_>, rule: ControlRule) -> Option<usize> {
        self.set_select("", ctx, rule)
    }

    fn keydown(&mut self, key: Key, ctx: &mut ControlContext<'_>) -> Option<usize> {
        keydown_option(ctx, &self.control_id, OptionKind::Checkbox, key)
    }

    fn cut(&mut self, ctx: &mut ControlContext<'_>) -> Option<usize> {
        cut_option(ctx, &self.control_id, OptionKind::Checkbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EditorMode, EngineConfig};
    use crate::control::test_support::{layout, list_with, run_text};
    use crate::model::{ControlDescriptor, ControlType, Range, ValueSet};

    fn presence() -> ControlDescriptor {
        ControlDescriptor {
            value_sets: vec![ValueSet::new("98175", "있음"), ValueSet::new("98176", "없음")],
            ..ControlDescriptor::new(ControlType::Checkbox)
        }
    }

    fn code_of(list: &[Element]) -> Option<String> {
        list.iter()
            .find(|e| e.in_control("c"))
            .and_then(|e| e.control.as_ref())
            .and_then(|c| c.code.clone())
    }

    #[test]
    fn test_set_select_checks_markers() {
        let config = EngineConfig::default();
        let mut list = list_with(presence());
        let head = layout(&list).head_end;
        let mut ctx = ControlContext::new(&mut list, Range::collapsed(head), EditorMode::Edit, &config);
        let mut checkbox = CheckboxControl::new("c");

        assert!(checkbox
            .set_select("98175", &mut ctx, ControlRule::default())
            .is_some());
        assert_eq!(run_text(ctx.elements), "{[x]있음[ ]없음}");
        assert_eq!(code_of(ctx.elements).as_deref(), Some("98175"));
        let labels: String = checkbox
            .value(&ctx)
            .iter()
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(labels, "있음");
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let config = EngineConfig::default();
        let mut list = list_with(presence());
        let layout = layout(&list);
        let second_marker = layout.head_end + 4;
        let mut ctx =
            ControlContext::new(&mut list, Range::collapsed(layout.head_end), EditorMode::Edit, &config);
        let mut checkbox = CheckboxControl::new("c");

        checkbox.set_select("98175", &mut ctx, ControlRule::default());
        checkbox.toggle(second_marker, &mut ctx, ControlRule::default());
        assert_eq!(code_of(ctx.elements).as_deref(), Some("98175,98176"));

        checkbox.toggle(layout.head_end + 1, &mut ctx, ControlRule::default());
        assert_eq!(code_of(ctx.elements).as_deref(), Some("98176"));

        // not a marker
        assert_eq!(
            checkbox.toggle(layout.head_end + 2, &mut ctx, ControlRule::default()),
            None
        );
    }

    #[test]
    fn test_custom_delimiter_round_trips_codes() {
        let config = EngineConfig::default();
        let control = ControlDescriptor {
            multi_select_delimiter: Some(";".to_string()),
            ..presence()
        };
        let mut list = list_with(control);
        let head = layout(&list).head_end;
        let mut ctx = ControlContext::new(&mut list, Range::collapsed(head), EditorMode::Edit, &config);
        let mut checkbox = CheckboxControl::new("c");

        checkbox.set_select("98175;98176", &mut ctx, ControlRule::default());
        assert_eq!(run_text(ctx.elements), "{[x]있음[x]없음}");
        assert_eq!(code_of(ctx.elements).as_deref(), Some("98175;98176"));

        // a comma is not the delimiter here
        checkbox.set_select("98175,98176", &mut ctx, ControlRule::default());
        assert_eq!(code_of(ctx.elements), None);
    }

    #[test]
    fn test_keydown_clears_options() {
        let config = EngineConfig::default();
        let mut control = presence();
        control.code = Some("98175,98176".to_string());
        let mut list = list_with(control);
        let head = layout(&list).head_end;
        let mut ctx =
            ControlContext::new(&mut list, Range::collapsed(head + 2), EditorMode::Edit, &config);
        let mut checkbox = CheckboxControl::new("c");

        assert!(checkbox.keydown(Key::Backspace, &mut ctx).is_some());
        assert_eq!(run_text(ctx.elements), "{[ ]있음[ ]없음}");
        assert_eq!(code_of(ctx.elements), None);
        assert!(ctx.effects.content_changed);
    }

    #[test]
    fn test_set_value_is_not_supported() {
        let config = EngineConfig::default();
        let mut list = list_with(presence());
        let mut ctx = ControlContext::new(&mut list, Range::collapsed(3), EditorMode::Edit, &config);
        let mut checkbox = CheckboxControl::new("c");
        assert_eq!(
            checkbox.set_value(vec![Element::text("x")], &mut ctx, ControlRule::default()),
            None
        );
    }
}
