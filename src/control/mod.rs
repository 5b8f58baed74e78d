//! Form controls: run geometry, placeholder handling and the six behaviors
//!
//! A control is a contiguous run of elements sharing one `control_id`:
//!
//! ```text
//! [prefix..][preText..][placeholder.. | value.. | (marker label..)..][postText..][postfix..]
//! ```
//!
//! Behaviors never hold element indices across calls; every operation
//! re-locates its run by id, starting near the caret.

pub mod checkbox;
pub mod date;
pub mod manager;
pub mod number;
pub mod radio;
pub mod search;
pub mod select;
pub mod text;

use crate::config::{EditorMode, EngineConfig};
use crate::format::{format_element_context, normalize_break, split_text, ContextOptions};
use crate::messages::Key;
use crate::model::{
    control_run_bounds, find_control_run, splice_element_list, ControlComponent,
    ControlDescriptor, ControlType, Element, ElementType, Range, SpliceOptions,
};

pub use checkbox::CheckboxControl;
pub use date::DateControl;
pub use manager::{ActiveControl, ControlValue, LocationPosition};
pub use number::NumberControl;
pub use radio::RadioControl;
pub use search::{ControlHighlight, ControlSearch, HighlightMatch, HighlightRule};
pub use select::SelectControl;
pub use text::TextControl;

/// Policy overrides for programmatic writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlRule {
    /// Write even if the control is disabled
    pub ignore_disabled_rule: bool,
    /// Delete even if the control is not deletable
    pub ignore_deleted_rule: bool,
}

/// Side effects of a behavior call, applied by the session afterwards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlEffects {
    /// The run's value or structure changed
    pub content_changed: bool,
    /// A placeholder was removed; the last history entry should be dropped
    pub rewind_history: bool,
    /// A placeholder was put back into an emptied run
    pub placeholder_restored: bool,
}

/// Exclusive access to the active element list for one behavior call
#[derive(Debug)]
pub struct ControlContext<'a> {
    pub elements: &'a mut Vec<Element>,
    pub range: Range,
    pub mode: EditorMode,
    pub config: &'a EngineConfig,
    pub effects: ControlEffects,
}

impl<'a> ControlContext<'a> {
    pub fn new(
        elements: &'a mut Vec<Element>,
        range: Range,
        mode: EditorMode,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            elements,
            range,
            mode,
            config,
            effects: ControlEffects::default(),
        }
    }

    pub fn is_design_mode(&self) -> bool {
        self.mode == EditorMode::Design
    }

    /// Splice inside a run; frame protection does not apply
    pub fn splice(&mut self, start: usize, delete_count: usize, insert: Vec<Element>) -> Vec<Element> {
        let inserted = insert.len();
        let removed = splice_element_list(
            self.elements,
            start,
            delete_count,
            insert,
            SpliceOptions::ignoring_rules(),
        );
        if !removed.is_empty() || inserted > 0 {
            self.effects.content_changed = true;
        }
        removed
    }

    /// Descriptor of the run `control_id`
    pub fn descriptor(&self, control_id: &str) -> Option<&ControlDescriptor> {
        let (start, _) = find_control_run(self.elements, control_id, self.range.start_index)?;
        self.elements[start].control.as_deref()
    }

    /// Whether writes to `control_id` are refused in the current mode
    pub fn is_disabled(&self, control_id: &str) -> bool {
        !self.is_design_mode() && self.descriptor(control_id).is_some_and(|c| c.is_disabled())
    }
}

/// Component geometry of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLayout {
    pub start: usize,
    pub end: usize,
    /// Last prefix/preText element
    pub head_end: usize,
    /// First postText/postfix element (`end + 1` when there is none)
    pub tail_start: usize,
}

impl RunLayout {
    pub fn locate(elements: &[Element], control_id: &str, hint: usize) -> Option<Self> {
        let (start, end) = find_control_run(elements, control_id, hint)?;
        let is_head = |i: usize| elements[i].control_component.is_some_and(|c| c.is_head());
        let is_tail = |i: usize| elements[i].control_component.is_some_and(|c| c.is_tail());

        let mut head_end = start;
        while head_end < end && is_head(head_end + 1) {
            head_end += 1;
        }
        let mut tail_start = end + 1;
        while tail_start > head_end + 1 && is_tail(tail_start - 1) {
            tail_start -= 1;
        }
        Some(Self {
            start,
            end,
            head_end,
            tail_start,
        })
    }

    /// Indices between the head and the tail
    pub fn value_range(&self) -> std::ops::Range<usize> {
        self.head_end + 1..self.tail_start
    }
}

pub(crate) fn component_at(elements: &[Element], index: usize) -> Option<ControlComponent> {
    elements.get(index).and_then(|e| e.control_component)
}

fn is_placeholder(elements: &[Element], index: usize) -> bool {
    component_at(elements, index) == Some(ControlComponent::Placeholder)
}

/// Value elements of a run
pub(crate) fn collect_values(elements: &[Element], layout: &RunLayout) -> Vec<Element> {
    elements[layout.value_range()]
        .iter()
        .filter(|e| e.is_component(ControlComponent::Value))
        .cloned()
        .collect()
}

/// Concatenated text of a run's value elements
pub(crate) fn values_text(values: &[Element]) -> String {
    values.iter().map(|e| crate::format::denormalize_break(&e.value)).collect()
}

fn has_content(elements: &[Element], layout: &RunLayout) -> bool {
    elements[layout.value_range()].iter().any(|e| {
        matches!(
            e.control_component,
            Some(ControlComponent::Value | ControlComponent::Checkbox | ControlComponent::Radio)
        )
    })
}

/// Clamp a selection inside a run to its value area. A caret resting on a
/// placeholder moves to the end of the head.
pub(crate) fn shrink_boundary(ctx: &mut ControlContext<'_>, layout: &RunLayout) {
    let Range {
        start_index,
        end_index,
    } = ctx.range;
    if start_index == end_index {
        if is_placeholder(ctx.elements, start_index) {
            ctx.range = Range::collapsed(layout.head_end);
        }
        return;
    }
    let low = layout.head_end;
    let high = layout.tail_start - 1;
    let start = start_index.clamp(low, high);
    let end = end_index.clamp(start, high);
    ctx.range = Range::new(start, end);
}

/// Insert the configured placeholder after `index`
pub(crate) fn add_placeholder(ctx: &mut ControlContext<'_>, index: usize) {
    let Some(at) = ctx.elements.get(index) else {
        return;
    };
    let Some(control) = at.control.clone() else {
        return;
    };
    let Some(placeholder) = control.placeholder.clone().filter(|p| !p.is_empty()) else {
        return;
    };
    let style = control.style.with_color(&ctx.config.control.placeholder_color);
    let control_id = at.control_id.clone();
    let row_flex = at.row_flex;

    let mut items: Vec<Element> = split_text(&placeholder)
        .into_iter()
        .map(|grapheme| Element {
            value: normalize_break(grapheme).to_string(),
            element_type: Some(ElementType::Control),
            style: style.clone(),
            row_flex,
            control_id: control_id.clone(),
            control: Some(control.clone()),
            control_component: Some(ControlComponent::Placeholder),
            ..Default::default()
        })
        .collect();
    format_element_context(ctx.elements, &mut items, index, ContextOptions::default());
    ctx.splice(index + 1, 0, items);
    ctx.effects.placeholder_restored = true;
}

/// Remove the placeholder of the run at or after `index`
pub(crate) fn remove_placeholder(ctx: &mut ControlContext<'_>, index: usize) {
    let at = if is_placeholder(ctx.elements, index) {
        index
    } else if is_placeholder(ctx.elements, index + 1) {
        index + 1
    } else {
        return;
    };
    let Some((start, end)) = control_run_bounds(ctx.elements, at) else {
        return;
    };
    let Some(first) = (start..=end).find(|&i| is_placeholder(ctx.elements, i)) else {
        return;
    };
    let last = (first..=end)
        .rev()
        .find(|&i| is_placeholder(ctx.elements, i))
        .unwrap_or(first);
    ctx.splice(first, last - first + 1, Vec::new());
    ctx.effects.rewind_history = true;
}

/// Reinstate the placeholder when the run has become empty
pub(crate) fn restore_placeholder(ctx: &mut ControlContext<'_>, control_id: &str, index: usize) {
    let Some(layout) = RunLayout::locate(ctx.elements, control_id, index) else {
        return;
    };
    let range = layout.value_range();
    if !has_content(ctx.elements, &layout) && !range.clone().any(|i| is_placeholder(ctx.elements, i)) {
        add_placeholder(ctx, layout.head_end);
    }
}

/// Delete the whole run containing `index`, honoring the deletion policy.
///
/// Returns the caret index before the removed run.
pub(crate) fn remove_control(ctx: &mut ControlContext<'_>, index: usize) -> Option<usize> {
    let control = ctx.elements.get(index)?.control.as_deref()?;
    if !ctx.is_design_mode() {
        if !control.is_deletable() {
            return None;
        }
        if ctx.mode == EditorMode::Form && !ctx.config.mode_rule.form.control_deletable {
            return None;
        }
    }
    let (start, end) = control_run_bounds(ctx.elements, index)?;
    ctx.splice(start, end - start + 1, Vec::new());
    Some(start.saturating_sub(1))
}

/// Apply `update` to the descriptor of every element of the run.
///
/// Returns whether the descriptor changed.
pub(crate) fn set_run_control(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    update: impl FnOnce(&mut ControlDescriptor),
) -> bool {
    let Some((start, end)) = find_control_run(ctx.elements, control_id, ctx.range.start_index) else {
        return false;
    };
    let Some(current) = ctx.elements[start].control.as_deref() else {
        return false;
    };
    let mut updated = current.clone();
    update(&mut updated);
    if &updated == current {
        return false;
    }
    for element in &mut ctx.elements[start..=end] {
        element.control = Some(Box::new(updated.clone()));
    }
    ctx.effects.content_changed = true;
    true
}

/// Replace a run's value area with `text` in the run's own style.
///
/// Empty text leaves the placeholder. Returns the caret after the new value.
pub(crate) fn replace_value_text(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    text: &str,
) -> Option<usize> {
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    let value_range = layout.value_range();
    ctx.splice(value_range.start, value_range.len(), Vec::new());
    if text.is_empty() {
        add_placeholder(ctx, layout.head_end);
        return Some(layout.head_end);
    }

    let head = &ctx.elements[layout.head_end];
    let control = head.control.clone();
    let style = control.as_ref().map(|c| c.style.clone()).unwrap_or_default();
    let row_flex = head.row_flex;
    let mut inserted: Vec<Element> = split_text(text)
        .into_iter()
        .map(|grapheme| Element {
            value: normalize_break(grapheme).to_string(),
            element_type: Some(ElementType::Control),
            style: style.clone(),
            row_flex,
            control_id: Some(control_id.to_string()),
            control: control.clone(),
            control_component: Some(ControlComponent::Value),
            ..Default::default()
        })
        .collect();
    format_element_context(ctx.elements, &mut inserted, layout.head_end, ContextOptions::default());
    let len = inserted.len();
    ctx.splice(layout.head_end + 1, 0, inserted);
    Some(layout.head_end + len)
}

/// Capability set shared by all six control types
pub trait ControlBehavior {
    fn control_id(&self) -> &str;

    /// Value elements of the run
    fn value(&self, ctx: &ControlContext<'_>) -> Vec<Element>;

    /// Replace the selection inside the run with `data`.
    /// `None` when the write is refused.
    fn set_value(
        &mut self,
        data: Vec<Element>,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize>;

    /// Remove the value and reinstate the placeholder
    fn clear_value(&mut self, ctx: &mut ControlContext<'_>, rule: ControlRule) -> Option<usize>;

    /// Handle one editing key; `None` when the control is disabled
    fn keydown(&mut self, key: Key, ctx: &mut ControlContext<'_>) -> Option<usize>;

    /// Delete the selection inside the run
    fn cut(&mut self, ctx: &mut ControlContext<'_>) -> Option<usize>;
}

/// Behavior instance of the active control, chosen once at activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Text(TextControl),
    Select(SelectControl),
    Checkbox(CheckboxControl),
    Radio(RadioControl),
    Date(DateControl),
    Number(NumberControl),
}

impl Control {
    pub fn new(control_type: ControlType, control_id: impl Into<String>) -> Self {
        let id = control_id.into();
        match control_type {
            ControlType::Text => Control::Text(TextControl::new(id)),
            ControlType::Select => Control::Select(SelectControl::new(id)),
            ControlType::Checkbox => Control::Checkbox(CheckboxControl::new(id)),
            ControlType::Radio => Control::Radio(RadioControl::new(id)),
            ControlType::Date => Control::Date(DateControl::new(id)),
            ControlType::Number => Control::Number(NumberControl::new(id)),
        }
    }

    /// Behavior for the run that `element` belongs to
    pub fn for_element(element: &Element) -> Option<Self> {
        let control_id = element.control_id.as_deref()?;
        let control = element.control.as_deref()?;
        Some(Self::new(control.control_type, control_id))
    }

    pub fn control_type(&self) -> ControlType {
        match self {
            Control::Text(_) => ControlType::Text,
            Control::Select(_) => ControlType::Select,
            Control::Checkbox(_) => ControlType::Checkbox,
            Control::Radio(_) => ControlType::Radio,
            Control::Date(_) => ControlType::Date,
            Control::Number(_) => ControlType::Number,
        }
    }

    fn behavior(&self) -> &dyn ControlBehavior {
        match self {
            Control::Text(c) => c,
            Control::Select(c) => c,
            Control::Checkbox(c) => c,
            Control::Radio(c) => c,
            Control::Date(c) => c,
            Control::Number(c) => c,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn ControlBehavior {
        match self {
            Control::Text(c) => c,
            Control::Select(c) => c,
            Control::Checkbox(c) => c,
            Control::Radio(c) => c,
            Control::Date(c) => c,
            Control::Number(c) => c,
        }
    }

    /// Apply a code (select/checkbox/radio) or a date string.
    /// Text and number controls have no selection and return `None`.
    pub fn set_select(
        &mut self,
        code: &str,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        match self {
            Control::Select(c) => c.set_select(code, ctx, rule),
            Control::Checkbox(c) => c.set_select(code, ctx, rule),
            Control::Radio(c) => c.set_select(code, ctx, rule),
            Control::Date(c) => c.set_select(code, ctx, rule),
            Control::Text(_) | Control::Number(_) => None,
        }
    }

    /// Flip the option whose marker sits at `index`
    pub fn toggle(
        &mut self,
        index: usize,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        match self {
            Control::Checkbox(c) => c.toggle(index, ctx, rule),
            Control::Radio(c) => c.toggle(index, ctx, rule),
            _ => None,
        }
    }

    /// Open the popup of select/date controls
    pub fn awake(&mut self, ctx: &ControlContext<'_>) {
        match self {
            Control::Select(c) => c.awake(ctx),
            Control::Date(c) => c.awake(ctx),
            _ => {}
        }
    }

    /// Close any popup
    pub fn destroy(&mut self) {
        match self {
            Control::Select(c) => c.destroy(),
            Control::Date(c) => c.destroy(),
            _ => {}
        }
    }

    pub fn is_popup_open(&self) -> bool {
        match self {
            Control::Select(c) => c.is_popup(),
            Control::Date(c) => c.is_popup(),
            _ => false,
        }
    }
}

impl ControlBehavior for Control {
    fn control_id(&self) -> &str {
        self.behavior().control_id()
    }

    fn value(&self, ctx: &ControlContext<'_>) -> Vec<Element> {
        self.behavior().value(ctx)
    }

    fn set_value(
        &mut self,
        data: Vec<Element>,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        self.behavior_mut().set_value(data, ctx, rule)
    }

    fn clear_value(&mut self, ctx: &mut ControlContext<'_>, rule: ControlRule) -> Option<usize> {
        self.behavior_mut().clear_value(ctx, rule)
    }

    fn keydown(&mut self, key: Key, ctx: &mut ControlContext<'_>) -> Option<usize> {
        self.behavior_mut().keydown(key, ctx)
    }

    fn cut(&mut self, ctx: &mut ControlContext<'_>) -> Option<usize> {
        self.behavior_mut().cut(ctx)
    }
}
