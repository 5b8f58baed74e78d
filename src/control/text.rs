//! Text control, and the character-editing routines shared with select,
//! date and number controls

use crate::format::{format_element_context, normalize_break, split_text, ContextOptions};
use crate::messages::Key;
use crate::model::{ControlComponent, Element, ElementType, Range};

use super::{
    collect_values, component_at, remove_control, remove_placeholder, restore_placeholder,
    shrink_boundary, ControlBehavior, ControlContext, ControlRule, RunLayout,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextControl {
    control_id: String,
}

impl TextControl {
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
        }
    }
}

impl ControlBehavior for TextControl {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn value(&self, ctx: &ControlContext<'_>) -> Vec<Element> {
        text_value(ctx, &self.control_id)
    }

    fn set_value(
        &mut self,
        data: Vec<Element>,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        set_text_value(ctx, &self.control_id, data, rule)
    }

    fn clear_value(&mut self, ctx: &mut ControlContext<'_>, rule: ControlRule) -> Option<usize> {
        clear_text_value(ctx, &self.control_id, rule)
    }

    fn keydown(&mut self, key: Key, ctx: &mut ControlContext<'_>) -> Option<usize> {
        keydown_text(ctx, &self.control_id, key)
    }

    fn cut(&mut self, ctx: &mut ControlContext<'_>) -> Option<usize> {
        cut_text(ctx, &self.control_id)
    }
}

pub(crate) fn text_value(ctx: &ControlContext<'_>, control_id: &str) -> Vec<Element> {
    RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)
        .map(|layout| collect_values(ctx.elements, &layout))
        .unwrap_or_default()
}

/// One element per grapheme, line breaks normalized
fn split_data(data: Vec<Element>) -> Vec<Element> {
    let mut split = Vec::with_capacity(data.len());
    for element in data {
        let graphemes = split_text(&element.value);
        if graphemes.len() <= 1 {
            let value = normalize_break(&element.value).to_string();
            split.push(Element { value, ..element });
            continue;
        }
        for grapheme in graphemes {
            let mut piece = element.clone();
            piece.value = normalize_break(grapheme).to_string();
            split.push(piece);
        }
    }
    split
}

/// Style source for content inserted after `index`: the element itself when
/// it is a value character, otherwise the control's own style
fn value_anchor(elements: &[Element], index: usize) -> Element {
    let at = &elements[index];
    let style = if at.is_component(ControlComponent::Value) {
        at.style.clone()
    } else {
        at.control
            .as_ref()
            .map(|c| c.style.clone())
            .unwrap_or_default()
    };
    Element {
        style,
        row_flex: at.row_flex,
        control_id: at.control_id.clone(),
        control: at.control.clone(),
        ..Default::default()
    }
}

/// Delete the selected elements and restore the placeholder if the run empties
fn delete_selection(ctx: &mut ControlContext<'_>, control_id: &str, range: Range) {
    ctx.splice(range.start_index + 1, range.len(), Vec::new());
    restore_placeholder(ctx, control_id, range.start_index);
}

pub(crate) fn set_text_value(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    data: Vec<Element>,
    rule: ControlRule,
) -> Option<usize> {
    if !rule.ignore_disabled_rule && ctx.is_disabled(control_id) {
        return None;
    }
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    shrink_boundary(ctx, &layout);
    let range = ctx.range;
    if range.start_index < layout.head_end || range.start_index >= layout.tail_start {
        return None;
    }

    if range.is_collapsed() {
        remove_placeholder(ctx, range.start_index);
    } else {
        ctx.splice(range.start_index + 1, range.len(), Vec::new());
    }

    let anchor = value_anchor(ctx.elements, range.start_index);
    let mut inserted: Vec<Element> = split_data(data)
        .into_iter()
        .map(|mut element| {
            element.strip_control();
            element.inherit_from(&anchor);
            if element.element_type.is_none() {
                element.element_type = Some(ElementType::Control);
            }
            element.control_component = Some(ControlComponent::Value);
            element
        })
        .collect();
    format_element_context(
        ctx.elements,
        &mut inserted,
        range.start_index,
        ContextOptions::default(),
    );
    let len = inserted.len();
    ctx.splice(range.start_index + 1, 0, inserted);
    if len == 0 {
        restore_placeholder(ctx, control_id, range.start_index);
    }
    Some(range.start_index + len)
}

pub(crate) fn clear_text_value(
    ctx: &mut ControlContext<'_>,
    control_id: &str,
    rule: ControlRule,
) -> Option<usize> {
    if !rule.ignore_disabled_rule && ctx.is_disabled(control_id) {
        return None;
    }
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    let value_range = layout.value_range();
    let only_placeholder = !value_range.is_empty()
        && ctx.elements[value_range.clone()]
            .iter()
            .all(|e| e.is_component(ControlComponent::Placeholder));
    if !only_placeholder {
        ctx.splice(value_range.start, value_range.len(), Vec::new());
        restore_placeholder(ctx, control_id, layout.head_end);
    }
    Some(layout.head_end)
}

pub(crate) fn keydown_text(ctx: &mut ControlContext<'_>, control_id: &str, key: Key) -> Option<usize> {
    if ctx.is_disabled(control_id) {
        return None;
    }
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    shrink_boundary(ctx, &layout);
    let range = ctx.range;
    let start = component_at(ctx.elements, range.start_index);
    let is_boundary = |c: Option<ControlComponent>| c.is_some_and(|c| c.is_head() || c.is_tail());

    match key {
        Key::Backspace if !range.is_collapsed() => {
            delete_selection(ctx, control_id, range);
            Some(range.start_index)
        }
        Key::Backspace => {
            if is_boundary(start) || start == Some(ControlComponent::Placeholder) {
                remove_control(ctx, range.start_index)
            } else if start == Some(ControlComponent::Value) {
                let caret = range.start_index - 1;
                ctx.splice(range.start_index, 1, Vec::new());
                restore_placeholder(ctx, control_id, caret);
                Some(caret)
            } else {
                Some(range.end_index)
            }
        }
        Key::Delete if !range.is_collapsed() => {
            delete_selection(ctx, control_id, range);
            Some(range.start_index)
        }
        Key::Delete => {
            let next = component_at(ctx.elements, range.end_index + 1);
            let head_before_placeholder = start.is_some_and(|c| c.is_head())
                && next == Some(ControlComponent::Placeholder);
            if head_before_placeholder
                || next.is_some_and(|c| c.is_tail())
                || start == Some(ControlComponent::Placeholder)
            {
                remove_control(ctx, range.start_index)
            } else if next == Some(ControlComponent::Value) {
                ctx.splice(range.start_index + 1, 1, Vec::new());
                restore_placeholder(ctx, control_id, range.start_index);
                Some(range.start_index)
            } else {
                Some(range.end_index)
            }
        }
        // a control value holds no line breaks
        Key::Enter => Some(range.end_index),
    }
}

pub(crate) fn cut_text(ctx: &mut ControlContext<'_>, control_id: &str) -> Option<usize> {
    if ctx.is_disabled(control_id) {
        return None;
    }
    let layout = RunLayout::locate(ctx.elements, control_id, ctx.range.start_index)?;
    shrink_boundary(ctx, &layout);
    let range = ctx.range;
    if !range.is_collapsed() {
        delete_selection(ctx, control_id, range);
    }
    Some(range.start_index)
}
