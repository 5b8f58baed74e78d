//! Select control: the value is a projection of `control.code`

use crate::messages::Key;
use crate::model::{ControlComponent, Element};

use super::text::{cut_text, keydown_text, set_text_value, text_value};
use super::{
    add_placeholder, collect_values, component_at, remove_control, replace_value_text,
    set_run_control, shrink_boundary, values_text, ControlBehavior, ControlContext, ControlRule,
    RunLayout,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    control_id: String,
    is_popup: bool,
}

impl SelectControl {
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            is_popup: false,
        }
    }

    pub fn is_popup(&self) -> bool {
        self.is_popup
    }

    /// Open the option popup unless the control is disabled
    pub fn awake(&mut self, ctx: &ControlContext<'_>) {
        if !ctx.is_disabled(&self.control_id) {
            self.is_popup = true;
        }
    }

    pub fn destroy(&mut self) {
        self.is_popup = false;
    }

    fn is_input_able(&self, ctx: &ControlContext<'_>) -> bool {
        ctx.descriptor(&self.control_id)
            .is_some_and(|c| c.is_input_able())
    }

    /// Select the option(s) in `code` and regenerate the visible value.
    ///
    /// An empty code clears the selection. An unchanged code set is a no-op.
    pub fn set_select(
        &mut self,
        code: &str,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        if !rule.ignore_disabled_rule && ctx.is_disabled(&self.control_id) {
            return None;
        }
        let control = ctx.descriptor(&self.control_id)?.clone();
        let codes = control.split_codes(code);
        if codes.is_empty() {
            return self.clear_select(ctx, rule);
        }
        let normalized = codes.join(control.delimiter());
        if control.code.as_deref() == Some(normalized.as_str()) {
            self.is_popup = false;
            return Some(ctx.range.start_index);
        }
        let text = control.projection(&normalized)?;

        let caret = replace_value_text(ctx, &self.control_id, &text)?;
        set_run_control(ctx, &self.control_id, |c| c.code = Some(normalized));
        self.is_popup = false;
        Some(caret)
    }

    /// Remove the value and the code, reinstating the placeholder
    pub fn clear_select(&mut self, ctx: &mut ControlContext<'_>, rule: ControlRule) -> Option<usize> {
        if !rule.ignore_disabled_rule && ctx.is_disabled(&self.control_id) {
            return None;
        }
        let layout = RunLayout::locate(ctx.elements, &self.control_id, ctx.range.start_index)?;
        let value_range = layout.value_range();
        let has_value = ctx.elements[value_range.clone()]
            .iter()
            .any(|e| e.is_component(ControlComponent::Value));
        if has_value || value_range.is_empty() {
            ctx.splice(value_range.start, value_range.len(), Vec::new());
            add_placeholder(ctx, layout.head_end);
        }
        set_run_control(ctx, &self.control_id, |c| c.code = None);
        Some(layout.head_end)
    }

    /// Re-derive the code from free-typed text
    fn sync_code(&self, ctx: &mut ControlContext<'_>) {
        let Some(layout) = RunLayout::locate(ctx.elements, &self.control_id, ctx.range.start_index)
        else {
            return;
        };
        let text = values_text(&collect_values(ctx.elements, &layout));
        let code = ctx.descriptor(&self.control_id).and_then(|c| {
            c.value_sets
                .iter()
                .find(|v| v.value == text)
                .map(|v| v.code.clone())
        });
        set_run_control(ctx, &self.control_id, |c| c.code = code);
    }
}

impl ControlBehavior for SelectControl {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn value(&self, ctx: &ControlContext<'_>) -> Vec<Element> {
        text_value(ctx, &self.control_id)
    }

    /// Free text is only accepted with `input_able`
    fn set_value(
        &mut self,
        data: Vec<Element>,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        if !self.is_input_able(ctx) {
            return None;
        }
        let caret = set_text_value(ctx, &self.control_id, data, rule)?;
        self.sync_code(ctx);
        Some(caret)
    }

    fn clear_value(&mut self, ctx: &mut ControlContext<'_>, rule: ControlRule) -> Option<usize> {
        self.clear_select(ctx, rule)
    }

    fn keydown(&mut self, key: Key, ctx: &mut ControlContext<'_>) -> Option<usize> {
        if ctx.is_disabled(&self.control_id) {
            return None;
        }
        if self.is_input_able(ctx) {
            let caret = keydown_text(ctx, &self.control_id, key)?;
            if ctx.elements.iter().any(|e| e.in_control(&self.control_id)) {
                self.sync_code(ctx);
            }
            return Some(caret);
        }

        let layout = RunLayout::locate(ctx.elements, &self.control_id, ctx.range.start_index)?;
        shrink_boundary(ctx, &layout);
        let range = ctx.range;
        let start = component_at(ctx.elements, range.start_index);
        let next = component_at(ctx.elements, range.end_index + 1);
        let collapsed = range.is_collapsed();
        match key {
            Key::Backspace if collapsed && start.is_some_and(|c| c.is_head() || c.is_tail()) => {
                remove_control(ctx, range.start_index)
            }
            Key::Delete
                if collapsed
                    && (next.is_some_and(|c| c.is_tail())
                        || (start.is_some_and(|c| c.is_head())
                            && next == Some(ControlComponent::Placeholder))) =>
            {
                remove_control(ctx, range.start_index)
            }
            Key::Backspace | Key::Delete => self.clear_select(ctx, ControlRule::default()),
            Key::Enter => Some(range.end_index),
        }
    }

    fn cut(&mut self, ctx: &mut ControlContext<'_>) -> Option<usize> {
        if ctx.is_disabled(&self.control_id) {
            return None;
        }
        if self.is_input_able(ctx) {
            let caret = cut_text(ctx, &self.control_id)?;
            self.sync_code(ctx);
            return Some(caret);
        }
        let layout = RunLayout::locate(ctx.elements, &self.control_id, ctx.range.start_index)?;
        shrink_boundary(ctx, &layout);
        if ctx.range.is_collapsed() {
            return Some(ctx.range.start_index);
        }
        self.clear_select(ctx, ControlRule::default())
    }
}
