//! Date control: a literal date string, edited like text or replaced
//! wholesale from the date picker

use crate::messages::Key;
use crate::model::Element;

use super::text::{clear_text_value, cut_text, keydown_text, set_text_value, text_value};
use super::{replace_value_text, ControlBehavior, ControlContext, ControlRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateControl {
    control_id: String,
    is_popup: bool,
}

impl DateControl {
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
            is_popup: false,
        }
    }

    pub fn is_popup(&self) -> bool {
        self.is_popup
    }

    pub fn awake(&mut self, ctx: &ControlContext<'_>) {
        if !ctx.is_disabled(&self.control_id) {
            self.is_popup = true;
        }
    }

    pub fn destroy(&mut self) {
        self.is_popup = false;
    }

    /// Replace the whole value with `date`; an empty string clears it
    pub fn set_select(
        &mut self,
        date: &str,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        if !rule.ignore_disabled_rule && ctx.is_disabled(&self.control_id) {
            return None;
        }
        let caret = replace_value_text(ctx, &self.control_id, date.trim())?;
        self.is_popup = false;
        Some(caret)
    }
}

impl ControlBehavior for DateControl {
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
