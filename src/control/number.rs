//! Number control: character editing without a popup

use crate::messages::Key;
use crate::model::Element;

use super::text::{clear_text_value, cut_text, keydown_text, set_text_value, text_value};
use super::{ControlBehavior, ControlContext, ControlRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberControl {
    control_id: String,
}

impl NumberControl {
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
        }
    }
}

impl ControlBehavior for NumberControl {
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
