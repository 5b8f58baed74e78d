//! Radio control: an option group with at most one checked option

use crate::messages::Key;
use crate::model::Element;

use super::checkbox::{
    cut_option, keydown_option, option_value, set_option_select, toggle_option, OptionKind,
};
use super::{ControlBehavior, ControlContext, ControlRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioControl {
    control_id: String,
}

impl RadioControl {
    pub fn new(control_id: impl Into<String>) -> Self {
        Self {
            control_id: control_id.into(),
        }
    }

    /// Check the option `code`; anything after a delimiter is ignored
    pub fn set_select(
        &mut self,
        code: &str,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        set_option_select(ctx, &self.control_id, OptionKind::Radio, code, rule)
    }

    /// Select the option whose marker sits at `index`
    pub fn toggle(
        &mut self,
        index: usize,
        ctx: &mut ControlContext<'_>,
        rule: ControlRule,
    ) -> Option<usize> {
        toggle_option(ctx, &self.control_id, OptionKind::Radio, index, rule)
    }
}

impl ControlBehavior for RadioControl {
    fn control_id(&self) -> &str {
        &self.control_id
    }

    fn value(&self, ctx: &ControlContext<'_>) -> Vec<Element> {
        option_value(ctx, &self.control_id, OptionKind::Radio)
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
        keydown_option(ctx, &self.control_id, OptionKind::Radio, key)
    }

    fn cut(&mut self, ctx: &mut ControlContext<'_>) -> Option<usize> {
        cut_option(ctx, &self.control_id, OptionKind::Radio)
    }
}
