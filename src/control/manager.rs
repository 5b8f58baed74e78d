//! Control manager: activation lifecycle and the control API of a session
//!
//! The manager never caches run indices. Each operation re-locates its run
//! by id, so batch updates stay consistent while earlier steps shift the
//! list under later ones.

use serde::{Deserialize, Serialize};

use crate::commands::{Cmd, RenderOptions};
use crate::error::ControlError;
use crate::events::{ControlEvent, ControlState};
use crate::format::{
    format_element_list, normalize_break, split_text, zip_element_list, zip_element_list_in_place,
    FormatOptions,
};
use crate::messages::Key;
use crate::model::{
    control_run_bounds, find_control_run, ControlComponent, ControlDescriptor, ControlType,
    DocumentData, Element, ElementType, GetValueOption, PositionContext, Range,
    SetPropertiesOption, SetValueOption, Zone,
};
use crate::session::EditorSession;

use super::{
    collect_values, remove_control, values_text, Control, ControlBehavior, ControlContext,
    ControlEffects, ControlRule, RunLayout,
};

/// The control that currently owns the caret
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveControl {
    pub control: Control,
    /// Whether an `active` event was emitted for the current visit.
    /// False while the caret rests on the postfix.
    pub announced: bool,
    /// Descriptor as last seen, reported once the run is gone
    pub descriptor: ControlDescriptor,
}

impl ActiveControl {
    pub fn control_id(&self) -> &str {
        self.control.control_id()
    }
}

/// Where [`EditorSession::location_control`] puts the caret
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationPosition {
    /// Just before the prefix
    Before,
    /// Just after the postfix
    After,
    /// At the end of the value, or after the head when empty
    #[default]
    Inside,
}

/// Value of one control as reported by [`EditorSession::value_by_id`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlValue {
    pub control_id: String,
    pub control_type: ControlType,
    /// Text for text/date/number, code for select/checkbox/radio
    pub value: Option<String>,
    /// Visible text; for option groups the labels of the checked options
    pub inner_text: Option<String>,
    pub zone: Zone,
    /// Value elements in compound form
    pub elements: Vec<Element>,
}

/// A control run somewhere in the document
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunSite {
    zone: Zone,
    position: PositionContext,
    control_id: String,
    start: usize,
}

fn scan_runs(
    list: &[Element],
    zone: Zone,
    position: PositionContext,
    matches: &impl Fn(&Element) -> bool,
    sites: &mut Vec<RunSite>,
) {
    let mut i = 0;
    while i < list.len() {
        let element = &list[i];
        if element.element_type == Some(ElementType::Table) && !position.is_table() {
            for (tr_index, tr) in element.tr_list.iter().enumerate() {
                for (td_index, td) in tr.td_list.iter().enumerate() {
                    let cell = PositionContext::in_cell(i, tr_index, td_index);
                    scan_runs(&td.value, zone, cell, matches, sites);
                }
            }
            i += 1;
            continue;
        }
        let Some((start, end)) = control_run_bounds(list, i) else {
            i += 1;
            continue;
        };
        if let Some(control_id) = list[start].control_id.as_ref().filter(|_| matches(&list[start])) {
            sites.push(RunSite {
                zone,
                position,
                control_id: control_id.clone(),
                start,
            });
        }
        i = end + 1;
    }
}

/// Every run whose head satisfies `matches`, in zone then document order
fn run_sites(document: &DocumentData, matches: impl Fn(&Element) -> bool) -> Vec<RunSite> {
    let mut sites = Vec::new();
    for zone in Zone::ALL {
        scan_runs(document.zone(zone), zone, PositionContext::default(), &matches, &mut sites);
    }
    sites
}

impl EditorSession {
    // === Activation ===

    /// Bring the active control in line with the caret.
    ///
    /// Entering a run emits `active`, unless the caret lands on the postfix.
    /// Resting on the postfix, leaving the run, or moving to another run
    /// emits `inactive` for an announced control.
    pub fn init_control(&mut self) {
        let Range {
            start_index,
            end_index,
        } = self.range;
        let list = self.element_list();
        let target = list.get(start_index).and_then(|element| {
            let control_id = element.control_id.clone()?;
            let descriptor = element.control.as_deref()?.clone();
            let same_end = list.get(end_index).is_some_and(|e| e.in_control(&control_id));
            same_end.then(|| {
                let on_postfix = element.is_component(ControlComponent::Postfix);
                (control_id, descriptor, on_postfix)
            })
        });
        let Some((control_id, descriptor, on_postfix)) = target else {
            self.destroy_control();
            return;
        };

        let reuse = self.active.as_ref().is_some_and(|active| {
            active.control_id() == control_id
                && active.control.control_type() == descriptor.control_type
        });
        if reuse {
            if let Some(active) = self.active.as_mut() {
                active.descriptor = descriptor;
            }
        } else {
            self.destroy_control();
            self.active = Some(ActiveControl {
                control: Control::new(descriptor.control_type, control_id),
                announced: false,
                descriptor,
            });
        }

        if on_postfix {
            self.leave_control();
        } else {
            self.announce_control();
        }
    }

    fn announce_control(&mut self) {
        let Some((active, ctx)) = self.split_active() else {
            return;
        };
        if active.announced {
            return;
        }
        active.control.awake(&ctx);
        active.announced = true;
        let event = ControlEvent::ControlChange {
            state: ControlState::Active,
            control: active.descriptor.clone(),
            control_id: active.control_id().to_string(),
        };
        tracing::debug!(target: "control", control_id = event.control_id(), "active");
        self.events.push(event);
    }

    fn leave_control(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.announced {
            return;
        }
        active.announced = false;
        active.control.destroy();
        let event = ControlEvent::ControlChange {
            state: ControlState::Inactive,
            control: active.descriptor.clone(),
            control_id: active.control_id().to_string(),
        };
        tracing::debug!(target: "control", control_id = event.control_id(), "inactive");
        self.events.push(event);
    }

    /// Drop the active control, emitting `inactive` if it was announced
    pub fn destroy_control(&mut self) {
        self.leave_control();
        if let Some(mut active) = self.active.take() {
            active.control.destroy();
        }
    }

    pub fn active_control(&self) -> Option<&ActiveControl> {
        self.active.as_ref()
    }

    // === Guards ===

    /// Both ends of the range sit inside one run, and not on its postfix
    pub fn is_range_within_control(&self) -> bool {
        let list = self.element_list();
        let (Some(start), Some(end)) = (
            list.get(self.range.start_index),
            list.get(self.range.end_index),
        ) else {
            return false;
        };
        match start.control_id.as_deref() {
            Some(control_id) => end.in_control(control_id) && !end.is_component(ControlComponent::Postfix),
            None => false,
        }
    }

    /// The selection starts or ends inside a run it does not fully cover
    pub fn is_part_range_in_control_outside(&self) -> bool {
        if self.range.is_collapsed() {
            return false;
        }
        let list = self.element_list();
        let inside = |index: usize| {
            list.get(index)
                .filter(|e| !e.is_component(ControlComponent::Postfix))
                .and_then(|e| e.control_id.as_deref())
        };
        let start = inside(self.range.start_index);
        let end = inside(self.range.end_index);
        (start.is_some() || end.is_some()) && start != end
    }

    /// The caret's control refuses writes in the current mode
    pub fn is_disabled_control(&self) -> bool {
        if self.mode == crate::config::EditorMode::Design {
            return false;
        }
        self.element_list()
            .get(self.range.start_index)
            .and_then(|e| e.control.as_deref())
            .is_some_and(|c| c.is_disabled())
    }

    // === Queries ===

    /// The whole run around the caret
    pub fn control_element_list(&self) -> Option<&[Element]> {
        let list = self.element_list();
        let (start, end) = control_run_bounds(list, self.range.start_index)?;
        Some(&list[start..=end])
    }

    /// Values of every control matching `option`, across zones and cells
    pub fn value_by_id(&self, option: &GetValueOption) -> Vec<ControlValue> {
        let mut values = Vec::new();
        for site in run_sites(&self.document, |head| option.matches(head)) {
            let list = self.document.active_list(site.zone, &site.position);
            let Some(layout) = RunLayout::locate(list, &site.control_id, site.start) else {
                continue;
            };
            let Some(control) = list[layout.start].control.as_deref() else {
                continue;
            };
            let elements = collect_values(list, &layout);
            let text = Some(values_text(&elements)).filter(|t| !t.is_empty());
            let (value, inner_text) = match control.control_type {
                ControlType::Text | ControlType::Date | ControlType::Number => (text.clone(), text),
                ControlType::Select => (control.code.clone(), text),
                ControlType::Checkbox | ControlType::Radio => {
                    let labels: Vec<&str> = control
                        .code_list()
                        .into_iter()
                        .filter_map(|code| control.label_for(code))
                        .collect();
                    let labels = Some(labels.join(control.delimiter())).filter(|l| !l.is_empty());
                    (control.code.clone(), labels)
                }
            };
            values.push(ControlValue {
                control_id: site.control_id,
                control_type: control.control_type,
                value,
                inner_text,
                zone: site.zone,
                elements: zip_element_list(&elements, &self.config),
            });
        }
        values
    }

    /// Every control of the document in compound form
    pub fn control_list(&self) -> Vec<Element> {
        run_sites(&self.document, |_| true)
            .into_iter()
            .filter_map(|site| {
                let list = self.document.active_list(site.zone, &site.position);
                let (start, end) = find_control_run(list, &site.control_id, site.start)?;
                zip_element_list(&list[start..=end], &self.config)
                    .into_iter()
                    .find(|e| e.element_type == Some(ElementType::Control))
            })
            .collect()
    }

    // === Behavior dispatch ===

    /// Run `op` on the active behavior, then apply its side effects
    fn run_active<T>(
        &mut self,
        op: impl FnOnce(&mut Control, &mut ControlContext<'_>) -> T,
    ) -> Result<(T, ControlEffects), ControlError> {
        let (active, mut ctx) = self.split_active().ok_or(ControlError::ActiveControlNull)?;
        let control_id = active.control_id();
        if find_control_run(ctx.elements, control_id, ctx.range.start_index).is_none() {
            return Err(ControlError::ControlNotFound(control_id.to_string()));
        }
        #[cfg(debug_assertions)]
        let before = crate::tracing::RunSnapshot::capture(ctx.elements, control_id, ctx.range.start_index);

        let result = op(&mut active.control, &mut ctx);

        #[cfg(debug_assertions)]
        if let Some(before) = before {
            let after = crate::tracing::RunSnapshot::capture(ctx.elements, &before.control_id, ctx.range.start_index);
            if let Some(diff) = before.diff(after.as_ref()) {
                tracing::trace!(target: "control", %diff, "run changed");
            }
        }

        let effects = ctx.effects;
        self.apply_effects(effects);
        Ok((result, effects))
    }

    fn apply_effects(&mut self, effects: ControlEffects) {
        // only the step that emptied the run is folded away
        if effects.rewind_history && self.rewind_armed {
            self.pop_undo();
        }
        if effects.content_changed {
            self.emit_content_change();
        }
    }

    /// Report the active run's new content, or drop the control if the
    /// run was deleted
    fn emit_content_change(&mut self) {
        let Some(control_id) = self.active.as_ref().map(|a| a.control_id().to_string()) else {
            return;
        };
        let list = self.element_list();
        let descriptor = find_control_run(list, &control_id, self.range.start_index)
            .and_then(|(start, _)| list[start].control.as_deref().cloned());
        match descriptor {
            Some(descriptor) => {
                if let Some(active) = self.active.as_mut() {
                    active.descriptor = descriptor.clone();
                }
                self.events.push(ControlEvent::ControlContentChange {
                    control: descriptor,
                    control_id,
                });
            }
            None => {
                tracing::debug!(target: "control", %control_id, "run removed");
                self.destroy_control();
            }
        }
    }

    /// Apply a behavior call and render at the caret it returns.
    /// History is recorded only when content changed.
    pub(crate) fn commit_active(
        &mut self,
        op: impl FnOnce(&mut Control, &mut ControlContext<'_>) -> Option<usize>,
    ) -> Option<Cmd> {
        let (caret, effects) = self.run_active(op).ok()?;
        let caret = caret?;
        let cmd = self.render(RenderOptions {
            cur_index: Some(caret),
            is_submit_history: effects.content_changed,
            is_set_cursor: true,
        });
        self.rewind_armed = effects.content_changed && effects.placeholder_restored;
        Some(cmd)
    }

    pub fn control_value(&mut self) -> Result<Vec<Element>, ControlError> {
        self.run_active(|control, ctx| control.value(ctx))
            .map(|(value, _)| value)
    }

    pub fn control_set_value(
        &mut self,
        data: Vec<Element>,
        rule: ControlRule,
    ) -> Result<Option<usize>, ControlError> {
        self.run_active(|control, ctx| control.set_value(data, ctx, rule))
            .map(|(caret, _)| caret)
    }

    pub fn control_clear_value(&mut self, rule: ControlRule) -> Result<Option<usize>, ControlError> {
        self.run_active(|control, ctx| control.clear_value(ctx, rule))
            .map(|(caret, _)| caret)
    }

    pub fn control_keydown(&mut self, key: Key) -> Result<Option<usize>, ControlError> {
        self.run_active(|control, ctx| control.keydown(key, ctx))
            .map(|(caret, _)| caret)
    }

    pub fn control_cut(&mut self) -> Result<Option<usize>, ControlError> {
        self.run_active(|control, ctx| control.cut(ctx))
            .map(|(caret, _)| caret)
    }

    pub fn control_set_select(
        &mut self,
        code: &str,
        rule: ControlRule,
    ) -> Result<Option<usize>, ControlError> {
        self.run_active(|control, ctx| control.set_select(code, ctx, rule))
            .map(|(caret, _)| caret)
    }

    pub fn control_toggle(&mut self, index: usize, rule: ControlRule) -> Result<Option<usize>, ControlError> {
        self.run_active(|control, ctx| control.toggle(index, ctx, rule))
            .map(|(caret, _)| caret)
    }

    /// Apply a code or date to the active control
    pub fn set_select(&mut self, code: &str) -> Option<Cmd> {
        if self.mode.is_readonly() || self.active.is_none() {
            return None;
        }
        self.commit_active(|control, ctx| control.set_select(code, ctx, ControlRule::default()))
    }

    /// Flip the option marker at `index` of the active control
    pub fn toggle_option(&mut self, index: usize) -> Option<Cmd> {
        if self.mode.is_readonly() || self.active.is_none() {
            return None;
        }
        self.commit_active(|control, ctx| control.toggle(index, ctx, ControlRule::default()))
    }

    // === Run mutation ===

    /// Delete the whole run containing `index`. `None` when the deletion
    /// policy refuses.
    pub fn remove_control(&mut self, index: usize) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        let control_id = self.element_list().get(index)?.control_id.clone()?;
        let elements = self.document.active_list_mut(self.zone, &self.position_context);
        let mut ctx = ControlContext::new(elements, self.range, self.mode, &self.config);
        let caret = remove_control(&mut ctx, index)?;
        tracing::debug!(target: "control", %control_id, "removed");
        if self.active.as_ref().is_some_and(|a| a.control_id() == control_id) {
            self.destroy_control();
        }
        Some(self.render(RenderOptions::cursor(caret)))
    }

    /// Write one value into the run at `site`; returns whether it changed
    fn apply_value(&mut self, site: &RunSite, value: &str) -> bool {
        let elements = self.document.active_list_mut(site.zone, &site.position);
        let Some(layout) = RunLayout::locate(elements, &site.control_id, site.start) else {
            return false;
        };
        let Some(control_type) = elements[layout.start].control.as_ref().map(|c| c.control_type) else {
            return false;
        };
        let is_text_like = matches!(
            control_type,
            ControlType::Text | ControlType::Number | ControlType::Date
        );
        if is_text_like && values_text(&collect_values(elements, &layout)) == value {
            return false;
        }

        let mut control = Control::new(control_type, site.control_id.clone());
        let rule = ControlRule {
            ignore_disabled_rule: true,
            ignore_deleted_rule: false,
        };
        let range = Range::new(layout.head_end, layout.tail_start - 1);
        let mut ctx = ControlContext::new(elements, range, self.mode, &self.config);
        match control_type {
            ControlType::Text | ControlType::Number if value.is_empty() => {
                control.clear_value(&mut ctx, rule);
            }
            ControlType::Text | ControlType::Number => {
                let data = split_text(value)
                    .into_iter()
                    .map(|grapheme| Element::text(normalize_break(grapheme)))
                    .collect();
                control.set_value(data, &mut ctx, rule);
            }
            _ => {
                control.set_select(value, &mut ctx, rule);
            }
        }
        ctx.effects.content_changed
    }

    /// Batch value injection. Matching runs get a content-change event
    /// but no activation events. `None` when nothing changed.
    pub fn set_value_list_by_id(&mut self, options: Vec<SetValueOption>) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        let mut changed = false;
        let mut submit = false;
        for option in &options {
            let matches = |head: &Element| option.target.matches(head);
            let mut sites = run_sites(&self.document, matches);
            let mut next = 0;
            while let Some(site) = sites.get(next).cloned() {
                next += 1;
                if !self.apply_value(&site, &option.value) {
                    continue;
                }
                // a write shifts later runs and the tables holding them
                sites = run_sites(&self.document, matches);
                changed = true;
                submit |= option.is_submit_history;
                let list = self.document.active_list(site.zone, &site.position);
                if let Some(control) = find_control_run(list, &site.control_id, site.start)
                    .and_then(|(start, _)| list[start].control.as_deref().cloned())
                {
                    self.events.push(ControlEvent::ControlContentChange {
                        control,
                        control_id: site.control_id.clone(),
                    });
                }
            }
        }
        tracing::debug!(target: "control", count = options.len(), changed, "set value list");
        if !changed {
            return None;
        }
        self.settle_after_batch();
        Some(self.finish_batch(submit))
    }

    /// Batch property patch followed by a full re-layout of every zone.
    /// `None` when no descriptor changed.
    pub fn set_properties_list_by_id(&mut self, options: Vec<SetPropertiesOption>) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        let mut changed = false;
        let mut submit = false;
        for option in &options {
            for site in run_sites(&self.document, |head| option.target.matches(head)) {
                let elements = self.document.active_list_mut(site.zone, &site.position);
                let Some((start, end)) = find_control_run(elements, &site.control_id, site.start) else {
                    continue;
                };
                let Some(mut descriptor) = elements[start].control.as_deref().cloned() else {
                    continue;
                };
                let before = descriptor.clone();
                option.properties.apply(&mut descriptor);
                if descriptor == before {
                    continue;
                }
                for element in &mut elements[start..=end] {
                    element.control = Some(Box::new(descriptor.clone()));
                }
                changed = true;
                submit |= option.is_submit_history;
            }
        }
        tracing::debug!(target: "control", count = options.len(), changed, "set properties list");
        if !changed {
            return None;
        }
        self.force_update();
        self.settle_after_batch();
        Some(self.finish_batch(submit))
    }

    /// Re-zip and re-expand every zone
    fn force_update(&mut self) {
        let options = FormatOptions::new(&self.config);
        for zone in Zone::ALL {
            let list = self.document.zone_mut(zone);
            zip_element_list_in_place(list, &self.config);
            format_element_list(list, &options, &mut self.ids);
        }
        if let Some(path) = self.position_context.table {
            if !path.is_valid(self.document.zone(self.zone)) {
                self.position_context = PositionContext::default();
            }
        }
    }

    /// Keep the caret in bounds and the active control's descriptor current
    /// after indices shifted underneath them
    fn settle_after_batch(&mut self) {
        let len = self.element_list().len();
        self.range = self.range.clamp(len);
        let Some(control_id) = self.active.as_ref().map(|a| a.control_id().to_string()) else {
            return;
        };
        let list = self.element_list();
        let descriptor = find_control_run(list, &control_id, self.range.start_index)
            .and_then(|(start, _)| list[start].control.as_deref().cloned());
        match descriptor {
            Some(descriptor) => {
                if let Some(active) = self.active.as_mut() {
                    active.descriptor = descriptor;
                }
            }
            None => self.destroy_control(),
        }
    }

    fn finish_batch(&mut self, submit: bool) -> Cmd {
        if !submit {
            self.recover_history();
        }
        self.render(RenderOptions::detached(submit))
    }

    // === Navigation ===

    /// Move the caret relative to the run `control_id`, in any zone
    pub fn location_control(&mut self, control_id: &str, position: LocationPosition) -> Option<Cmd> {
        let site = run_sites(&self.document, |head| head.in_control(control_id))
            .into_iter()
            .next()?;
        let list = self.document.active_list(site.zone, &site.position);
        let layout = RunLayout::locate(list, control_id, site.start)?;
        let index = match position {
            LocationPosition::Before => layout.start.saturating_sub(1),
            LocationPosition::After => layout.end,
            LocationPosition::Inside if collect_values(list, &layout).is_empty() => layout.head_end,
            LocationPosition::Inside => layout.tail_start - 1,
        };
        if site.zone != self.zone || site.position != self.position_context {
            self.destroy_control();
            self.zone = site.zone;
            self.position_context = site.position;
        }
        self.range = Range::collapsed(index);
        self.init_control();
        Some(Cmd::Render(RenderOptions {
            cur_index: Some(index),
            is_submit_history: false,
            is_set_cursor: true,
        }))
    }
}
