//! Editing session: all mutable state of one logical document
//!
//! Every mutation takes `&mut self` and runs to completion. Behaviors borrow
//! the active element list for the duration of one call through
//! [`EditorSession::split_active`].

use crate::commands::{Cmd, RenderOptions};
use crate::config::{EditorMode, EngineConfig};
use crate::control::{
    ActiveControl, ControlBehavior, ControlContext, ControlHighlight, ControlRule, ControlSearch,
    HighlightMatch,
};
use crate::events::{ControlEvent, EventQueue};
use crate::format::{
    format_element_context, format_element_list, normalize_break, split_text,
    zip_element_list, ContextOptions, FormatOptions,
};
use crate::history::{DocumentSnapshot, HistoryProvider, SnapshotHistory};
use crate::messages::Key;
use crate::model::{
    splice_element_list, DocumentData, Element, ElementType, IdGenerator, PositionContext, Range,
    SpliceOptions, Zone,
};

#[derive(Debug)]
pub struct EditorSession {
    pub(crate) document: DocumentData,
    pub(crate) zone: Zone,
    pub(crate) position_context: PositionContext,
    pub(crate) range: Range,
    pub(crate) mode: EditorMode,
    pub(crate) config: EngineConfig,
    pub(crate) active: Option<ActiveControl>,
    pub(crate) events: EventQueue,
    pub(crate) ids: IdGenerator,
    pub(crate) search: ControlSearch,
    /// The last commit put a placeholder back; typing next folds that step
    pub(crate) rewind_armed: bool,
    history: Box<dyn HistoryProvider>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EditorSession {
    /// Empty document: each zone holds only its anchor
    pub fn new(config: EngineConfig) -> Self {
        Self::with_document(DocumentData::default(), config)
    }

    /// Session over compound `document`, expanded zone by zone
    pub fn with_document(mut document: DocumentData, config: EngineConfig) -> Self {
        let mut ids = IdGenerator::default();
        for zone in Zone::ALL {
            format_element_list(document.zone_mut(zone), &FormatOptions::new(&config), &mut ids);
        }
        let history = Box::new(SnapshotHistory::with_max_size(config.history.max_size));
        let mut session = Self {
            document,
            zone: Zone::Main,
            position_context: PositionContext::default(),
            range: Range::default(),
            mode: config.mode,
            config,
            active: None,
            events: EventQueue::default(),
            ids,
            search: ControlSearch::default(),
            rewind_armed: false,
            history,
        };
        let baseline = session.snapshot();
        session.history.submit(baseline);
        session
    }

    /// Replace the history provider; the current state becomes its baseline
    pub fn with_history(mut self, history: Box<dyn HistoryProvider>) -> Self {
        self.history = history;
        let baseline = self.snapshot();
        self.history.submit(baseline);
        self
    }

    // === Accessors ===

    pub fn document(&self) -> &DocumentData {
        &self.document
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn position_context(&self) -> PositionContext {
        self.position_context
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn history(&self) -> &dyn HistoryProvider {
        self.history.as_ref()
    }

    /// The list the caret addresses
    pub fn element_list(&self) -> &Vec<Element> {
        self.document.active_list(self.zone, &self.position_context)
    }

    pub(crate) fn element_list_mut(&mut self) -> &mut Vec<Element> {
        self.document.active_list_mut(self.zone, &self.position_context)
    }

    /// Compound form of every zone
    pub fn zipped(&self) -> DocumentData {
        DocumentData {
            header: zip_element_list(&self.document.header, &self.config),
            main: zip_element_list(&self.document.main, &self.config),
            footer: zip_element_list(&self.document.footer, &self.config),
        }
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Take every queued control event, oldest first
    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        self.events.drain()
    }

    pub fn set_highlight_list(&mut self, highlight_list: Vec<ControlHighlight>) {
        self.search.set_highlight_list(highlight_list);
    }

    pub fn compute_highlight_list(&self) -> Vec<HighlightMatch> {
        self.search.compute_highlight_list(&self.document)
    }

    /// Behavior of the active control together with a context over the
    /// active list. Borrows disjoint fields of the session.
    pub(crate) fn split_active(&mut self) -> Option<(&mut ActiveControl, ControlContext<'_>)> {
        let active = self.active.as_mut()?;
        let elements = self.document.active_list_mut(self.zone, &self.position_context);
        let ctx = ControlContext::new(elements, self.range, self.mode, &self.config);
        Some((active, ctx))
    }

    // === History & render ===

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            document: self.document.clone(),
            zone: self.zone,
            position_context: self.position_context,
            range: self.range,
        }
    }

    pub(crate) fn pop_undo(&mut self) {
        self.history.pop_undo();
    }

    pub(crate) fn recover_history(&mut self) {
        let snapshot = self.snapshot();
        self.history.recovery(snapshot);
    }

    /// Apply the caret and history side of a render and return the command
    /// the host repaints on
    pub fn render(&mut self, options: RenderOptions) -> Cmd {
        self.rewind_armed = false;
        if options.is_set_cursor {
            if let Some(index) = options.cur_index {
                let len = self.element_list().len();
                self.range = Range::collapsed(index).clamp(len);
            }
        }
        if options.is_submit_history {
            let snapshot = self.snapshot();
            self.history.submit(snapshot);
        }
        if options.is_set_cursor {
            self.init_control();
        }
        tracing::trace!(?options, range = ?self.range, "render");
        Cmd::Render(options)
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.destroy_control();
        self.document = snapshot.document;
        self.zone = snapshot.zone;
        self.position_context = snapshot.position_context;
        let len = self.element_list().len();
        self.range = snapshot.range.clamp(len);
        self.init_control();
    }

    pub fn undo(&mut self) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        let snapshot = self.history.undo()?;
        self.restore(snapshot);
        Some(Cmd::Render(RenderOptions {
            cur_index: Some(self.range.start_index),
            is_submit_history: false,
            is_set_cursor: true,
        }))
    }

    pub fn redo(&mut self) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        let snapshot = self.history.redo()?;
        self.restore(snapshot);
        Some(Cmd::Render(RenderOptions {
            cur_index: Some(self.range.start_index),
            is_submit_history: false,
            is_set_cursor: true,
        }))
    }

    // === Caret ===

    /// Place the caret; activates or deactivates controls as it moves
    pub fn set_range(&mut self, start_index: usize, end_index: usize) {
        let len = self.element_list().len();
        let range = Range::new(start_index, end_index).clamp(len);
        if range != self.range {
            self.rewind_armed = false;
        }
        self.range = range;
        self.init_control();
    }

    pub fn set_zone(&mut self, zone: Zone) {
        if zone == self.zone {
            return;
        }
        self.destroy_control();
        self.zone = zone;
        self.position_context = PositionContext::default();
        self.range = Range::default();
        self.init_control();
    }

    /// Enter a table cell, or leave it with the default context. An
    /// invalid cell path is ignored.
    pub fn set_position_context(&mut self, position_context: PositionContext) {
        if let Some(path) = position_context.table {
            if !path.is_valid(self.document.zone(self.zone)) {
                tracing::debug!(?path, "ignoring invalid cell path");
                return;
            }
        }
        self.destroy_control();
        self.position_context = position_context;
        self.range = Range::default();
        self.init_control();
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "mode");
        self.mode = mode;
        if mode.is_readonly() {
            self.destroy_control();
        }
    }

    // === Editing ===

    /// Whether an edit outside any control is allowed at the current range
    fn can_edit_outside(&self) -> bool {
        !self.mode.is_readonly()
            && self.mode != EditorMode::Form
            && !self.is_part_range_in_control_outside()
    }

    fn splice_options(&self) -> SpliceOptions {
        SpliceOptions {
            ignore_deleted_rule: false,
            is_design_mode: self.mode == EditorMode::Design,
        }
    }

    /// Insert a compound element list at the selection
    pub fn insert_element_list(&mut self, payload: Vec<Element>) -> Option<Cmd> {
        if self.mode.is_readonly() || payload.is_empty() {
            return None;
        }
        let mut payload = payload;
        let options = FormatOptions::new(&self.config).nested();
        format_element_list(&mut payload, &options, &mut self.ids);

        if self.active.is_some() && self.is_range_within_control() {
            let data: Vec<Element> = payload
                .into_iter()
                .filter(|e| e.control_id.is_none())
                .collect();
            return self.commit_active(|control, ctx| {
                control.set_value(data, ctx, ControlRule::default())
            });
        }
        self.insert_outside(payload)
    }

    /// Insert typed or pasted text at the selection
    pub fn input(&mut self, text: &str) -> Option<Cmd> {
        if self.mode.is_readonly() || text.is_empty() {
            return None;
        }
        let data: Vec<Element> = split_text(text)
            .into_iter()
            .map(|grapheme| Element::text(normalize_break(grapheme)))
            .collect();

        if self.active.is_some() && self.is_range_within_control() {
            return self.commit_active(|control, ctx| {
                control.set_value(data, ctx, ControlRule::default())
            });
        }

        // Typed text takes the style of the text or link it follows
        let anchor = self.element_list().get(self.range.start_index).cloned();
        let data = data
            .into_iter()
            .map(|mut element| {
                if let Some(anchor) = anchor.as_ref().filter(|a| {
                    a.control_id.is_none()
                        && (ElementType::is_plain(a.element_type)
                            || a.hyperlink_id.is_some()
                            || a.date_id.is_some())
                }) {
                    element.style = anchor.style.clone();
                }
                element
            })
            .collect();
        self.insert_outside(data)
    }

    /// Splice already-flat `payload` over the selection
    fn insert_outside(&mut self, mut payload: Vec<Element>) -> Option<Cmd> {
        if !self.can_edit_outside() {
            return None;
        }
        let Range {
            start_index,
            end_index,
        } = self.range;
        let options = self.splice_options();
        let list = self.document.active_list_mut(self.zone, &self.position_context);
        format_element_context(
            list,
            &mut payload,
            start_index,
            ContextOptions {
                is_break_when_wrap: true,
            },
        );
        let len = payload.len();
        splice_element_list(list, start_index + 1, end_index - start_index, payload, options);
        Some(self.render(RenderOptions::cursor(start_index + len)))
    }

    /// Handle an editing key at the selection
    pub fn keydown(&mut self, key: Key) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        if self.active.is_some() && self.is_range_within_control() {
            return self.commit_active(|control, ctx| control.keydown(key, ctx));
        }
        if !self.can_edit_outside() {
            return None;
        }

        let Range {
            start_index,
            end_index,
        } = self.range;
        let collapsed = self.range.is_collapsed();
        match key {
            Key::Backspace | Key::Delete if !collapsed => self.delete_outside(),
            Key::Backspace => {
                if start_index == 0 {
                    return None;
                }
                let at = &self.element_list()[start_index];
                if at.control_id.is_some() {
                    return self.remove_control(start_index);
                }
                let options = self.splice_options();
                splice_element_list(self.element_list_mut(), start_index, 1, Vec::new(), options);
                Some(self.render(RenderOptions::cursor(start_index - 1)))
            }
            Key::Delete => {
                let next = self.element_list().get(end_index + 1)?;
                if next.control_id.is_some() {
                    return self.remove_control(end_index + 1);
                }
                let options = self.splice_options();
                splice_element_list(self.element_list_mut(), end_index + 1, 1, Vec::new(), options);
                Some(self.render(RenderOptions::cursor(start_index)))
            }
            Key::Enter => self.insert_outside(vec![Element::zero()]),
        }
    }

    /// Delete the selection
    pub fn cut(&mut self) -> Option<Cmd> {
        if self.mode.is_readonly() {
            return None;
        }
        if self.active.is_some() && self.is_range_within_control() {
            return self.commit_active(|control, ctx| control.cut(ctx));
        }
        if !self.can_edit_outside() || self.range.is_collapsed() {
            return None;
        }
        self.delete_outside()
    }

    fn delete_outside(&mut self) -> Option<Cmd> {
        let range = self.range;
        let options = self.splice_options();
        let list = self.element_list_mut();
        let removed = splice_element_list(list, range.start_index + 1, range.len(), Vec::new(), options);
        if removed.is_empty() {
            return None;
        }
        Some(self.render(RenderOptions::cursor(range.start_index)))
    }

    /// Check group contiguity and the index-0 anchor of the active list
    #[cfg(debug_assertions)]
    pub fn assert_invariants_with_context(&self, context: &str) {
        let list = self.element_list();
        assert!(
            list.first().is_some_and(|e| e.is_zero() || e.list_id.is_some()),
            "[{}] active list lost its anchor",
            context
        );
        fn control_id(e: &Element) -> Option<&str> {
            e.control_id.as_deref()
        }
        fn hyperlink_id(e: &Element) -> Option<&str> {
            e.hyperlink_id.as_deref()
        }
        fn date_id(e: &Element) -> Option<&str> {
            e.date_id.as_deref()
        }
        // titles and lists may be split by a pasted line break
        let groups: [(&str, fn(&Element) -> Option<&str>); 3] = [
            ("control", control_id),
            ("hyperlink", hyperlink_id),
            ("date", date_id),
        ];
        for (name, id_of) in groups {
            let mut seen: Vec<&str> = Vec::new();
            let mut previous: Option<&str> = None;
            for element in list {
                let current = id_of(element);
                if current != previous {
                    if let Some(id) = current {
                        assert!(
                            !seen.contains(&id),
                            "[{}] {} group {} is not contiguous",
                            context,
                            name,
                            id
                        );
                        seen.push(id);
                    }
                }
                previous = current;
            }
        }
    }

    #[cfg(not(debug_assertions))]
    pub fn assert_invariants_with_context(&self, _context: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ControlComponent, ControlDescriptor, ControlType};

    fn session_with_text() -> EditorSession {
        let doc = DocumentData::from_main(vec![Element::text("hello")]);
        EditorSession::with_document(doc, EngineConfig::default())
    }

    fn main_text(session: &EditorSession) -> String {
        session.document().main.iter().map(|e| e.value.as_str()).collect()
    }

    #[test]
    fn test_new_session_has_anchors() {
        let session = EditorSession::default();
        for zone in Zone::ALL {
            assert_eq!(session.document().zone(zone).len(), 1);
            assert!(session.document().zone(zone)[0].is_zero());
        }
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_input_and_undo() {
        let mut session = session_with_text();
        session.set_range(5, 5);
        let cmd = session.input("!").unwrap();
        assert_eq!(cmd.render_options().cur_index, Some(6));
        assert_eq!(main_text(&session), "\u{200B}hello!");
        assert_eq!(session.range(), Range::collapsed(6));

        session.undo().unwrap();
        assert_eq!(main_text(&session), "\u{200B}hello");
        session.redo().unwrap();
        assert_eq!(main_text(&session), "\u{200B}hello!");
    }

    #[test]
    fn test_backspace_never_removes_anchor() {
        let mut session = session_with_text();
        session.set_range(0, 0);
        assert!(session.keydown(Key::Backspace).is_none());
        session.set_range(1, 1);
        session.keydown(Key::Backspace).unwrap();
        assert_eq!(main_text(&session), "\u{200B}ello");
        assert_eq!(session.range(), Range::collapsed(0));
    }

    #[test]
    fn test_selection_cut() {
        let mut session = session_with_text();
        session.set_range(1, 3);
        session.cut().unwrap();
        assert_eq!(main_text(&session), "\u{200B}hlo");
    }

    #[test]
    fn test_enter_inserts_break() {
        let mut session = session_with_text();
        session.set_range(2, 2);
        session.keydown(Key::Enter).unwrap();
        assert!(session.document().main[3].is_zero());
    }

    #[test]
    fn test_readonly_rejects_edits() {
        let mut session = session_with_text();
        session.set_mode(EditorMode::Readonly);
        session.set_range(5, 5);
        assert!(session.input("x").is_none());
        assert!(session.keydown(Key::Backspace).is_none());
        assert!(session.undo().is_none());
        assert_eq!(main_text(&session), "\u{200B}hello");
    }

    #[test]
    fn test_form_mode_edits_only_controls() {
        let control = ControlDescriptor {
            placeholder: Some("x".to_string()),
            ..ControlDescriptor::new(ControlType::Text)
        };
        let doc = DocumentData::from_main(vec![Element::text("a"), Element::control(control)]);
        let mut session = EditorSession::with_document(doc, EngineConfig::default());
        session.set_mode(EditorMode::Form);

        session.set_range(1, 1);
        assert!(session.input("b").is_none());

        // anchor a { <x> }
        session.set_range(2, 2);
        assert!(session.input("v").is_some());
        let value: String = session
            .document()
            .main
            .iter()
            .filter(|e| e.is_component(ControlComponent::Value))
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(value, "v");
    }

    #[test]
    fn test_insert_element_list_expands_payload() {
        let mut session = session_with_text();
        session.set_range(5, 5);
        let control = ControlDescriptor {
            placeholder: Some("p".to_string()),
            ..ControlDescriptor::new(ControlType::Text)
        };
        session.insert_element_list(vec![Element::control(control)]).unwrap();
        let list = &session.document().main;
        assert!(list[6].is_component(ControlComponent::Prefix));
        assert!(list[7].is_component(ControlComponent::Placeholder));
        assert!(list[8].is_component(ControlComponent::Postfix));
        assert_eq!(session.range(), Range::collapsed(8));
    }

    #[test]
    fn test_typing_inside_hyperlink_keeps_one_link() {
        let mut link = Element::compound(ElementType::Hyperlink, vec![Element::text("go")]);
        link.url = Some("https://example.com".to_string());
        let doc = DocumentData::from_main(vec![link]);
        let mut session = EditorSession::with_document(doc, EngineConfig::default());

        // anchor g | o
        session.set_range(1, 1);
        session.input("x").unwrap();
        let list = &session.document().main;
        assert_eq!(main_text(&session), "\u{200B}gxo");
        assert!(list[1..].iter().all(|e| e.hyperlink_id == list[1].hyperlink_id));
        assert_eq!(list[2].element_type, Some(ElementType::Hyperlink));
        assert_eq!(list[2].url.as_deref(), Some("https://example.com"));
        session.assert_invariants_with_context("typing inside hyperlink");

        let zipped = session.zipped();
        let links: Vec<&Element> = zipped
            .main
            .iter()
            .filter(|e| e.element_type == Some(ElementType::Hyperlink))
            .collect();
        assert_eq!(links.len(), 1);
        let text: String = links[0]
            .value_list
            .iter()
            .flatten()
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(text, "gxo");
    }

    #[test]
    fn test_typing_after_hyperlink_stays_outside() {
        let link = Element::compound(ElementType::Hyperlink, vec![Element::text("go")]);
        let doc = DocumentData::from_main(vec![link]);
        let mut session = EditorSession::with_document(doc, EngineConfig::default());

        session.set_range(2, 2);
        session.input("!").unwrap();
        let list = &session.document().main;
        assert!(list[3].hyperlink_id.is_none());
        assert_eq!(list[3].element_type, None);
    }

    #[test]
    fn test_set_zone_resets_caret() {
        let mut session = session_with_text();
        session.set_range(3, 3);
        session.set_zone(Zone::Footer);
        assert_eq!(session.zone(), Zone::Footer);
        assert_eq!(session.range(), Range::collapsed(0));
        assert_eq!(session.element_list().len(), 1);
    }
}
