//! Context propagation onto newly inserted elements

use crate::model::{Element, ElementType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// After a line break inside the payload, only table and row context applies
    pub is_break_when_wrap: bool,
}

/// The element whose context new content at `anchor_index` inherits.
///
/// A bare line break outside a list hands over to the element after it.
fn context_source(source: &[Element], anchor_index: usize) -> Option<&Element> {
    let anchor = source.get(anchor_index)?;
    if anchor.is_zero() && anchor.list_id.is_none() {
        if let Some(next) = source.get(anchor_index + 1) {
            if !next.is_zero() {
                return Some(next);
            }
        }
    }
    Some(anchor)
}

fn copy_table_context(target: &mut Element, from: &Element) {
    target.table_id.clone_from(&from.table_id);
    target.tr_id.clone_from(&from.tr_id);
    target.td_id.clone_from(&from.td_id);
}

fn copy_group_context(target: &mut Element, from: &Element) {
    target.title_id.clone_from(&from.title_id);
    target.level = from.level;
    target.list_id.clone_from(&from.list_id);
    target.list_type = from.list_type;
    target.list_style = from.list_style;
    target.area_id.clone_from(&from.area_id);
    target.area.clone_from(&from.area);
}

/// The hyperlink or date element at `anchor_index` when the element after
/// it belongs to the same group, so new content lands inside the group
fn inline_group(source: &[Element], anchor_index: usize) -> Option<&Element> {
    let anchor = source.get(anchor_index)?;
    let next = source.get(anchor_index + 1)?;
    let same_link = anchor.hyperlink_id.is_some() && anchor.hyperlink_id == next.hyperlink_id;
    let same_date = anchor.date_id.is_some() && anchor.date_id == next.date_id;
    (same_link || same_date).then_some(anchor)
}

fn copy_inline_group(target: &mut Element, from: &Element) {
    if !ElementType::is_plain(target.element_type) {
        return;
    }
    if from.hyperlink_id.is_some() {
        target.element_type = Some(ElementType::Hyperlink);
        target.hyperlink_id.clone_from(&from.hyperlink_id);
        target.url.clone_from(&from.url);
    } else {
        target.element_type = Some(ElementType::Date);
        target.date_id.clone_from(&from.date_id);
        target.date_format.clone_from(&from.date_format);
    }
}

/// Copy context attributes from the element at `anchor_index` of `source`
/// onto `targets`. Attributes the anchor lacks are removed from the targets.
/// Plain content inserted between two elements of one hyperlink or date
/// joins that group.
pub fn format_element_context(
    source: &[Element],
    targets: &mut [Element],
    anchor_index: usize,
    options: ContextOptions,
) {
    let Some(from) = context_source(source, anchor_index) else {
        return;
    };
    let group = inline_group(source, anchor_index);
    let mut after_break = false;
    for target in targets.iter_mut() {
        if let Some(group) = group {
            copy_inline_group(target, group);
        }
        copy_table_context(target, from);
        if !ElementType::is_block(target.element_type) {
            target.row_flex = from.row_flex;
        }
        if after_break && options.is_break_when_wrap {
            continue;
        }
        copy_group_context(target, from);
        if target.is_zero() {
            after_break = true;
        }
        if let Some(inner) = target.value_list.as_mut() {
            format_element_context(source, inner, anchor_index, options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RowFlex, TitleLevel};

    fn titled(value: &str) -> Element {
        Element {
            title_id: Some("t1".to_string()),
            level: Some(TitleLevel::First),
            row_flex: Some(RowFlex::Center),
            ..Element::text(value)
        }
    }

    #[test]
    fn test_copies_and_removes_context() {
        let source = vec![Element::zero(), titled("a")];
        let mut targets = vec![Element {
            list_id: Some("stale".to_string()),
            ..Element::text("x")
        }];
        format_element_context(&source, &mut targets, 1, ContextOptions::default());
        assert_eq!(targets[0].title_id.as_deref(), Some("t1"));
        assert_eq!(targets[0].row_flex, Some(RowFlex::Center));
        assert!(targets[0].list_id.is_none());
    }

    fn linked(value: &str) -> Element {
        Element {
            element_type: Some(ElementType::Hyperlink),
            hyperlink_id: Some("h1".to_string()),
            url: Some("https://example.com".to_string()),
            ..Element::text(value)
        }
    }

    #[test]
    fn test_insert_inside_hyperlink_joins_it() {
        let source = vec![Element::zero(), linked("g"), linked("o")];
        let mut targets = vec![Element::text("x")];
        format_element_context(&source, &mut targets, 1, ContextOptions::default());
        assert_eq!(targets[0].element_type, Some(ElementType::Hyperlink));
        assert_eq!(targets[0].hyperlink_id.as_deref(), Some("h1"));
        assert_eq!(targets[0].url.as_deref(), Some("https://example.com"));

        // at the end of the link the new text stays outside
        let mut targets = vec![Element::text("x")];
        format_element_context(&source, &mut targets, 2, ContextOptions::default());
        assert_eq!(targets[0].element_type, None);
        assert!(targets[0].hyperlink_id.is_none());
    }

    #[test]
    fn test_bare_break_uses_next_element() {
        let source = vec![Element::zero(), titled("a")];
        let mut targets = vec![Element::text("x")];
        format_element_context(&source, &mut targets, 0, ContextOptions::default());
        assert_eq!(targets[0].title_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_break_when_wrap_stops_group_context() {
        let source = vec![Element::zero(), titled("a")];
        let mut targets = vec![Element::text("x"), Element::zero(), Element::text("y")];
        let options = ContextOptions {
            is_break_when_wrap: true,
        };
        format_element_context(&source, &mut targets, 1, options);
        assert!(targets[1].title_id.is_some());
        assert!(targets[2].title_id.is_none());
        assert_eq!(targets[2].row_flex, Some(RowFlex::Center));
    }
}
