//! Zipper: rebuild compound elements from flat runs
//!
//! A single left-to-right scan. Groups are recognized by priority (area,
//! title, list, table, hyperlink, date, control); everything else collapses
//! into text runs of identical attributes.

use crate::config::EngineConfig;
use crate::model::{ControlComponent, ControlType, Element, ElementType};

use super::text::denormalize_break;

/// Compound form of `list`; the input is left untouched
pub fn zip_element_list(list: &[Element], config: &EngineConfig) -> Vec<Element> {
    let mut scratch = list.to_vec();
    zip_scratch(&mut scratch, config, true)
}

/// Replace `list` with its compound form without cloning elements
pub fn zip_element_list_in_place(list: &mut Vec<Element>, config: &EngineConfig) {
    let zipped = zip_scratch(list, config, true);
    *list = zipped;
}

/// Consumes the elements of `list`, leaving defaults behind
fn zip_scratch(list: &mut [Element], config: &EngineConfig, strip_anchor: bool) -> Vec<Element> {
    let mut zipped = Vec::new();
    let mut e = 0;
    while e < list.len() {
        let element = &list[e];
        if e == 0 && strip_anchor && is_leading_anchor(element) {
            e += 1;
            continue;
        }

        if let Some(area_id) = element.area_id.clone() {
            let end = group_end(list, e, |x| x.area_id.as_deref() == Some(area_id.as_str()));
            let area = element.area.clone();
            let mut inner = take_group(list, e, end, |x| {
                x.area_id = None;
                x.area = None;
            });
            zipped.push(Element {
                area_id: Some(area_id),
                area,
                ..Element::compound(ElementType::Area, zip_scratch(&mut inner, config, true))
            });
            e = end;
        } else if let (Some(title_id), level) = (element.title_id.clone(), element.level) {
            let end = group_end(list, e, |x| x.title_id.as_deref() == Some(title_id.as_str()));
            let default_size = level.map(|l| config.title.size_for(l));
            let mut inner = take_group(list, e, end, |x| {
                x.title_id = None;
                x.level = None;
                if level.is_some() {
                    if x.style.size == default_size {
                        x.style.size = None;
                    }
                    if x.style.bold == Some(true) {
                        x.style.bold = None;
                    }
                }
            });
            zipped.push(Element {
                title_id: Some(title_id),
                level,
                ..Element::compound(ElementType::Title, zip_scratch(&mut inner, config, true))
            });
            e = end;
        } else if let Some(list_id) = element.list_id.clone() {
            let end = group_end(list, e, |x| x.list_id.as_deref() == Some(list_id.as_str()));
            let (list_type, list_style) = (element.list_type, element.list_style);
            let mut inner = take_group(list, e, end, |x| {
                x.list_id = None;
                x.list_type = None;
                x.list_style = None;
            });
            zipped.push(Element {
                list_id: Some(list_id),
                list_type,
                list_style,
                ..Element::compound(ElementType::List, zip_scratch(&mut inner, config, true))
            });
            e = end;
        } else if element.element_type == Some(ElementType::Table) {
            e = zip_table(list, e, config, &mut zipped);
        } else if let Some(hyperlink_id) = element.hyperlink_id.clone() {
            let end = group_end(list, e, |x| {
                x.hyperlink_id.as_deref() == Some(hyperlink_id.as_str())
            });
            let url = element.url.clone();
            let mut inner = take_group(list, e, end, |x| {
                x.hyperlink_id = None;
                x.url = None;
                if x.element_type == Some(ElementType::Hyperlink) {
                    x.element_type = None;
                }
            });
            zipped.push(Element {
                hyperlink_id: Some(hyperlink_id),
                url,
                ..Element::compound(ElementType::Hyperlink, zip_scratch(&mut inner, config, false))
            });
            e = end;
        } else if let Some(date_id) = element.date_id.clone() {
            let end = group_end(list, e, |x| x.date_id.as_deref() == Some(date_id.as_str()));
            let date_format = element.date_format.clone();
            let mut inner = take_group(list, e, end, |x| {
                x.date_id = None;
                x.date_format = None;
                if x.element_type == Some(ElementType::Date) {
                    x.element_type = None;
                }
            });
            zipped.push(Element {
                date_id: Some(date_id),
                date_format,
                ..Element::compound(ElementType::Date, zip_scratch(&mut inner, config, false))
            });
            e = end;
        } else if let Some(end) = complete_run_end(list, e) {
            zipped.push(zip_control(list, e, end, config));
            e = end + 1;
        } else {
            e = zip_text(list, e, &mut zipped);
        }
    }
    zipped
}

/// A zero-width element at index 0 that only exists as the list anchor
fn is_leading_anchor(element: &Element) -> bool {
    element.is_zero() && !element.has_group_id() && ElementType::is_plain(element.element_type)
}

/// Exclusive end of the contiguous group starting at `start`
fn group_end(list: &[Element], start: usize, same: impl Fn(&Element) -> bool) -> usize {
    let mut end = start;
    while end < list.len() && same(&list[end]) {
        end += 1;
    }
    end
}

fn take_group(
    list: &mut [Element],
    start: usize,
    end: usize,
    strip: impl Fn(&mut Element),
) -> Vec<Element> {
    list[start..end]
        .iter_mut()
        .map(|x| {
            let mut element = std::mem::take(x);
            strip(&mut element);
            element
        })
        .collect()
}

/// Index of the last element of a control run that starts at `start` with a
/// prefix and contains a postfix before its id changes
fn complete_run_end(list: &[Element], start: usize) -> Option<usize> {
    let head = &list[start];
    if !head.is_component(ControlComponent::Prefix) || head.control.is_none() {
        return None;
    }
    let control_id = head.control_id.as_deref()?;
    let mut seen_postfix = false;
    let mut i = start;
    while i < list.len() && list[i].in_control(control_id) {
        seen_postfix |= list[i].is_component(ControlComponent::Postfix);
        i += 1;
    }
    if !seen_postfix {
        tracing::trace!(control_id, start, "incomplete control run left as fragments");
    }
    seen_postfix.then_some(i - 1)
}

fn zip_control(list: &mut [Element], start: usize, end: usize, config: &EngineConfig) -> Element {
    let head = std::mem::take(&mut list[start]);
    let mut control = head.control.map(|c| *c).unwrap_or_default();
    let mut values: Vec<Element> = list[start + 1..=end]
        .iter_mut()
        .filter(|x| x.is_component(ControlComponent::Value))
        .map(|x| {
            let mut value = std::mem::take(x);
            value.strip_control();
            value.style.clear_matching(&control.style);
            if value.row_flex == head.row_flex {
                value.row_flex = None;
            }
            value
        })
        .collect();

    let text: String = values
        .iter()
        .map(|v| denormalize_break(&v.value))
        .collect();
    let projected = control
        .code
        .as_deref()
        .and_then(|code| control.projection(code));
    control.value = match control.control_type {
        ControlType::Checkbox | ControlType::Radio => None,
        ControlType::Select if projected.as_deref() == Some(text.as_str()) => None,
        _ if values.is_empty() => None,
        _ => Some(zip_scratch(&mut values, config, false)),
    };

    Element {
        control_id: head.control_id,
        row_flex: head.row_flex,
        ..Element::control(control)
    }
}

/// Merge paging fragments, then zip every cell on its own
fn zip_table(list: &mut [Element], start: usize, config: &EngineConfig, zipped: &mut Vec<Element>) -> usize {
    let mut table = std::mem::take(&mut list[start]);
    let mut end = start + 1;
    if let Some(paging_id) = table.paging_id.take() {
        while end < list.len()
            && list[end].element_type == Some(ElementType::Table)
            && list[end].paging_id.as_deref() == Some(paging_id.as_str())
        {
            let part = std::mem::take(&mut list[end]);
            table.tr_list.extend(part.tr_list);
            end += 1;
        }
    }
    for tr in &mut table.tr_list {
        for td in &mut tr.td_list {
            let mut value = std::mem::take(&mut td.value);
            for x in &mut value {
                x.table_id = None;
                x.tr_id = None;
                x.td_id = None;
            }
            td.value = zip_scratch(&mut value, config, true);
        }
    }
    zipped.push(table);
    end
}

/// Whether the element at `i` would be emitted as plain text
fn is_text_piece(list: &[Element], i: usize) -> bool {
    let element = &list[i];
    if element.area_id.is_some()
        || element.title_id.is_some()
        || element.list_id.is_some()
        || element.hyperlink_id.is_some()
        || element.date_id.is_some()
        || element.element_type == Some(ElementType::Table)
        || element.value.is_empty()
    {
        return false;
    }
    if element.control_id.is_some() {
        return complete_run_end(list, i).is_none();
    }
    ElementType::is_plain(element.element_type)
}

/// Emit the element at `start`, merging the plain elements that follow it
fn zip_text(list: &mut [Element], start: usize, zipped: &mut Vec<Element>) -> usize {
    let mut element = std::mem::take(&mut list[start]);
    let mut e = start + 1;
    if element.control_id.is_some() {
        element.strip_control();
        if element.value.is_empty() {
            return e;
        }
    }
    if !ElementType::is_plain(element.element_type) {
        zipped.push(element);
        return e;
    }

    element.value = denormalize_break(&element.value);
    while e < list.len() && is_text_piece(list, e) {
        let mut next = std::mem::take(&mut list[e]);
        next.strip_control();
        if !ElementType::is_plain(next.element_type) || !element.same_except_value(&next) {
            list[e] = next;
            break;
        }
        element.value.push_str(&denormalize_break(&next.value));
        e += 1;
    }
    zipped.push(element);
    e
}
