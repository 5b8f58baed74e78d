//! Formatter: rewrite compound elements into flat, tagged runs
//!
//! Expansion works in place on the caller's list. Already-flat input passes
//! through unchanged, so expanding twice equals expanding once.

use crate::config::EngineConfig;
use crate::model::{
    ControlComponent, ControlDescriptor, ControlType, Element, ElementType, IdGenerator,
    OptionState, RowFlex, TextStyle, ZERO,
};

use super::text::{normalize_break, split_text};

/// Options for [`format_element_list`]
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions<'a> {
    /// Insert a zero-width anchor at index 0 unless the list already has one
    pub is_handle_first_element: bool,
    /// Insert the anchor unconditionally
    pub is_force_compensation: bool,
    pub config: &'a EngineConfig,
}

impl<'a> FormatOptions<'a> {
    /// Options for a zone or table cell: anchor handling on
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            is_handle_first_element: true,
            is_force_compensation: false,
            config,
        }
    }

    /// Options for content nested inside another element
    pub fn nested(&self) -> Self {
        Self {
            is_handle_first_element: false,
            is_force_compensation: false,
            config: self.config,
        }
    }
}

/// Expand every compound element of `list` into flat runs
pub fn format_element_list(list: &mut Vec<Element>, options: &FormatOptions<'_>, ids: &mut IdGenerator) {
    if needs_anchor(list, options) {
        list.insert(0, Element::zero());
    }
    let source = std::mem::take(list);
    let mut flat = Vec::with_capacity(source.len());
    for element in source {
        expand_element(element, &mut flat, options, ids);
    }
    *list = flat;
}

fn needs_anchor(list: &[Element], options: &FormatOptions<'_>) -> bool {
    if options.is_force_compensation {
        return true;
    }
    if !options.is_handle_first_element {
        return false;
    }
    let Some(first) = list.first() else {
        return true;
    };
    if first.list_id.is_some() || first.element_type == Some(ElementType::List) {
        return false;
    }
    let opens_with_break = first.value.starts_with(ZERO) || first.value.starts_with('\n');
    !(ElementType::is_plain(first.element_type) && opens_with_break)
}

fn expand_element(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    match element.element_type {
        Some(ElementType::Control) if element.control_component.is_none() => {
            expand_control(element, flat, options, ids)
        }
        Some(ElementType::Title) => expand_title(element, flat, options, ids),
        Some(ElementType::List) => expand_list(element, flat, options, ids),
        Some(ElementType::Area) => expand_area(element, flat, options, ids),
        Some(ElementType::Hyperlink) if element.value_list.is_some() => {
            expand_hyperlink(element, flat, options, ids)
        }
        Some(ElementType::Date) if element.value_list.is_some() => {
            expand_date(element, flat, options, ids)
        }
        Some(ElementType::Table) => {
            expand_table(&mut element, options, ids);
            flat.push(element);
        }
        ty if ElementType::is_splittable(ty) => split_into(element, flat),
        _ => flat.push(element),
    }
}

/// One element per grapheme, line breaks normalized to the zero-width marker
fn split_into(element: Element, flat: &mut Vec<Element>) {
    let graphemes = split_text(&element.value);
    if graphemes.len() == 1 && normalize_break(graphemes[0]) == graphemes[0] {
        flat.push(element);
        return;
    }
    if graphemes.is_empty() {
        flat.push(element);
        return;
    }
    for grapheme in graphemes {
        let mut piece = element.clone();
        piece.value = normalize_break(grapheme).to_string();
        flat.push(piece);
    }
}

/// Nested content of a wrapper; a wrapper with only a `value` wraps that text
fn take_inner(element: &mut Element) -> Vec<Element> {
    match element.value_list.take() {
        Some(list) => list,
        None if element.value.is_empty() => Vec::new(),
        None => vec![Element::text(std::mem::take(&mut element.value))],
    }
}

/// Emits the elements of one control run
struct RunBuilder<'a> {
    control_id: String,
    descriptor: Box<ControlDescriptor>,
    row_flex: Option<RowFlex>,
    flat: &'a mut Vec<Element>,
}

impl RunBuilder<'_> {
    fn element(&self, component: ControlComponent, value: &str, style: TextStyle) -> Element {
        Element {
            value: value.to_string(),
            element_type: Some(ElementType::Control),
            style,
            row_flex: self.row_flex,
            control_id: Some(self.control_id.clone()),
            control: Some(self.descriptor.clone()),
            control_component: Some(component),
            ..Default::default()
        }
    }

    fn push_text(&mut self, component: ControlComponent, text: &str, style: &TextStyle) {
        for grapheme in split_text(text) {
            let element = self.element(component, normalize_break(grapheme), style.clone());
            self.flat.push(element);
        }
    }

    fn push_value(&mut self, mut element: Element) {
        element.style.fill_from(&self.descriptor.style);
        if element.element_type.is_none() {
            element.element_type = Some(ElementType::Control);
        }
        if element.row_flex.is_none() {
            element.row_flex = self.row_flex;
        }
        element.control_id = Some(self.control_id.clone());
        element.control = Some(self.descriptor.clone());
        element.control_component = Some(ControlComponent::Value);
        self.flat.push(element);
    }
}

fn expand_control(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    let Some(mut descriptor) = element.control.take() else {
        element.element_type = None;
        split_into(element, flat);
        return;
    };
    let config = &options.config.control;
    let control_id = element.control_id.take().unwrap_or_else(|| ids.next_id());
    let value = descriptor.value.take().filter(|v| !v.is_empty());
    let style = descriptor.style.clone();
    let bracket_style = style.with_color(&config.bracket_color);
    let control_type = descriptor.control_type;

    let values = match control_type {
        ControlType::Checkbox | ControlType::Radio => Vec::new(),
        ControlType::Select => value
            .or_else(|| {
                let code = descriptor.code.as_deref()?;
                descriptor.projection(code).map(|text| vec![Element::text(text)])
            })
            .unwrap_or_default(),
        _ => value.unwrap_or_default(),
    };

    let mut run = RunBuilder {
        control_id,
        descriptor,
        row_flex: element.row_flex,
        flat,
    };

    let prefix = run.descriptor.prefix.clone().unwrap_or_else(|| config.prefix.clone());
    run.push_text(ControlComponent::Prefix, &prefix, &bracket_style);
    if let Some(pre_text) = run.descriptor.pre_text.clone() {
        run.push_text(ControlComponent::PreText, &pre_text, &style);
    }

    if matches!(control_type, ControlType::Checkbox | ControlType::Radio) {
        expand_options(&mut run, &style, options.config);
    } else if !values.is_empty() {
        let mut values = values;
        format_element_list(&mut values, &options.nested(), ids);
        for value in values {
            // nested runs contribute only their value characters
            if value
                .control_component
                .is_some_and(|c| c != ControlComponent::Value)
            {
                continue;
            }
            run.push_value(value);
        }
    } else if let Some(placeholder) = run.descriptor.placeholder.clone() {
        let placeholder_style = style.with_color(&config.placeholder_color);
        run.push_text(ControlComponent::Placeholder, &placeholder, &placeholder_style);
    }

    if let Some(post_text) = run.descriptor.post_text.clone() {
        run.push_text(ControlComponent::PostText, &post_text, &style);
    }
    let postfix = run.descriptor.postfix.clone().unwrap_or_else(|| config.postfix.clone());
    run.push_text(ControlComponent::Postfix, &postfix, &bracket_style);
}

/// One marker per option followed by its label characters
fn expand_options(run: &mut RunBuilder<'_>, style: &TextStyle, config: &EngineConfig) {
    let is_radio = run.descriptor.control_type == ControlType::Radio;
    let (component, gap) = if is_radio {
        (ControlComponent::Radio, config.radio.gap)
    } else {
        (ControlComponent::Checkbox, config.checkbox.gap)
    };
    let mut codes: Vec<String> = run
        .descriptor
        .code_list()
        .into_iter()
        .map(str::to_string)
        .collect();
    if is_radio {
        codes.truncate(1);
    }

    for option in run.descriptor.value_sets.clone() {
        let mut marker = run.element(component, "", style.clone());
        let state = OptionState {
            value: codes.contains(&option.code),
            code: option.code,
        };
        if is_radio {
            marker.radio = Some(state);
        } else {
            marker.checkbox = Some(state);
        }
        run.flat.push(marker);

        let labels = split_text(&option.value);
        let last = labels.len().saturating_sub(1);
        for (i, grapheme) in labels.into_iter().enumerate() {
            let mut label =
                run.element(ControlComponent::Value, normalize_break(grapheme), style.clone());
            if i == last {
                label.letter_spacing = Some(gap);
            }
            run.flat.push(label);
        }
    }
}

fn expand_title(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    let title_id = element.title_id.take().unwrap_or_else(|| ids.next_id());
    let level = element.level;
    let mut inner = take_inner(&mut element);
    format_element_list(&mut inner, &options.nested(), ids);
    for mut el in inner {
        el.title_id = Some(title_id.clone());
        el.level = level;
        if let Some(level) = level {
            if el.style.size.is_none() {
                el.style.size = Some(options.config.title.size_for(level));
            }
            if el.style.bold.is_none() {
                el.style.bold = Some(true);
            }
        }
        flat.push(el);
    }
}

fn expand_list(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    let list_id = element.list_id.take().unwrap_or_else(|| ids.next_id());
    let mut inner = take_inner(&mut element);
    format_element_list(&mut inner, &FormatOptions::new(options.config), ids);
    for mut el in inner {
        el.list_id = Some(list_id.clone());
        el.list_type = element.list_type;
        el.list_style = element.list_style;
        flat.push(el);
    }
}

fn expand_area(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    let area_id = element.area_id.take().unwrap_or_else(|| ids.next_id());
    let mut inner = take_inner(&mut element);
    format_element_list(&mut inner, &options.nested(), ids);
    for mut el in inner {
        el.area_id = Some(area_id.clone());
        el.area.clone_from(&element.area);
        flat.push(el);
    }
}

fn expand_hyperlink(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    let hyperlink_id = element.hyperlink_id.take().unwrap_or_else(|| ids.next_id());
    let mut inner = take_inner(&mut element);
    format_element_list(&mut inner, &options.nested(), ids);
    for mut el in inner {
        el.element_type = Some(ElementType::Hyperlink);
        el.hyperlink_id = Some(hyperlink_id.clone());
        el.url.clone_from(&element.url);
        flat.push(el);
    }
}

fn expand_date(
    mut element: Element,
    flat: &mut Vec<Element>,
    options: &FormatOptions<'_>,
    ids: &mut IdGenerator,
) {
    let date_id = element.date_id.take().unwrap_or_else(|| ids.next_id());
    let mut inner = take_inner(&mut element);
    format_element_list(&mut inner, &options.nested(), ids);
    for mut el in inner {
        el.element_type = Some(ElementType::Date);
        el.date_id = Some(date_id.clone());
        el.date_format.clone_from(&element.date_format);
        flat.push(el);
    }
}

/// Expand every cell independently and tag its elements with the cell path ids
fn expand_table(table: &mut Element, options: &FormatOptions<'_>, ids: &mut IdGenerator) {
    let table_id = table.id.get_or_insert_with(|| ids.next_id()).clone();
    for tr in &mut table.tr_list {
        let tr_id = tr.id.get_or_insert_with(|| ids.next_id()).clone();
        for td in &mut tr.td_list {
            let td_id = td.id.get_or_insert_with(|| ids.next_id()).clone();
            format_element_list(&mut td.value, &FormatOptions::new(options.config), ids);
            for el in &mut td.value {
                el.table_id = Some(table_id.clone());
                el.tr_id = Some(tr_id.clone());
                el.td_id = Some(td_id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableRow, TitleLevel, ValueSet};

    fn expand(list: Vec<Element>) -> Vec<Element> {
        let config = EngineConfig::default();
        let mut ids = IdGenerator::new("t");
        let mut list = list;
        format_element_list(&mut list, &FormatOptions::new(&config), &mut ids);
        list
    }

    fn components(list: &[Element]) -> Vec<Option<ControlComponent>> {
        list.iter().map(|e| e.control_component).collect()
    }

    #[test]
    fn test_plain_text_is_split_with_anchor() {
        let list = expand(vec![Element::text("ab\ncd")]);
        let values: Vec<&str> = list.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec![ZERO, "a", "b", ZERO, "c", "d"]);
    }

    #[test]
    fn test_existing_anchor_is_kept() {
        let list = expand(vec![Element::text("\nab")]);
        assert_eq!(list.len(), 3);
        assert!(list[0].is_zero());
    }

    #[test]
    fn test_text_control_with_placeholder() {
        let control = ControlDescriptor {
            placeholder: Some("Name".to_string()),
            ..ControlDescriptor::new(ControlType::Text)
        };
        let list = expand(vec![Element::control(control)]);
        assert_eq!(list.len(), 7);
        assert_eq!(list[1].control_component, Some(ControlComponent::Prefix));
        assert!(list[2..6]
            .iter()
            .all(|e| e.is_component(ControlComponent::Placeholder)));
        assert_eq!(list[6].control_component, Some(ControlComponent::Postfix));
        assert_eq!(list[2].style.color.as_deref(), Some("#9c9b9b"));
        let id = list[1].control_id.clone();
        assert!(id.is_some());
        assert!(list[1..].iter().all(|e| e.control_id == id));
    }

    #[test]
    fn test_control_without_value_or_placeholder_is_bracket_only() {
        let list = expand(vec![Element::control(ControlDescriptor::new(ControlType::Number))]);
        assert_eq!(
            components(&list[1..]),
            vec![Some(ControlComponent::Prefix), Some(ControlComponent::Postfix)]
        );
    }

    #[test]
    fn test_select_code_is_projected() {
        let control = ControlDescriptor {
            code: Some("b".to_string()),
            value_sets: vec![ValueSet::new("a", "Apple"), ValueSet::new("b", "Banana")],
            pre_text: Some("F:".to_string()),
            ..ControlDescriptor::new(ControlType::Select)
        };
        let list = expand(vec![Element::control(control)]);
        let value: String = list
            .iter()
            .filter(|e| e.is_component(ControlComponent::Value))
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(value, "Banana");
        assert_eq!(list[2].control_component, Some(ControlComponent::PreText));
        assert!(list.iter().all(|e| e
            .control
            .as_ref()
            .map_or(true, |c| c.value.is_none())));
    }

    #[test]
    fn test_checkbox_markers_and_gap() {
        let control = ControlDescriptor {
            code: Some("2".to_string()),
            value_sets: vec![ValueSet::new("1", "ab"), ValueSet::new("2", "c")],
            ..ControlDescriptor::new(ControlType::Checkbox)
        };
        let list = expand(vec![Element::control(control)]);
        // anchor, prefix, marker, a, b, marker, c, postfix
        assert_eq!(list.len(), 8);
        assert_eq!(list[2].checkbox.as_ref().map(|s| s.value), Some(false));
        assert_eq!(list[5].checkbox.as_ref().map(|s| s.value), Some(true));
        assert_eq!(list[3].letter_spacing, None);
        assert_eq!(list[4].letter_spacing, Some(5.0));
        assert_eq!(list[6].letter_spacing, Some(5.0));
    }

    #[test]
    fn test_title_tags_and_defaults() {
        let mut title = Element::compound(ElementType::Title, vec![Element::text("Hi")]);
        title.level = Some(TitleLevel::Second);
        let list = expand(vec![title]);
        assert_eq!(list.len(), 3);
        assert!(list[1].title_id.is_some());
        assert_eq!(list[1].title_id, list[2].title_id);
        assert_eq!(list[1].style.size, Some(24));
        assert_eq!(list[1].style.bold, Some(true));
        assert!(list[0].title_id.is_none());
    }

    #[test]
    fn test_list_has_own_anchor() {
        let list = expand(vec![Element::compound(ElementType::List, vec![Element::text("x")])]);
        assert_eq!(list.len(), 2);
        assert!(list[0].is_zero());
        assert!(list[0].list_id.is_some());
        assert_eq!(list[0].list_id, list[1].list_id);
    }

    #[test]
    fn test_hyperlink_elements_carry_url() {
        let mut link = Element::compound(ElementType::Hyperlink, vec![Element::text("go")]);
        link.url = Some("https://example.com".to_string());
        let list = expand(vec![link]);
        assert!(list[1..].iter().all(|e| e.url.as_deref() == Some("https://example.com")
            && e.element_type == Some(ElementType::Hyperlink)));
    }

    #[test]
    fn test_table_cells_are_tagged() {
        let mut table = Element::of_type(ElementType::Table);
        table.tr_list = vec![TableRow::new(vec![TableCell::new(vec![Element::text("ab")])])];
        let list = expand(vec![table]);
        let cell = &list[1].tr_list[0].td_list[0];
        assert_eq!(cell.value.len(), 3);
        assert!(cell.value[0].is_zero());
        assert_eq!(cell.value[1].table_id, list[1].id);
        assert!(cell.value.iter().all(|e| e.td_id == cell.id));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let control = ControlDescriptor {
            value: Some(vec![Element::text("v")]),
            ..ControlDescriptor::new(ControlType::Text)
        };
        let once = expand(vec![Element::text("ab"), Element::control(control)]);
        let twice = expand(once.clone());
        assert_eq!(once, twice);
    }
}
