//! Element model - the atomic unit of document content
//!
//! A document zone is a flat `Vec<Element>`. Compound elements (controls,
//! titles, lists, hyperlinks, dates, areas) carry a `value_list` before they
//! are expanded and are represented afterwards by a contiguous run of flat
//! elements sharing a group id.

use serde::{Deserialize, Serialize};

use super::control::ControlDescriptor;
use super::table::TableRow;

/// Zero-width marker used for line breaks and non-text anchors
pub const ZERO: &str = "\u{200B}";

/// Element type tag. Absent means plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Text,
    Hyperlink,
    Subscript,
    Superscript,
    Date,
    Control,
    Table,
    Image,
    Separator,
    PageBreak,
    Tab,
    Title,
    List,
    Area,
    Latex,
    Checkbox,
    Radio,
}

impl ElementType {
    /// Plain text types: the only ones the zipper merges into longer runs
    pub fn is_plain(ty: Option<ElementType>) -> bool {
        matches!(
            ty,
            None | Some(ElementType::Text | ElementType::Subscript | ElementType::Superscript)
        )
    }

    /// Types whose `value` is real text and is split per grapheme on expansion
    pub fn is_splittable(ty: Option<ElementType>) -> bool {
        Self::is_plain(ty)
            || matches!(
                ty,
                Some(ElementType::Hyperlink | ElementType::Date | ElementType::Control)
            )
    }

    /// Block-level types do not take row attributes from their context
    pub fn is_block(ty: Option<ElementType>) -> bool {
        matches!(ty, Some(ElementType::Table))
    }
}

/// Role of an element inside a control run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlComponent {
    Prefix,
    PreText,
    Value,
    Placeholder,
    PostText,
    Postfix,
    Checkbox,
    Radio,
}

impl ControlComponent {
    /// Prefix or pre-text: the leading frame of a run
    pub fn is_head(self) -> bool {
        matches!(self, ControlComponent::Prefix | ControlComponent::PreText)
    }

    /// Post-text or postfix: the trailing frame of a run
    pub fn is_tail(self) -> bool {
        matches!(self, ControlComponent::PostText | ControlComponent::Postfix)
    }

    /// Components that make up the frame of a run rather than its content
    pub fn is_frame(self) -> bool {
        self.is_head()
            || self.is_tail()
            || matches!(self, ControlComponent::Checkbox | ControlComponent::Radio)
    }
}

/// Horizontal alignment of the row an element sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowFlex {
    Left,
    Center,
    Right,
    Alignment,
    Justify,
}

/// Heading level of a title run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TitleLevel {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListType {
    Ol,
    Ul,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStyle {
    Disc,
    Circle,
    Square,
    Decimal,
    Checkbox,
}

/// Checked state of one checkbox/radio option marker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionState {
    pub code: String,
    #[serde(default)]
    pub value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AreaMode {
    Edit,
    Readonly,
    Form,
}

/// Attributes shared by every element of an area run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AreaMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<serde_json::Value>,
}

/// Character style attributes, shared by elements and control descriptors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikeout: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl TextStyle {
    /// Fill every unset attribute from `base`
    pub fn fill_from(&mut self, base: &TextStyle) {
        fn fill<T: Clone>(slot: &mut Option<T>, base: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(base);
            }
        }
        fill(&mut self.font, &base.font);
        fill(&mut self.size, &base.size);
        fill(&mut self.bold, &base.bold);
        fill(&mut self.italic, &base.italic);
        fill(&mut self.underline, &base.underline);
        fill(&mut self.strikeout, &base.strikeout);
        fill(&mut self.color, &base.color);
        fill(&mut self.highlight, &base.highlight);
    }

    /// Unset every attribute that equals the corresponding attribute of `other`
    pub fn clear_matching(&mut self, other: &TextStyle) {
        fn clear<T: PartialEq>(slot: &mut Option<T>, other: &Option<T>) {
            if other.is_some() && *slot == *other {
                *slot = None;
            }
        }
        clear(&mut self.font, &other.font);
        clear(&mut self.size, &other.size);
        clear(&mut self.bold, &other.bold);
        clear(&mut self.italic, &other.italic);
        clear(&mut self.underline, &other.underline);
        clear(&mut self.strikeout, &other.strikeout);
        clear(&mut self.color, &other.color);
        clear(&mut self.highlight, &other.highlight);
    }

    /// Copy of this style with the color replaced
    pub fn with_color(&self, color: &str) -> TextStyle {
        TextStyle {
            color: Some(color.to_string()),
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TextStyle::default()
    }
}

/// The atomic unit of document content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// One grapheme, or a zero-width marker for non-text nodes
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<ElementType>,
    /// Nested content of a compound element (absent once expanded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_list: Option<Vec<Element>>,

    // === Style ===
    #[serde(flatten)]
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_flex: Option<RowFlex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,

    // === Control ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<Box<ControlDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_component: Option<ControlComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox: Option<OptionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio: Option<OptionState>,

    // === Title ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<TitleLevel>,

    // === List ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_type: Option<ListType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_style: Option<ListStyle>,

    // === Hyperlink ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // === Date ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    // === Area ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaDescriptor>,

    // === Table ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub td_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tr_list: Vec<TableRow>,
    /// Shared by the fragments of a table split across pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<serde_json::Value>,
}

impl Element {
    /// Plain text element
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Zero-width line-break/anchor element
    pub fn zero() -> Self {
        Self::text(ZERO)
    }

    /// Typed element with an empty value
    pub fn of_type(element_type: ElementType) -> Self {
        Self {
            element_type: Some(element_type),
            ..Default::default()
        }
    }

    /// Compound control element ready for expansion
    pub fn control(descriptor: ControlDescriptor) -> Self {
        Self {
            element_type: Some(ElementType::Control),
            control: Some(Box::new(descriptor)),
            ..Default::default()
        }
    }

    /// Compound element wrapping `value_list`
    pub fn compound(element_type: ElementType, value_list: Vec<Element>) -> Self {
        Self {
            element_type: Some(element_type),
            value_list: Some(value_list),
            ..Default::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == ZERO
    }

    /// Whether this element belongs to the control run `control_id`
    pub fn in_control(&self, control_id: &str) -> bool {
        self.control_id.as_deref() == Some(control_id)
    }

    /// Whether this element carries the given control component
    pub fn is_component(&self, component: ControlComponent) -> bool {
        self.control_component == Some(component)
    }

    /// Whether any group id links this element to a compound parent
    pub fn has_group_id(&self) -> bool {
        self.control_id.is_some()
            || self.title_id.is_some()
            || self.list_id.is_some()
            || self.hyperlink_id.is_some()
            || self.date_id.is_some()
            || self.area_id.is_some()
            || self.table_id.is_some()
    }

    /// Remove every control tag, leaving the element as a plain fragment
    pub fn strip_control(&mut self) {
        self.control_id = None;
        self.control = None;
        self.control_component = None;
        self.checkbox = None;
        self.radio = None;
        if self.element_type == Some(ElementType::Control) {
            self.element_type = None;
        }
    }

    /// Attributes are identical except for `value`
    pub fn same_except_value(&self, other: &Element) -> bool {
        let mut probe = other.clone();
        probe.value.clone_from(&self.value);
        *self == probe
    }

    /// Fill style and control linkage that this element does not set itself
    pub fn inherit_from(&mut self, base: &Element) {
        self.style.fill_from(&base.style);
        if self.row_flex.is_none() {
            self.row_flex = base.row_flex;
        }
        if self.control_id.is_none() {
            self.control_id.clone_from(&base.control_id);
            self.control.clone_from(&base.control);
        }
    }
}
