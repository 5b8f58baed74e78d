//! Control descriptors and the payloads of the batch control APIs

use serde::{Deserialize, Serialize};

use super::element::{Element, TextStyle};

/// The six control behaviors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlType {
    #[default]
    Text,
    Select,
    Checkbox,
    Radio,
    Date,
    Number,
}

/// One selectable option of a select/checkbox/radio control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSet {
    pub code: String,
    pub value: String,
}

impl ValueSet {
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectExclusiveOptions {
    /// Allow free text typing into a select control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_able: Option<bool>,
}

/// Configuration and state of one form control.
///
/// Every element of a control run carries a copy of the descriptor; changes
/// are applied to the whole run at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlDescriptor {
    #[serde(rename = "type", default)]
    pub control_type: ControlType,
    /// Value before expansion; `None` inside an expanded run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<Element>>,
    /// Selected option code(s) for select/checkbox/radio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_sets: Vec<ValueSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multi_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_exclusive_options: Option<SelectExclusiveOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<serde_json::Value>,
    #[serde(flatten)]
    pub style: TextStyle,
}

/// Delimiter between codes when none is configured
pub const DEFAULT_DELIMITER: &str = ",";

impl ControlDescriptor {
    pub fn new(control_type: ControlType) -> Self {
        Self {
            control_type,
            ..Default::default()
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled == Some(true)
    }

    pub fn is_deletable(&self) -> bool {
        self.deletable != Some(false)
    }

    pub fn is_multi_select(&self) -> bool {
        self.is_multi_select == Some(true)
    }

    pub fn is_input_able(&self) -> bool {
        self.select_exclusive_options
            .as_ref()
            .and_then(|o| o.input_able)
            .unwrap_or(false)
    }

    pub fn delimiter(&self) -> &str {
        self.multi_select_delimiter
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DELIMITER)
    }

    /// Split a code string into individual option codes.
    ///
    /// Option-group codes are always split; select codes only when
    /// multi-select. A radio keeps the first code when it is applied.
    pub fn split_codes<'a>(&self, code: &'a str) -> Vec<&'a str> {
        let is_set = matches!(self.control_type, ControlType::Checkbox | ControlType::Radio)
            || self.is_multi_select();
        if is_set {
            code.split(self.delimiter())
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect()
        } else {
            let code = code.trim();
            if code.is_empty() {
                Vec::new()
            } else {
                vec![code]
            }
        }
    }

    /// Codes currently selected
    pub fn code_list(&self) -> Vec<&str> {
        self.code
            .as_deref()
            .map(|code| self.split_codes(code))
            .unwrap_or_default()
    }

    /// Label of a single option code
    pub fn label_for(&self, code: &str) -> Option<&str> {
        self.value_sets
            .iter()
            .find(|v| v.code == code)
            .map(|v| v.value.as_str())
    }

    /// Visible text of a code set, as rendered by a select control
    pub fn projection(&self, code: &str) -> Option<String> {
        let labels: Vec<&str> = self
            .split_codes(code)
            .into_iter()
            .filter_map(|c| self.label_for(c))
            .collect();
        if labels.is_empty() {
            None
        } else {
            Some(labels.join(self.delimiter()))
        }
    }
}

/// Attribute patch for `set_properties_list_by_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_sets: Option<Vec<ValueSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_multi_select: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_select_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_exclusive_options: Option<SelectExclusiveOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<serde_json::Value>,
    #[serde(flatten)]
    pub style: TextStyle,
}

impl ControlProperties {
    /// Apply every set attribute onto `control`; the value is never touched
    pub fn apply(&self, control: &mut ControlDescriptor) {
        fn set<T: Clone>(slot: &mut Option<T>, patch: &Option<T>) {
            if patch.is_some() {
                slot.clone_from(patch);
            }
        }
        set(&mut control.placeholder, &self.placeholder);
        set(&mut control.prefix, &self.prefix);
        set(&mut control.postfix, &self.postfix);
        set(&mut control.pre_text, &self.pre_text);
        set(&mut control.post_text, &self.post_text);
        set(&mut control.concept_id, &self.concept_id);
        set(&mut control.disabled, &self.disabled);
        set(&mut control.deletable, &self.deletable);
        set(&mut control.min_width, &self.min_width);
        set(&mut control.is_multi_select, &self.is_multi_select);
        set(&mut control.multi_select_delimiter, &self.multi_select_delimiter);
        set(
            &mut control.select_exclusive_options,
            &self.select_exclusive_options,
        );
        set(&mut control.date_format, &self.date_format);
        set(&mut control.extension, &self.extension);
        if let Some(value_sets) = &self.value_sets {
            control.value_sets.clone_from(value_sets);
        }

        let style = &mut control.style;
        set(&mut style.font, &self.style.font);
        set(&mut style.size, &self.style.size);
        set(&mut style.bold, &self.style.bold);
        set(&mut style.italic, &self.style.italic);
        set(&mut style.underline, &self.style.underline);
        set(&mut style.strikeout, &self.style.strikeout);
        set(&mut style.color, &self.style.color);
        set(&mut style.highlight, &self.style.highlight);
    }
}

/// Selects controls by id, concept id or enclosing area. Unset keys match all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetValueOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
}

impl GetValueOption {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn by_concept(concept_id: impl Into<String>) -> Self {
        Self {
            concept_id: Some(concept_id.into()),
            ..Default::default()
        }
    }

    /// Whether the element at the head of a control run is selected
    pub fn matches(&self, element: &Element) -> bool {
        let Some(control) = element.control.as_deref() else {
            return false;
        };
        if self.id.is_some() && element.control_id != self.id {
            return false;
        }
        if self.concept_id.is_some() && control.concept_id != self.concept_id {
            return false;
        }
        if self.area_id.is_some() && element.area_id != self.area_id {
            return false;
        }
        true
    }
}

fn default_true() -> bool {
    true
}

/// One entry of `set_value_list_by_id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetValueOption {
    #[serde(flatten)]
    pub target: GetValueOption,
    /// Text for text/date/number, code(s) for select/checkbox/radio
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_true")]
    pub is_submit_history: bool,
}

impl SetValueOption {
    pub fn new(target: GetValueOption, value: impl Into<String>) -> Self {
        Self {
            target,
            value: value.into(),
            is_submit_history: true,
        }
    }
}

/// One entry of `set_properties_list_by_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPropertiesOption {
    #[serde(flatten)]
    pub target: GetValueOption,
    pub properties: ControlProperties,
    #[serde(default = "default_true")]
    pub is_submit_history: bool,
}
