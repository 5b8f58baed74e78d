//! Keyword highlighting inside control values

use serde::{Deserialize, Serialize};

use crate::format::split_text;
use crate::model::{control_run_bounds, CellPath, ControlComponent, DocumentData, Element, ElementType, Zone};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRule {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
}

/// Rules applied to the controls matching `id` or `concept_id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlHighlight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<String>,
    #[serde(default)]
    pub rule_list: Vec<HighlightRule>,
}

impl ControlHighlight {
    fn matches(&self, head: &Element) -> bool {
        let by_id = self.id.is_some() && self.id == head.control_id;
        let by_concept = self.concept_id.is_some()
            && head.control.as_ref().map(|c| &c.concept_id) == Some(&self.concept_id);
        by_id || by_concept
    }
}

/// One highlighted slice of a list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightMatch {
    pub zone: Zone,
    /// Cell holding the match; `None` for the zone's own list
    pub table: Option<CellPath>,
    pub index: usize,
    pub length: usize,
    pub background_color: Option<String>,
    pub alpha: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlSearch {
    highlight_list: Vec<ControlHighlight>,
}

impl ControlSearch {
    pub fn set_highlight_list(&mut self, highlight_list: Vec<ControlHighlight>) {
        self.highlight_list = highlight_list;
    }

    pub fn highlight_list(&self) -> &[ControlHighlight] {
        &self.highlight_list
    }

    /// Every keyword match in the values of highlighted controls
    pub fn compute_highlight_list(&self, document: &DocumentData) -> Vec<HighlightMatch> {
        let mut matches = Vec::new();
        if self.highlight_list.is_empty() {
            return matches;
        }
        for zone in Zone::ALL {
            self.search_list(document.zone(zone), zone, None, &mut matches);
        }
        matches
    }

    fn search_list(
        &self,
        list: &[Element],
        zone: Zone,
        table: Option<CellPath>,
        matches: &mut Vec<HighlightMatch>,
    ) {
        let mut i = 0;
        while i < list.len() {
            let element = &list[i];
            if element.element_type == Some(ElementType::Table) {
                for (tr_index, tr) in element.tr_list.iter().enumerate() {
                    for (td_index, td) in tr.td_list.iter().enumerate() {
                        let path = CellPath {
                            index: i,
                            tr_index,
                            td_index,
                        };
                        self.search_list(&td.value, zone, Some(path), matches);
                    }
                }
                i += 1;
                continue;
            }
            let Some((start, end)) = control_run_bounds(list, i) else {
                i += 1;
                continue;
            };
            for highlight in self.highlight_list.iter().filter(|h| h.matches(&list[start])) {
                for rule in &highlight.rule_list {
                    search_run(list, start, end, rule, zone, table, matches);
                }
            }
            i = end + 1;
        }
    }
}

/// Match `rule` against each contiguous stretch of value elements
fn search_run(
    list: &[Element],
    start: usize,
    end: usize,
    rule: &HighlightRule,
    zone: Zone,
    table: Option<CellPath>,
    matches: &mut Vec<HighlightMatch>,
) {
    let keyword = split_text(&rule.keyword);
    if keyword.is_empty() {
        return;
    }
    let mut p = start;
    while p + keyword.len() <= end + 1 {
        let hit = keyword.iter().enumerate().all(|(q, grapheme)| {
            let element = &list[p + q];
            element.is_component(ControlComponent::Value) && element.value == *grapheme
        });
        if hit {
            matches.push(HighlightMatch {
                zone,
                table,
                index: p,
                length: keyword.len(),
                background_color: rule.background_color.clone(),
                alpha: rule.alpha,
            });
            p += keyword.len();
        } else {
            p += 1;
        }
    }
}
