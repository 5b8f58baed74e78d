//! Table rows and cells. Each cell owns an independent element list.

use serde::{Deserialize, Serialize};

use super::element::Element;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default)]
    pub td_list: Vec<TableCell>,
}

impl TableRow {
    pub fn new(td_list: Vec<TableCell>) -> Self {
        Self {
            td_list,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rowspan: Option<u32>,
    #[serde(default)]
    pub value: Vec<Element>,
}

impl TableCell {
    pub fn new(value: Vec<Element>) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }
}

/// Where the caret is: the zone's top-level list, or a table cell inside it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionContext {
    /// Index of the table element in the zone list; `None` outside tables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<CellPath>,
}

impl PositionContext {
    pub fn in_cell(index: usize, tr_index: usize, td_index: usize) -> Self {
        Self {
            table: Some(CellPath {
                index,
                tr_index,
                td_index,
            }),
        }
    }

    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPath {
    pub index: usize,
    pub tr_index: usize,
    pub td_index: usize,
}

impl CellPath {
    /// Whether this path addresses an existing cell of `list`
    pub fn is_valid(&self, list: &[Element]) -> bool {
        list.get(self.index)
            .and_then(|table| table.tr_list.get(self.tr_index))
            .is_some_and(|tr| tr.td_list.len() > self.td_index)
    }

    pub fn cell<'a>(&self, list: &'a [Element]) -> Option<&'a TableCell> {
        list.get(self.index)?
            .tr_list
            .get(self.tr_index)?
            .td_list
            .get(self.td_index)
    }

    pub fn cell_mut<'a>(&self, list: &'a mut [Element]) -> Option<&'a mut TableCell> {
        list.get_mut(self.index)?
            .tr_list
            .get_mut(self.tr_index)?
            .td_list
            .get_mut(self.td_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementType;

    fn table() -> Element {
        let mut el = Element::of_type(ElementType::Table);
        el.tr_list = vec![TableRow::new(vec![
            TableCell::new(vec![Element::text("a")]),
            TableCell::new(vec![Element::text("b")]),
        ])];
        el
    }

    #[test]
    fn test_cell_path_resolves() {
        let list = vec![Element::zero(), table()];
        let path = CellPath {
            index: 1,
            tr_index: 0,
            td_index: 1,
        };
        assert!(path.is_valid(&list));
        assert_eq!(path.cell(&list).map(|c| c.value[0].value.as_str()), Some("b"));
    }

    #[test]
    fn test_cell_path_out_of_bounds() {
        let list = vec![Element::zero(), table()];
        let path = CellPath {
            index: 1,
            tr_index: 0,
            td_index: 2,
        };
        assert!(!path.is_valid(&list));
        assert!(path.cell(&list).is_none());
    }
}
