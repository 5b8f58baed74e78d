//! Document data - the three zone sequences of one document

use serde::{Deserialize, Serialize};

use super::element::Element;
use super::table::PositionContext;

/// Which zone of the document the caret is in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Header,
    #[default]
    Main,
    Footer,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Header, Zone::Main, Zone::Footer];
}

/// Element sequences of header, main body and footer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub header: Vec<Element>,
    #[serde(default)]
    pub main: Vec<Element>,
    #[serde(default)]
    pub footer: Vec<Element>,
}

impl DocumentData {
    /// Document with only a main zone
    pub fn from_main(main: Vec<Element>) -> Self {
        Self {
            main,
            ..Default::default()
        }
    }

    pub fn zone(&self, zone: Zone) -> &Vec<Element> {
        match zone {
            Zone::Header => &self.header,
            Zone::Main => &self.main,
            Zone::Footer => &self.footer,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> &mut Vec<Element> {
        match zone {
            Zone::Header => &mut self.header,
            Zone::Main => &mut self.main,
            Zone::Footer => &mut self.footer,
        }
    }

    /// The list the caret addresses: a table cell when the position context
    /// points at a valid cell, otherwise the zone's own list
    pub fn active_list(&self, zone: Zone, position: &PositionContext) -> &Vec<Element> {
        let list = self.zone(zone);
        match position.table.and_then(|path| path.cell(list)) {
            Some(cell) => &cell.value,
            None => list,
        }
    }

    pub fn active_list_mut(&mut self, zone: Zone, position: &PositionContext) -> &mut Vec<Element> {
        let valid = position.table.filter(|path| path.is_valid(self.zone(zone)));
        let list = self.zone_mut(zone);
        match valid {
            Some(path) => {
                &mut list[path.index].tr_list[path.tr_index].td_list[path.td_index].value
            }
            None => list,
        }
    }

    /// Total number of top-level elements across zones
    pub fn len(&self) -> usize {
        self.header.len() + self.main.len() + self.footer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
