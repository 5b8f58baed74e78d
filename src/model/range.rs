//! Caret range over a flat element list.
//!
//! Index `i` means "the caret sits after element `i`". A collapsed range has
//! `start_index == end_index`; otherwise the selection covers elements
//! `start_index + 1 ..= end_index`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

impl Range {
    /// Create a range, ordering the endpoints
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index: start_index.min(end_index),
            end_index: start_index.max(end_index),
        }
    }

    /// Create a collapsed range (caret with no selection)
    pub fn collapsed(index: usize) -> Self {
        Self {
            start_index: index,
            end_index: index,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Number of selected elements
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Indices of the selected elements
    pub fn selected(&self) -> std::ops::Range<usize> {
        self.start_index + 1..self.end_index + 1
    }

    /// Clamp both endpoints into a list of `len` elements
    pub fn clamp(&self, len: usize) -> Self {
        let max = len.saturating_sub(1);
        Self::new(self.start_index.min(max), self.end_index.min(max))
    }
}
