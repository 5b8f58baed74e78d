//! Group id generation for expanded runs

/// Hands out ids for controls, titles, lists, hyperlinks, dates, areas and
/// table parts that arrive without one
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("fd")
    }
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Next unused id
    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_sequential() {
        let mut ids = IdGenerator::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
    }
}
