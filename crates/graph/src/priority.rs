use crate::types::WeightedTopic;
use std::collections::{BTreeSet, HashMap};
use taxonomy_corpus::{KeywordCatalog, DEFAULT_PRIORITY};

/// Keyword -> specificity lookup
///
/// 0 = excluded upstream, 1 = maximally general, 100 = maximally specific.
/// Keywords missing from the table resolve to the default.
#[derive(Debug, Clone)]
pub struct KeywordPriorityIndex {
    priorities: HashMap<String, u32>,
    default_priority: u32,
}

impl Default for KeywordPriorityIndex {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY)
    }
}

impl KeywordPriorityIndex {
    pub fn new(default_priority: u32) -> Self {
        Self {
            priorities: HashMap::new(),
            default_priority,
        }
    }

    pub fn from_catalog(catalog: &KeywordCatalog) -> Self {
        let mut index = Self::new(catalog.default_priority());
        for (keyword, priority) in catalog.priorities() {
            index.insert(keyword, priority);
        }
        index
    }

    pub fn insert(&mut self, keyword: impl Into<String>, priority: u32) {
        self.priorities.insert(keyword.into(), priority);
    }

    /// Add an entry (builder pattern)
    pub fn with(mut self, keyword: impl Into<String>, priority: u32) -> Self {
        self.insert(keyword, priority);
        self
    }

    pub fn default_priority(&self) -> u32 {
        self.default_priority
    }

    pub fn priority(&self, keyword: &str) -> u32 {
        self.priorities
            .get(keyword)
            .copied()
            .unwrap_or(self.default_priority)
    }

    pub fn weigh(&self, keyword: &str) -> WeightedTopic {
        WeightedTopic::new(keyword, self.priority(keyword))
    }

    /// Every specificity value the run knows about, default included
    pub fn known_specificities(&self) -> BTreeSet<u32> {
        self.priorities
            .values()
            .copied()
            .chain(std::iter::once(self.default_priority))
            .collect()
    }
}
