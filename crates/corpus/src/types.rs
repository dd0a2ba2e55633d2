use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// Normalize a raw keyword phrase (trim + lower-case)
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Research paper as ingested from the dataset
///
/// Identity is the reference index: two records with the same index are the
/// same paper regardless of their metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Stable reference index (row position in the source sheet)
    pub reference_index: u32,

    pub title: Option<String>,

    pub authors: Option<String>,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
}

impl Paper {
    pub fn new(reference_index: u32) -> Self {
        Self {
            reference_index,
            title: None,
            authors: None,
            abstract_text: None,
        }
    }

    /// Set title (builder pattern)
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display, empty when the sheet had none
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

impl PartialEq for Paper {
    fn eq(&self, other: &Self) -> bool {
        self.reference_index == other.reference_index
    }
}

impl Eq for Paper {}

impl Hash for Paper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference_index.hash(state);
    }
}

impl PartialOrd for Paper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Paper {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reference_index.cmp(&other.reference_index)
    }
}

/// A paper together with its normalized keyword set
#[derive(Debug, Clone, Serialize)]
pub struct PaperKeywords {
    pub paper: Paper,
    pub keywords: BTreeSet<String>,
}

/// Per-keyword summary used by keyword inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordStats {
    pub keyword: String,
    pub paper_count: usize,
    /// Keywords that co-occur with this one on at least one paper
    pub related_keywords: Vec<String>,
}

/// Paper-to-keywords map consumed by the classification core
///
/// Ordered by reference index so every traversal is deterministic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordIndex {
    papers: BTreeMap<u32, PaperKeywords>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paper, merging keywords if the reference index is already known
    pub fn insert<I, S>(&mut self, paper: Paper, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self
            .papers
            .entry(paper.reference_index)
            .or_insert_with(|| PaperKeywords {
                paper,
                keywords: BTreeSet::new(),
            });
        for kw in keywords {
            let kw = normalize_keyword(kw.as_ref());
            if !kw.is_empty() {
                entry.keywords.insert(kw);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn get(&self, reference_index: u32) -> Option<&PaperKeywords> {
        self.papers.get(&reference_index)
    }

    /// Iterate papers in reference-index order
    pub fn iter(&self) -> impl Iterator<Item = &PaperKeywords> {
        self.papers.values()
    }

    /// Every distinct keyword in the index
    pub fn keywords(&self) -> BTreeSet<&str> {
        self.papers
            .values()
            .flat_map(|entry| entry.keywords.iter().map(String::as_str))
            .collect()
    }

    /// Keyword inspection report, most frequent keywords first
    pub fn keyword_stats(&self) -> Vec<KeywordStats> {
        let mut counts: BTreeMap<&str, (usize, BTreeSet<&str>)> = BTreeMap::new();

        for entry in self.papers.values() {
            for kw in &entry.keywords {
                let (count, related) = counts.entry(kw.as_str()).or_default();
                *count += 1;
                related.extend(
                    entry
                        .keywords
                        .iter()
                        .map(String::as_str)
                        .filter(|other| *other != kw.as_str()),
                );
            }
        }

        let mut stats: Vec<KeywordStats> = counts
            .into_iter()
            .map(|(keyword, (paper_count, related))| KeywordStats {
                keyword: keyword.to_string(),
                paper_count,
                related_keywords: related.into_iter().map(str::to_string).collect(),
            })
            .collect();

        stats.sort_by(|a, b| {
            b.paper_count
                .cmp(&a.paper_count)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_keyword() {
        assert_eq!(normalize_keyword("  Machine Learning "), "machine learning");
        assert_eq!(normalize_keyword("\tLSTM\n"), "lstm");
        assert_eq!(normalize_keyword("   "), "");
    }

    #[test]
    fn test_paper_identity_is_reference_index() {
        let a = Paper::new(7).title("One title");
        let b = Paper::new(7).title("Another title");
        let c = Paper::new(8).title("One title");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);

        let set: BTreeSet<Paper> = [c.clone(), a.clone(), b].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().map(|p| p.reference_index), Some(7));
    }

    #[test]
    fn test_insert_merges_and_normalizes() {
        let mut index = KeywordIndex::new();
        index.insert(Paper::new(1), ["Sentiment Analysis", " lstm "]);
        index.insert(Paper::new(1), ["LSTM", "", "cnn"]);

        let entry = index.get(1).unwrap();
        let keywords: Vec<&str> = entry.keywords.iter().map(String::as_str).collect();
        assert_eq!(keywords, vec!["cnn", "lstm", "sentiment analysis"]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_keyword_stats_sorted_by_count_then_name() {
        let mut index = KeywordIndex::new();
        index.insert(Paper::new(1), ["x", "y"]);
        index.insert(Paper::new(2), ["x", "z"]);
        index.insert(Paper::new(3), ["x", "y", "w"]);

        let stats = index.keyword_stats();
        let order: Vec<(&str, usize)> = stats
            .iter()
            .map(|s| (s.keyword.as_str(), s.paper_count))
            .collect();
        assert_eq!(order, vec![("x", 3), ("y", 2), ("w", 1), ("z", 1)]);

        assert_eq!(stats[0].related_keywords, vec!["w", "y", "z"]);
        assert_eq!(stats[1].related_keywords, vec!["w", "x"]);
    }
}
