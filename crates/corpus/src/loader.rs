use crate::catalog::KeywordCatalog;
use crate::error::{CorpusError, Result};
use crate::types::{normalize_keyword, KeywordIndex, Paper};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

/// Keyword cell of a dataset row
///
/// Spreadsheet exports carry one comma-separated string, hand-written
/// datasets usually carry a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeywordCell {
    Joined(String),
    List(Vec<String>),
}

impl Default for KeywordCell {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl KeywordCell {
    /// Raw phrases, split on commas, blanks removed
    pub fn phrases(&self) -> Vec<&str> {
        match self {
            Self::Joined(cell) => cell
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect(),
            Self::List(items) => items
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

/// One dataset row before keyword unification
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPaper {
    #[serde(default)]
    pub reference_index: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: KeywordCell,
}

/// Read a JSON array of [`RawPaper`] rows
pub fn load_raw_papers(path: &Path) -> Result<Vec<RawPaper>> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CorpusError::parse(format!("{}: {err}", path.display())))
}

/// Result of ingestion
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub index: KeywordIndex,
    /// Papers that ended up with no keyword at all
    pub missed: Vec<Paper>,
}

/// Turns dataset rows into a [`KeywordIndex`]
///
/// Applies synonym unification, unwanted-keyword filtering and
/// operator-assigned keywords, then tries to rescue keyword-less papers by
/// matching known keyword phrases against their title and abstract.
pub struct CorpusLoader<'a> {
    catalog: &'a KeywordCatalog,
    unwanted: HashSet<String>,
    assigned: BTreeMap<u32, Vec<String>>,
}

impl<'a> CorpusLoader<'a> {
    pub fn new(catalog: &'a KeywordCatalog) -> Self {
        Self {
            catalog,
            unwanted: HashSet::new(),
            assigned: BTreeMap::new(),
        }
    }

    /// Keywords dropped during ingestion (builder pattern)
    pub fn unwanted<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.unwanted
            .extend(keywords.into_iter().map(|k| normalize_keyword(k.as_ref())));
        self
    }

    /// Extra keywords for a given paper (builder pattern)
    pub fn assign<I, S>(mut self, reference_index: u32, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned
            .entry(reference_index)
            .or_default()
            .extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn load(&self, rows: Vec<RawPaper>) -> LoadedCorpus {
        let mut index = KeywordIndex::new();
        let mut pending = Vec::new();

        for (position, row) in rows.into_iter().enumerate() {
            let reference_index = row
                .reference_index
                .unwrap_or_else(|| u32::try_from(position + 1).unwrap_or(u32::MAX));
            let paper = Paper {
                reference_index,
                title: row.title,
                authors: row.authors,
                abstract_text: row.abstract_text,
            };

            // Assigned keywords only extend a non-empty cell
            let mut phrases: Vec<&str> = row.keywords.phrases();
            if !phrases.is_empty() {
                if let Some(extra) = self.assigned.get(&reference_index) {
                    phrases.extend(extra.iter().map(String::as_str));
                }
            }

            let keywords: BTreeSet<String> = phrases
                .into_iter()
                .filter_map(|phrase| self.unify(phrase))
                .collect();

            if keywords.is_empty() {
                pending.push(paper);
            } else {
                index.insert(paper, keywords);
            }
        }

        let missed = self.rescue(&mut index, pending);
        if !missed.is_empty() {
            log::warn!("Missed {} papers during keyword ingestion", missed.len());
            for paper in &missed {
                log::warn!("  {} {}", paper.reference_index, paper.display_title());
            }
        }

        log::info!(
            "Loaded {} papers with {} distinct keywords",
            index.len(),
            index.keywords().len()
        );

        LoadedCorpus { index, missed }
    }

    /// Normalize, unify synonyms, drop unwanted and excluded keywords
    fn unify(&self, phrase: &str) -> Option<String> {
        let normalized = normalize_keyword(phrase);
        let keyword = self
            .catalog
            .canonical_for(&normalized)
            .map(str::to_string)
            .unwrap_or(normalized);

        if keyword.is_empty() || self.unwanted.contains(&keyword) {
            return None;
        }
        if self.catalog.priority(&keyword) == 0 {
            return None;
        }
        Some(keyword)
    }

    /// Second pass: match known keyword phrases against title/abstract
    fn rescue(&self, index: &mut KeywordIndex, pending: Vec<Paper>) -> Vec<Paper> {
        let known: Vec<String> = index.keywords().into_iter().map(str::to_string).collect();
        let mut missed = Vec::new();

        for paper in pending {
            let haystacks: Vec<String> = [paper.title.as_deref(), paper.abstract_text.as_deref()]
                .into_iter()
                .flatten()
                .map(str::to_lowercase)
                .collect();

            let matched: Vec<&str> = known
                .iter()
                .map(String::as_str)
                .filter(|keyword| {
                    self.catalog
                        .phrases_for(keyword)
                        .iter()
                        .map(|phrase| phrase.trim().to_lowercase())
                        .filter(|phrase| !phrase.is_empty())
                        .any(|phrase| haystacks.iter().any(|text| text.contains(&phrase)))
                })
                .collect();

            if matched.is_empty() {
                missed.push(paper);
            } else {
                log::debug!(
                    "Paper {} matched {} keywords from title/abstract",
                    paper.reference_index,
                    matched.len()
                );
                index.insert(paper, matched);
            }
        }

        missed
    }
}
