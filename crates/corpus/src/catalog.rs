use crate::error::{CorpusError, Result};
use crate::types::normalize_keyword;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Default specificity for keywords missing from the catalog
pub const DEFAULT_PRIORITY: u32 = 50;

/// Highest allowed specificity (most specific)
pub const MAX_PRIORITY: u32 = 100;

/// Operator customization for a single canonical keyword
///
/// Priority 0 excludes the keyword entirely, 1 is maximally general and 100
/// maximally specific.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordCustomization {
    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Phrases unified into the canonical keyword during ingestion
    #[serde(default)]
    pub synonyms: Vec<String>,
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

impl Default for KeywordCustomization {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            synonyms: Vec::new(),
        }
    }
}

impl KeywordCustomization {
    pub fn with_priority(priority: u32) -> Self {
        Self {
            priority,
            ..Default::default()
        }
    }

    /// Add synonyms (builder pattern)
    pub fn synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }
}

/// Validated keyword -> customization table
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    entries: BTreeMap<String, KeywordCustomization>,
    synonym_index: HashMap<String, String>,
    default_priority: u32,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            synonym_index: HashMap::new(),
            default_priority: DEFAULT_PRIORITY,
        }
    }
}

impl KeywordCatalog {
    /// Build and validate a catalog. Keys are normalized before use.
    pub fn new<I, S>(entries: I, default_priority: u32) -> Result<Self>
    where
        I: IntoIterator<Item = (S, KeywordCustomization)>,
        S: AsRef<str>,
    {
        let raw: Vec<(String, KeywordCustomization)> = entries
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v))
            .collect();

        validate(&raw, default_priority)?;

        let mut synonym_index = HashMap::new();
        let mut normalized = BTreeMap::new();
        for (keyword, customization) in raw {
            let keyword = normalize_keyword(&keyword);
            for synonym in &customization.synonyms {
                synonym_index.insert(normalize_keyword(synonym), keyword.clone());
            }
            normalized.insert(keyword, customization);
        }

        log::debug!(
            "Keyword catalog: {} keywords, {} synonyms",
            normalized.len(),
            synonym_index.len()
        );

        Ok(Self {
            entries: normalized,
            synonym_index,
            default_priority,
        })
    }

    pub fn default_priority(&self) -> u32 {
        self.default_priority
    }

    /// Canonical keyword for a normalized synonym phrase
    pub fn canonical_for(&self, phrase: &str) -> Option<&str> {
        self.synonym_index.get(phrase).map(String::as_str)
    }

    /// Priority for a keyword, falling back to the default
    pub fn priority(&self, keyword: &str) -> u32 {
        self.entries
            .get(keyword)
            .map_or(self.default_priority, |c| c.priority)
    }

    /// Explicitly configured (keyword, priority) pairs
    pub fn priorities(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.priority))
    }

    /// Canonical keyword plus all of its synonyms
    pub fn phrases_for<'a>(&'a self, keyword: &'a str) -> Vec<&'a str> {
        let mut phrases = vec![keyword];
        if let Some(customization) = self.entries.get(keyword) {
            phrases.extend(customization.synonyms.iter().map(String::as_str));
        }
        phrases
    }
}

fn validate(entries: &[(String, KeywordCustomization)], default_priority: u32) -> Result<()> {
    let mut errors = Vec::new();

    if default_priority > MAX_PRIORITY {
        errors.push(format!(
            "Default priority {default_priority} exceeds {MAX_PRIORITY}"
        ));
    }

    let canonical: HashMap<String, &str> = entries
        .iter()
        .map(|(k, _)| (normalize_keyword(k), k.as_str()))
        .collect();

    let mut spellings: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (keyword, _) in entries {
        spellings
            .entry(normalize_keyword(keyword))
            .or_default()
            .push(keyword.as_str());
    }
    for (keyword, keys) in &spellings {
        if keys.len() > 1 {
            errors.push(format!(
                "Keyword \"{keyword}\" is customized more than once: {}",
                keys.join(", ")
            ));
        }
    }

    let mut owners: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for (keyword, customization) in entries {
        if customization.priority > MAX_PRIORITY {
            errors.push(format!(
                "Keyword \"{keyword}\" has priority {} (max {MAX_PRIORITY})",
                customization.priority
            ));
        }

        for synonym in &customization.synonyms {
            let normalized = normalize_keyword(synonym);
            if normalized.is_empty() {
                errors.push(format!("Keyword \"{keyword}\" has an empty synonym"));
                continue;
            }
            if let Some(owner) = canonical.get(&normalized) {
                if normalize_keyword(owner) == normalize_keyword(keyword) {
                    errors.push(format!(
                        "Keyword \"{keyword}\" is listed as a synonym of itself"
                    ));
                } else {
                    errors.push(format!(
                        "Keyword \"{synonym}\" is repeated as a synonym (within the synonym list for keyword \"{keyword}\")"
                    ));
                }
            }
            let owner_list = owners.entry(normalized).or_default();
            if !owner_list.contains(&keyword.as_str()) {
                owner_list.push(keyword.as_str());
            }
        }
    }

    for (synonym, keywords) in owners {
        if keywords.len() > 1 {
            errors.push(format!(
                "Synonym \"{synonym}\" is declared for more than one keyword: {}",
                keywords.join(", ")
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CorpusError::InvalidKeywordCustomization(errors))
    }
}
