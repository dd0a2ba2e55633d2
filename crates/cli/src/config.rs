use anyhow::{anyhow, Context as AnyhowContext, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use taxonomy_corpus::{
    load_raw_papers, CorpusLoader, KeywordCatalog, KeywordCustomization, LoadedCorpus,
    DEFAULT_PRIORITY,
};
use taxonomy_graph::{ClassificationConfig, KeywordPriorityIndex};

/// Operator-assigned keywords for one paper
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignedKeywords {
    pub reference_index: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Project file driving every subcommand (JSON or TOML)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyConfig {
    /// Paper dataset, relative to the config file
    pub papers: PathBuf,

    #[serde(default)]
    pub interested_topic: String,

    #[serde(default)]
    pub pruned_topics: Vec<String>,

    #[serde(default = "default_threshold")]
    pub threshold_child_paper_count: usize,

    #[serde(default = "default_threshold")]
    pub threshold_tree_depth: usize,

    #[serde(default = "default_priority")]
    pub default_priority: u32,

    #[serde(default)]
    pub keywords: BTreeMap<String, KeywordCustomization>,

    #[serde(default)]
    pub unwanted_keywords: Vec<String>,

    #[serde(default)]
    pub assigned_keywords: Vec<AssignedKeywords>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_threshold() -> usize {
    8
}

fn default_priority() -> u32 {
    DEFAULT_PRIORITY
}

impl TaxonomyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config =
            parse_raw(&bytes).with_context(|| format!("Invalid config {}", path.display()))?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Dataset path with relative paths resolved against the config file
    pub fn papers_path(&self) -> PathBuf {
        if self.papers.is_absolute() {
            self.papers.clone()
        } else {
            self.base_dir.join(&self.papers)
        }
    }

    pub fn catalog(&self) -> Result<KeywordCatalog> {
        Ok(KeywordCatalog::new(
            self.keywords
                .iter()
                .map(|(keyword, customization)| (keyword.as_str(), customization.clone())),
            self.default_priority,
        )?)
    }

    pub fn classification(&self) -> ClassificationConfig {
        ClassificationConfig::new(self.interested_topic.clone())
            .pruned_topics(self.pruned_topics.clone())
            .min_papers_per_branch(self.threshold_child_paper_count)
            .max_depth(self.threshold_tree_depth)
    }

    /// Read the dataset and run ingestion against `catalog`
    pub fn load_corpus(&self, catalog: &KeywordCatalog) -> Result<LoadedCorpus> {
        let path = self.papers_path();
        let rows = load_raw_papers(&path)
            .with_context(|| format!("Failed to load papers from {}", path.display()))?;

        let loader = self.assigned_keywords.iter().fold(
            CorpusLoader::new(catalog).unwanted(&self.unwanted_keywords),
            |loader, assigned| loader.assign(assigned.reference_index, assigned.keywords.clone()),
        );
        Ok(loader.load(rows))
    }
}

/// Everything a subcommand needs after configuration is resolved
pub struct Project {
    pub config: TaxonomyConfig,
    pub catalog: KeywordCatalog,
    pub corpus: LoadedCorpus,
}

impl Project {
    pub fn open(config_path: &Path) -> Result<Self> {
        let config = TaxonomyConfig::load(config_path)?;
        let catalog = config.catalog()?;
        let corpus = config.load_corpus(&catalog)?;
        log::info!(
            "Loaded {} papers ({} without keywords)",
            corpus.index.len(),
            corpus.missed.len()
        );
        Ok(Self {
            config,
            catalog,
            corpus,
        })
    }

    pub fn priorities(&self) -> KeywordPriorityIndex {
        KeywordPriorityIndex::from_catalog(&self.catalog)
    }
}

fn parse_raw(bytes: &[u8]) -> Result<TaxonomyConfig> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!("Config is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}")
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML config to JSON: {err}"))?
        }
    };

    serde_json::from_value(value).map_err(|err| anyhow!("Config parse error: {err}"))
}
