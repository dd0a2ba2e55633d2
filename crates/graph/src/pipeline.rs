use crate::assembler::ClassificationTreeAssembler;
use crate::builder::TopicHierarchyBuilder;
use crate::canonical::PathCanonicalizer;
use crate::collector::collect_per_paper_chains;
use crate::config::ClassificationConfig;
use crate::error::Result;
use crate::priority::KeywordPriorityIndex;
use crate::types::{ClassificationNode, ClassificationPath, TopicChain, TopicHierarchyNode};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use taxonomy_corpus::{KeywordIndex, Paper};

/// How much of the corpus the root topic reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub total_papers: usize,
    pub topic_papers: usize,
}

impl Coverage {
    pub fn ratio(&self) -> f64 {
        if self.total_papers == 0 {
            0.0
        } else {
            self.topic_papers as f64 / self.total_papers as f64
        }
    }
}

/// Everything a classification run produces
#[derive(Debug, Clone)]
pub struct Classification {
    pub topic_tree: TopicHierarchyNode,
    pub paper_chains: BTreeMap<Paper, BTreeSet<TopicChain>>,
    pub paper_paths: BTreeMap<Paper, BTreeSet<ClassificationPath>>,
    pub tree: ClassificationNode,
    pub coverage: Coverage,
}

/// Runs hierarchy building, chain collection, canonicalization and assembly
pub struct Classifier {
    config: ClassificationConfig,
    priorities: KeywordPriorityIndex,
}

impl Classifier {
    pub fn new(config: ClassificationConfig, priorities: KeywordPriorityIndex) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, priorities })
    }

    /// Topic hierarchy only
    pub fn topic_tree(&self, index: &KeywordIndex) -> TopicHierarchyNode {
        TopicHierarchyBuilder::from_config(index, &self.config).build(&self.config.root_keyword())
    }

    pub fn classify(&self, index: &KeywordIndex) -> Result<Classification> {
        let topic_tree = self.topic_tree(index);
        let paper_chains = collect_per_paper_chains(&topic_tree);

        let coverage = Coverage {
            total_papers: index.len(),
            topic_papers: paper_chains.len(),
        };
        log::info!(
            "{} of {} papers fall under \"{}\" (coverage {:.3})",
            coverage.topic_papers,
            coverage.total_papers,
            topic_tree.keyword,
            coverage.ratio()
        );

        let canonicalizer = PathCanonicalizer::new(&self.priorities);
        let paper_paths: BTreeMap<Paper, BTreeSet<ClassificationPath>> = paper_chains
            .iter()
            .map(|(paper, chains)| (paper.clone(), canonicalizer.canonicalize_all(chains)))
            .collect();

        let tree = ClassificationTreeAssembler::new(&paper_paths).assemble()?;

        Ok(Classification {
            topic_tree,
            paper_chains,
            paper_paths,
            tree,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaxonomyError;

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = Classifier::new(
            ClassificationConfig::default(),
            KeywordPriorityIndex::default(),
        );
        assert!(matches!(result, Err(TaxonomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_coverage_ratio() {
        let coverage = Coverage {
            total_papers: 4,
            topic_papers: 1,
        };
        assert!((coverage.ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(
            Coverage {
                total_papers: 0,
                topic_papers: 0
            }
            .ratio(),
            0.0
        );
    }

    #[test]
    fn test_root_missing_from_corpus() {
        let mut index = KeywordIndex::new();
        index.insert(Paper::new(1), ["y"]);
        let classifier = Classifier::new(
            ClassificationConfig::new("x").min_papers_per_branch(1),
            KeywordPriorityIndex::default(),
        )
        .unwrap();

        assert!(matches!(
            classifier.classify(&index),
            Err(TaxonomyError::NoRootTopicFound)
        ));
    }
}
