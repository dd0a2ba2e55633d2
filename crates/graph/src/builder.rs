use crate::config::ClassificationConfig;
use crate::types::{TopicChain, TopicHierarchyNode};
use std::collections::BTreeSet;
use taxonomy_corpus::{normalize_keyword, KeywordIndex, PaperKeywords};

/// Build the topic hierarchy from keyword co-occurrence
///
/// Starting at the root keyword, every keyword that co-occurs with the current
/// chain on some paper becomes a child branch. Expansion stops at
/// `max_depth` or when a branch has fewer than `min_papers_per_branch` papers.
pub struct TopicHierarchyBuilder<'a> {
    index: &'a KeywordIndex,
    pruned: BTreeSet<String>,
    max_depth: usize,
    min_papers_per_branch: usize,
}

impl<'a> TopicHierarchyBuilder<'a> {
    pub fn new<I, S>(
        index: &'a KeywordIndex,
        pruned_keywords: I,
        max_depth: usize,
        min_papers_per_branch: usize,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            index,
            pruned: pruned_keywords
                .into_iter()
                .map(|k| normalize_keyword(k.as_ref()))
                .collect(),
            max_depth,
            min_papers_per_branch,
        }
    }

    pub fn from_config(index: &'a KeywordIndex, config: &ClassificationConfig) -> Self {
        Self::new(
            index,
            config.pruned_keywords(),
            config.threshold_tree_depth,
            config.threshold_child_paper_count,
        )
    }

    /// Build the hierarchy rooted at `root_keyword`
    pub fn build(&self, root_keyword: &str) -> TopicHierarchyNode {
        let root_keyword = normalize_keyword(root_keyword);
        let pool: Vec<&PaperKeywords> = self.index.iter().collect();
        let root = self.expand(vec![root_keyword], 0, &pool);

        log::info!(
            "Built topic hierarchy for \"{}\": {} nodes, {} papers at the root",
            root.keyword,
            root.node_count(),
            root.papers.len()
        );

        root
    }

    /// `pool` holds the papers matching every chain element except the last
    fn expand(
        &self,
        chain: TopicChain,
        depth: usize,
        pool: &[&'a PaperKeywords],
    ) -> TopicHierarchyNode {
        let keyword = chain.last().cloned().unwrap_or_default();

        let matching: Vec<&PaperKeywords> = pool
            .iter()
            .copied()
            .filter(|entry| entry.keywords.contains(&keyword))
            .collect();

        let candidate_keywords: BTreeSet<String> = matching
            .iter()
            .flat_map(|entry| entry.keywords.iter())
            .filter(|kw| !chain.contains(kw) && !self.pruned.contains(*kw))
            .cloned()
            .collect();

        let papers = matching.iter().map(|entry| entry.paper.clone()).collect();

        let mut children = Vec::new();
        if depth >= self.max_depth {
            log::debug!("[{}] depth limit {} reached", chain.join(" -> "), self.max_depth);
        } else if matching.len() < self.min_papers_per_branch {
            log::debug!(
                "[{}] {} papers below branch threshold {}",
                chain.join(" -> "),
                matching.len(),
                self.min_papers_per_branch
            );
        } else {
            for child_keyword in &candidate_keywords {
                let mut child_chain = chain.clone();
                child_chain.push(child_keyword.clone());
                children.push(self.expand(child_chain, depth + 1, &matching));
            }
        }

        TopicHierarchyNode {
            keyword,
            chain,
            depth,
            papers,
            candidate_keywords,
            children,
        }
    }
}

/// Convenience wrapper around [`TopicHierarchyBuilder`]
pub fn build_topic_hierarchy<I, S>(
    root_keyword: &str,
    index: &KeywordIndex,
    pruned_keywords: I,
    max_depth: usize,
    min_papers_per_branch: usize,
) -> TopicHierarchyNode
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TopicHierarchyBuilder::new(index, pruned_keywords, max_depth, min_papers_per_branch)
        .build(root_keyword)
}
