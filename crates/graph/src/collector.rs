use crate::types::{TopicChain, TopicHierarchyNode};
use std::collections::{BTreeMap, BTreeSet};
use taxonomy_corpus::Paper;

/// Every root-to-node chain each paper belongs to
///
/// A paper attached to a node and to some of its descendants collects one
/// chain per node. Papers are keyed by reference index.
pub fn collect_per_paper_chains(
    hierarchy: &TopicHierarchyNode,
) -> BTreeMap<Paper, BTreeSet<TopicChain>> {
    let mut chains: BTreeMap<Paper, BTreeSet<TopicChain>> = BTreeMap::new();

    for node in hierarchy.iter() {
        for paper in &node.papers {
            chains
                .entry(paper.clone())
                .or_default()
                .insert(node.chain.clone());
        }
    }

    log::debug!(
        "Collected topic chains for {} papers from {} hierarchy nodes",
        chains.len(),
        hierarchy.node_count()
    );

    chains
}
