use crate::types::ClassificationNode;
use std::collections::HashMap;

/// Deepest level at which each topic keyword occurs anywhere in the tree
pub fn max_levels(root: &ClassificationNode) -> HashMap<String, usize> {
    let mut levels: HashMap<String, usize> = HashMap::new();
    for node in root.iter() {
        let level = levels.entry(node.topic.clone()).or_insert(node.level);
        if *level < node.level {
            *level = node.level;
        }
    }
    levels
}

/// Rebuild the tree keeping only children that sit at their topic's maximum
/// level. Dropped children take their whole subtree with them. The root is
/// always kept.
pub fn prune_shallow_duplicates(
    root: &ClassificationNode,
    levels: &HashMap<String, usize>,
) -> ClassificationNode {
    let children = root
        .children
        .iter()
        .filter(|child| {
            let keep = levels.get(&child.topic) == Some(&child.level);
            if !keep {
                log::debug!(
                    "Dropping \"{}\" at level {} ({} papers, {} nodes)",
                    child.topic,
                    child.level,
                    child.papers.len(),
                    child.node_count()
                );
            }
            keep
        })
        .map(|child| prune_shallow_duplicates(child, levels))
        .collect();

    ClassificationNode {
        topic: root.topic.clone(),
        specificity: root.specificity,
        path: root.path.clone(),
        level: root.level,
        papers: root.papers.clone(),
        children,
    }
}

/// Both passes: compute maximum levels, then prune
pub fn deduplicate(root: &ClassificationNode) -> ClassificationNode {
    let levels = max_levels(root);
    prune_shallow_duplicates(root, &levels)
}
