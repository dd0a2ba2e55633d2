use crate::dedup::deduplicate;
use crate::error::{Result, TaxonomyError};
use crate::types::{ClassificationNode, ClassificationPath};
use std::collections::{BTreeMap, BTreeSet};
use taxonomy_corpus::Paper;

/// Assembles per-paper classification paths into a single-root tree
///
/// Identical paths share one node whose papers are the union of every paper
/// that produced the path. After insertion, shallow occurrences of a topic
/// that also appears deeper elsewhere are pruned.
pub struct ClassificationTreeAssembler {
    papers_by_path: BTreeMap<ClassificationPath, BTreeSet<Paper>>,
}

impl ClassificationTreeAssembler {
    pub fn new(per_paper_paths: &BTreeMap<Paper, BTreeSet<ClassificationPath>>) -> Self {
        let mut papers_by_path: BTreeMap<ClassificationPath, BTreeSet<Paper>> = BTreeMap::new();
        for (paper, paths) in per_paper_paths {
            for path in paths.iter().filter(|p| !p.is_empty()) {
                papers_by_path
                    .entry(path.clone())
                    .or_default()
                    .insert(paper.clone());
            }
        }
        Self { papers_by_path }
    }

    /// Distinct length-1 paths; exactly one is required
    pub fn root_candidates(&self) -> Vec<&ClassificationPath> {
        self.papers_by_path.keys().filter(|p| p.len() == 1).collect()
    }

    /// Build the tree and run the duplicate-topic pass
    pub fn assemble(&self) -> Result<ClassificationNode> {
        let raw = self.assemble_raw()?;
        let tree = deduplicate(&raw);

        log::info!(
            "Assembled classification tree for \"{}\": {} nodes ({} before duplicate pruning)",
            tree.topic,
            tree.node_count(),
            raw.node_count()
        );

        Ok(tree)
    }

    /// Build the tree without pruning duplicate topics
    pub fn assemble_raw(&self) -> Result<ClassificationNode> {
        let root_path = self.single_root()?;
        let root_papers = self
            .papers_by_path
            .get(root_path)
            .cloned()
            .unwrap_or_default();
        let mut root = ClassificationNode::new(root_path.clone(), root_papers);

        for (path, papers) in self.papers_by_path.iter().filter(|(p, _)| p.len() > 1) {
            insert(&mut root, path, papers);
        }

        Ok(root)
    }

    fn single_root(&self) -> Result<&ClassificationPath> {
        let candidates = self.root_candidates();
        match candidates.as_slice() {
            [] => Err(TaxonomyError::NoRootTopicFound),
            [root] => Ok(*root),
            _ => Err(TaxonomyError::AmbiguousRootTopic {
                candidates: candidates
                    .iter()
                    .filter_map(|p| p.get(0).cloned())
                    .collect(),
            }),
        }
    }
}

/// Insert `path` below `node`, creating intermediate nodes as needed
fn insert(node: &mut ClassificationNode, path: &ClassificationPath, papers: &BTreeSet<Paper>) {
    let level = node.level;
    let Some(next) = path.get(level) else {
        return;
    };

    let existing = node.children.iter().position(|child| child.matches(next));

    if level + 1 == path.len() {
        match existing {
            Some(idx) => node.children[idx].papers.extend(papers.iter().cloned()),
            None => node
                .children
                .push(ClassificationNode::new(path.clone(), papers.clone())),
        }
    } else {
        let idx = existing.unwrap_or_else(|| {
            node.children.push(ClassificationNode::new(
                path.prefix(level + 1),
                BTreeSet::new(),
            ));
            node.children.len() - 1
        });
        insert(&mut node.children[idx], path, papers);
    }

    node.sort_children();
}

/// Convenience wrapper around [`ClassificationTreeAssembler::assemble`]
pub fn assemble(
    per_paper_paths: &BTreeMap<Paper, BTreeSet<ClassificationPath>>,
) -> Result<ClassificationNode> {
    ClassificationTreeAssembler::new(per_paper_paths).assemble()
}
