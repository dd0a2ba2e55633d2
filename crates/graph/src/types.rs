use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use taxonomy_corpus::Paper;

/// Root-first keyword chain from the topic hierarchy
pub type TopicChain = Vec<String>;

/// Keyword with its specificity attached
///
/// Field order matters: the derived ordering is (specificity, name), which is
/// the tie-break used everywhere paths and children are sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WeightedTopic {
    pub specificity: u32,
    pub name: String,
}

impl WeightedTopic {
    pub fn new(name: impl Into<String>, specificity: u32) -> Self {
        Self {
            specificity,
            name: name.into(),
        }
    }
}

impl fmt::Display for WeightedTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.name, self.specificity)
    }
}

/// Canonical classification path, one topic per distinct specificity level
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassificationPath(Vec<WeightedTopic>);

impl ClassificationPath {
    /// Build a path, sorting by (specificity, name)
    pub fn new(mut topics: Vec<WeightedTopic>) -> Self {
        topics.sort();
        Self(topics)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn topics(&self) -> &[WeightedTopic] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&WeightedTopic> {
        self.0.get(index)
    }

    pub fn last(&self) -> Option<&WeightedTopic> {
        self.0.last()
    }

    /// First `len` topics as a path of their own
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedTopic> {
        self.0.iter()
    }
}

impl fmt::Display for ClassificationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Node of the topic (co-occurrence) hierarchy
#[derive(Debug, Clone, Serialize)]
pub struct TopicHierarchyNode {
    pub keyword: String,

    /// Full keyword chain from the root, ending with `keyword`
    pub chain: TopicChain,

    /// 0 for the root
    pub depth: usize,

    /// Papers whose keyword set is a superset of `chain`
    pub papers: BTreeSet<Paper>,

    /// Keywords of those papers not yet in the chain and not pruned
    pub candidate_keywords: BTreeSet<String>,

    /// Children in lexicographic keyword order
    pub children: Vec<TopicHierarchyNode>,
}

impl TopicHierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Pre-order traversal
    pub fn iter(&self) -> PreOrder<'_, Self> {
        PreOrder::new(self)
    }

    /// First node (pre-order) whose chain equals `chain`
    pub fn find_chain<S: AsRef<str>>(&self, chain: &[S]) -> Option<&Self> {
        self.iter().find(|node| {
            node.chain.len() == chain.len()
                && node.chain.iter().zip(chain).all(|(a, b)| a == b.as_ref())
        })
    }
}

/// Node of the final classification tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationNode {
    pub topic: String,

    pub specificity: u32,

    /// Path from the root down to and including this node
    pub path: ClassificationPath,

    /// 1-based; equals `path.len()`
    pub level: usize,

    pub papers: BTreeSet<Paper>,

    /// Sorted by (specificity, topic)
    pub children: Vec<ClassificationNode>,
}

impl ClassificationNode {
    pub(crate) fn new(path: ClassificationPath, papers: BTreeSet<Paper>) -> Self {
        let (topic, specificity) = path
            .last()
            .map(|t| (t.name.clone(), t.specificity))
            .unwrap_or_default();
        let level = path.len();
        Self {
            topic,
            specificity,
            path,
            level,
            papers,
            children: Vec::new(),
        }
    }

    pub fn weighted_topic(&self) -> WeightedTopic {
        WeightedTopic::new(self.topic.clone(), self.specificity)
    }

    pub(crate) fn matches(&self, topic: &WeightedTopic) -> bool {
        self.topic == topic.name && self.specificity == topic.specificity
    }

    pub(crate) fn sort_children(&mut self) {
        self.children
            .sort_by(|a, b| (a.specificity, &a.topic).cmp(&(b.specificity, &b.topic)));
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Pre-order traversal
    pub fn iter(&self) -> PreOrder<'_, Self> {
        PreOrder::new(self)
    }

    /// All nodes (pre-order) for a topic keyword
    pub fn find_all<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.iter().filter(move |node| node.topic == topic)
    }

    /// First node (pre-order) for a topic keyword
    pub fn find(&self, topic: &str) -> Option<&Self> {
        self.iter().find(|node| node.topic == topic)
    }
}

/// Trees that expose their children in order
pub trait TreeNode: Sized {
    fn child_nodes(&self) -> &[Self];
}

impl TreeNode for TopicHierarchyNode {
    fn child_nodes(&self) -> &[Self] {
        &self.children
    }
}

impl TreeNode for ClassificationNode {
    fn child_nodes(&self) -> &[Self] {
        &self.children
    }
}

/// Explicit-stack pre-order iterator
pub struct PreOrder<'a, T: TreeNode> {
    stack: Vec<&'a T>,
}

impl<'a, T: TreeNode> PreOrder<'a, T> {
    fn new(root: &'a T) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a, T: TreeNode> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_nodes().iter().rev());
        Some(node)
    }
}
