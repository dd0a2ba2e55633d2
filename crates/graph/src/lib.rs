//! # Taxonomy Graph
//!
//! Builds a topic hierarchy and a classification tree from keyword-tagged
//! papers.
//!
//! ## Architecture
//!
//! ```text
//! KeywordIndex (paper -> keywords)
//!     │
//!     ├──> TopicHierarchyBuilder
//!     │      ├─ expand co-occurring keywords below the root topic
//!     │      └─ stop at depth / paper-count thresholds
//!     │
//!     ├──> collect_per_paper_chains
//!     │      └─ every root-to-node chain a paper belongs to
//!     │
//!     ├──> PathCanonicalizer (KeywordPriorityIndex)
//!     │      ├─ bucket chain keywords by specificity
//!     │      ├─ one path per combination of representatives
//!     │      └─ drop paths that bypass a known specificity level
//!     │
//!     └──> ClassificationTreeAssembler
//!            ├─ single root check
//!            ├─ merge identical paths, union their papers
//!            └─ keep each topic only at its deepest level
//! ```
//!
//! ## Example
//!
//! ```rust
//! use taxonomy_corpus::{KeywordIndex, Paper};
//! use taxonomy_graph::{ClassificationConfig, Classifier, KeywordPriorityIndex};
//!
//! let mut index = KeywordIndex::new();
//! index.insert(Paper::new(1), ["x", "y"]);
//! index.insert(Paper::new(2), ["x", "y", "z"]);
//!
//! let config = ClassificationConfig::new("x").min_papers_per_branch(1);
//! let priorities = KeywordPriorityIndex::new(50).with("x", 1);
//!
//! let classification = Classifier::new(config, priorities)
//!     .unwrap()
//!     .classify(&index)
//!     .unwrap();
//! assert_eq!(classification.tree.topic, "x");
//! assert_eq!(classification.tree.children.len(), 2);
//! ```

mod assembler;
mod builder;
mod canonical;
mod collector;
mod config;
mod dedup;
mod error;
mod pipeline;
mod priority;
mod types;

pub use assembler::{assemble, ClassificationTreeAssembler};
pub use builder::{build_topic_hierarchy, TopicHierarchyBuilder};
pub use canonical::{canonicalize, expand_groups, extend_partials, PathCanonicalizer};
pub use collector::collect_per_paper_chains;
pub use config::ClassificationConfig;
pub use dedup::{deduplicate, max_levels, prune_shallow_duplicates};
pub use error::{Result, TaxonomyError};
pub use pipeline::{Classification, Classifier, Coverage};
pub use priority::KeywordPriorityIndex;
pub use types::{
    ClassificationNode, ClassificationPath, PreOrder, TopicChain, TopicHierarchyNode, TreeNode,
    WeightedTopic,
};
