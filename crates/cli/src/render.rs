use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use taxonomy_corpus::{KeywordStats, Paper};
use taxonomy_graph::{ClassificationNode, Coverage, TopicChain, TopicHierarchyNode};

/// Leading whitespace for one tree level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indentation {
    pub start: usize,
    pub unit: String,
    pub span: usize,
    pub suffix: String,
}

impl Default for Indentation {
    fn default() -> Self {
        Self {
            start: 0,
            unit: " ".to_string(),
            span: 3,
            suffix: String::new(),
        }
    }
}

impl Indentation {
    pub fn indent(&self) -> String {
        let mut out = self.unit.repeat(self.start * self.span);
        out.push_str(&self.suffix);
        out
    }

    /// Same settings, one level deeper
    pub fn nested(&self) -> Self {
        Self {
            start: self.start + 1,
            ..self.clone()
        }
    }

    pub fn is_top(&self) -> bool {
        self.start == 0
    }
}

pub fn render_topic_tree(node: &TopicHierarchyNode) -> String {
    let mut out = String::new();
    write_topic_node(&mut out, node, &Indentation::default());
    out
}

fn write_topic_node(out: &mut String, node: &TopicHierarchyNode, indentation: &Indentation) {
    let indent = indentation.indent();
    let _ = writeln!(out, "{indent} # {} - [{}]", node.keyword, node.chain.join(", "));
    let candidates: Vec<&str> = node.candidate_keywords.iter().map(String::as_str).collect();
    let _ = writeln!(out, "{indent}   * [{}]", candidates.join(", "));
    for paper in &node.papers {
        let _ = writeln!(out, "{indent}   - {} {}", paper.reference_index, paper.display_title());
    }

    let nested = indentation.nested();
    for child in &node.children {
        write_topic_node(out, child, &nested);
    }
}

/// Each paper followed by its chains, shortest first
pub fn render_paper_chains(chains: &BTreeMap<Paper, BTreeSet<TopicChain>>) -> String {
    let mut out = String::new();
    for (paper, paper_chains) in chains {
        let _ = writeln!(out, "[{}] {}", paper.reference_index, paper.display_title());
        let mut ordered: Vec<&TopicChain> = paper_chains.iter().collect();
        ordered.sort_by_key(|chain| chain.len());
        for chain in ordered {
            let _ = writeln!(out, "   {}", chain.join(", "));
        }
    }
    out
}

pub fn render_classification_tree(node: &ClassificationNode) -> String {
    let mut out = String::new();
    write_classification_node(&mut out, node, &Indentation::default());
    out
}

fn write_classification_node(
    out: &mut String,
    node: &ClassificationNode,
    indentation: &Indentation,
) {
    let indent = indentation.indent();
    let _ = writeln!(out, "{indent} # {} - {} {}", node.topic, node.specificity, node.path);
    for paper in &node.papers {
        let _ = writeln!(out, "{indent}   - {} {}", paper.reference_index, paper.display_title());
    }

    let nested = indentation.nested();
    for child in &node.children {
        write_classification_node(out, child, &nested);
    }
}

pub fn render_coverage(topic: &str, coverage: &Coverage) -> String {
    format!(
        "Total papers: {}\nPapers under \"{topic}\": {}\nTopic coverage: {:.3}\n",
        coverage.total_papers,
        coverage.topic_papers,
        coverage.ratio()
    )
}

pub fn render_keyword_stats(stats: &[KeywordStats]) -> String {
    let mut out = String::new();
    for entry in stats {
        let _ = writeln!(
            out,
            "{} ({} papers) => [{}]",
            entry.keyword,
            entry.paper_count,
            entry.related_keywords.join(", ")
        );
    }
    out
}
