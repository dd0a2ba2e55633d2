use crate::render::Indentation;
use anyhow::{Context as AnyhowContext, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use taxonomy_corpus::KeywordIndex;
use taxonomy_graph::ClassificationNode;

/// Comment in the page template replaced by the rendered tree
pub const TREE_MARKER: &str = "<!-- ### ALL TREE ITEMS GO HERE ### -->";

const PAGE_TEMPLATE: &str = include_str!("../assets/tree.html");

/// Collapsible checkbox/label tree of a classification
///
/// Element ids are the sanitized topic plus a pre-order counter, so the same
/// tree always renders to the same bytes.
pub struct HtmlRenderer<'a> {
    keywords: &'a KeywordIndex,
    next_id: usize,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(keywords: &'a KeywordIndex) -> Self {
        Self {
            keywords,
            next_id: 0,
        }
    }

    /// Full page with the tree spliced in at [`TREE_MARKER`]
    pub fn render_page(&mut self, tree: &ClassificationNode) -> String {
        PAGE_TEMPLATE.replace(TREE_MARKER, &self.render_tree(tree))
    }

    pub fn render_tree(&mut self, tree: &ClassificationNode) -> String {
        self.next_id = 0;
        let mut out = String::new();
        self.write_node(&mut out, tree, &Indentation::default());
        out
    }

    fn write_node(
        &mut self,
        out: &mut String,
        node: &ClassificationNode,
        indentation: &Indentation,
    ) {
        let indent = indentation.indent();
        let id = format!("{}_{}", element_id(&node.topic), self.next_id);
        self.next_id += 1;

        let kind = if node.is_leaf() { "LEAF" } else { "PARENT" };

        if indentation.is_top() {
            let _ = writeln!(out, "{indent} <ul class='tree'>");
        } else {
            let _ = writeln!(out, "{indent} <ul>");
        }
        let _ = writeln!(out, "{indent} <li class='section'>");
        let _ = writeln!(out, "{indent} <input type='checkbox' id='{id}_checkbox'/>");
        let _ = writeln!(
            out,
            "{indent} <label for='{id}_checkbox' id='{id}_label'>[{kind}] {} ({} papers)</label>",
            escape(&node.topic),
            node.papers.len()
        );

        for paper in &node.papers {
            let keywords = self
                .keywords
                .get(paper.reference_index)
                .map(|entry| {
                    entry
                        .keywords
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{indent} <p> {} {} | Keywords -> [{}] </p>",
                paper.reference_index,
                escape(paper.display_title()),
                escape(&keywords)
            );
        }

        let nested = indentation.nested();
        for child in &node.children {
            self.write_node(out, child, &nested);
        }

        let _ = writeln!(out, "{indent} </li>");
        let _ = writeln!(out, "{indent} </ul>");
    }
}

/// `<topic_with_underscores>.html`, with path separators and dots replaced too
pub fn page_file_name(topic: &str) -> String {
    format!("{}.html", element_id(topic))
}

/// Write the page into `dir`, creating it if needed. Other files are kept.
pub fn write_page(
    dir: &Path,
    tree: &ClassificationNode,
    keywords: &KeywordIndex,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(page_file_name(&tree.topic));
    let page = HtmlRenderer::new(keywords).render_page(tree);
    fs::write(&path, page).with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Wrote classification tree to {}", path.display());
    Ok(path)
}

fn element_id(topic: &str) -> String {
    topic
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
