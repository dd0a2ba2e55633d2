use pretty_assertions::assert_eq;
use std::collections::HashMap;
use taxonomy_corpus::{KeywordIndex, Paper};
use taxonomy_graph::{
    build_topic_hierarchy, collect_per_paper_chains, max_levels, ClassificationConfig,
    ClassificationNode, Classifier, KeywordPriorityIndex, TaxonomyError,
};

fn index(papers: &[(u32, &[&str])]) -> KeywordIndex {
    let mut index = KeywordIndex::new();
    for (reference_index, keywords) in papers {
        index.insert(
            Paper::new(*reference_index).title(format!("Paper {reference_index}")),
            keywords.iter().copied(),
        );
    }
    index
}

fn refs(node: &ClassificationNode) -> Vec<u32> {
    node.papers.iter().map(|p| p.reference_index).collect()
}

fn outline(node: &ClassificationNode) -> Vec<String> {
    node.iter()
        .map(|n| format!("{}{} {:?}", "  ".repeat(n.level - 1), n.topic, refs(n)))
        .collect()
}

/// A small corpus around "sentiment analysis" with three specificity levels
fn sentiment_corpus() -> (KeywordIndex, KeywordPriorityIndex) {
    let index = index(&[
        (1, &["sentiment analysis", "machine learning", "svm"]),
        (2, &["sentiment analysis", "machine learning", "lstm"]),
        (3, &["sentiment analysis", "deep learning", "lstm"]),
        (4, &["sentiment analysis", "lexicon"]),
        (5, &["sentiment analysis", "machine learning", "deep learning", "cnn"]),
        (6, &["bitcoin", "lstm"]),
    ]);
    let priorities = KeywordPriorityIndex::new(50)
        .with("sentiment analysis", 1)
        .with("machine learning", 30)
        .with("deep learning", 30)
        .with("lexicon", 30);
    (index, priorities)
}

fn classifier(root: &str, min_papers: usize, priorities: KeywordPriorityIndex) -> Classifier {
    Classifier::new(
        ClassificationConfig::new(root).min_papers_per_branch(min_papers),
        priorities,
    )
    .unwrap()
}

#[test]
fn equal_specificity_alternatives_attach_to_their_own_papers() {
    let index = index(&[(1, &["x", "y"]), (2, &["x", "y", "z"])]);
    let priorities = KeywordPriorityIndex::new(50).with("x", 1);

    let result = classifier("x", 1, priorities).classify(&index).unwrap();

    assert_eq!(
        outline(&result.tree),
        vec!["x [1, 2]", "  y [1, 2]", "  z [2]"]
    );
}

#[test]
fn branch_below_paper_threshold_is_a_leaf() {
    let index = index(&[
        (1, &["x", "y", "a", "b"]),
        (2, &["x", "y", "a", "b"]),
        (3, &["x", "w"]),
    ]);

    let hierarchy = build_topic_hierarchy("x", &index, Vec::<String>::new(), 8, 3);
    let y = hierarchy.find_chain(&["x", "y"]).unwrap();

    assert_eq!(y.papers.len(), 2);
    assert!(y.is_leaf());
    assert_eq!(
        y.candidate_keywords.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[test]
fn classification_is_deterministic() {
    let (index, priorities) = sentiment_corpus();
    let first = classifier("sentiment analysis", 1, priorities.clone())
        .classify(&index)
        .unwrap();
    let second = classifier("sentiment analysis", 1, priorities)
        .classify(&index)
        .unwrap();

    assert_eq!(first.tree, second.tree);
    assert_eq!(
        serde_json::to_string(&first.tree).unwrap(),
        serde_json::to_string(&second.tree).unwrap()
    );
}

#[test]
fn sentiment_corpus_tree_shape() {
    let (index, priorities) = sentiment_corpus();
    let result = classifier("sentiment analysis", 1, priorities)
        .classify(&index)
        .unwrap();

    assert_eq!(result.coverage.total_papers, 6);
    assert_eq!(result.coverage.topic_papers, 5);
    assert_eq!(
        outline(&result.tree),
        vec![
            "sentiment analysis [1, 2, 3, 4, 5]",
            "  deep learning [3, 5]",
            "    cnn [5]",
            "    lstm [3]",
            "  lexicon [4]",
            "  machine learning [1, 2, 5]",
            "    cnn [5]",
            "    lstm [2]",
            "    svm [1]",
        ]
    );
}

#[test]
fn tree_invariants_hold() {
    let (index, priorities) = sentiment_corpus();
    let result = classifier("sentiment analysis", 1, priorities)
        .classify(&index)
        .unwrap();
    let tree = &result.tree;

    // Single root matching the topic of interest.
    assert_eq!(tree.iter().filter(|n| n.level == 1).count(), 1);
    assert_eq!(tree.topic, "sentiment analysis");

    for node in tree.iter() {
        assert_eq!(node.level, node.path.len());
        let specs: Vec<u32> = node.path.iter().map(|t| t.specificity).collect();
        assert!(specs.windows(2).all(|w| w[0] <= w[1]), "{specs:?}");
        assert_eq!(node.path.last(), Some(&node.weighted_topic()));

        for child in &node.children {
            assert_eq!(child.path.prefix(node.level), node.path);
            assert_eq!(child.level, node.level + 1);
        }
        let keys: Vec<(u32, &str)> = node
            .children
            .iter()
            .map(|c| (c.specificity, c.topic.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}

#[test]
fn root_sharing_specificity_with_a_co_keyword_is_ambiguous() {
    let index = index(&[
        (1, &["r", "a", "b"]),
        (2, &["r", "b"]),
        (3, &["r", "a"]),
    ]);
    let priorities = KeywordPriorityIndex::new(50).with("r", 1).with("a", 1);
    let classifier = Classifier::new(
        ClassificationConfig::new("r").min_papers_per_branch(1),
        priorities,
    )
    .unwrap();

    // r and a share specificity 1, so both collapse into length-1 paths.
    let result = classifier.classify(&index);
    match result {
        Err(TaxonomyError::AmbiguousRootTopic { candidates }) => {
            let names: Vec<&str> = candidates.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, vec!["a", "r"]);
        }
        other => panic!("expected ambiguous root, got {:?}", other.map(|c| c.tree)),
    }
}

#[test]
fn dedup_leaves_no_shallow_duplicates() {
    let (index, priorities) = sentiment_corpus();
    let result = classifier("sentiment analysis", 1, priorities)
        .classify(&index)
        .unwrap();

    let levels: HashMap<String, usize> = max_levels(&result.tree);
    for node in result.tree.iter() {
        assert_eq!(levels.get(&node.topic), Some(&node.level), "{}", node.topic);
    }
}

#[test]
fn chains_cover_every_paper_under_the_root() {
    let (index, _) = sentiment_corpus();
    let hierarchy = build_topic_hierarchy("sentiment analysis", &index, ["lexicon"], 8, 1);
    let chains = collect_per_paper_chains(&hierarchy);

    let papers: Vec<u32> = chains.keys().map(|p| p.reference_index).collect();
    assert_eq!(papers, vec![1, 2, 3, 4, 5]);

    // Paper 4 only carries the pruned keyword besides the root.
    let paper_four = chains.get(&Paper::new(4)).unwrap();
    assert_eq!(paper_four.len(), 1);
    assert!(hierarchy.iter().all(|n| !n.chain.contains(&"lexicon".to_string())));
}

#[test]
fn bypassing_paths_are_dropped_from_the_tree() {
    let index = index(&[(1, &["a", "b", "c"]), (2, &["a", "b", "c", "d"])]);
    let priorities = KeywordPriorityIndex::new(50)
        .with("a", 10)
        .with("b", 50)
        .with("c", 90)
        .with("d", 70);

    let result = classifier("a", 1, priorities).classify(&index).unwrap();

    // b -> c skips the rung at 70, so it only survives through d.
    assert_eq!(
        outline(&result.tree),
        vec!["a [1, 2]", "  b [1, 2]", "    d [2]", "      c [2]"]
    );
}
