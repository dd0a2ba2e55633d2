use crate::priority::KeywordPriorityIndex;
use crate::types::{ClassificationPath, TopicChain, WeightedTopic};
use std::collections::BTreeSet;

/// Turns raw topic chains into canonical classification paths
///
/// Keywords sharing a specificity are interchangeable at that level, so a
/// chain expands into one path per combination of representatives. Paths
/// that skip over an unoccupied, known specificity level are discarded.
pub struct PathCanonicalizer<'a> {
    priorities: &'a KeywordPriorityIndex,
    known_specificities: BTreeSet<u32>,
}

impl<'a> PathCanonicalizer<'a> {
    pub fn new(priorities: &'a KeywordPriorityIndex) -> Self {
        Self {
            priorities,
            known_specificities: priorities.known_specificities(),
        }
    }

    /// Attach specificity and bucket by it, lowest specificity first
    pub fn group_by_specificity(&self, chain: &[String]) -> Vec<Vec<WeightedTopic>> {
        let weighted: BTreeSet<WeightedTopic> =
            chain.iter().map(|kw| self.priorities.weigh(kw)).collect();

        let mut groups: Vec<Vec<WeightedTopic>> = Vec::new();
        for topic in weighted {
            match groups.last_mut() {
                Some(group) if group[0].specificity == topic.specificity => group.push(topic),
                _ => groups.push(vec![topic]),
            }
        }
        groups
    }

    /// True if some adjacent pair climbs over a known specificity value that
    /// neither of them occupies
    pub fn is_bypassed(&self, path: &ClassificationPath) -> bool {
        path.topics().windows(2).any(|pair| {
            let (lower, upper) = (pair[0].specificity, pair[1].specificity);
            lower < upper
                && self
                    .known_specificities
                    .range(lower + 1..upper)
                    .next()
                    .is_some()
        })
    }

    /// Accepted classification paths for one chain
    pub fn canonicalize(&self, chain: &[String]) -> BTreeSet<ClassificationPath> {
        let groups = self.group_by_specificity(chain);
        expand_groups(&groups)
            .into_iter()
            .filter(|path| {
                let bypassed = self.is_bypassed(path);
                if bypassed {
                    log::debug!("Rejected bypassing path {path}");
                }
                !bypassed
            })
            .collect()
    }

    /// Union of accepted paths over all chains of one paper
    pub fn canonicalize_all<'c, I>(&self, chains: I) -> BTreeSet<ClassificationPath>
    where
        I: IntoIterator<Item = &'c TopicChain>,
    {
        chains
            .into_iter()
            .flat_map(|chain| self.canonicalize(chain))
            .collect()
    }
}

/// Append each member of `group` to each partial path
pub fn extend_partials(
    partials: &[Vec<WeightedTopic>],
    group: &[WeightedTopic],
) -> Vec<Vec<WeightedTopic>> {
    partials
        .iter()
        .flat_map(|partial| {
            group.iter().map(move |topic| {
                let mut next = partial.clone();
                next.push(topic.clone());
                next
            })
        })
        .collect()
}

/// Cartesian product over specificity buckets, one representative per bucket
///
/// Buckets must be sorted by ascending specificity. No buckets, no paths.
pub fn expand_groups(groups: &[Vec<WeightedTopic>]) -> Vec<ClassificationPath> {
    if groups.is_empty() {
        return Vec::new();
    }

    groups
        .iter()
        .fold(vec![Vec::new()], |partials, group| {
            extend_partials(&partials, group)
        })
        .into_iter()
        .map(ClassificationPath::new)
        .collect()
}

/// Convenience wrapper around [`PathCanonicalizer::canonicalize`]
pub fn canonicalize(
    chain: &[String],
    priorities: &KeywordPriorityIndex,
) -> BTreeSet<ClassificationPath> {
    PathCanonicalizer::new(priorities).canonicalize(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain(keywords: &[&str]) -> TopicChain {
        keywords.iter().map(|k| k.to_string()).collect()
    }

    fn render(paths: &BTreeSet<ClassificationPath>) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.iter()
                    .map(|t| t.name.as_str())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }

    fn path(topics: &[(&str, u32)]) -> ClassificationPath {
        ClassificationPath::new(
            topics
                .iter()
                .map(|(name, spec)| WeightedTopic::new(*name, *spec))
                .collect(),
        )
    }

    #[test]
    fn test_grouping_sorts_by_specificity_then_name() {
        let priorities = KeywordPriorityIndex::new(50).with("x", 1).with("d", 90);
        let canonicalizer = PathCanonicalizer::new(&priorities);

        let groups = canonicalizer.group_by_specificity(&chain(&["d", "z", "x", "a"]));
        let names: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|t| t.name.as_str()).collect())
            .collect();
        assert_eq!(names, vec![vec!["x"], vec!["a", "z"], vec!["d"]]);
    }

    #[test]
    fn test_single_group_yields_one_path_per_member() {
        let priorities = KeywordPriorityIndex::new(50);
        let paths = canonicalize(&chain(&["b", "a"]), &priorities);
        assert_eq!(render(&paths), vec!["a", "b"]);
    }

    #[test]
    fn test_cartesian_product_across_groups() {
        let priorities = KeywordPriorityIndex::new(50)
            .with("x", 1)
            .with("p", 30)
            .with("q", 30);
        let paths = canonicalize(&chain(&["x", "y", "p", "z", "q"]), &priorities);

        assert_eq!(render(&paths), vec!["x/p/y", "x/p/z", "x/q/y", "x/q/z"]);
        assert!(paths.iter().all(|p| p.len() == 3));
    }

    #[test]
    fn test_extend_partials_step() {
        let partials = vec![vec![WeightedTopic::new("x", 1)]];
        let group = vec![WeightedTopic::new("a", 50), WeightedTopic::new("b", 50)];

        let extended = extend_partials(&partials, &group);
        assert_eq!(
            extended,
            vec![
                vec![WeightedTopic::new("x", 1), WeightedTopic::new("a", 50)],
                vec![WeightedTopic::new("x", 1), WeightedTopic::new("b", 50)],
            ]
        );
        assert!(extend_partials(&partials, &[]).is_empty());
    }

    #[test]
    fn test_empty_chain_yields_no_paths() {
        let priorities = KeywordPriorityIndex::default();
        assert!(canonicalize(&[], &priorities).is_empty());
        assert!(expand_groups(&[]).is_empty());
    }

    #[test]
    fn test_bypass_rule_with_gap_value() {
        let with_gap = KeywordPriorityIndex::new(50)
            .with("a", 10)
            .with("b", 50)
            .with("c", 90)
            .with("d", 70);
        let canonicalizer = PathCanonicalizer::new(&with_gap);
        assert!(canonicalizer.is_bypassed(&path(&[("a", 10), ("b", 50), ("c", 90)])));
        assert!(canonicalize(&chain(&["a", "b", "c"]), &with_gap).is_empty());

        let without_gap = KeywordPriorityIndex::new(50)
            .with("a", 10)
            .with("b", 50)
            .with("c", 90);
        let canonicalizer = PathCanonicalizer::new(&without_gap);
        assert!(!canonicalizer.is_bypassed(&path(&[("a", 10), ("b", 50), ("c", 90)])));
        assert_eq!(
            render(&canonicalize(&chain(&["a", "b", "c"]), &without_gap)),
            vec!["a/b/c"]
        );
    }

    #[test]
    fn test_bypass_considers_default_specificity() {
        // 50 is only known as the default, yet it still counts as a rung.
        let priorities = KeywordPriorityIndex::new(50).with("root", 1).with("deep", 90);
        let canonicalizer = PathCanonicalizer::new(&priorities);

        assert!(canonicalizer.is_bypassed(&path(&[("root", 1), ("deep", 90)])));
        assert!(!canonicalizer.is_bypassed(&path(&[
            ("root", 1),
            ("mid", 50),
            ("deep", 90)
        ])));
        assert!(!canonicalizer.is_bypassed(&path(&[("root", 1)])));
    }

    #[test]
    fn test_canonicalize_all_deduplicates() {
        let priorities = KeywordPriorityIndex::new(50).with("x", 1);
        let canonicalizer = PathCanonicalizer::new(&priorities);
        let chains = vec![
            chain(&["x"]),
            chain(&["x", "y"]),
            chain(&["x", "y", "z"]),
            chain(&["x", "z", "y"]),
        ];

        let paths = canonicalizer.canonicalize_all(&chains);
        assert_eq!(render(&paths), vec!["x", "x/y", "x/z"]);
    }
}
