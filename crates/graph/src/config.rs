use crate::error::{Result, TaxonomyError};
use serde::{Deserialize, Serialize};
use taxonomy_corpus::normalize_keyword;

/// Thresholds and root topic for a classification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Root keyword of interest
    pub interested_topic: String,

    /// Keywords never expanded as children in the topic hierarchy
    #[serde(default)]
    pub pruned_topics: Vec<String>,

    /// Minimum papers a branch needs before it is expanded
    #[serde(default = "default_threshold")]
    pub threshold_child_paper_count: usize,

    /// Maximum topic hierarchy depth (root is depth 0)
    #[serde(default = "default_threshold")]
    pub threshold_tree_depth: usize,
}

fn default_threshold() -> usize {
    8
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            interested_topic: String::new(),
            pruned_topics: Vec::new(),
            threshold_child_paper_count: default_threshold(),
            threshold_tree_depth: default_threshold(),
        }
    }
}

impl ClassificationConfig {
    pub fn new(interested_topic: impl Into<String>) -> Self {
        Self {
            interested_topic: interested_topic.into(),
            ..Default::default()
        }
    }

    /// Set pruned topics (builder pattern)
    pub fn pruned_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pruned_topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Set minimum papers per expanded branch (builder pattern)
    pub fn min_papers_per_branch(mut self, count: usize) -> Self {
        self.threshold_child_paper_count = count;
        self
    }

    /// Set maximum hierarchy depth (builder pattern)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.threshold_tree_depth = depth;
        self
    }

    /// Root keyword in normalized form
    pub fn root_keyword(&self) -> String {
        normalize_keyword(&self.interested_topic)
    }

    /// Pruned keywords in normalized form
    pub fn pruned_keywords(&self) -> Vec<String> {
        self.pruned_topics
            .iter()
            .map(|k| normalize_keyword(k))
            .filter(|k| !k.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.root_keyword().is_empty() {
            return Err(TaxonomyError::InvalidConfig(
                "interested_topic must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ClassificationConfig::new("Sentiment Analysis");
        assert_eq!(config.threshold_child_paper_count, 8);
        assert_eq!(config.threshold_tree_depth, 8);
        assert_eq!(config.root_keyword(), "sentiment analysis");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(ClassificationConfig::default().validate().is_err());
        assert!(ClassificationConfig::new("  ").validate().is_err());
        assert!(ClassificationConfig::new("x")
            .min_papers_per_branch(0)
            .validate()
            .is_ok());
        assert!(ClassificationConfig::new("x")
            .pruned_topics([" X "])
            .validate()
            .is_ok());
        assert!(ClassificationConfig::new("x")
            .pruned_topics(["y"])
            .max_depth(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: ClassificationConfig =
            serde_json::from_str(r#"{"interested_topic": "x", "threshold_tree_depth": 3}"#)
                .unwrap();
        assert_eq!(config.threshold_tree_depth, 3);
        assert_eq!(config.threshold_child_paper_count, 8);
        assert!(config.pruned_topics.is_empty());
    }
}
