use crate::types::WeightedTopic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaxonomyError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Input does not contain any root topics")]
    NoRootTopicFound,

    #[error("Input contains more than one root topics {}", format_candidates(.candidates))]
    AmbiguousRootTopic { candidates: Vec<WeightedTopic> },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn format_candidates(candidates: &[WeightedTopic]) -> String {
    candidates
        .iter()
        .map(|t| format!("[{},{}]", t.name, t.specificity))
        .collect::<Vec<_>>()
        .join(", ")
}
