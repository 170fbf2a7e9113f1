// Typed failures for the clustering engine.
//
// The application layer (config, corpus loading, CLI) uses anyhow. The engine
// itself returns ClusterError so callers can match on the failure kind.

use thiserror::Error;

/// Everything that can make a clustering call fail.
///
/// There is no partial result: a call either clusters the whole corpus or
/// returns one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// The corpus has no documents.
    #[error("empty corpus: nothing to cluster")]
    EmptyCorpus,

    /// Every document normalized to zero terms and the policy is `Fail`.
    #[error("degenerate vocabulary: {documents} documents produced no terms")]
    DegenerateVocabulary { documents: usize },

    /// A raw article is missing a required field.
    #[error("invalid article at index {index}: missing `{field}`")]
    InvalidArticle { index: usize, field: &'static str },

    /// The distance threshold is negative or not finite.
    #[error("invalid distance threshold {0}: must be finite and >= 0")]
    InvalidThreshold(f64),

    /// A fixed cluster count of zero was requested.
    #[error("invalid cluster count {0}: must be at least 1")]
    InvalidClusterCount(usize),

    /// The label sequence does not line up with the corpus.
    #[error("label count {labels} does not match article count {articles}")]
    LabelMismatch { labels: usize, articles: usize },
}
