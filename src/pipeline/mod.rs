// Clustering pipeline: articles in, stories out.
//
// Normalize -> vectorize -> pairwise distances -> agglomerative merge ->
// summarize. Every call builds its own vocabulary and distance matrix from
// the corpus it is given; nothing is kept between calls unless the caller
// holds a ClusterCache.

pub mod cache;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cluster::agglomerative::{
    suggested_cluster_count, AgglomerativeClustering, EmptyVocabularyPolicy, Linkage, Merge,
    StopRule, DEFAULT_DISTANCE_THRESHOLD,
};
use crate::cluster::summary::{self, ClusterSummary, SummaryOptions};
use crate::cluster::tfidf::{TextField, TfIdfVectorizer};
use crate::cluster::traits::Clusterer;
use crate::corpus::Article;
use crate::error::ClusterError;

pub use cache::ClusterCache;

/// How many stories to form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterCount {
    /// Let the distance threshold decide.
    #[default]
    ByThreshold,
    /// Exactly this many stories (fewer if the corpus is smaller).
    Fixed(usize),
    /// A count picked from the corpus size.
    BySize,
}

impl ClusterCount {
    /// Stop rule for a corpus of `documents` articles.
    pub fn stop_rule(self, distance_threshold: f64, documents: usize) -> StopRule {
        match self {
            ClusterCount::ByThreshold => StopRule::Threshold(distance_threshold),
            ClusterCount::Fixed(k) => StopRule::Clusters(k),
            // suggested count is 0 only for an empty corpus, which fails earlier
            ClusterCount::BySize => StopRule::Clusters(suggested_cluster_count(documents).max(1)),
        }
    }
}

impl FromStr for ClusterCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" => Ok(ClusterCount::ByThreshold),
            "auto" => Ok(ClusterCount::BySize),
            other => match other.parse::<usize>() {
                Ok(0) => Err("cluster count must be at least 1".to_string()),
                Ok(k) => Ok(ClusterCount::Fixed(k)),
                Err(_) => Err(format!(
                    "unknown cluster count '{other}' (expected threshold, auto or a number)"
                )),
            },
        }
    }
}

impl std::fmt::Display for ClusterCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterCount::ByThreshold => f.write_str("threshold"),
            ClusterCount::Fixed(k) => write!(f, "{k}"),
            ClusterCount::BySize => f.write_str("auto"),
        }
    }
}

/// Everything that changes the outcome of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub distance_threshold: f64,
    /// Ignored unless `cluster_count` is `ByThreshold`.
    pub cluster_count: ClusterCount,
    pub linkage: Linkage,
    pub text_field: TextField,
    pub top_keywords: usize,
    pub sample_size: usize,
    pub empty_vocabulary: EmptyVocabularyPolicy,
    pub stemming: bool,
    pub sublinear_tf: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        let summary = SummaryOptions::default();
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            cluster_count: ClusterCount::default(),
            linkage: Linkage::default(),
            text_field: TextField::default(),
            top_keywords: summary.top_keywords,
            sample_size: summary.sample_size,
            empty_vocabulary: EmptyVocabularyPolicy::default(),
            stemming: false,
            sublinear_tf: false,
        }
    }
}

impl EngineParams {
    pub fn vectorizer(&self) -> TfIdfVectorizer {
        TfIdfVectorizer::default()
            .with_text_field(self.text_field)
            .with_stemming(self.stemming)
            .with_sublinear_tf(self.sublinear_tf)
    }

    /// Clusterer for a corpus of `documents` articles.
    pub fn clusterer(&self, documents: usize) -> AgglomerativeClustering {
        let stop_rule = self.cluster_count.stop_rule(self.distance_threshold, documents);
        AgglomerativeClustering::with_stop_rule(stop_rule)
            .with_linkage(self.linkage)
            .with_empty_vocabulary(self.empty_vocabulary)
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            top_keywords: self.top_keywords,
            sample_size: self.sample_size,
        }
    }
}

/// Output of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterResult {
    /// One label per input article, in input order.
    pub labels: Vec<usize>,
    pub summaries: BTreeMap<usize, ClusterSummary>,
    pub merges: Vec<Merge>,
    pub vocabulary_size: usize,
}

impl ClusterResult {
    pub fn n_clusters(&self) -> usize {
        self.summaries.len()
    }

    /// Stories with articles from more than one source.
    pub fn featured(&self) -> Vec<&ClusterSummary> {
        summary::featured(&self.summaries)
    }

    /// Look up a story by the 1-based number shown to users.
    pub fn story(&self, display_id: usize) -> Option<&ClusterSummary> {
        display_id
            .checked_sub(1)
            .and_then(|label| self.summaries.get(&label))
    }
}

/// Cluster `corpus` with the default agglomerative clusterer.
pub fn cluster_articles(
    corpus: &[Article],
    params: &EngineParams,
) -> Result<ClusterResult, ClusterError> {
    cluster_articles_with(corpus, params, &params.clusterer(corpus.len()))
}

/// Cluster `corpus` with any `Clusterer`.
pub fn cluster_articles_with(
    corpus: &[Article],
    params: &EngineParams,
    clusterer: &dyn Clusterer,
) -> Result<ClusterResult, ClusterError> {
    if corpus.is_empty() {
        return Err(ClusterError::EmptyCorpus);
    }

    // Step 1: Vectorize
    let matrix = params.vectorizer().fit_transform(corpus);

    // Step 2: Partition
    let dendrogram = clusterer.fit(&matrix)?;

    // Step 3: Summarize each story
    let summaries = summary::summarize(corpus, &dendrogram.labels, params.summary_options())?;

    info!(
        articles = corpus.len(),
        vocabulary = matrix.n_cols(),
        clusters = summaries.len(),
        "Clustered articles"
    );

    Ok(ClusterResult {
        labels: dendrogram.labels,
        summaries,
        merges: dendrogram.merges,
        vocabulary_size: matrix.n_cols(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::agglomerative::Dendrogram;
    use crate::cluster::tfidf::TfIdfMatrix;

    /// Puts every article in its own cluster.
    struct Singletons;

    impl Clusterer for Singletons {
        fn fit(&self, matrix: &TfIdfMatrix) -> Result<Dendrogram, ClusterError> {
            Ok(Dendrogram {
                labels: (0..matrix.n_rows()).collect(),
                merges: Vec::new(),
            })
        }
    }

    fn corpus() -> Vec<Article> {
        vec![
            Article::new("a", "Senate vote", "senate ballots senate").with_keywords(["senate"]),
            Article::new("b", "Senate count", "senate ballots tally").with_keywords(["ballots"]),
            Article::new("c", "Volcano", "volcano lava eruption").with_keywords(["volcano"]),
        ]
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let err = cluster_articles(&[], &EngineParams::default()).unwrap_err();
        assert_eq!(err, ClusterError::EmptyCorpus);
    }

    #[test]
    fn test_default_params() {
        let params = EngineParams::default();
        assert_eq!(params.distance_threshold, 1.5);
        assert_eq!(params.linkage, Linkage::Average);
        assert_eq!(params.top_keywords, 10);
        assert_eq!(params.sample_size, 2);
    }

    #[test]
    fn test_related_articles_share_a_story() {
        let result = cluster_articles(&corpus(), &EngineParams::default()).unwrap();
        assert_eq!(result.labels, vec![0, 0, 1]);
        assert_eq!(result.n_clusters(), 2);
        assert_eq!(result.summaries[&0].top_keywords, vec!["senate", "ballots"]);
        assert_eq!(result.merges.len(), 1);
        assert!(result.vocabulary_size > 0);
    }

    #[test]
    fn test_custom_clusterer_is_used() {
        let result = cluster_articles_with(&corpus(), &EngineParams::default(), &Singletons).unwrap();
        assert_eq!(result.labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_fixed_count_merges_unrelated_stories() {
        let params = EngineParams {
            cluster_count: ClusterCount::Fixed(1),
            ..EngineParams::default()
        };
        let result = cluster_articles(&corpus(), &params).unwrap();
        assert_eq!(result.labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_by_size_picks_count_from_corpus() {
        let params = EngineParams {
            cluster_count: ClusterCount::BySize,
            ..EngineParams::default()
        };
        // 3 articles -> 2 stories
        let result = cluster_articles(&corpus(), &params).unwrap();
        assert_eq!(result.n_clusters(), 2);
        assert_eq!(params.clusterer(1).stop_rule, StopRule::Clusters(1));
        assert_eq!(params.clusterer(60).stop_rule, StopRule::Clusters(10));
    }

    #[test]
    fn test_cluster_count_parsing() {
        assert_eq!("auto".parse::<ClusterCount>(), Ok(ClusterCount::BySize));
        assert_eq!("threshold".parse::<ClusterCount>(), Ok(ClusterCount::ByThreshold));
        assert_eq!(" 4 ".parse::<ClusterCount>(), Ok(ClusterCount::Fixed(4)));
        assert!("0".parse::<ClusterCount>().is_err());
        assert!("many".parse::<ClusterCount>().is_err());
    }

    #[test]
    fn test_story_lookup_is_one_based() {
        let result = cluster_articles(&corpus(), &EngineParams::default()).unwrap();
        assert_eq!(result.story(1).map(|s| s.cluster_label), Some(0));
        assert_eq!(result.story(2).map(|s| s.cluster_label), Some(1));
        assert!(result.story(0).is_none());
        assert!(result.story(3).is_none());
    }
}
