// Agglomerative (bottom-up) hierarchical clustering with a distance threshold.
//
// Every document starts as its own cluster. The closest pair of clusters is
// merged repeatedly until the closest remaining pair is farther apart than the
// threshold. Inter-cluster distances are updated in place with the
// Lance–Williams recurrences, so the document distance matrix is computed once.
//
// A cluster lives in the slot of its lowest member index. Merging slots i < j
// keeps slot i, which makes the tie-break ("lowest (i, j) pair wins") and the
// final label order both depend only on document order.
//
// Pairs at UNRELATED_DISTANCE or beyond share no terms at all and are never
// merged under a distance threshold, whatever its value. A fixed cluster
// count instead merges until exactly that many clusters remain, related or
// not. O(n²) memory, O(n³) time: fine for a feed batch of a few hundred
// articles, not for tens of thousands.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::distance::{pairwise_distances, DistanceMatrix};
use super::tfidf::TfIdfMatrix;
use super::traits::Clusterer;
use crate::error::ClusterError;

/// Default merge cutoff.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 1.5;

/// Cosine distance of two non-negative vectors with no terms in common.
pub const UNRELATED_DISTANCE: f64 = 1.0;

/// How the distance between two clusters is derived from member distances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Mean of all cross-cluster document distances.
    #[default]
    Average,
    /// Largest cross-cluster document distance.
    Complete,
    /// Smallest cross-cluster document distance.
    Single,
}

impl Linkage {
    /// Distance from the union of clusters `i` and `j` to a third cluster `k`.
    fn update(self, d_ik: f64, d_jk: f64, size_i: usize, size_j: usize) -> f64 {
        match self {
            Linkage::Average => {
                let (ni, nj) = (size_i as f64, size_j as f64);
                (ni * d_ik + nj * d_jk) / (ni + nj)
            }
            Linkage::Complete => d_ik.max(d_jk),
            Linkage::Single => d_ik.min(d_jk),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Linkage::Average => "average",
            Linkage::Complete => "complete",
            Linkage::Single => "single",
        }
    }
}

impl FromStr for Linkage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" => Ok(Linkage::Average),
            "complete" => Ok(Linkage::Complete),
            "single" => Ok(Linkage::Single),
            other => Err(format!(
                "unknown linkage '{other}' (expected average, complete or single)"
            )),
        }
    }
}

impl std::fmt::Display for Linkage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when the matrix has no columns (every document was empty).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyVocabularyPolicy {
    /// Put every document in one cluster.
    #[default]
    SingleCluster,
    /// Return `ClusterError::DegenerateVocabulary`.
    Fail,
}

impl FromStr for EmptyVocabularyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-cluster" | "single" => Ok(EmptyVocabularyPolicy::SingleCluster),
            "fail" => Ok(EmptyVocabularyPolicy::Fail),
            other => Err(format!(
                "unknown empty-vocabulary policy '{other}' (expected single-cluster or fail)"
            )),
        }
    }
}

/// When to stop merging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopRule {
    /// Stop once the closest related pair is farther apart than this.
    Threshold(f64),
    /// Merge until this many clusters remain.
    Clusters(usize),
}

impl std::fmt::Display for StopRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopRule::Threshold(t) => write!(f, "threshold {t}"),
            StopRule::Clusters(k) => write!(f, "{k} clusters"),
        }
    }
}

/// Cluster count for a corpus of `documents` articles when none is given.
///
/// Fewer than 3 articles are too few to group, so each stays on its own.
pub fn suggested_cluster_count(documents: usize) -> usize {
    match documents {
        0..=2 => documents,
        3..=4 => 2,
        5..=19 => 3,
        20..=49 => 6,
        _ => 10,
    }
}

/// One merge step. `left` and `right` are the slots (lowest member index) of the merged clusters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    /// Size of the merged cluster.
    pub size: usize,
}

/// Result of a clustering run: flat labels plus the merge history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dendrogram {
    /// One label per document. Labels are `0..k`, numbered by each cluster's lowest member.
    pub labels: Vec<usize>,
    pub merges: Vec<Merge>,
}

impl Dendrogram {
    pub fn n_clusters(&self) -> usize {
        self.labels.iter().max().map_or(0, |&max| max + 1)
    }
}

/// Bottom-up clustering stopped by a distance threshold or a cluster count.
#[derive(Debug, Clone)]
pub struct AgglomerativeClustering {
    pub stop_rule: StopRule,
    pub linkage: Linkage,
    pub empty_vocabulary: EmptyVocabularyPolicy,
}

impl Default for AgglomerativeClustering {
    fn default() -> Self {
        Self::new(DEFAULT_DISTANCE_THRESHOLD)
    }
}

impl AgglomerativeClustering {
    pub fn new(distance_threshold: f64) -> Self {
        Self::with_stop_rule(StopRule::Threshold(distance_threshold))
    }

    /// Merge until exactly `n_clusters` clusters remain (or no merge is left).
    pub fn with_n_clusters(n_clusters: usize) -> Self {
        Self::with_stop_rule(StopRule::Clusters(n_clusters))
    }

    pub fn with_stop_rule(stop_rule: StopRule) -> Self {
        Self {
            stop_rule,
            linkage: Linkage::default(),
            empty_vocabulary: EmptyVocabularyPolicy::default(),
        }
    }

    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    pub fn with_empty_vocabulary(mut self, policy: EmptyVocabularyPolicy) -> Self {
        self.empty_vocabulary = policy;
        self
    }

    fn check_stop_rule(&self) -> Result<(), ClusterError> {
        match self.stop_rule {
            StopRule::Threshold(t) if !t.is_finite() || t < 0.0 => {
                Err(ClusterError::InvalidThreshold(t))
            }
            StopRule::Clusters(0) => Err(ClusterError::InvalidClusterCount(0)),
            _ => Ok(()),
        }
    }

    /// Cluster from a precomputed distance matrix.
    pub fn fit_distances(&self, distances: &DistanceMatrix) -> Result<Dendrogram, ClusterError> {
        self.check_stop_rule()?;
        let n = distances.len();
        if n == 0 {
            return Err(ClusterError::EmptyCorpus);
        }

        let mut dist = distances.as_slice().to_vec();
        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        let mut active = vec![true; n];
        let mut merges = Vec::new();

        let (target, related_only) = match self.stop_rule {
            StopRule::Threshold(_) => (1, true),
            StopRule::Clusters(k) => (k, false),
        };

        while n - merges.len() > target {
            let Some((i, j, d_ij)) = closest_pair(&dist, &active, n, related_only) else {
                debug!("No related clusters left to merge");
                break;
            };
            if let StopRule::Threshold(threshold) = self.stop_rule {
                if d_ij > threshold {
                    debug!(distance = d_ij, threshold, "Closest pair exceeds threshold");
                    break;
                }
            }

            let (size_i, size_j) = (members[i].len(), members[j].len());
            for k in (0..n).filter(|&k| active[k] && k != i && k != j) {
                let d = self.linkage.update(dist[i * n + k], dist[j * n + k], size_i, size_j);
                dist[i * n + k] = d;
                dist[k * n + i] = d;
            }

            let absorbed = std::mem::take(&mut members[j]);
            members[i].extend(absorbed);
            members[i].sort_unstable();
            active[j] = false;

            merges.push(Merge {
                left: i,
                right: j,
                distance: d_ij,
                size: members[i].len(),
            });
        }

        let mut labels = vec![0usize; n];
        for (label, slot) in (0..n).filter(|&s| active[s]).enumerate() {
            for &doc in &members[slot] {
                labels[doc] = label;
            }
        }

        let dendrogram = Dendrogram { labels, merges };
        info!(
            documents = n,
            clusters = dendrogram.n_clusters(),
            merges = dendrogram.merges.len(),
            linkage = %self.linkage,
            stop = %self.stop_rule,
            "Agglomerative clustering finished"
        );
        Ok(dendrogram)
    }
}

impl Clusterer for AgglomerativeClustering {
    fn fit(&self, matrix: &TfIdfMatrix) -> Result<Dendrogram, ClusterError> {
        self.check_stop_rule()?;
        let n = matrix.n_rows();
        if n == 0 {
            return Err(ClusterError::EmptyCorpus);
        }

        if matrix.n_cols() == 0 {
            return match self.empty_vocabulary {
                EmptyVocabularyPolicy::SingleCluster => {
                    info!(documents = n, "Empty vocabulary, placing every article in one cluster");
                    Ok(Dendrogram {
                        labels: vec![0; n],
                        merges: Vec::new(),
                    })
                }
                EmptyVocabularyPolicy::Fail => {
                    Err(ClusterError::DegenerateVocabulary { documents: n })
                }
            };
        }

        self.fit_distances(&pairwise_distances(matrix))
    }
}

/// Closest mergeable pair of active slots, lowest `(i, j)` on ties.
fn closest_pair(
    dist: &[f64],
    active: &[bool],
    n: usize,
    related_only: bool,
) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for i in (0..n).filter(|&i| active[i]) {
        for j in ((i + 1)..n).filter(|&j| active[j]) {
            let d = dist[i * n + j];
            if related_only && d >= UNRELATED_DISTANCE {
                continue;
            }
            if best.map_or(true, |(_, _, b)| d < b) {
                best = Some((i, j, d));
            }
        }
    }
    best
}
