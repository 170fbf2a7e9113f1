// Clusterer trait: the seam around the partitioning step.
//
// The pipeline only needs "matrix in, dendrogram out". Agglomerative
// clustering is the default; a different partitioner can be dropped in
// without touching vectorization or summarization.

use super::agglomerative::Dendrogram;
use super::tfidf::TfIdfMatrix;
use crate::error::ClusterError;

/// Partition the rows of a document-term matrix.
pub trait Clusterer {
    /// Cluster the rows and report how the partition was reached.
    fn fit(&self, matrix: &TfIdfMatrix) -> Result<Dendrogram, ClusterError>;

    /// One label per row, in row order.
    fn fit_predict(&self, matrix: &TfIdfMatrix) -> Result<Vec<usize>, ClusterError> {
        Ok(self.fit(matrix)?.labels)
    }
}
