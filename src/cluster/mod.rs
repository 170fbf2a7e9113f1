// Story clustering: TF-IDF vectors, cosine distance, agglomerative
// clustering and per-story summaries.

pub mod agglomerative;
pub mod distance;
pub mod summary;
pub mod tfidf;
pub mod traits;

pub use agglomerative::{
    suggested_cluster_count, AgglomerativeClustering, Dendrogram, EmptyVocabularyPolicy, Linkage,
    Merge, StopRule, DEFAULT_DISTANCE_THRESHOLD,
};
pub use distance::{cosine_distance, pairwise_distances, DistanceMatrix};
pub use summary::{featured, summarize, ClusterSummary, SampleArticle, SummaryOptions};
pub use tfidf::{compute_tfidf, SparseVector, TextField, TfIdfMatrix, TfIdfVectorizer};
pub use traits::Clusterer;
