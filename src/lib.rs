// Storyline: group news articles into stories
//
// This is the library root. The clustering engine lives in `text` and
// `cluster`; `pipeline` ties it together, and `corpus`, `config` and
// `output` serve the command-line front end.

pub mod cluster;
pub mod config;
pub mod corpus;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod text;

pub use corpus::Article;
pub use error::ClusterError;
pub use pipeline::{cluster_articles, ClusterCache, ClusterCount, ClusterResult, EngineParams};
