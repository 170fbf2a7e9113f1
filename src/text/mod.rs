// Text normalization: tokenizing, stopword removal and light stemming.

pub mod normalize;
pub mod stem;

pub use normalize::{normalize, TextNormalizer};
