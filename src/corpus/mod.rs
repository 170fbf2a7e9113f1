// Corpus handling: article records, cache loading, and the quality filter.

pub mod article;
pub mod clean;
pub mod loader;

pub use article::{Article, MissingFieldPolicy, RawArticle};
pub use clean::{clean_articles, QualityFilter, QualityRules};
pub use loader::{load_articles, parse_articles};
