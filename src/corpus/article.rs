// Article records: the typed shape of a cached news article.
//
// The cache file is written by the scraper and is loosely shaped: fields can be
// missing or null. RawArticle mirrors that shape, and validation turns it into
// an Article whose required fields are guaranteed present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ClusterError;

/// A news article as consumed by the clustering pipeline.
///
/// The engine only reads `title`, `body`, `keywords` and `source`. The other
/// fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sentiment_category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Article {
    /// Build an article with only the fields the engine needs.
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            source: String::new(),
            date: None,
            keywords: Vec::new(),
            sentiment_category: String::new(),
            image_url: None,
        }
    }

    pub fn with_keywords<S: Into<String>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// What to do when a raw record lacks `title` or `body`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Fail the whole call with `ClusterError::InvalidArticle`.
    #[default]
    Reject,
    /// Substitute an empty string and carry on.
    TreatAsEmpty,
}

/// An article record exactly as it appears in the cache file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    pub id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub source: Option<String>,
    /// `YYYY-MM-DD`; anything else is dropped with a warning.
    pub date: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub sentiment_category: Option<String>,
    pub image_url: Option<String>,
}

impl RawArticle {
    /// Turn a raw record into an `Article`.
    ///
    /// `index` is the record's position in the corpus (used in errors and as
    /// the last-resort id). `key` is the cache key the record was stored
    /// under, if the cache is a keyed object.
    pub fn validate(
        self,
        index: usize,
        key: Option<&str>,
        policy: MissingFieldPolicy,
    ) -> Result<Article, ClusterError> {
        let title = require(self.title, index, "title", policy)?;
        let body = require(self.body, index, "body", policy)?;

        let id = self
            .id
            .or_else(|| key.map(str::to_string))
            .or_else(|| self.url.clone())
            .unwrap_or_else(|| index.to_string());

        let date = self.date.as_deref().and_then(|raw| {
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(index, date = raw, error = %e, "Ignoring unparseable article date");
                    None
                }
            }
        });

        Ok(Article {
            id,
            title,
            body,
            source: self.source.unwrap_or_default(),
            date,
            keywords: self.keywords.unwrap_or_default(),
            sentiment_category: self.sentiment_category.unwrap_or_default(),
            image_url: self.image_url,
        })
    }
}

fn require(
    value: Option<String>,
    index: usize,
    field: &'static str,
    policy: MissingFieldPolicy,
) -> Result<String, ClusterError> {
    match (value, policy) {
        (Some(v), _) => Ok(v),
        (None, MissingFieldPolicy::TreatAsEmpty) => Ok(String::new()),
        (None, MissingFieldPolicy::Reject) => Err(ClusterError::InvalidArticle { index, field }),
    }
}
