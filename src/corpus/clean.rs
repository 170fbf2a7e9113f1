// Article quality filter.
//
// Scraped feeds contain stubs: paywall teasers, photo captions, video pages
// with no text. These rules drop records too thin to cluster meaningfully.
// Whitespace runs stand in for word gaps, so "3 runs" means at least 4 words.

use anyhow::Result;
use regex_lite::Regex;
use tracing::info;

use super::article::Article;

/// Thresholds for the quality filter.
#[derive(Debug, Clone)]
pub struct QualityRules {
    pub min_title_gaps: usize,
    pub min_body_gaps: usize,
    pub require_image: bool,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            min_title_gaps: 3,
            min_body_gaps: 20,
            require_image: true,
        }
    }
}

/// Compiled quality filter.
pub struct QualityFilter {
    rules: QualityRules,
    whitespace: Regex,
}

impl QualityFilter {
    pub fn new(rules: QualityRules) -> Result<Self> {
        Ok(Self {
            rules,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Whether an article passes every rule.
    pub fn accepts(&self, article: &Article) -> bool {
        if article.title.is_empty() || article.body.is_empty() {
            return false;
        }
        if self.rules.require_image && article.image_url.as_deref().unwrap_or("").is_empty() {
            return false;
        }
        self.gaps(&article.title) >= self.rules.min_title_gaps
            && self.gaps(&article.body) >= self.rules.min_body_gaps
    }

    fn gaps(&self, text: &str) -> usize {
        self.whitespace.find_iter(text).count()
    }
}

/// Drop articles that fail the default quality rules, keeping corpus order.
pub fn clean_articles(articles: Vec<Article>) -> Result<Vec<Article>> {
    let filter = QualityFilter::new(QualityRules::default())?;
    let before = articles.len();
    let kept: Vec<Article> = articles.into_iter().filter(|a| filter.accepts(a)).collect();
    info!(before, after = kept.len(), "Filtered thin articles");
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn good() -> Article {
        Article::new("1", words(4), words(21)).with_image_url("https://img.example/1.jpg")
    }

    #[test]
    fn test_good_article_passes() {
        let filter = QualityFilter::new(QualityRules::default()).unwrap();
        assert!(filter.accepts(&good()));
    }

    #[test]
    fn test_short_title_fails() {
        let filter = QualityFilter::new(QualityRules::default()).unwrap();
        let mut a = good();
        a.title = words(3);
        assert!(!filter.accepts(&a));
    }

    #[test]
    fn test_short_body_fails() {
        let filter = QualityFilter::new(QualityRules::default()).unwrap();
        let mut a = good();
        a.body = words(20);
        assert!(!filter.accepts(&a));
    }

    #[test]
    fn test_missing_image_fails_unless_relaxed() {
        let mut a = good();
        a.image_url = Some(String::new());
        let strict = QualityFilter::new(QualityRules::default()).unwrap();
        assert!(!strict.accepts(&a));

        let relaxed = QualityFilter::new(QualityRules {
            require_image: false,
            ..QualityRules::default()
        })
        .unwrap();
        assert!(relaxed.accepts(&a));
    }

    #[test]
    fn test_clean_preserves_order() {
        let mut thin = good();
        thin.id = "thin".to_string();
        thin.body = "too short".to_string();
        let mut second = good();
        second.id = "2".to_string();

        let kept = clean_articles(vec![good(), thin, second]).unwrap();
        let ids: Vec<&str> = kept.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
