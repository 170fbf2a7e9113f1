// Cluster summaries: keywords, sample articles and sources per story.
//
// Keywords come from the articles themselves (the scraper's per-article
// keyword lists), not from the TF-IDF vocabulary. A story's top keywords are
// the most frequent entries across its members' lists.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::corpus::Article;
use crate::error::ClusterError;

/// A representative article shown with a story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleArticle {
    /// Position in the corpus.
    pub index: usize,
    pub id: String,
    pub title: String,
    pub source: String,
}

/// Everything a reader needs to scan one story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster_label: usize,
    /// Member indices in corpus order.
    pub member_indices: Vec<usize>,
    /// Most frequent member keywords, descending; ties keep first-seen order.
    pub top_keywords: Vec<String>,
    /// The first members in corpus order.
    pub sample_articles: Vec<SampleArticle>,
    /// Distinct non-empty member sources, sorted.
    pub sources: Vec<String>,
}

impl ClusterSummary {
    pub fn size(&self) -> usize {
        self.member_indices.len()
    }

    /// Covered by more than one outlet.
    pub fn is_featured(&self) -> bool {
        self.sources.len() > 1
    }

    /// Short display title: the top three keywords joined with " / ".
    ///
    /// Falls back to the first sample's title when no member has keywords.
    pub fn headline(&self) -> String {
        if self.top_keywords.is_empty() {
            return self
                .sample_articles
                .first()
                .map(|s| s.title.clone())
                .unwrap_or_default();
        }
        let words: Vec<&str> = self.top_keywords.iter().take(3).map(String::as_str).collect();
        words.join(" / ")
    }
}

/// Summary sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryOptions {
    pub top_keywords: usize,
    pub sample_size: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_keywords: 10,
            sample_size: 2,
        }
    }
}

/// Build one summary per cluster label, ordered by label.
pub fn summarize(
    corpus: &[Article],
    labels: &[usize],
    options: SummaryOptions,
) -> Result<BTreeMap<usize, ClusterSummary>, ClusterError> {
    if labels.len() != corpus.len() {
        return Err(ClusterError::LabelMismatch {
            labels: labels.len(),
            articles: corpus.len(),
        });
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(index);
    }

    let summaries = groups
        .into_iter()
        .map(|(label, members)| {
            let keywords = members
                .iter()
                .flat_map(|&i| corpus[i].keywords.iter().map(String::as_str));
            let top_keywords = rank_keywords(keywords, options.top_keywords);

            let sample_articles = members
                .iter()
                .take(options.sample_size)
                .map(|&i| SampleArticle {
                    index: i,
                    id: corpus[i].id.clone(),
                    title: corpus[i].title.clone(),
                    source: corpus[i].source.clone(),
                })
                .collect();

            let sources: BTreeSet<&str> = members
                .iter()
                .map(|&i| corpus[i].source.as_str())
                .filter(|s| !s.is_empty())
                .collect();

            let summary = ClusterSummary {
                cluster_label: label,
                member_indices: members,
                top_keywords,
                sample_articles,
                sources: sources.into_iter().map(str::to_string).collect(),
            };
            (label, summary)
        })
        .collect();

    Ok(summaries)
}

/// Top `k` keywords by count. Equal counts keep the order they first appeared in.
pub fn rank_keywords<'a>(keywords: impl IntoIterator<Item = &'a str>, k: usize) -> Vec<String> {
    // (keyword, count) in first-seen order
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for keyword in keywords {
        match position.get(keyword) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                position.insert(keyword, counts.len());
                counts.push((keyword, 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(k)
        .map(|(keyword, _)| keyword.to_string())
        .collect()
}

/// Stories covered by more than one source, in label order.
pub fn featured(summaries: &BTreeMap<usize, ClusterSummary>) -> Vec<&ClusterSummary> {
    summaries.values().filter(|s| s.is_featured()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, keywords: &[&str], source: &str) -> Article {
        Article::new(id, format!("Title {id}"), "")
            .with_keywords(keywords.iter().copied())
            .with_source(source)
    }

    #[test]
    fn test_more_frequent_keyword_ranks_first() {
        let corpus = vec![
            article("a", &["ml", "ai"], "Wire"),
            article("b", &["ai", "ai"], "Wire"),
            article("c", &["ml"], "Wire"),
        ];
        let summaries = summarize(&corpus, &[0, 0, 0], SummaryOptions::default()).unwrap();
        // ai: 3, ml: 2
        assert_eq!(summaries[&0].top_keywords, vec!["ai", "ml"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranked = rank_keywords(["rain", "storm", "storm", "rain", "wind"], 10);
        assert_eq!(ranked, vec!["rain", "storm", "wind"]);
    }

    #[test]
    fn test_top_k_truncates() {
        let ranked = rank_keywords(["a", "b", "c", "a"], 2);
        assert_eq!(ranked, vec!["a", "b"]);
    }

    #[test]
    fn test_groups_in_corpus_order_sorted_by_label() {
        let corpus: Vec<Article> = (0..5).map(|i| article(&i.to_string(), &[], "")).collect();
        let summaries = summarize(&corpus, &[1, 0, 1, 2, 0], SummaryOptions::default()).unwrap();
        let labels: Vec<usize> = summaries.keys().copied().collect();
        assert_eq!(labels, vec![0, 1, 2]);
        assert_eq!(summaries[&0].member_indices, vec![1, 4]);
        assert_eq!(summaries[&1].member_indices, vec![0, 2]);
        assert_eq!(summaries[&2].member_indices, vec![3]);
    }

    #[test]
    fn test_samples_are_first_members() {
        let corpus: Vec<Article> = (0..4).map(|i| article(&i.to_string(), &[], "")).collect();
        let summaries = summarize(&corpus, &[0, 0, 0, 0], SummaryOptions::default()).unwrap();
        let samples: Vec<usize> = summaries[&0].sample_articles.iter().map(|s| s.index).collect();
        assert_eq!(samples, vec![0, 1]);
    }

    #[test]
    fn test_empty_keywords_give_empty_ranking_and_title_headline() {
        let corpus = vec![article("only", &[], "Wire")];
        let summaries = summarize(&corpus, &[0], SummaryOptions::default()).unwrap();
        assert!(summaries[&0].top_keywords.is_empty());
        assert_eq!(summaries[&0].headline(), "Title only");
    }

    #[test]
    fn test_headline_uses_top_three() {
        let corpus = vec![article("x", &["a", "b", "c", "d"], "")];
        let summaries = summarize(&corpus, &[0], SummaryOptions::default()).unwrap();
        assert_eq!(summaries[&0].headline(), "a / b / c");
    }

    #[test]
    fn test_label_mismatch() {
        let corpus = vec![article("x", &[], "")];
        let err = summarize(&corpus, &[0, 0], SummaryOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ClusterError::LabelMismatch {
                labels: 2,
                articles: 1
            }
        );
    }

    #[test]
    fn test_featured_requires_two_sources() {
        let corpus = vec![
            article("a", &[], "Wire"),
            article("b", &[], "Herald"),
            article("c", &[], "Wire"),
            article("d", &[], "Wire"),
            article("e", &[], ""),
        ];
        let summaries = summarize(&corpus, &[0, 0, 1, 1, 1], SummaryOptions::default()).unwrap();
        assert_eq!(summaries[&0].sources, vec!["Herald", "Wire"]);
        assert_eq!(summaries[&1].sources, vec!["Wire"]);
        let labels: Vec<usize> = featured(&summaries).iter().map(|s| s.cluster_label).collect();
        assert_eq!(labels, vec![0]);
    }
}
