// TF-IDF vectorization of a corpus.
//
// Each article is one document. The vocabulary is rebuilt from scratch for
// every corpus and ordered lexicographically, so column indices depend only
// on the set of terms present. Rows are sparse: a news article touches a few
// hundred terms out of a vocabulary of thousands.
//
//   idf(t)   = ln((1 + n) / (1 + df(t))) + 1
//   w(d, t)  = tf(d, t) * idf(t), then L2-normalized per row

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::Article;
use crate::text::TextNormalizer;

/// Which article fields feed the vectorizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextField {
    #[default]
    Body,
    #[serde(rename = "title-body", alias = "title-and-body")]
    TitleAndBody,
}

impl TextField {
    pub fn text_of(self, article: &Article) -> String {
        match self {
            TextField::Body => article.body.clone(),
            TextField::TitleAndBody => format!("{} {}", article.title, article.body),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextField::Body => "body",
            TextField::TitleAndBody => "title-body",
        }
    }
}

impl std::str::FromStr for TextField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" => Ok(TextField::Body),
            "title-body" | "title-and-body" => Ok(TextField::TitleAndBody),
            other => Err(format!(
                "unknown text field '{other}' (expected body or title-body)"
            )),
        }
    }
}

/// Term → column mapping, lexicographically ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: BTreeMap<String, usize>,
}

impl Vocabulary {
    fn from_terms(terms: BTreeSet<String>) -> Self {
        let terms: Vec<String> = terms.into_iter().collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// One document row: `(column, weight)` pairs sorted by column, zeros omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(column, weight)` pairs. Pairs are sorted and zero weights dropped.
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(col, _)| col);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |&(c, _)| c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn to_dense(&self, width: usize) -> Vec<f64> {
        let mut dense = vec![0.0; width];
        for &(col, w) in &self.entries {
            if col < width {
                dense[col] = w;
            }
        }
        dense
    }
}

/// Document-term matrix: one row per article, one column per vocabulary term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfIdfMatrix {
    rows: Vec<SparseVector>,
    vocabulary: Vocabulary,
}

impl TfIdfMatrix {
    /// Wrap a dense feature matrix. Columns are named `f0`, `f1`, ... in order.
    pub fn from_dense(rows: &[Vec<f64>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let terms: Vec<String> = (0..width).map(|i| format!("f{i}")).collect();
        let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        let rows = rows
            .iter()
            .map(|r| SparseVector::from_entries(r.iter().copied().enumerate().collect()))
            .collect();
        Self {
            rows,
            vocabulary: Vocabulary { terms, index },
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn row(&self, index: usize) -> &SparseVector {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let width = self.n_cols();
        self.rows.iter().map(|r| r.to_dense(width)).collect()
    }
}

/// Configured TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    pub text_field: TextField,
    /// Use `1 + ln(count)` instead of the raw count.
    pub sublinear_tf: bool,
    /// L2-normalize each row.
    pub normalize: bool,
    normalizer: TextNormalizer,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            text_field: TextField::Body,
            sublinear_tf: false,
            normalize: true,
            normalizer: TextNormalizer::new(),
        }
    }
}

impl TfIdfVectorizer {
    pub fn with_text_field(mut self, field: TextField) -> Self {
        self.text_field = field;
        self
    }

    pub fn with_stemming(mut self, stemming: bool) -> Self {
        self.normalizer = self.normalizer.with_stemming(stemming);
        self
    }

    pub fn with_sublinear_tf(mut self, sublinear: bool) -> Self {
        self.sublinear_tf = sublinear;
        self
    }

    /// Build the vocabulary from `corpus` and return its weight matrix.
    pub fn fit_transform(&self, corpus: &[Article]) -> TfIdfMatrix {
        let documents: Vec<Vec<String>> = corpus
            .iter()
            .map(|a| self.normalizer.normalize(&self.text_field.text_of(a)))
            .collect();

        let vocabulary = Vocabulary::from_terms(documents.iter().flatten().cloned().collect());

        // Raw counts per document, keyed by column so each row comes out sorted.
        let counts: Vec<BTreeMap<usize, usize>> = documents
            .iter()
            .map(|tokens| {
                let mut row = BTreeMap::new();
                for token in tokens {
                    if let Some(col) = vocabulary.column(token) {
                        *row.entry(col).or_insert(0) += 1;
                    }
                }
                row
            })
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for row in &counts {
            for &col in row.keys() {
                doc_freq[col] += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseVector> = counts
            .into_iter()
            .map(|row| {
                let mut entries: Vec<(usize, f64)> = row
                    .into_iter()
                    .map(|(col, count)| (col, self.term_frequency(count) * idf[col]))
                    .collect();
                if self.normalize {
                    let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                    if norm > 0.0 {
                        for (_, w) in &mut entries {
                            *w /= norm;
                        }
                    }
                }
                SparseVector { entries }
            })
            .collect();

        debug!(
            documents = rows.len(),
            terms = vocabulary.len(),
            "Built TF-IDF matrix"
        );

        TfIdfMatrix { rows, vocabulary }
    }

    fn term_frequency(&self, count: usize) -> f64 {
        if self.sublinear_tf {
            1.0 + (count as f64).ln()
        } else {
            count as f64
        }
    }
}

/// Vectorize a corpus with the default settings (body text, raw counts, L2 rows).
pub fn compute_tfidf(corpus: &[Article]) -> TfIdfMatrix {
    TfIdfVectorizer::default().fit_transform(corpus)
}
