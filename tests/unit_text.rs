// Unit tests for text normalization and TF-IDF vectorization.
//
// Tests the public text pipeline in isolation: tokenization edge cases,
// stopword and stemming behavior, and the shape of the weight matrix.

use storyline::cluster::tfidf::{compute_tfidf, TextField, TfIdfVectorizer};
use storyline::corpus::Article;
use storyline::text::stem::stem;
use storyline::text::{normalize, TextNormalizer};

fn body(id: &str, text: &str) -> Article {
    Article::new(id, "", text)
}

// ============================================================
// normalize: tokenization
// ============================================================

#[test]
fn normalize_is_deterministic() {
    let text = "Senate ballots, hurricane rainfall; volcano!";
    assert_eq!(normalize(text), normalize(text));
}

#[test]
fn normalize_drops_common_english_stopwords() {
    let tokens = normalize("the senate and the election");
    assert_eq!(tokens, vec!["senate", "election"]);
}

#[test]
fn normalize_drops_single_characters_and_punctuation() {
    let tokens = normalize("x - volcano ... y");
    assert_eq!(tokens, vec!["volcano"]);
}

#[test]
fn normalize_composed_and_decomposed_accents_match() {
    let composed = normalize("caf\u{e9} zebra");
    let decomposed = normalize("cafe\u{301} zebra");
    assert_eq!(composed, decomposed);
    assert!(composed.contains(&"zebra".to_string()));
}

#[test]
fn normalize_punctuation_only_is_empty() {
    assert!(normalize("!!! ??? ...").is_empty());
}

// ============================================================
// Stemming
// ============================================================

#[test]
fn stemming_merges_plural_and_singular() {
    let stemmer = TextNormalizer::new().with_stemming(true);
    assert_eq!(
        stemmer.normalize("elections election"),
        vec!["election", "election"]
    );
}

#[test]
fn stemming_is_off_by_default() {
    assert_eq!(normalize("ballots"), vec!["ballots"]);
}

#[test]
fn stem_leaves_short_words_alone() {
    assert_eq!(stem("is"), "is");
    assert_eq!(stem("ox"), "ox");
}

// ============================================================
// TF-IDF matrix shape
// ============================================================

#[test]
fn tfidf_rows_match_corpus_and_columns_match_vocabulary() {
    let corpus = vec![
        body("1", "senate election ballots"),
        body("2", "hurricane rainfall"),
        body("3", "senate hurricane"),
    ];
    let m = compute_tfidf(&corpus);
    assert_eq!(m.n_rows(), 3);
    assert_eq!(m.n_cols(), 5);
    assert_eq!(
        m.vocabulary().terms(),
        &["ballots", "election", "hurricane", "rainfall", "senate"]
    );
}

#[test]
fn tfidf_weights_are_non_negative() {
    let corpus = vec![
        body("1", "storm storm forecast"),
        body("2", "forecast rainfall"),
    ];
    let m = compute_tfidf(&corpus);
    for row in m.rows() {
        assert!(row.entries().iter().all(|&(_, w)| w >= 0.0));
    }
}

#[test]
fn tfidf_rare_term_outweighs_common_term() {
    let corpus = vec![
        body("1", "senate volcano"),
        body("2", "senate"),
        body("3", "senate"),
    ];
    let m = compute_tfidf(&corpus);
    let senate = m.vocabulary().column("senate").unwrap();
    let volcano = m.vocabulary().column("volcano").unwrap();
    assert!(m.row(0).get(volcano) > m.row(0).get(senate));
}

#[test]
fn tfidf_empty_document_has_empty_row() {
    let corpus = vec![body("1", "zebra"), body("2", "")];
    let m = compute_tfidf(&corpus);
    assert_eq!(m.n_rows(), 2);
    assert!(m.row(1).is_empty());
}

#[test]
fn tfidf_title_field_is_opt_in() {
    let corpus = vec![Article::new("1", "Asteroid", "zebra")];
    let body_only = compute_tfidf(&corpus);
    assert!(body_only.vocabulary().column("asteroid").is_none());

    let with_title = TfIdfVectorizer::default()
        .with_text_field(TextField::TitleAndBody)
        .fit_transform(&corpus);
    assert!(with_title.vocabulary().column("asteroid").is_some());
}
