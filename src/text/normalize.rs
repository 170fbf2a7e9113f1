// Text normalization: raw article text to a token stream.
//
// NFC first so composed and decomposed accents produce the same token, then
// lowercase and Unicode word segmentation. Stopwords come from the stop-words
// crate's English list. Tokens shorter than two characters are dropped.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::stem::stem;

const MIN_TOKEN_CHARS: usize = 2;

/// Tokenizer with a fixed stopword list and optional stemming.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stop_words: HashSet<String>,
    stemming: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: stop_words.into_iter().collect(),
            stemming: false,
        }
    }

    pub fn with_stemming(mut self, stemming: bool) -> Self {
        self.stemming = stemming;
        self
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Split text into normalized tokens. Empty input yields an empty vector.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.nfc().collect::<String>().to_lowercase();

        lowered
            .unicode_words()
            .filter(|word| !self.is_stop_word(word))
            .map(|word| word.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS && !self.is_stop_word(token))
            .map(|token| if self.stemming { stem(&token) } else { token })
            .collect()
    }
}

/// Normalize with the default settings (English stopwords, no stemming).
pub fn normalize(text: &str) -> Vec<String> {
    TextNormalizer::new().normalize(text)
}
