//! Text analysis for feature extraction.
//!
//! Tokenization uses Unicode word boundary rules (UAX #29), so Latin-script
//! text splits on whitespace and punctuation while CJK text splits into
//! individual ideographs. Terms are lowercased unigrams plus space-joined
//! bigrams, which is what the TF-IDF vectorizer consumes.

use unicode_segmentation::UnicodeSegmentation;

/// A tokenizer that emits lowercased word unigrams and bigrams.
///
/// # Examples
///
/// ```
/// use intentio::analysis::NgramTokenizer;
///
/// let tokenizer = NgramTokenizer::new();
/// let terms = tokenizer.terms("Install CUDA");
/// assert_eq!(terms, vec!["install", "cuda", "install cuda"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NgramTokenizer {
    /// Largest n-gram to emit (1 = unigrams only).
    max_ngram: usize,
}

impl NgramTokenizer {
    /// Create a tokenizer emitting unigrams and bigrams.
    pub fn new() -> Self {
        NgramTokenizer { max_ngram: 2 }
    }

    /// Create a tokenizer emitting n-grams up to `max_ngram` words.
    pub fn with_max_ngram(max_ngram: usize) -> Self {
        NgramTokenizer {
            max_ngram: max_ngram.max(1),
        }
    }

    /// Split text into lowercased word tokens on Unicode word boundaries.
    ///
    /// Non-word segments (punctuation, whitespace) are dropped. A Han
    /// ideograph is its own word under UAX #29, so Chinese text tokenizes
    /// per character.
    pub fn words(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .unicode_words()
            .map(|w| w.to_string())
            .collect()
    }

    /// Produce the term sequence for a text: unigrams first, then each
    /// higher-order n-gram joined with a single space.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let words = self.words(text);
        let mut terms = words.clone();
        for n in 2..=self.max_ngram {
            if words.len() < n {
                break;
            }
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_filters_punctuation() {
        let tokenizer = NgramTokenizer::new();
        let words = tokenizer.words("Hello, world!");
        assert_eq!(words, vec!["hello", "world"]);
    }

    #[test]
    fn test_words_splits_cjk() {
        let tokenizer = NgramTokenizer::new();
        let words = tokenizer.words("什么是交叉熵");
        assert!(words.len() >= 4);
        assert!(words.iter().all(|w| !w.trim().is_empty()));
    }

    #[test]
    fn test_terms_include_bigrams() {
        let tokenizer = NgramTokenizer::new();
        let terms = tokenizer.terms("how to learn");
        assert!(terms.contains(&"how".to_string()));
        assert!(terms.contains(&"how to".to_string()));
        assert!(terms.contains(&"to learn".to_string()));
        assert!(!terms.contains(&"how to learn".to_string()));
    }

    #[test]
    fn test_unigram_only() {
        let tokenizer = NgramTokenizer::with_max_ngram(1);
        let terms = tokenizer.terms("a b c");
        assert_eq!(terms, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_text() {
        let tokenizer = NgramTokenizer::new();
        assert!(tokenizer.terms("").is_empty());
        assert!(tokenizer.terms("   ").is_empty());
    }
}
