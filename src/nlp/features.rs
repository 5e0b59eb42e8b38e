//! Tokenisation and TF-IDF document vectors.

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::Language;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so",
    "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "would", "you", "your", "yours", "yourself", "yourselves",
];

/// Split a document into lowercase word tokens of two or more characters.
pub fn tokenize(text: &str, language: Language) -> Vec<String> {
    static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| match language {
            Language::English => !ENGLISH_STOP_WORDS.contains(token),
            Language::Multilingual => true,
        })
        .map(str::to_string)
        .collect()
}

/// Sorted term dictionary shared by every document of a corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn build(documents: &[Vec<String>]) -> Self {
        let terms: Vec<String> = documents
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn position(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, idx: usize) -> &str {
        &self.terms[idx]
    }

    /// Raw term counts, one row per document.
    pub fn counts(&self, documents: &[Vec<String>]) -> Array2<f64> {
        let mut counts = Array2::<f64>::zeros((documents.len(), self.len()));
        for (row, tokens) in documents.iter().enumerate() {
            for token in tokens {
                if let Some(col) = self.position(token) {
                    counts[[row, col]] += 1.0;
                }
            }
        }
        counts
    }
}

/// Smoothed TF-IDF with unit-length rows.
pub fn tfidf(documents: &[Vec<String>], vocabulary: &Vocabulary) -> Array2<f64> {
    let mut matrix = vocabulary.counts(documents);
    let n_docs = documents.len() as f64;
    for mut column in matrix.columns_mut() {
        let df = column.iter().filter(|v| **v > 0.0).count() as f64;
        let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
        column.mapv_inplace(|tf| tf * idf);
    }
    normalise_rows(&mut matrix);
    debug!(
        documents = documents.len(),
        terms = vocabulary.len(),
        "built tfidf matrix"
    );
    matrix
}

/// Scale every non-zero row to unit L2 norm.
pub fn normalise_rows(matrix: &mut Array2<f64>) {
    for mut row in matrix.rows_mut() {
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
}
