//! TF-IDF vectorization of article text.
//!
//! The vocabulary and IDF weights are fit once over the whole corpus and then
//! reused for every document, which is what makes the resulting vectors
//! comparable with each other.


use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum token length in characters
const MIN_TOKEN_CHARS: usize = 2;

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "before", "being", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "his", "how", "if", "in", "into", "is", "it", "its", "may",
    "more", "most", "no", "not", "of", "on", "or", "our", "out", "over", "she", "should", "so",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "up",
    "was", "we", "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopWords {
    #[default]
    None,
    English,
}

impl StopWords {
    fn contains(self, token: &str) -> bool {
        match self {
            Self::None => false,
            Self::English => ENGLISH_STOP_WORDS.binary_search(&token).is_ok(),
        }
    }
}

impl std::fmt::Display for StopWords {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::None => write!(f, "none"),
            Self::English => write!(f, "english"),
        }
    }
}

/// Configuration for the TF-IDF vectorizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Lowercase text before tokenizing
    pub lowercase: bool,
    /// Ignore terms that appear in fewer documents than this
    pub min_df: usize,
    /// Ignore terms that appear in more than this fraction of documents
    pub max_df: f32,
    pub stop_words: StopWords,
    /// Replace raw term counts with `1 + ln(tf)`
    pub sublinear_tf: bool,
}

impl Default for VectorizerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            lowercase: true,
            min_df: 1,
            max_df: 1.0,
            stop_words: StopWords::None,
            sublinear_tf: false,
        }
    }
}

/// Sparse TF-IDF vector, entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl FeatureVector {
    /// Build from `(term index, weight)` pairs in any order
    #[inline]
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(index, _)| index);
        let (indices, values) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    #[inline]
    pub fn get(&self, index: u32) -> Option<f32> {
        self.indices
            .binary_search(&index)
            .ok()
            .map(|position| self.values[position])
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Sparse dot product by merging the two sorted index lists
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }
}

/// TF-IDF model: a fixed vocabulary plus one IDF weight per term
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    #[inline]
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    #[inline]
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn term_index(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    #[inline]
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|index| self.idf[index as usize])
    }

    /// Learn the vocabulary and IDF weights from `documents`.
    ///
    /// Any previous fit is discarded. Fitting an empty collection leaves an
    /// empty vocabulary.
    #[inline]
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        let n_docs = documents.len();
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for document in documents {
            let unique: HashSet<String> = self.tokenize(document.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_doc_count = self.config.max_df * n_docs as f32;
        let min_df = self.config.min_df;

        // BTreeMap iteration gives a lexicographic, reproducible term order
        self.vocabulary.clear();
        self.idf.clear();
        for (term, df) in doc_freq {
            if df < min_df || df as f32 > max_doc_count {
                continue;
            }
            let index = self.idf.len() as u32;
            self.idf
                .push(((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0);
            self.vocabulary.insert(term, index);
        }

        debug!(
            "Fitted TF-IDF vocabulary of {} terms over {} documents",
            self.idf.len(),
            n_docs
        );
    }

    /// Vectorize one document against the fitted vocabulary.
    ///
    /// The result is L2-normalized; it is all zeros when no token of the
    /// document is in the vocabulary.
    #[inline]
    pub fn transform(&self, document: &str) -> FeatureVector {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for token in self.tokenize(document) {
            if let Some(index) = self.term_index(&token) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f32).ln()
                } else {
                    count as f32
                };
                (index, tf * self.idf[index as usize])
            })
            .collect();

        let mut vector = FeatureVector::from_pairs(pairs);
        vector.normalize();
        vector
    }

    #[inline]
    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<FeatureVector> {
        documents
            .iter()
            .map(|document| self.transform(document.as_ref()))
            .collect()
    }

    #[inline]
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<FeatureVector> {
        self.fit(documents);
        self.transform_all(documents)
    }

    /// Split text into terms: runs of alphanumerics or underscores, at least
    /// two characters long
    #[inline]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
            .map(|token| {
                if self.config.lowercase {
                    token.to_lowercase()
                } else {
                    token.to_string()
                }
            })
            .filter(|token| !self.config.stop_words.contains(token))
            .collect()
    }
}
