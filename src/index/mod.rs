//! Content index: the corpus together with everything derived from it.
//!
//! A [`ContentIndex`] is constructed in one step and is read-only afterwards,
//! so it can be shared between threads behind an `Arc` without locking.

pub mod cache;
pub mod identifiers;
pub mod similarity;
pub mod tfidf;


use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::corpus::{Article, Corpus};

pub use cache::CacheError;
pub use identifiers::IdentifierIndex;
pub use similarity::{SimilarityMatrix, cosine_similarity};
pub use tfidf::{FeatureVector, StopWords, TfidfVectorizer, VectorizerConfig};

/// Where a loaded index came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSource {
    Cache,
    Built,
}

impl std::fmt::Display for IndexSource {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            IndexSource::Cache => write!(f, "cache"),
            IndexSource::Built => write!(f, "fresh build"),
        }
    }
}

/// Immutable bundle of corpus, identifier index, vectorizer, feature vectors
/// and similarity matrix, all aligned on corpus row order
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    corpus: Corpus,
    identifiers: IdentifierIndex,
    vectorizer: TfidfVectorizer,
    vectors: Vec<FeatureVector>,
    similarity: SimilarityMatrix,
}

impl ContentIndex {
    /// Fit the vectorizer on `corpus` and compute all pairwise similarities
    #[inline]
    pub fn build(corpus: Corpus, config: &VectorizerConfig) -> Self {
        let started = Instant::now();

        let texts = corpus.combined_texts();
        let mut vectorizer = TfidfVectorizer::new(config.clone());
        let vectors = vectorizer.fit_transform(&texts);
        let similarity = SimilarityMatrix::from_vectors(&vectors);
        let identifiers = IdentifierIndex::from_corpus(&corpus);

        info!(
            "Built content index: {} articles, {} terms in {:?}",
            corpus.len(),
            vectorizer.vocabulary_size(),
            started.elapsed()
        );

        Self {
            corpus,
            identifiers,
            vectorizer,
            vectors,
            similarity,
        }
    }

    /// Reuse the cache in `cache_dir` when it matches `corpus`, otherwise
    /// build from scratch and refresh the cache.
    ///
    /// Failing to write the cache is logged and does not fail the build.
    #[inline]
    pub fn load_or_build(
        corpus: Corpus,
        config: &VectorizerConfig,
        cache_dir: &Path,
        force_rebuild: bool,
    ) -> (Self, IndexSource) {
        if !force_rebuild {
            match cache::load(cache_dir, &corpus, config) {
                Ok(artifacts) => {
                    info!("Using cached content index for {} articles", corpus.len());
                    let identifiers = IdentifierIndex::from_corpus(&corpus);
                    let index = Self {
                        corpus,
                        identifiers,
                        vectorizer: artifacts.vectorizer,
                        vectors: artifacts.vectors,
                        similarity: artifacts.similarity,
                    };
                    return (index, IndexSource::Cache);
                }
                Err(CacheError::Missing(path)) => {
                    info!("No index cache at {}, building", path.display());
                }
                Err(e) => warn!("Ignoring index cache: {}", e),
            }
        }

        let index = Self::build(corpus, config);
        if let Err(e) = cache::save(&index, cache_dir) {
            warn!("Failed to write index cache: {}", e);
        }

        (index, IndexSource::Built)
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[inline]
    pub fn identifiers(&self) -> &IdentifierIndex {
        &self.identifiers
    }

    #[inline]
    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    #[inline]
    pub fn feature_vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    #[inline]
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    /// Look up an article for display
    #[inline]
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.identifiers
            .position_of(id)
            .and_then(|position| self.corpus.get(position))
    }

    /// Similarity between two articles by identifier
    #[inline]
    pub fn similarity_between(&self, a: &str, b: &str) -> Option<f32> {
        let row = self.identifiers.position_of(a)?;
        let column = self.identifiers.position_of(b)?;
        self.similarity.get(row, column)
    }
}
