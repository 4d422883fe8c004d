//! On-disk cache of fitted index artifacts.
//!
//! Fitting the vectorizer and computing the similarity matrix is the slow part
//! of startup, so the results are written to `index.bin` and reused as long as
//! they still describe the loaded corpus.


use std::fs::{self, File};
use std::hash::Hasher;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use thiserror::Error;
use tracing::{debug, info};

use super::ContentIndex;
use super::similarity::SimilarityMatrix;
use super::tfidf::{FeatureVector, TfidfVectorizer, VectorizerConfig};
use crate::corpus::Corpus;

pub const CACHE_FILE_NAME: &str = "index.bin";
const CACHE_FORMAT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("No cached index at {0}")]
    Missing(PathBuf),
    #[error("Cache format version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("Cached index does not match the loaded corpus")]
    StaleCorpus,
    #[error("Cached index was fitted with different vectorizer settings")]
    StaleVectorizer,
    #[error("Cached index is inconsistent: {0}")]
    Inconsistent(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

#[derive(Serialize, Deserialize)]
struct CachedIndex {
    version: u32,
    article_ids: Vec<String>,
    /// One hash of the vectorized text per corpus row
    text_fingerprints: Vec<u64>,
    vectorizer: TfidfVectorizer,
    vectors: Vec<FeatureVector>,
    similarity: SimilarityMatrix,
}

/// Fitted artifacts read back from the cache, already checked against a corpus
#[derive(Debug)]
pub struct CachedArtifacts {
    pub vectorizer: TfidfVectorizer,
    pub vectors: Vec<FeatureVector>,
    pub similarity: SimilarityMatrix,
}

/// Per-row SipHash of the vectorized text, with fixed keys
fn text_fingerprints(corpus: &Corpus) -> Vec<u64> {
    corpus
        .iter()
        .map(|article| {
            let mut hasher = SipHasher13::new_with_keys(0, 0);
            hasher.write(article.combined_text().as_bytes());
            hasher.finish()
        })
        .collect()
}

#[inline]
pub fn cache_file_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILE_NAME)
}

/// Write `index` to `cache_dir`, replacing any previous cache
#[inline]
pub fn save(index: &ContentIndex, cache_dir: &Path) -> Result<PathBuf, CacheError> {
    fs::create_dir_all(cache_dir)?;

    let path = cache_file_path(cache_dir);
    let temp_path = path.with_extension("bin.tmp");

    let cached = CachedIndex {
        version: CACHE_FORMAT_VERSION,
        article_ids: index.identifiers().identifiers().to_vec(),
        text_fingerprints: text_fingerprints(index.corpus()),
        vectorizer: index.vectorizer().clone(),
        vectors: index.feature_vectors().to_vec(),
        similarity: index.similarity().clone(),
    };

    let mut writer = BufWriter::new(File::create(&temp_path)?);
    bincode::serialize_into(&mut writer, &cached)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&temp_path, &path)?;
    info!("Wrote index cache to {}", path.display());

    Ok(path)
}

/// Read the cache in `cache_dir` and verify it was built from `corpus` with
/// `config`
#[inline]
pub fn load(
    cache_dir: &Path,
    corpus: &Corpus,
    config: &VectorizerConfig,
) -> Result<CachedArtifacts, CacheError> {
    let path = cache_file_path(cache_dir);
    if !path.exists() {
        return Err(CacheError::Missing(path));
    }

    let reader = BufReader::new(File::open(&path)?);
    let cached: CachedIndex = bincode::deserialize_from(reader)?;

    if cached.version != CACHE_FORMAT_VERSION {
        return Err(CacheError::VersionMismatch {
            found: cached.version,
            expected: CACHE_FORMAT_VERSION,
        });
    }

    if cached.vectorizer.config() != config {
        return Err(CacheError::StaleVectorizer);
    }

    if cached.article_ids.len() != corpus.len()
        || !cached.article_ids.iter().map(String::as_str).eq(corpus.ids())
    {
        return Err(CacheError::StaleCorpus);
    }

    // Same ids with edited titles or abstracts
    if cached.text_fingerprints != text_fingerprints(corpus) {
        return Err(CacheError::StaleCorpus);
    }

    let (rows, columns) = cached.similarity.shape();
    if cached.vectors.len() != corpus.len() || rows != corpus.len() || columns != corpus.len() {
        return Err(CacheError::Inconsistent(format!(
            "{} articles, {} vectors, {}x{} matrix",
            corpus.len(),
            cached.vectors.len(),
            rows,
            columns
        )));
    }

    debug!("Loaded index cache from {}", path.display());

    Ok(CachedArtifacts {
        vectorizer: cached.vectorizer,
        vectors: cached.vectors,
        similarity: cached.similarity,
    })
}
