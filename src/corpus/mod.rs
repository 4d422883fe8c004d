//! Article corpus loading and cleaning.
//!
//! The corpus is read from a headerless tab-separated file whose fields are
//! positional: id, category, subcategory, title, abstract, url. Rows without
//! both a title and an abstract cannot be vectorized and are dropped here,
//! so nothing downstream ever sees an incomplete article.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const FIELD_ID: usize = 0;
const FIELD_CATEGORY: usize = 1;
const FIELD_SUBCATEGORY: usize = 2;
const FIELD_TITLE: usize = 3;
const FIELD_BODY: usize = 4;
const FIELD_URL: usize = 5;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to open corpus file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read corpus data: {0}")]
    Read(#[from] csv::Error),
}

/// A single indexable news article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub category: String,
    pub subcategory: String,
    pub title: String,
    pub body: String,
    pub url: Option<String>,
}

impl Article {
    #[inline]
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: String::new(),
            subcategory: String::new(),
            title: title.into(),
            body: body.into(),
            url: None,
        }
    }

    /// Text fed to the vectorizer: title and body joined by a single space
    #[inline]
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    /// Both text fields must be present for the article to be indexable
    #[inline]
    pub fn is_indexable(&self) -> bool {
        !self.id.is_empty() && !self.title.is_empty() && !self.body.is_empty()
    }
}

/// Counters describing what cleaning discarded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub rows_read: usize,
    pub missing_text: usize,
    pub duplicate_ids: usize,
    pub malformed_rows: usize,
}

/// The cleaned, ordered article collection.
///
/// Row position in this sequence is the canonical index used by the
/// similarity matrix and identifier index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    articles: Vec<Article>,
    /// Lowercased (title, body) per row, for query matching
    search_text: Vec<(String, String)>,
    stats: CorpusStats,
}

impl Corpus {
    /// Clean `articles`, keeping the order of the survivors
    #[inline]
    pub fn from_articles(articles: Vec<Article>) -> Self {
        let mut stats = CorpusStats {
            rows_read: articles.len(),
            ..CorpusStats::default()
        };
        let mut seen = HashSet::with_capacity(articles.len());
        let mut kept = Vec::with_capacity(articles.len());

        for article in articles {
            if !article.is_indexable() {
                stats.missing_text += 1;
                continue;
            }
            if !seen.insert(article.id.clone()) {
                warn!("Dropping duplicate article id {}", article.id);
                stats.duplicate_ids += 1;
                continue;
            }
            kept.push(article);
        }

        let search_text = kept
            .iter()
            .map(|article| (article.title.to_lowercase(), article.body.to_lowercase()))
            .collect();

        Self {
            articles: kept,
            search_text,
            stats,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    #[inline]
    pub fn get(&self, position: usize) -> Option<&Article> {
        self.articles.get(position)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    #[inline]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    #[inline]
    pub fn stats(&self) -> CorpusStats {
        self.stats
    }

    #[inline]
    pub fn combined_texts(&self) -> Vec<String> {
        self.articles.iter().map(Article::combined_text).collect()
    }

    /// Rows whose title or body contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    #[inline]
    pub fn positions_mentioning<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.search_text
            .iter()
            .enumerate()
            .filter(move |(_, (title, body))| title.contains(needle) || body.contains(needle))
            .map(|(position, _)| position)
    }

    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.articles.iter().map(|article| article.id.as_str())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}

/// Reads corpus files into a cleaned [`Corpus`]
pub struct CorpusStore;

impl CorpusStore {
    /// Load and clean the corpus at `path`
    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Corpus, CorpusError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CorpusError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let corpus = Self::from_reader(file)?;
        info!(
            "Loaded {} articles from {} ({} rows read)",
            corpus.len(),
            path.display(),
            corpus.stats().rows_read
        );
        Ok(corpus)
    }

    /// Load the corpus, degrading to an empty one if the file is unusable
    #[inline]
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Corpus {
        match Self::load(path) {
            Ok(corpus) => corpus,
            Err(e) => {
                warn!("Corpus unavailable, continuing with no articles: {}", e);
                Corpus::empty()
            }
        }
    }

    /// Parse tab-separated rows from any reader
    #[inline]
    pub fn from_reader<R: Read>(reader: R) -> Result<Corpus, CorpusError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut articles = Vec::new();
        let mut malformed_rows = 0;

        for (line, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                // Invalid UTF-8 rows are skipped
                Err(e) if !e.is_io_error() => {
                    debug!("Skipping malformed corpus row {}: {}", line + 1, e);
                    malformed_rows += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let field = |index: usize| record.get(index).unwrap_or_default().to_string();
            let url = record
                .get(FIELD_URL)
                .filter(|url| !url.is_empty())
                .map(ToString::to_string);

            articles.push(Article {
                id: field(FIELD_ID),
                category: field(FIELD_CATEGORY),
                subcategory: field(FIELD_SUBCATEGORY),
                title: field(FIELD_TITLE),
                body: field(FIELD_BODY),
                url,
            });
        }

        let mut corpus = Corpus::from_articles(articles);
        corpus.stats.rows_read += malformed_rows;
        corpus.stats.malformed_rows = malformed_rows;

        debug!(
            "Corpus cleaning dropped {} rows without text and {} duplicate ids",
            corpus.stats.missing_text, corpus.stats.duplicate_ids
        );

        Ok(corpus)
    }
}
