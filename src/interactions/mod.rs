//! User interaction log.
//!
//! The log is maintained outside this crate; it is only ever read here.


use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const BEHAVIOR_FIELD_USER: usize = 1;
const BEHAVIOR_FIELD_HISTORY: usize = 3;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Failed to open interaction log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read interaction log: {0}")]
    Read(#[from] csv::Error),
}

/// One historical user-article interaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub user_id: String,
    pub news_id: String,
}

impl InteractionRecord {
    #[inline]
    pub fn new(user_id: impl Into<String>, news_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            news_id: news_id.into(),
        }
    }
}

/// On-disk layout of an interaction log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionFormat {
    /// Tab-separated `user_id`, `news_id` columns with a header row
    #[default]
    Pairs,
    /// Headerless behaviors log: impression id, user id, time, space-separated
    /// click history, impressions
    Behaviors,
}

impl std::fmt::Display for InteractionFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            InteractionFormat::Pairs => write!(f, "pairs"),
            InteractionFormat::Behaviors => write!(f, "behaviors"),
        }
    }
}

/// Ordered sequence of interaction records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionLog {
    records: Vec<InteractionRecord>,
}

impl InteractionLog {
    #[inline]
    pub fn new(records: Vec<InteractionRecord>) -> Self {
        Self { records }
    }

    #[inline]
    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// News ids the user interacted with, in log order
    #[inline]
    pub fn history_of<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.records
            .iter()
            .filter(move |record| record.user_id == user_id)
            .map(|record| record.news_id.as_str())
    }

    /// Load a log from `path` in the given format
    #[inline]
    pub fn load<P: AsRef<Path>>(
        path: P,
        format: InteractionFormat,
    ) -> Result<Self, InteractionError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| InteractionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let log = Self::from_reader(file, format)?;
        info!(
            "Loaded {} interactions ({}) from {}",
            log.len(),
            format,
            path.display()
        );
        Ok(log)
    }

    /// Load a log, degrading to an empty one if the file is unusable
    #[inline]
    pub fn load_or_empty<P: AsRef<Path>>(path: P, format: InteractionFormat) -> Self {
        match Self::load(path, format) {
            Ok(log) => log,
            Err(e) => {
                warn!("Interaction log unavailable, continuing without history: {}", e);
                Self::default()
            }
        }
    }

    #[inline]
    pub fn from_reader<R: Read>(reader: R, format: InteractionFormat) -> Result<Self, InteractionError> {
        match format {
            InteractionFormat::Pairs => Self::read_pairs(reader),
            InteractionFormat::Behaviors => Self::read_behaviors(reader),
        }
    }

    fn read_pairs<R: Read>(reader: R) -> Result<Self, InteractionError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = reader
            .deserialize::<InteractionRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(records))
    }

    fn read_behaviors<R: Read>(reader: R) -> Result<Self, InteractionError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let Some(user_id) = row.get(BEHAVIOR_FIELD_USER).filter(|id| !id.is_empty()) else {
                continue;
            };
            let history = row.get(BEHAVIOR_FIELD_HISTORY).unwrap_or_default();

            records.extend(
                history
                    .split_whitespace()
                    .map(|news_id| InteractionRecord::new(user_id, news_id)),
            );
        }

        Ok(Self::new(records))
    }
}

impl From<Vec<InteractionRecord>> for InteractionLog {
    #[inline]
    fn from(records: Vec<InteractionRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<InteractionRecord> for InteractionLog {
    #[inline]
    fn from_iter<I: IntoIterator<Item = InteractionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
