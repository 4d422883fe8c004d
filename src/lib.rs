use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecsError>;

#[derive(Error, Debug)]
pub enum RecsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] corpus::CorpusError),

    #[error("Interaction log error: {0}")]
    Interactions(#[from] interactions::InteractionError),

    #[error("Index cache error: {0}")]
    Cache(#[from] index::cache::CacheError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod corpus;
pub mod index;
pub mod interactions;
pub mod recommend;
