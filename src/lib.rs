use thiserror::Error;

pub type Result<T> = std::result::Result<T, CampusError>;

#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod chunker;
pub mod commands;
pub mod config;
pub mod data;
pub mod embeddings;
pub mod engine;
pub mod fallback;
pub mod generation;
pub mod index;
pub mod server;
pub mod synthesizer;
