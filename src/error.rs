//! Error types for dedupq.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("queue is empty")]
    EmptyQueue,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid graph: {0}")]
    Graph(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
