//! Error types

/// Errors produced by key handling and anonymization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid output length {0}: must be between 1 and {max}", max = crate::anonymizer::MAX_LENGTH)]
    InvalidLength(usize),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
