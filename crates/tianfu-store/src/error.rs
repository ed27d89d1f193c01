use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The letter to save has no text.
    #[error("Letter text is missing")]
    MissingText,

    /// Reading or writing the mailbox file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The mailbox could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
