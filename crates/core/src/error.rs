#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Whole-load failures. The store keeps its previous catalog when one of these is returned.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoadError {
    #[error("network: {0}")]
    Network(String),
    #[error("status: upstream answered {0}")]
    Status(u16),
    #[error("decode: {0}")]
    Decode(String),
    #[error("io: {0}")]
    Io(String),
    #[error("discarded: store was closed before the load completed")]
    Discarded,
}

/// Failure to structurally decode a string-encoded image list.
/// Never leaves the normalizer: it is absorbed into an empty list.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ImageDecodeError {
    #[error("image text is not valid JSON: {0}")]
    Syntax(String),
    #[error("image text decoded to {0}, expected an array")]
    NotAList(&'static str),
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("validation: page size must be at least 1 (got {0})")]
    InvalidPageSize(usize),
}
