#![forbid(unsafe_code)]

use crate::error::LoadError;

/// Where a catalog comes from. Implementations return the raw records; shaping
/// them into products is the store's job.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every raw record. A body that is not a JSON array is a [`LoadError::Decode`].
    async fn fetch(&self) -> Result<Vec<serde_json::Value>, LoadError>;

    /// Human-readable origin for logs (URL, file path...).
    fn describe(&self) -> String;
}
