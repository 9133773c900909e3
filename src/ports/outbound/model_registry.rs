use crate::analysis::domain::RegistryMetadata;
use crate::shared::Result;
use async_trait::async_trait;

/// Result of a model-registry metadata lookup.
///
/// A failed enrichment call degrades to `Unverified` rather than an
/// error; the model finding is kept either way.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryLookup {
    Found(RegistryMetadata),
    Unverified,
}

/// ModelRegistry port for enriching open-registry models with
/// license, task and popularity metadata.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Fetches metadata for a model id of the form `org/model`.
    async fn fetch_model_info(&self, model_id: &str) -> Result<RegistryLookup>;
}
