use aibom_scan::analysis::domain::RegistryMetadata;
use aibom_scan::ports::outbound::{ModelRegistry, RegistryLookup};
use aibom_scan::shared::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock ModelRegistry serving canned metadata; unknown models resolve
/// to the unverified marker, matching the real adapter's degradation.
#[derive(Default)]
pub struct MockModelRegistry {
    entries: HashMap<String, RegistryMetadata>,
}

impl MockModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model_id: &str, license: &str, task: &str) -> Self {
        self.entries.insert(
            model_id.to_string(),
            RegistryMetadata {
                license: Some(license.to_string()),
                task: Some(task.to_string()),
                downloads: Some(1000),
                likes: Some(10),
            },
        );
        self
    }
}

#[async_trait]
impl ModelRegistry for MockModelRegistry {
    async fn fetch_model_info(&self, model_id: &str) -> Result<RegistryLookup> {
        Ok(match self.entries.get(model_id) {
            Some(meta) => RegistryLookup::Found(meta.clone()),
            None => RegistryLookup::Unverified,
        })
    }
}
