use crate::analysis::domain::RegistryMetadata;
use crate::ports::outbound::{ModelRegistry, RegistryLookup};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ModelInfoResponse {
    #[serde(default)]
    pipeline_tag: Option<String>,
    #[serde(default)]
    downloads: Option<u64>,
    #[serde(default)]
    likes: Option<u64>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(rename = "cardData", default)]
    card_data: Option<CardData>,
}

#[derive(Debug, Deserialize)]
struct CardData {
    #[serde(default)]
    license: Option<String>,
}

impl ModelInfoResponse {
    /// License from the model card, falling back to a `license:` tag.
    fn license(&self) -> Option<String> {
        if let Some(card) = &self.card_data {
            if let Some(license) = &card.license {
                return Some(license.clone());
            }
        }
        self.tags
            .iter()
            .find_map(|t| t.strip_prefix("license:").map(str::to_string))
    }
}

/// HuggingFaceClient adapter for enriching model findings from the
/// Hugging Face Hub API
///
/// Enrichment is strictly best-effort: any transport failure or
/// non-success status degrades to `Unverified` so a registry outage
/// never costs a finding.
pub struct HuggingFaceClient {
    client: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new() -> Result<Self> {
        let user_agent = format!("aibom-scan/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Model ids are `org/model` path segments; anything that would
    /// escape the models namespace is rejected before hitting the wire.
    fn valid_model_id(model_id: &str) -> bool {
        !model_id.is_empty()
            && !model_id.contains("..")
            && !model_id.contains('?')
            && !model_id.contains('#')
            && model_id.split('/').count() <= 2
            && model_id.split('/').all(|part| !part.is_empty())
    }
}

#[async_trait]
impl ModelRegistry for HuggingFaceClient {
    async fn fetch_model_info(&self, model_id: &str) -> Result<RegistryLookup> {
        if !Self::valid_model_id(model_id) {
            return Ok(RegistryLookup::Unverified);
        }

        let url = format!("https://huggingface.co/api/models/{}", model_id);
        let Ok(response) = self.client.get(&url).send().await else {
            return Ok(RegistryLookup::Unverified);
        };
        if !response.status().is_success() {
            return Ok(RegistryLookup::Unverified);
        }
        let Ok(info) = response.json::<ModelInfoResponse>().await else {
            return Ok(RegistryLookup::Unverified);
        };

        Ok(RegistryLookup::Found(RegistryMetadata {
            license: info.license(),
            task: info.pipeline_tag.clone(),
            downloads: info.downloads,
            likes: info.likes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HuggingFaceClient::new().is_ok());
    }

    #[test]
    fn test_model_id_validation() {
        assert!(HuggingFaceClient::valid_model_id("meta-llama/Llama-3-8B"));
        assert!(HuggingFaceClient::valid_model_id("gpt2"));
        assert!(!HuggingFaceClient::valid_model_id(""));
        assert!(!HuggingFaceClient::valid_model_id("a/b/c"));
        assert!(!HuggingFaceClient::valid_model_id("../admin"));
        assert!(!HuggingFaceClient::valid_model_id("org/"));
        assert!(!HuggingFaceClient::valid_model_id("org/model?x=1"));
    }

    #[test]
    fn test_license_from_card_data() {
        let info: ModelInfoResponse = serde_json::from_value(serde_json::json!({
            "pipeline_tag": "text-generation",
            "downloads": 12345,
            "likes": 67,
            "cardData": {"license": "llama3"}
        }))
        .unwrap();
        assert_eq!(info.license().as_deref(), Some("llama3"));
    }

    #[test]
    fn test_license_from_tags_fallback() {
        let info: ModelInfoResponse = serde_json::from_value(serde_json::json!({
            "tags": ["transformers", "license:apache-2.0", "safetensors"]
        }))
        .unwrap();
        assert_eq!(info.license().as_deref(), Some("apache-2.0"));
    }

    #[test]
    fn test_no_license() {
        let info: ModelInfoResponse = serde_json::from_value(serde_json::json!({
            "tags": ["transformers"]
        }))
        .unwrap();
        assert_eq!(info.license(), None);
    }
}
