use crate::analysis::domain::{
    Category, Evidence, Finding, InfraInfo, Payload, Resumable, Severity,
};
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Docker base images that carry an AI runtime.
static AI_BASE_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*FROM\s+\S*(nvidia/cuda|pytorch/pytorch|tensorflow/tensorflow|huggingface/|vllm/vllm|ollama/ollama|ghcr\.io/ggerganov/llama\.cpp|nvcr\.io/nvidia)\S*",
    )
    .expect("base image pattern")
});

/// Kubernetes GPU resource requests.
static K8S_GPU_RESOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(nvidia\.com/gpu|amd\.com/gpu|cloud-tpus\.google\.com)").expect("gpu resource pattern")
});

/// Model serving platforms, matched in compose files and manifests.
const SERVING_PLATFORMS: &[(&str, &str)] = &[
    ("vllm", "vllm"),
    ("ollama", "ollama"),
    ("text-generation-inference", "tgi"),
    ("tgi", "tgi"),
    ("triton-inference-server", "triton"),
    ("tritonserver", "triton"),
    ("kserve", "kserve"),
    ("seldon", "seldon"),
    ("bentoml", "bentoml"),
    ("ray-serve", "ray-serve"),
    ("sagemaker", "sagemaker"),
];

/// Infrastructure scan unit.
///
/// Reads Dockerfiles, compose files and Kubernetes manifests for AI
/// base images, GPU resource requests and model serving platforms.
pub struct InfrastructureUnit;

impl InfrastructureUnit {
    pub fn new() -> Self {
        Self
    }

    fn is_infra_file(path: &str) -> bool {
        let lower = path.to_lowercase();
        let name = lower.rsplit('/').next().unwrap_or(&lower);
        name == "dockerfile"
            || name.starts_with("dockerfile.")
            || name.ends_with(".dockerfile")
            || name.starts_with("docker-compose")
            || name.starts_with("compose.")
            || ((lower.ends_with(".yaml") || lower.ends_with(".yml"))
                && (lower.contains("k8s")
                    || lower.contains("kubernetes")
                    || lower.contains("helm")
                    || lower.contains("deploy")
                    || lower.contains("manifest")))
    }
}

#[async_trait]
impl DetectionUnit for InfrastructureUnit {
    fn name(&self) -> &'static str {
        "infrastructure"
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut platforms: Vec<String> = Vec::new();
        let mut infra_type = None;
        let mut evidence = Vec::new();

        let infra_paths: Vec<String> = input
            .repo
            .files()
            .iter()
            .filter(|f| Self::is_infra_file(&f.path))
            .map(|f| f.path.clone())
            .collect();

        for path in infra_paths {
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                let mut hit = false;
                if AI_BASE_IMAGE.is_match(line) {
                    infra_type.get_or_insert_with(|| "container".to_string());
                    hit = true;
                }
                if K8S_GPU_RESOURCE.is_match(line) {
                    infra_type = Some("kubernetes-gpu".to_string());
                    hit = true;
                }
                let lower = line.to_lowercase();
                for (token, platform) in SERVING_PLATFORMS {
                    if lower.contains(token) && !platforms.iter().any(|p| p == platform) {
                        platforms.push(platform.to_string());
                        infra_type.get_or_insert_with(|| "model-serving".to_string());
                        hit = true;
                    }
                }
                if hit && evidence.len() < 5 {
                    evidence.push(
                        Evidence::at_line(&path, line_no as u32 + 1)
                            .with_snippet(line.trim().chars().take(120).collect::<String>()),
                    );
                }
            }
        }

        let Some(infra_type) = infra_type else {
            return Ok(Resumable::Complete(UnitOutcome::default()));
        };

        platforms.sort();

        let mut finding = Finding::new(
            format!("infra-{}", infra_type),
            Category::Infrastructure,
            Severity::Low,
            5,
            format!("AI Infrastructure: {}", infra_type),
            if platforms.is_empty() {
                format!("Deployment files declare {} infrastructure", infra_type)
            } else {
                format!(
                    "Deployment files declare {} infrastructure using {}",
                    infra_type,
                    platforms.join(", ")
                )
            },
        )
        .with_payload(Payload::Infrastructure(InfraInfo {
            infra_type,
            platforms,
        }));
        for ev in evidence {
            finding.push_evidence(ev);
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(vec![finding])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_infra_file() {
        assert!(InfrastructureUnit::is_infra_file("Dockerfile"));
        assert!(InfrastructureUnit::is_infra_file("docker/Dockerfile.gpu"));
        assert!(InfrastructureUnit::is_infra_file("docker-compose.yml"));
        assert!(InfrastructureUnit::is_infra_file("k8s/deployment.yaml"));
        assert!(!InfrastructureUnit::is_infra_file("src/main.rs"));
        assert!(!InfrastructureUnit::is_infra_file("config/settings.yaml"));
    }

    #[test]
    fn test_ai_base_image() {
        assert!(AI_BASE_IMAGE.is_match("FROM nvidia/cuda:12.4.1-runtime-ubuntu22.04"));
        assert!(AI_BASE_IMAGE.is_match("FROM pytorch/pytorch:2.3.0-cuda12.1-cudnn8-runtime"));
        assert!(AI_BASE_IMAGE.is_match("FROM vllm/vllm-openai:latest"));
        assert!(!AI_BASE_IMAGE.is_match("FROM python:3.12-slim"));
    }

    #[test]
    fn test_k8s_gpu_resource() {
        assert!(K8S_GPU_RESOURCE.is_match("    nvidia.com/gpu: 1"));
        assert!(!K8S_GPU_RESOURCE.is_match("    cpu: 500m"));
    }
}
