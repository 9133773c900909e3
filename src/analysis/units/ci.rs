use crate::analysis::domain::{Category, Evidence, Finding, Resumable, Severity};
use crate::analysis::policies::ai_packages::is_ai_package;
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;

const AI_SECRET_NAMES: &[&str] = &[
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "HF_TOKEN",
    "HUGGING_FACE_HUB_TOKEN",
    "GOOGLE_API_KEY",
    "GEMINI_API_KEY",
    "COHERE_API_KEY",
    "MISTRAL_API_KEY",
    "GROQ_API_KEY",
    "REPLICATE_API_TOKEN",
];

/// CI pipeline scan unit.
///
/// Inspects workflow definitions for AI SDK installs, model downloads
/// and AI provider secrets. Workflows are parsed as YAML; a file that
/// fails to parse contributes nothing and the scan continues.
pub struct CiScanUnit;

impl CiScanUnit {
    pub fn new() -> Self {
        Self
    }

    fn is_workflow(path: &str) -> bool {
        let lower = path.to_lowercase();
        (lower.starts_with(".github/workflows/")
            && (lower.ends_with(".yml") || lower.ends_with(".yaml")))
            || lower.ends_with(".gitlab-ci.yml")
            || lower.ends_with("azure-pipelines.yml")
    }

    /// Recursively collects every scalar string in a YAML document.
    fn collect_strings(value: &serde_yaml_ng::Value, out: &mut Vec<String>) {
        match value {
            serde_yaml_ng::Value::String(s) => out.push(s.clone()),
            serde_yaml_ng::Value::Sequence(seq) => {
                for item in seq {
                    Self::collect_strings(item, out);
                }
            }
            serde_yaml_ng::Value::Mapping(map) => {
                for (key, item) in map {
                    if let serde_yaml_ng::Value::String(s) = key {
                        out.push(s.clone());
                    }
                    Self::collect_strings(item, out);
                }
            }
            _ => {}
        }
    }

    fn scan_workflow(path: &str, content: &str) -> Option<Finding> {
        let parsed: serde_yaml_ng::Value = serde_yaml_ng::from_str(content).ok()?;
        let mut strings = Vec::new();
        Self::collect_strings(&parsed, &mut strings);

        let mut observations = Vec::new();
        for s in &strings {
            if let Some(secret) = AI_SECRET_NAMES.iter().find(|name| s.contains(*name)) {
                observations.push(format!("references secret {}", secret));
            }
            if s.contains("pip install") || s.contains("npm install") || s.contains("uv add") {
                if s.split_whitespace().any(is_ai_package) {
                    observations.push("installs an AI package".to_string());
                }
            }
            if s.contains("huggingface-cli download") || s.contains("hf_hub_download") {
                observations.push("downloads model weights".to_string());
            }
        }
        observations.dedup();
        if observations.is_empty() {
            return None;
        }

        Some(
            Finding::new(
                format!("ci-{}", path.replace('/', "-")),
                Category::Ci,
                Severity::Low,
                5,
                format!("AI Usage in CI: {}", path),
                format!("Workflow {} {}", path, observations.join("; ")),
            )
            .with_evidence(Evidence::file(path)),
        )
    }
}

#[async_trait]
impl DetectionUnit for CiScanUnit {
    fn name(&self) -> &'static str {
        "ci"
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut findings = Vec::new();

        let workflow_paths: Vec<String> = input
            .repo
            .files()
            .iter()
            .filter(|f| Self::is_workflow(&f.path))
            .map(|f| f.path.clone())
            .collect();

        for path in workflow_paths {
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };
            if let Some(finding) = Self::scan_workflow(&path, &content) {
                findings.push(finding);
            }
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}
