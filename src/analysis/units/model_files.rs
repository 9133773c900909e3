use crate::analysis::domain::{
    Category, Evidence, Finding, ModelInfo, Payload, Resumable, Severity,
};
use crate::analysis::units::{DetectionUnit, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;

/// Extensions that unambiguously identify model weight artifacts.
const WEIGHT_EXTENSIONS: &[&str] = &[
    "safetensors",
    "gguf",
    "ggml",
    "onnx",
    "pt",
    "pth",
    "tflite",
    "mlmodel",
    "h5",
    "pb",
];

/// Local model artifact unit.
///
/// Purely listing-based: no file content is fetched. `.bin` files are
/// only counted when the path suggests a model directory, since the
/// extension is too generic on its own.
pub struct ModelFileUnit;

impl ModelFileUnit {
    pub fn new() -> Self {
        Self
    }

    fn is_weight_file(path: &str) -> bool {
        let lower = path.to_lowercase();
        if let Some(ext) = lower.rsplit('.').next() {
            if WEIGHT_EXTENSIONS.contains(&ext) {
                return true;
            }
            if ext == "bin" && (lower.contains("model") || lower.contains("checkpoint")) {
                return true;
            }
        }
        false
    }
}

#[async_trait]
impl DetectionUnit for ModelFileUnit {
    fn name(&self) -> &'static str {
        "model_files"
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut findings = Vec::new();

        for file in input.repo.files() {
            if !Self::is_weight_file(&file.path) {
                continue;
            }
            let name = file.file_name();
            let size_mb = file.size as f64 / (1024.0 * 1024.0);
            findings.push(
                Finding::new(
                    format!("model-file-{}", file.path.replace('/', "-")),
                    Category::Models,
                    Severity::Medium,
                    10,
                    format!("Local Model File: {}", name),
                    format!("Model weight artifact {} ({:.1} MB)", file.path, size_mb),
                )
                .with_payload(Payload::Model(ModelInfo {
                    provider: "local".to_string(),
                    model_name: name,
                    model_type: Some("local-model-file".to_string()),
                    locations: vec![file.path.clone()],
                    registry: None,
                    related_models: Vec::new(),
                }))
                .with_evidence(Evidence::file(&file.path)),
            );
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}
