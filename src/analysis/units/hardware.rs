use crate::analysis::domain::{
    Category, Evidence, Finding, HardwareInfo, Payload, Resumable, Severity, MAX_EVIDENCE,
};
use crate::analysis::units::{DetectionUnit, Needs, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Packages whose presence implies accelerator hardware requirements.
const ACCELERATOR_PACKAGES: &[(&str, &str)] = &[
    ("nvidia-cuda-runtime", "cuda"),
    ("nvidia-cudnn", "cuda"),
    ("cupy", "cuda"),
    ("cupy-cuda", "cuda"),
    ("triton", "cuda"),
    ("bitsandbytes", "cuda"),
    ("flash-attn", "cuda"),
    ("deepspeed", "cuda"),
    ("xformers", "cuda"),
    ("tensorrt", "cuda"),
    ("torch-rocm", "rocm"),
    ("rocm-smi", "rocm"),
    ("intel-extension-for-pytorch", "xpu"),
    ("tpu-client", "tpu"),
    ("jax[tpu]", "tpu"),
];

static GPU_MODEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(A100|H100|H200|V100|T4|L4|L40S?|RTX\s?[34]0\d0|MI2\d0X?|MI300X?|TPU\s?v[2-5])\b")
        .expect("gpu model pattern")
});

static DEVICE_SELECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(torch\.cuda\.|device\s*=\s*['"]cuda|\.to\(\s*['"]cuda|torch\.device\(\s*['"]cuda|tf\.config\..*GPU)"#)
        .expect("device selection pattern")
});

/// Hardware requirements unit.
///
/// Combines dependency signals (accelerator packages), code signals
/// (device selection calls) and documentation-adjacent mentions of
/// concrete GPU models into a single finding per hardware type.
pub struct HardwareUnit;

impl HardwareUnit {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DetectionUnit for HardwareUnit {
    fn name(&self) -> &'static str {
        "hardware"
    }

    fn needs(&self) -> Needs {
        Needs {
            dependencies: true,
            ai_files: true,
            ..Needs::NONE
        }
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut libraries: Vec<String> = Vec::new();
        let mut hardware_type = None;
        let mut evidence = Vec::new();

        if let Some(deps) = input.dependencies {
            for pkg in &deps.packages {
                let lower = pkg.name.to_lowercase();
                for (name, hw) in ACCELERATOR_PACKAGES {
                    if lower == *name || lower.starts_with(&format!("{}-", name)) {
                        libraries.push(pkg.name.clone());
                        hardware_type.get_or_insert_with(|| hw.to_string());
                    }
                }
            }
        }

        // Device selection in files already known to use AI libraries.
        if let Some(ai_files) = input.ai_files {
            for path in ai_files {
                let Some(content) = input.repo.file_content(path).await? else {
                    continue;
                };
                for (line_no, line) in content.lines().enumerate() {
                    if DEVICE_SELECTION.is_match(line) {
                        hardware_type.get_or_insert_with(|| "cuda".to_string());
                        if evidence.len() < 3 {
                            evidence.push(
                                Evidence::at_line(path, line_no as u32 + 1)
                                    .with_snippet(line.trim().chars().take(120).collect::<String>()),
                            );
                        }
                        break;
                    }
                }
            }
        }

        // Concrete GPU models named in infra or docs files.
        for file in input.repo.files() {
            let lower = file.path.to_lowercase();
            let interesting = lower.ends_with("dockerfile")
                || lower.contains("docker-compose")
                || (file.is_config() && (lower.contains("deploy") || lower.contains("infra")))
                || lower.ends_with("readme.md");
            if !interesting {
                continue;
            }
            let Some(content) = input.repo.file_content(&file.path).await? else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                if let Some(m) = GPU_MODEL.find(line) {
                    hardware_type.get_or_insert_with(|| "gpu".to_string());
                    if evidence.len() < MAX_EVIDENCE {
                        evidence.push(
                            Evidence::at_line(&file.path, line_no as u32 + 1)
                                .with_snippet(m.as_str().to_string()),
                        );
                    }
                    break;
                }
            }
        }

        let Some(hardware_type) = hardware_type else {
            return Ok(Resumable::Complete(UnitOutcome::default()));
        };

        libraries.sort();
        libraries.dedup();

        let mut finding = Finding::new(
            format!("hardware-{}", hardware_type),
            Category::Hardware,
            Severity::Low,
            5,
            format!("Accelerator Requirement: {}", hardware_type),
            format!(
                "Repository shows {} hardware usage ({} accelerator package(s))",
                hardware_type,
                libraries.len()
            ),
        )
        .with_payload(Payload::Hardware(HardwareInfo {
            hardware_type,
            libraries,
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
    fn test_gpu_model_pattern() {
        assert!(GPU_MODEL.is_match("requires an A100 80GB"));
        assert!(GPU_MODEL.is_match("nvidia.com/gpu: H100"));
        assert!(GPU_MODEL.is_match("tested on RTX 4090"));
        assert!(!GPU_MODEL.is_match("runs on any laptop"));
    }

    #[test]
    fn test_device_selection_pattern() {
        assert!(DEVICE_SELECTION.is_match("model.to(\"cuda\")"));
        assert!(DEVICE_SELECTION.is_match("if torch.cuda.is_available():"));
        assert!(DEVICE_SELECTION.is_match("device = 'cuda:0'"));
        assert!(!DEVICE_SELECTION.is_match("device = 'cpu'"));
    }
}
