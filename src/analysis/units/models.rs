use crate::analysis::domain::{
    Category, Evidence, Finding, ModelInfo, Payload, RegistryInfo, Resumable, Severity,
};
use crate::analysis::policies::model_patterns::{infer_task, normalize_model_name, MODEL_PATTERNS};
use crate::analysis::policies::model_validation::is_plausible_model_name;
use crate::analysis::units::{DetectionUnit, Needs, UnitInput, UnitOutcome};
use crate::ports::outbound::{ModelRegistry, RegistryLookup};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Bound on the number of files content-scanned per run.
const MAX_SCAN_FILES: usize = 60;

/// One accumulated model identity before it becomes a finding.
#[derive(Debug)]
struct ModelCandidate {
    provider: String,
    name: String,
    model_type: Option<String>,
    locations: Vec<String>,
    evidence: Vec<Evidence>,
    related: Vec<String>,
}

/// Model identification unit.
///
/// Scans a prioritized file set (AI-confirmed files first, then
/// configuration files, then a bounded sample of remaining sources)
/// against the ordered provider pattern table. Generic open-registry
/// captures pass the validation filter; identities are keyed by
/// `(provider, normalized name)`; open-registry models are enriched
/// with registry metadata, degrading to an unverified marker when the
/// lookup fails.
pub struct ModelIdentificationUnit {
    registry: Arc<dyn ModelRegistry>,
}

impl ModelIdentificationUnit {
    pub fn new(registry: Arc<dyn ModelRegistry>) -> Self {
        Self { registry }
    }

    /// AI-confirmed files, then config files, then remaining sources,
    /// bounded to `MAX_SCAN_FILES` and deduplicated.
    fn prioritized_files(input: &UnitInput<'_>) -> Vec<String> {
        let mut files: Vec<String> = Vec::new();
        let mut push = |path: &str| {
            if files.len() < MAX_SCAN_FILES && !files.iter().any(|f| f == path) {
                files.push(path.to_string());
            }
        };

        if let Some(ai_files) = input.ai_files {
            for path in ai_files {
                push(path);
            }
        }
        for file in input.repo.files() {
            if file.is_config() {
                push(&file.path);
            }
        }
        for file in input.repo.files() {
            if file.is_source() {
                push(&file.path);
            }
        }
        files
    }

    fn scan_content(
        candidates: &mut BTreeMap<(String, String), ModelCandidate>,
        path: &str,
        content: &str,
    ) {
        for (line_no, line) in content.lines().enumerate() {
            for pattern in MODEL_PATTERNS.iter() {
                for m in pattern.regex.find_iter(line) {
                    let raw = m.as_str();
                    if pattern.provider == "huggingface" && !is_plausible_model_name(raw) {
                        continue;
                    }
                    let normalized = normalize_model_name(pattern.provider, raw);
                    let key = (pattern.provider.to_string(), normalized.clone());
                    let candidate = candidates.entry(key).or_insert_with(|| ModelCandidate {
                        provider: pattern.provider.to_string(),
                        name: normalized.clone(),
                        model_type: infer_task(&normalized)
                            .or(pattern.default_task)
                            .map(String::from),
                        locations: Vec::new(),
                        evidence: Vec::new(),
                        related: Vec::new(),
                    });
                    if !candidate.locations.iter().any(|l| l == path) {
                        candidate.locations.push(path.to_string());
                    }
                    candidate.evidence.push(
                        Evidence::at_line(path, line_no as u32 + 1)
                            .with_snippet(line.trim().chars().take(120).collect::<String>()),
                    );
                }
            }
        }
    }

    /// Cross-links identities that carry the same short name under
    /// different providers, rather than leaving duplicates.
    fn link_related(candidates: &mut BTreeMap<(String, String), ModelCandidate>) {
        let keys: Vec<(String, String)> = candidates.keys().cloned().collect();
        for (provider_a, name_a) in &keys {
            for (provider_b, name_b) in &keys {
                if provider_a == provider_b {
                    continue;
                }
                if short_name(name_a) == short_name(name_b) {
                    let full_b = name_b.clone();
                    if let Some(candidate) =
                        candidates.get_mut(&(provider_a.clone(), name_a.clone()))
                    {
                        if !candidate.related.contains(&full_b) {
                            candidate.related.push(full_b);
                        }
                    }
                }
            }
        }
    }

    async fn enrich(&self, candidate: &ModelCandidate) -> Option<RegistryInfo> {
        if candidate.provider != "huggingface" {
            return None;
        }
        match self.registry.fetch_model_info(&candidate.name).await {
            Ok(RegistryLookup::Found(meta)) => Some(RegistryInfo::Verified(meta)),
            // A failed enrichment degrades to an unverified marker
            // rather than dropping the finding.
            Ok(RegistryLookup::Unverified) | Err(_) => Some(RegistryInfo::Unverified),
        }
    }
}

fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

#[async_trait]
impl DetectionUnit for ModelIdentificationUnit {
    fn name(&self) -> &'static str {
        "models"
    }

    fn needs(&self) -> Needs {
        Needs {
            ai_files: true,
            dependencies: true,
            ..Needs::NONE
        }
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let mut candidates: BTreeMap<(String, String), ModelCandidate> = BTreeMap::new();

        for path in Self::prioritized_files(&input) {
            let Some(content) = input.repo.file_content(&path).await? else {
                continue;
            };
            Self::scan_content(&mut candidates, &path, &content);
        }

        Self::link_related(&mut candidates);

        let mut findings = Vec::new();
        for candidate in candidates.values() {
            let registry = self.enrich(candidate).await;
            let model_type = match &registry {
                Some(RegistryInfo::Verified(meta)) => {
                    meta.task.clone().or_else(|| candidate.model_type.clone())
                }
                _ => candidate.model_type.clone(),
            };
            let mut finding = Finding::new(
                format!("model-{}-{}", candidate.provider, slug(&candidate.name)),
                Category::Models,
                Severity::Medium,
                15,
                format!("Model Reference: {}", candidate.name),
                format!(
                    "{} model `{}` referenced in {} file(s)",
                    candidate.provider,
                    candidate.name,
                    candidate.locations.len()
                ),
            )
            .with_payload(Payload::Model(ModelInfo {
                provider: candidate.provider.clone(),
                model_name: candidate.name.clone(),
                model_type,
                locations: candidate.locations.clone(),
                registry,
                related_models: candidate.related.clone(),
            }));
            for ev in candidate.evidence.iter().take(5).cloned() {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}
