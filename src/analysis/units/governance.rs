use crate::analysis::domain::{Category, Evidence, Finding, ParsedDocs, Resumable, Severity};
use crate::analysis::units::{DetectionUnit, Needs, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;

/// Governance documentation unit.
///
/// Emits one finding per governance artifact, present or missing, so
/// the extended report can render a completeness checklist. Every
/// finding carries weight zero: documentation about AI must never move
/// the detection score.
pub struct GovernanceUnit;

impl GovernanceUnit {
    pub fn new() -> Self {
        Self
    }

    fn license_path(input: &UnitInput<'_>) -> Option<String> {
        input.repo.files().iter().find_map(|f| {
            let lower = f.path.to_lowercase();
            let name = lower.rsplit('/').next().unwrap_or(&lower);
            let is_license = name == "license"
                || name.starts_with("license.")
                || name == "licence"
                || name.starts_with("licence.");
            (is_license && !f.path.contains('/')).then(|| f.path.clone())
        })
    }

    fn policy_path(input: &UnitInput<'_>) -> Option<String> {
        input.repo.files().iter().find_map(|f| {
            let lower = f.path.to_lowercase();
            let name = lower.rsplit('/').next().unwrap_or(&lower);
            let is_policy = name.contains("responsible_ai")
                || name.contains("responsible-ai")
                || name.contains("ai_policy")
                || name.contains("ai-policy")
                || name.contains("acceptable_use")
                || name.contains("acceptable-use");
            is_policy.then(|| f.path.clone())
        })
    }

    fn dataset_documented(docs: &ParsedDocs) -> bool {
        !docs.sections_matching("dataset").is_empty()
            || !docs.sections_matching("training data").is_empty()
            || !docs.sections_matching("datasheet").is_empty()
    }

    fn present(id: &str, title: &str, description: String, path: Option<String>) -> Finding {
        let mut finding = Finding::new(
            id,
            Category::Governance,
            Severity::Info,
            0,
            title,
            description,
        );
        if let Some(path) = path {
            finding.push_evidence(Evidence::file(path));
        }
        finding
    }
}

#[async_trait]
impl DetectionUnit for GovernanceUnit {
    fn name(&self) -> &'static str {
        "governance"
    }

    fn needs(&self) -> Needs {
        Needs {
            docs: true,
            ..Needs::NONE
        }
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let empty = ParsedDocs::default();
        let docs = input.docs.unwrap_or(&empty);
        let mut findings = Vec::new();

        if docs.has_model_card {
            findings.push(Self::present(
                "gov-model-card",
                "Model Card Present",
                "Repository documents its models in a model card".to_string(),
                None,
            ));
        } else {
            findings.push(Self::present(
                "gov-model-card",
                "Model Card Missing",
                "No model card found in the repository".to_string(),
                None,
            ));
        }

        match Self::license_path(&input) {
            Some(path) => findings.push(Self::present(
                "gov-license",
                "License Present",
                format!("License file at {}", path),
                Some(path),
            )),
            None => findings.push(Self::present(
                "gov-license",
                "License Missing",
                "No top-level license file found".to_string(),
                None,
            )),
        }

        match Self::policy_path(&input) {
            Some(path) => findings.push(Self::present(
                "gov-usage-policy",
                "AI Usage Policy Present",
                format!("AI usage policy at {}", path),
                Some(path),
            )),
            None => findings.push(Self::present(
                "gov-usage-policy",
                "AI Usage Policy Missing",
                "No responsible-AI or acceptable-use policy found".to_string(),
                None,
            )),
        }

        if Self::dataset_documented(docs) {
            findings.push(Self::present(
                "gov-data-docs",
                "Data Documentation Present",
                "Documentation describes training or evaluation data".to_string(),
                None,
            ));
        } else {
            findings.push(Self::present(
                "gov-data-docs",
                "Data Documentation Missing",
                "No dataset or training-data documentation found".to_string(),
                None,
            ));
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}
