use crate::analysis::domain::{
    Category, Evidence, Finding, Payload, Resumable, RiskInfo, Severity,
};
use crate::analysis::units::{DetectionUnit, Needs, UnitInput, UnitOutcome};
use crate::shared::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_KEY_SCAN_FILES: usize = 60;

/// Literal AI provider credentials committed to the tree.
static HARDCODED_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"](sk-ant-[A-Za-z0-9_-]{20,}|sk-[A-Za-z0-9_-]{20,}|hf_[A-Za-z0-9]{20,}|AIza[A-Za-z0-9_-]{30,})['"]"#)
        .expect("hardcoded key pattern")
});

/// Risk assessment unit.
///
/// Runs last over everything the pipeline has gathered. Like the
/// governance unit, every finding carries weight zero: risks qualify
/// the detection, they do not make a repository "more AI".
pub struct RiskAssessmentUnit;

impl RiskAssessmentUnit {
    pub fn new() -> Self {
        Self
    }

    /// Model references pinned to a floating alias instead of a fixed
    /// version. `-latest` suffixes and `:latest` tags both resolve to
    /// whatever the provider ships next.
    fn unpinned_models(findings: &[Finding]) -> Vec<String> {
        let mut unpinned = Vec::new();
        for finding in findings {
            if let Some(Payload::Model(info)) = &finding.payload {
                let name = info.model_name.to_lowercase();
                if name.ends_with("-latest") || name.ends_with(":latest") {
                    unpinned.push(info.model_name.clone());
                }
            }
        }
        unpinned
    }

    fn missing_governance(findings: &[Finding]) -> Vec<String> {
        findings
            .iter()
            .filter(|f| f.category == Category::Governance && f.title.ends_with("Missing"))
            .map(|f| f.title.trim_end_matches(" Missing").to_string())
            .collect()
    }
}

#[async_trait]
impl DetectionUnit for RiskAssessmentUnit {
    fn name(&self) -> &'static str {
        "risk"
    }

    fn needs(&self) -> Needs {
        Needs {
            findings: true,
            docs: true,
            ai_files: true,
            ..Needs::NONE
        }
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>> {
        let prior = input.findings.unwrap_or(&[]);
        let mut findings = Vec::new();

        // Credential scan covers AI usage sites plus config files,
        // where committed keys actually show up.
        let mut scan_paths: Vec<String> = input
            .ai_files
            .map(|files| files.to_vec())
            .unwrap_or_default();
        for file in input.repo.files() {
            if file.is_config() && !scan_paths.contains(&file.path) {
                scan_paths.push(file.path.clone());
            }
        }
        scan_paths.truncate(MAX_KEY_SCAN_FILES);

        let mut key_evidence = Vec::new();
        for path in &scan_paths {
            let Some(content) = input.repo.file_content(path).await? else {
                continue;
            };
            for (line_no, line) in content.lines().enumerate() {
                if HARDCODED_KEY.is_match(line) && key_evidence.len() < 5 {
                    // The snippet deliberately omits the matched line.
                    key_evidence.push(Evidence::at_line(path, line_no as u32 + 1));
                }
            }
        }
        if !key_evidence.is_empty() {
            let count = key_evidence.len() as u32;
            let mut finding = Finding::new(
                "risk-hardcoded-keys",
                Category::Risk,
                Severity::High,
                0,
                "Hardcoded API Keys",
                format!("{} AI provider credential(s) committed to the repository", count),
            )
            .with_payload(Payload::Risk(RiskInfo {
                risk_type: "hardcoded-credentials".to_string(),
                count,
            }));
            for ev in key_evidence {
                finding.push_evidence(ev);
            }
            findings.push(finding);
        }

        let unpinned = Self::unpinned_models(prior);
        if !unpinned.is_empty() {
            findings.push(
                Finding::new(
                    "risk-unpinned-models",
                    Category::Risk,
                    Severity::Medium,
                    0,
                    "Unpinned Model Versions",
                    format!("Floating model aliases in use: {}", unpinned.join(", ")),
                )
                .with_payload(Payload::Risk(RiskInfo {
                    risk_type: "unpinned-model-version".to_string(),
                    count: unpinned.len() as u32,
                })),
            );
        }

        let missing = Self::missing_governance(prior);
        let has_ai = prior.iter().any(|f| f.weight > 0);
        if has_ai && !missing.is_empty() {
            findings.push(
                Finding::new(
                    "risk-governance-gaps",
                    Category::Risk,
                    Severity::Low,
                    0,
                    "Governance Gaps",
                    format!("AI components present without: {}", missing.join(", ")),
                )
                .with_payload(Payload::Risk(RiskInfo {
                    risk_type: "missing-governance".to_string(),
                    count: missing.len() as u32,
                })),
            );
        }

        Ok(Resumable::Complete(UnitOutcome::from_findings(findings)))
    }
}
