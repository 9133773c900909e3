use crate::analysis::domain::{
    Category, Finding, HardwareInfo, InfraInfo, Payload, RegistryInfo, Severity,
};
use serde::Serialize;

/// Governance checklist derived from the governance findings' titles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GovernanceChecklist {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

impl GovernanceChecklist {
    /// Fraction of governance artifacts that are present.
    pub fn completeness(&self) -> f64 {
        let total = self.present.len() + self.missing.len();
        if total == 0 {
            return 0.0;
        }
        self.present.len() as f64 / total as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskEntry {
    pub risk_type: String,
    pub severity: Severity,
    pub count: u32,
    pub description: String,
}

/// Detection areas reported in the scanned-for-but-not-found gap list.
const SCAN_AREAS: [(Category, &str); 8] = [
    (Category::Dependencies, "AI dependencies"),
    (Category::Code, "Code-level SDK usage"),
    (Category::Models, "Model references"),
    (Category::Config, "AI configuration"),
    (Category::Ci, "CI/CD AI usage"),
    (Category::Prompts, "Prompt assets"),
    (Category::Hardware, "Hardware requirements"),
    (Category::Infrastructure, "Serving infrastructure"),
];

/// Detected packages that indicate a dataset or training-data pipeline.
const DATA_STACK: [&str; 4] = ["datasets", "dvc", "mlflow", "wandb"];

/// Report-only summaries shared by the extended envelope and the
/// human-facing output.
///
/// Computed once per analysis from the reconciled findings; the
/// serializers read from here instead of re-deriving.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSections {
    pub hardware: Vec<HardwareInfo>,
    pub infrastructure: Vec<InfraInfo>,
    pub governance: GovernanceChecklist,
    pub risks: Vec<RiskEntry>,
    /// Data/training pipeline packages among the detected dependencies.
    pub data_pipeline: Vec<String>,
    /// Detection areas scanned with nothing found.
    pub gaps: Vec<String>,
    /// Free-form analysis notes for the extended envelope.
    pub notes: Vec<String>,
}

impl ReportSections {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut sections = ReportSections::default();

        for finding in findings {
            match (&finding.category, &finding.payload) {
                (Category::Hardware, Some(Payload::Hardware(info))) => {
                    sections.hardware.push(info.clone());
                }
                (Category::Infrastructure, Some(Payload::Infrastructure(info))) => {
                    sections.infrastructure.push(info.clone());
                }
                (Category::Risk, Some(Payload::Risk(info))) => {
                    sections.risks.push(RiskEntry {
                        risk_type: info.risk_type.clone(),
                        severity: finding.severity,
                        count: info.count,
                        description: finding.description.clone(),
                    });
                }
                (Category::Governance, _) => {
                    if let Some(artifact) = finding.title.strip_suffix(" Present") {
                        sections.governance.present.push(artifact.to_string());
                    } else if let Some(artifact) = finding.title.strip_suffix(" Missing") {
                        sections.governance.missing.push(artifact.to_string());
                    }
                }
                _ => {}
            }
        }

        for finding in findings {
            if let Some(Payload::Dependency(info)) = &finding.payload {
                if DATA_STACK.contains(&info.name.as_str())
                    && !sections.data_pipeline.contains(&info.name)
                {
                    sections.data_pipeline.push(info.name.clone());
                }
            }
        }

        // Computed once here; the extended envelope reuses it as-is.
        for (category, label) in SCAN_AREAS {
            let found = match category {
                // Code findings fold into their dependency finding, so
                // usage survives reconciliation as `code_usage`.
                Category::Code => findings
                    .iter()
                    .any(|f| f.category == Category::Code || !f.code_usage.is_empty()),
                _ => findings.iter().any(|f| f.category == category),
            };
            if !found {
                sections.gaps.push(label.to_string());
            }
        }

        let unverified = findings
            .iter()
            .filter(|f| {
                matches!(
                    &f.payload,
                    Some(Payload::Model(info)) if info.registry == Some(RegistryInfo::Unverified)
                )
            })
            .count();
        if unverified > 0 {
            sections.notes.push(format!(
                "{} model reference(s) could not be verified against the model registry",
                unverified
            ));
        }
        let corroborated = findings.iter().filter(|f| !f.code_usage.is_empty()).count();
        if corroborated > 0 {
            sections.notes.push(format!(
                "{} dependency finding(s) corroborated by code-level usage",
                corroborated
            ));
        }

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::RiskInfo;

    fn gov(title: &str) -> Finding {
        Finding::new("gov", Category::Governance, Severity::Info, 0, title, "")
    }

    #[test]
    fn test_governance_checklist_from_titles() {
        let sections = ReportSections::from_findings(&[
            gov("Model Card Present"),
            gov("License Present"),
            gov("AI Usage Policy Missing"),
            gov("Data Documentation Missing"),
        ]);
        assert_eq!(sections.governance.present, vec!["Model Card", "License"]);
        assert_eq!(
            sections.governance.missing,
            vec!["AI Usage Policy", "Data Documentation"]
        );
        assert!((sections.governance.completeness() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_gap_list_names_empty_areas() {
        let dep = Finding::new(
            "dep-openai",
            Category::Dependencies,
            Severity::Medium,
            10,
            "openai",
            "",
        );
        let sections = ReportSections::from_findings(&[dep]);
        assert!(!sections.gaps.contains(&"AI dependencies".to_string()));
        assert!(sections.gaps.contains(&"Model references".to_string()));
        assert!(sections.gaps.contains(&"Prompt assets".to_string()));
    }

    #[test]
    fn test_code_usage_on_merged_finding_clears_the_code_gap() {
        let mut dep = Finding::new(
            "dep-openai",
            Category::Dependencies,
            Severity::Medium,
            10,
            "openai - Usage Detected",
            "",
        );
        dep.code_usage.push(crate::analysis::domain::Evidence::file("app.py"));
        let sections = ReportSections::from_findings(&[dep]);
        assert!(!sections.gaps.contains(&"Code-level SDK usage".to_string()));
        assert_eq!(sections.notes, vec![
            "1 dependency finding(s) corroborated by code-level usage".to_string()
        ]);
    }

    #[test]
    fn test_data_pipeline_packages_collected() {
        let dep = |name: &str| {
            Finding::new(
                format!("dep-{}", name),
                Category::Dependencies,
                Severity::Medium,
                10,
                name,
                "",
            )
            .with_payload(Payload::Dependency(crate::analysis::domain::DependencyInfo {
                name: name.to_string(),
                version: None,
                ecosystem: "pypi".to_string(),
                source: "requirements.txt".to_string(),
            }))
        };
        let sections = ReportSections::from_findings(&[dep("datasets"), dep("openai")]);
        assert_eq!(sections.data_pipeline, vec!["datasets".to_string()]);
    }

    #[test]
    fn test_risk_entries_carry_severity_and_count() {
        let finding = Finding::new(
            "risk-hardcoded-keys",
            Category::Risk,
            Severity::High,
            0,
            "Hardcoded API Keys",
            "2 AI provider credential(s) committed to the repository",
        )
        .with_payload(Payload::Risk(RiskInfo {
            risk_type: "hardcoded-credentials".to_string(),
            count: 2,
        }));
        let sections = ReportSections::from_findings(&[finding]);
        assert_eq!(sections.risks.len(), 1);
        assert_eq!(sections.risks[0].risk_type, "hardcoded-credentials");
        assert_eq!(sections.risks[0].severity, Severity::High);
        assert_eq!(sections.risks[0].count, 2);
    }

    #[test]
    fn test_empty_checklist_completeness_is_zero() {
        assert_eq!(GovernanceChecklist::default().completeness(), 0.0);
    }

    #[test]
    fn test_hardware_and_infrastructure_collected() {
        let hw = Finding::new("hardware-cuda", Category::Hardware, Severity::Low, 5, "x", "")
            .with_payload(Payload::Hardware(HardwareInfo {
                hardware_type: "cuda".to_string(),
                libraries: vec!["bitsandbytes".to_string()],
            }));
        let infra = Finding::new("infra-container", Category::Infrastructure, Severity::Low, 5, "y", "")
            .with_payload(Payload::Infrastructure(InfraInfo {
                infra_type: "container".to_string(),
                platforms: vec!["vllm".to_string()],
            }));
        let sections = ReportSections::from_findings(&[hw, infra]);
        assert_eq!(sections.hardware.len(), 1);
        assert_eq!(sections.infrastructure[0].platforms, vec!["vllm"]);
    }
}
