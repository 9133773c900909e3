use crate::analysis::domain::{Category, Finding};
use crate::analysis::policies::merge_keywords::title_matches_package;

/// Merges code-usage findings into the dependency findings they
/// corroborate.
///
/// A code finding attributed to an installed package is folded into
/// the package's dependency finding: the dependency keeps its own
/// severity and weight, gains the code evidence in `code_usage`, and
/// takes the merged title. Reconciliation only ever reduces the number
/// of findings. Config findings are never merged; a config file naming
/// a provider is a distinct observation from the package being
/// installed.
pub struct FindingReconciler;

impl FindingReconciler {
    pub fn reconcile(findings: Vec<Finding>) -> Vec<Finding> {
        let mut merged: Vec<Finding> = Vec::with_capacity(findings.len());
        let mut code_findings: Vec<Finding> = Vec::new();

        for finding in findings {
            if finding.category == Category::Code {
                code_findings.push(finding);
            } else {
                merged.push(finding);
            }
        }

        for code in code_findings {
            let target = merged.iter_mut().find(|f| {
                f.category == Category::Dependencies
                    && Self::package_name(f)
                        .map(|pkg| title_matches_package(&code.title, pkg))
                        .unwrap_or(false)
            });
            match target {
                Some(dep) => {
                    let package = Self::package_name(dep).unwrap_or(&dep.title).to_string();
                    dep.title = format!("{} - Usage Detected", package);
                    dep.description = format!(
                        "{}; code-level usage confirmed ({})",
                        dep.description, code.title
                    );
                    dep.code_usage.extend(code.evidence);
                }
                None => merged.push(code),
            }
        }

        merged
    }

    fn package_name(finding: &Finding) -> Option<&str> {
        match &finding.payload {
            Some(crate::analysis::domain::Payload::Dependency(info)) => Some(&info.name),
            _ => None,
        }
    }
}
