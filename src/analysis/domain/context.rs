use crate::analysis::domain::finding::Finding;
use serde::{Deserialize, Serialize};

/// One package resolved by the dependency detection unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedPackage {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub ecosystem: String,
}

/// Side-channel output of the dependency unit, consumed by later units
/// to narrow their search space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedDependencies {
    /// Whether the machine-readable dependency graph was retrieved.
    pub sbom_available: bool,
    pub packages: Vec<DetectedPackage>,
}

impl DetectedDependencies {
    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|p| p.name == name)
    }

    /// Whether any detected package name contains the given fragment.
    pub fn contains_like(&self, fragment: &str) -> bool {
        self.packages.iter().any(|p| p.name.contains(fragment))
    }
}

/// One extracted documentation section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocSection {
    pub file: String,
    pub heading: String,
    pub body: String,
}

/// Structured documentation extracts produced by the docs parser unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocs {
    pub sections: Vec<DocSection>,
    pub has_model_card: bool,
    pub readme_path: Option<String>,
}

impl ParsedDocs {
    /// Sections whose heading contains the given fragment, case-insensitive.
    pub fn sections_matching(&self, fragment: &str) -> Vec<&DocSection> {
        let fragment = fragment.to_lowercase();
        self.sections
            .iter()
            .filter(|s| s.heading.to_lowercase().contains(&fragment))
            .collect()
    }
}

/// Mutable-by-append aggregate threaded through the orchestrator.
///
/// Lives only for the duration of one analysis run and is owned
/// exclusively by the orchestrator; never shared across runs.
#[derive(Debug, Default)]
pub struct PipelineContext {
    pub findings: Vec<Finding>,
    /// Files confirmed to contain AI usage, used to prioritize later scans.
    pub ai_files_found: Vec<String>,
    pub dependencies: Option<DetectedDependencies>,
    pub parsed_docs: Option<ParsedDocs>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends findings, discarding any whose id is already present.
    pub fn absorb_findings(&mut self, findings: Vec<Finding>) {
        for finding in findings {
            if !self.findings.iter().any(|f| f.id == finding.id) {
                self.findings.push(finding);
            }
        }
    }

    /// Records AI-confirmed files, deduplicated by path.
    pub fn absorb_ai_files(&mut self, files: Vec<String>) {
        for file in files {
            if !self.ai_files_found.contains(&file) {
                self.ai_files_found.push(file);
            }
        }
    }
}
