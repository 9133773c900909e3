use serde::{Deserialize, Serialize};

/// Maximum number of evidence entries kept per finding.
pub const MAX_EVIDENCE: usize = 5;

/// Closed set of detection categories.
///
/// Every finding belongs to exactly one category, and the category
/// determines which payload variant (if any) the finding may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Dependencies,
    Code,
    Metadata,
    Config,
    Ci,
    Models,
    Prompts,
    Hardware,
    Infrastructure,
    Governance,
    Risk,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dependencies => "dependencies",
            Category::Code => "code",
            Category::Metadata => "metadata",
            Category::Config => "config",
            Category::Ci => "ci",
            Category::Models => "models",
            Category::Prompts => "prompts",
            Category::Hardware => "hardware",
            Category::Infrastructure => "infrastructure",
            Category::Governance => "governance",
            Category::Risk => "risk",
        }
    }

    /// Categories that imply tangible proof: findings in these categories
    /// must always carry at least one evidence entry.
    pub fn requires_evidence(&self) -> bool {
        matches!(
            self,
            Category::Dependencies
                | Category::Code
                | Category::Models
                | Category::Hardware
                | Category::Infrastructure
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// A single location of detected evidence.
///
/// `file:line` precision is preferred but optional; search-API hits
/// carry a URL instead of a line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Evidence {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            file: path.into(),
            line: None,
            snippet: None,
            url: None,
        }
    }

    pub fn at_line(path: impl Into<String>, line: u32) -> Self {
        Self {
            file: path.into(),
            line: Some(line),
            snippet: None,
            url: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Dependency payload: a manifest-declared or graph-resolved package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub ecosystem: String,
    /// "dependency-graph" when resolved from the host SBOM endpoint,
    /// otherwise the manifest file the package was parsed from.
    pub source: String,
}

/// Registry metadata for an open-registry model, or an explicit marker
/// that the registry lookup failed and the model is unverified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RegistryInfo {
    Verified(RegistryMetadata),
    Unverified,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
}

/// Model payload: one identity-resolved model reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    /// Files the model name was observed in.
    pub locations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistryInfo>,
    /// Normalized names of the same model surfaced under other providers.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related_models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub hardware_type: String,
    pub libraries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraInfo {
    pub infra_type: String,
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInfo {
    pub risk_type: String,
    pub count: u32,
}

/// Category-selected payload variant.
///
/// Exactly one variant is allowed per finding and it must agree with
/// the finding's category (enforced by `Finding::with_payload`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Dependency(DependencyInfo),
    Model(ModelInfo),
    Hardware(HardwareInfo),
    Infrastructure(InfraInfo),
    Risk(RiskInfo),
}

impl Payload {
    /// Whether this payload variant is legal for the given category.
    pub fn matches(&self, category: Category) -> bool {
        matches!(
            (self, category),
            (Payload::Dependency(_), Category::Dependencies)
                | (Payload::Model(_), Category::Models)
                | (Payload::Hardware(_), Category::Hardware)
                | (Payload::Infrastructure(_), Category::Infrastructure)
                | (Payload::Risk(_), Category::Risk)
        )
    }
}

/// The universal evidence unit produced by detection units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable id, unique within one pipeline run.
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    /// Non-negative contribution to the aggregate confidence score.
    /// Informational governance/risk findings always carry weight 0.
    pub weight: u32,
    pub title: String,
    pub description: String,
    pub evidence: Vec<Evidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// Code-usage evidence merged in by the reconciler; empty unless a
    /// dependency finding absorbed a matching code finding.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub code_usage: Vec<Evidence>,
}

impl Finding {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        severity: Severity,
        weight: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            weight,
            title: title.into(),
            description: description.into(),
            evidence: Vec::new(),
            payload: None,
            code_usage: Vec::new(),
        }
    }

    /// Attaches a payload, asserting the category invariant in debug builds.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        debug_assert!(
            payload.matches(self.category),
            "payload variant does not match category {:?}",
            self.category
        );
        self.payload = Some(payload);
        self
    }

    /// Appends an evidence entry, keeping at most `MAX_EVIDENCE` entries.
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.push_evidence(evidence);
        self
    }

    pub fn push_evidence(&mut self, evidence: Evidence) {
        if self.evidence.len() < MAX_EVIDENCE {
            self.evidence.push(evidence);
        }
    }
}
