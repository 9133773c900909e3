//! The detection units of the analysis pipeline.
//!
//! Each unit consumes a slice of the repository context plus the
//! side-channel state it declares through [`Needs`], and produces zero
//! or more findings. Units never abort the run: the orchestrator
//! isolates per-unit failures.

pub mod ci;
pub mod code_usage;
pub mod configs;
pub mod dependencies;
pub mod docs;
pub mod governance;
pub mod hardware;
pub mod infrastructure;
pub mod model_files;
pub mod models;
pub mod prompts;
pub mod risk;

use crate::analysis::domain::{
    DetectedDependencies, Finding, ParsedDocs, Resumable, ResumeState,
};
use crate::ports::outbound::{DocExtractor, ModelRegistry, RepositoryContext};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Declared input set of a detection unit.
///
/// The orchestrator resolves these flags into a typed [`UnitInput`];
/// this is the mechanism by which later units gain visibility into
/// earlier results without depending on a god-object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Needs {
    pub findings: bool,
    pub dependencies: bool,
    pub docs: bool,
    pub ai_files: bool,
}

impl Needs {
    pub const NONE: Needs = Needs {
        findings: false,
        dependencies: false,
        docs: false,
        ai_files: false,
    };
}

/// Per-unit input assembled by the orchestrator.
///
/// Fields beyond the repository context are populated only when the
/// unit declares the corresponding capability flag.
pub struct UnitInput<'a> {
    pub repo: &'a dyn RepositoryContext,
    pub findings: Option<&'a [Finding]>,
    pub dependencies: Option<&'a DetectedDependencies>,
    pub docs: Option<&'a ParsedDocs>,
    pub ai_files: Option<&'a [String]>,
    /// Checkpoint for a re-invocation of a previously paused unit.
    pub resume: Option<ResumeState>,
}

impl<'a> UnitInput<'a> {
    pub fn bare(repo: &'a dyn RepositoryContext) -> Self {
        Self {
            repo,
            findings: None,
            dependencies: None,
            docs: None,
            ai_files: None,
            resume: None,
        }
    }
}

/// Result of one unit invocation.
#[derive(Debug, Default)]
pub struct UnitOutcome {
    pub findings: Vec<Finding>,
    /// Files confirmed to contain AI usage, for later prioritization.
    pub ai_files: Vec<String>,
    /// Set by the dependency unit only.
    pub dependencies: Option<DetectedDependencies>,
    /// Set by the docs parser unit only.
    pub parsed_docs: Option<ParsedDocs>,
}

impl UnitOutcome {
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            ..Default::default()
        }
    }
}

/// A single detection stage of the pipeline.
#[async_trait]
pub trait DetectionUnit: Send + Sync {
    fn name(&self) -> &'static str;

    /// Declared input set; defaults to the bare repository context.
    fn needs(&self) -> Needs {
        Needs::NONE
    }

    async fn run(&self, input: UnitInput<'_>) -> Result<Resumable<UnitOutcome>>;
}

/// Builds the full unit registry in the fixed pipeline order:
/// producers run before consumers.
pub fn build_registry(
    model_registry: Arc<dyn ModelRegistry>,
    doc_extractor: Arc<dyn DocExtractor>,
) -> Vec<Box<dyn DetectionUnit>> {
    vec![
        Box::new(dependencies::DependencyUnit::new()),
        Box::new(code_usage::CodeUsageUnit::new()),
        Box::new(models::ModelIdentificationUnit::new(model_registry)),
        Box::new(configs::ConfigScanUnit::new()),
        Box::new(ci::CiScanUnit::new()),
        Box::new(model_files::ModelFileUnit::new()),
        Box::new(prompts::PromptScanUnit::new()),
        Box::new(hardware::HardwareUnit::new()),
        Box::new(infrastructure::InfrastructureUnit::new()),
        Box::new(docs::DocsParserUnit::new(doc_extractor)),
        Box::new(governance::GovernanceUnit::new()),
        Box::new(risk::RiskAssessmentUnit::new()),
    ]
}
