use crate::analysis::domain::{Finding, RepoSummary};
use crate::analysis::services::ConfidenceLevel;
use crate::application::dto::OutputFormat;

/// One synthesized BOM document.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub format: OutputFormat,
    pub content: String,
}

/// The state of one complete analysis run.
///
/// Created by the analysis use case and extended by document
/// synthesis; the CLI reads everything it presents from here instead
/// of threading loose values around.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub summary: RepoSummary,
    pub findings: Vec<Finding>,
    pub score: u32,
    pub confidence: ConfidenceLevel,
    pub documents: Vec<GeneratedDocument>,
}

impl AnalysisSession {
    pub fn ai_detected(&self) -> bool {
        self.score > 0
    }

    pub fn document(&self, format: OutputFormat) -> Option<&GeneratedDocument> {
        self.documents.iter().find(|d| d.format == format)
    }
}
