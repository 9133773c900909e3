use crate::analysis::domain::{Finding, RepoSummary};
use crate::analysis::services::ConfidenceLevel;

/// AnalysisResponse - Internal response DTO from the repository
/// analysis use case.
///
/// Carries the reconciled findings plus the aggregate score; document
/// synthesis consumes this without re-running any detection.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub summary: RepoSummary,
    pub findings: Vec<Finding>,
    pub score: u32,
    pub confidence: ConfidenceLevel,
}

impl AnalysisResponse {
    /// Whether any scored AI component was detected.
    pub fn ai_detected(&self) -> bool {
        self.score > 0
    }
}
