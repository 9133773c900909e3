use crate::analysis::services::{ConfidenceScorer, FindingReconciler, PipelineOrchestrator};
use crate::analysis::units::DetectionUnit;
use crate::application::dto::{AnalysisRequest, AnalysisResponse};
use crate::ports::outbound::{ProgressReporter, RepositoryContext};
use crate::shared::Result;

/// AnalyzeRepositoryUseCase - Core use case for repository analysis
///
/// Runs the detection pipeline over the repository context, reconciles
/// the raw findings and computes the aggregate detection score.
///
/// # Type Parameters
/// * `RC` - RepositoryContext implementation
/// * `PR` - ProgressReporter implementation
pub struct AnalyzeRepositoryUseCase<RC, PR> {
    repository: RC,
    progress_reporter: PR,
    units: Vec<Box<dyn DetectionUnit>>,
}

impl<RC, PR> AnalyzeRepositoryUseCase<RC, PR>
where
    RC: RepositoryContext,
    PR: ProgressReporter,
{
    pub fn new(repository: RC, progress_reporter: PR, units: Vec<Box<dyn DetectionUnit>>) -> Self {
        Self {
            repository,
            progress_reporter,
            units,
        }
    }

    pub async fn execute(self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        let summary = self.repository.summary().clone();
        self.progress_reporter
            .report(&format!("🔍 Analyzing {}", summary.full_name()));

        let mut orchestrator = PipelineOrchestrator::new(self.units, &self.progress_reporter);
        if let Some(secs) = request.max_resume_wait_secs {
            orchestrator = orchestrator.with_max_resume_wait(secs);
        }
        let ctx = orchestrator.run(&self.repository).await;

        let findings = FindingReconciler::reconcile(ctx.findings);
        let score = ConfidenceScorer::score(&findings);
        let confidence = ConfidenceScorer::level(score);

        Ok(AnalysisResponse {
            summary,
            findings,
            score,
            confidence,
        })
    }
}
