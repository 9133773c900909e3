mod bom_synthesizer;
mod confidence;
mod pipeline;
mod reconciler;
mod report_sections;

pub use bom_synthesizer::BomSynthesizer;
pub use confidence::{ConfidenceLevel, ConfidenceScorer};
pub use pipeline::{PipelineOrchestrator, MAX_RESUME_WAIT_SECS};
pub use reconciler::FindingReconciler;
pub use report_sections::{GovernanceChecklist, ReportSections, RiskEntry};
