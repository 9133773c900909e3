use super::{BomMetadataView, BomReadModel};
use crate::analysis::domain::{Finding, RepoSummary};
use crate::analysis::services::{BomSynthesizer, ConfidenceScorer, ReportSections};
use chrono::Utc;
use uuid::Uuid;

/// Builder for constructing [`BomReadModel`] from an analysis result.
pub struct BomReadModelBuilder;

impl BomReadModelBuilder {
    /// Builds the read model: synthesizes the component graph, computes
    /// the report sections and stamps fresh document metadata.
    pub fn build(summary: RepoSummary, findings: Vec<Finding>, score: u32) -> BomReadModel {
        let graph = BomSynthesizer::synthesize(&summary, &findings);
        let sections = ReportSections::from_findings(&findings);
        let confidence = ConfidenceScorer::level(score);

        BomReadModel {
            metadata: Self::build_metadata(summary),
            graph,
            sections,
            findings,
            score,
            confidence,
        }
    }

    fn build_metadata(repository: RepoSummary) -> BomMetadataView {
        BomMetadataView {
            timestamp: Utc::now().to_rfc3339(),
            tool_name: "aibom-scan".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            serial_number: format!("urn:uuid:{}", Uuid::new_v4()),
            repository,
        }
    }
}
