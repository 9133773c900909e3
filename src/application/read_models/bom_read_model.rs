use crate::analysis::domain::{BomGraph, Finding, RepoSummary};
use crate::analysis::services::{ConfidenceLevel, ReportSections};

/// Main read model for BOM document serialization.
///
/// Denormalized view of one analysis, built once and shared by every
/// formatter invocation for the run.
#[derive(Debug, Clone)]
pub struct BomReadModel {
    pub metadata: BomMetadataView,
    /// Identity-resolved component graph.
    pub graph: BomGraph,
    /// Hardware/infrastructure/governance/risk summaries.
    pub sections: ReportSections,
    /// Reconciled findings, for the extended envelope.
    pub findings: Vec<Finding>,
    pub score: u32,
    pub confidence: ConfidenceLevel,
}

/// View representation of document metadata.
#[derive(Debug, Clone)]
pub struct BomMetadataView {
    /// RFC3339 generation timestamp.
    pub timestamp: String,
    pub tool_name: String,
    pub tool_version: String,
    /// `urn:uuid:...` serial, unique per generation.
    pub serial_number: String,
    pub repository: RepoSummary,
}
