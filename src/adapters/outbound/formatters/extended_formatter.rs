use crate::application::read_models::BomReadModel;
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;
use serde_json::json;

/// ExtendedFormatter adapter for the tool's own envelope format.
///
/// Carries everything the standard formats cannot: the full reconciled
/// findings with evidence, the detection score and confidence band,
/// and the hardware/infrastructure/governance/risk report sections,
/// alongside the same component graph the other formats emit.
pub struct ExtendedFormatter;

impl ExtendedFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtendedFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for ExtendedFormatter {
    fn format(&self, model: &BomReadModel) -> Result<String> {
        let document = json!({
            "schema": "aibom-extended/1",
            "metadata": {
                "timestamp": model.metadata.timestamp,
                "serialNumber": model.metadata.serial_number,
                "tool": {
                    "name": model.metadata.tool_name,
                    "version": model.metadata.tool_version,
                },
                "repository": model.metadata.repository,
            },
            "detection": {
                "score": model.score,
                "confidence": model.confidence,
                "findings": model.findings,
            },
            "graph": model.graph,
            "hardware": model.sections.hardware,
            "infrastructure": model.sections.infrastructure,
            "governance": {
                "present": model.sections.governance.present,
                "missing": model.sections.governance.missing,
                "completeness": model.sections.governance.completeness(),
            },
            "risks": model.sections.risks,
            "dataPipeline": model.sections.data_pipeline,
            "gaps": model.sections.gaps,
            "notes": model.sections.notes,
        });

        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}
