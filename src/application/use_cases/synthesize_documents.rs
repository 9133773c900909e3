use crate::application::dto::{AnalysisResponse, OutputFormat};
use crate::application::factories::FormatterFactory;
use crate::application::read_models::BomReadModelBuilder;
use crate::application::session::{AnalysisSession, GeneratedDocument};
use crate::ports::outbound::ProgressReporter;
use crate::shared::Result;

/// SynthesizeDocumentsUseCase - Turns one analysis into BOM documents
///
/// Builds the shared read model exactly once per run, then serializes
/// it into every requested format. Because all serializers consume the
/// same read model, the emitted documents agree on component identity,
/// topology and metadata.
pub struct SynthesizeDocumentsUseCase<PR> {
    progress_reporter: PR,
}

impl<PR> SynthesizeDocumentsUseCase<PR>
where
    PR: ProgressReporter,
{
    pub fn new(progress_reporter: PR) -> Self {
        Self { progress_reporter }
    }

    pub fn execute(
        &self,
        response: AnalysisResponse,
        formats: &[OutputFormat],
    ) -> Result<AnalysisSession> {
        let model = BomReadModelBuilder::build(
            response.summary.clone(),
            response.findings.clone(),
            response.score,
        );

        let mut documents = Vec::with_capacity(formats.len());
        for format in formats {
            self.progress_reporter
                .report(FormatterFactory::progress_message(*format));
            let formatter = FormatterFactory::create(*format);
            documents.push(GeneratedDocument {
                format: *format,
                content: formatter.format(&model)?,
            });
        }

        Ok(AnalysisSession {
            summary: response.summary,
            findings: response.findings,
            score: response.score,
            confidence: response.confidence,
            documents,
        })
    }
}
