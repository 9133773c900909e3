use crate::adapters::outbound::formatters::{
    CycloneDxJsonFormatter, CycloneDxXmlFormatter, ExtendedFormatter, SpdxFormatter,
};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::BomFormatter;

/// Factory for creating BOM formatters
///
/// Encapsulates the mapping from output format to formatter adapter.
/// Lives in the application layer because it selects infrastructure
/// adapters on behalf of the use cases.
pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat) -> Box<dyn BomFormatter> {
        match format {
            OutputFormat::CycloneDxJson => Box::new(CycloneDxJsonFormatter::new()),
            OutputFormat::CycloneDxXml => Box::new(CycloneDxXmlFormatter::new()),
            OutputFormat::Spdx => Box::new(SpdxFormatter::new()),
            OutputFormat::Extended => Box::new(ExtendedFormatter::new()),
        }
    }

    /// Progress message shown before serializing the given format.
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::CycloneDxJson => "📝 Generating CycloneDX JSON output...",
            OutputFormat::CycloneDxXml => "📝 Generating CycloneDX XML output...",
            OutputFormat::Spdx => "📝 Generating SPDX output...",
            OutputFormat::Extended => "📝 Generating extended AIBOM output...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_covers_every_format() {
        for format in OutputFormat::ALL {
            let formatter = FormatterFactory::create(format);
            assert!(std::mem::size_of_val(&formatter) > 0);
        }
    }

    #[test]
    fn test_progress_messages_name_the_format() {
        assert!(FormatterFactory::progress_message(OutputFormat::Spdx).contains("SPDX"));
        assert!(FormatterFactory::progress_message(OutputFormat::CycloneDxXml).contains("XML"));
    }
}
