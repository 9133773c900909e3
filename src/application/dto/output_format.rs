use std::str::FromStr;

/// Supported BOM document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    CycloneDxJson,
    CycloneDxXml,
    Spdx,
    Extended,
}

impl OutputFormat {
    /// All concrete formats, in the order `--format all` emits them.
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::CycloneDxJson,
        OutputFormat::CycloneDxXml,
        OutputFormat::Spdx,
        OutputFormat::Extended,
    ];

    /// File extension used when writing this format to disk.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::CycloneDxJson => "cdx.json",
            OutputFormat::CycloneDxXml => "cdx.xml",
            OutputFormat::Spdx => "spdx.json",
            OutputFormat::Extended => "aibom.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::CycloneDxJson => "cyclonedx-json",
            OutputFormat::CycloneDxXml => "cyclonedx-xml",
            OutputFormat::Spdx => "spdx",
            OutputFormat::Extended => "extended",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cyclonedx-json" | "cyclonedx" | "json" => Ok(OutputFormat::CycloneDxJson),
            "cyclonedx-xml" | "xml" => Ok(OutputFormat::CycloneDxXml),
            "spdx" => Ok(OutputFormat::Spdx),
            "extended" => Ok(OutputFormat::Extended),
            _ => Err(format!(
                "Unknown format: {}. Valid formats: cyclonedx-json, cyclonedx-xml, spdx, extended, all",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("cyclonedx-json".parse(), Ok(OutputFormat::CycloneDxJson));
        assert_eq!("json".parse(), Ok(OutputFormat::CycloneDxJson));
        assert_eq!("XML".parse(), Ok(OutputFormat::CycloneDxXml));
        assert_eq!("spdx".parse(), Ok(OutputFormat::Spdx));
        assert_eq!("extended".parse(), Ok(OutputFormat::Extended));
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_extensions_are_distinct() {
        let mut extensions: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.extension()).collect();
        extensions.dedup();
        assert_eq!(extensions.len(), 4);
    }
}
