mod cyclonedx_json;
mod cyclonedx_xml;
mod extended_formatter;
mod spdx_formatter;

pub use cyclonedx_json::CycloneDxJsonFormatter;
pub use cyclonedx_xml::CycloneDxXmlFormatter;
pub use extended_formatter::ExtendedFormatter;
pub use spdx_formatter::SpdxFormatter;

/// Turns a bom-ref into an id safe for XML attributes and SPDX ids.
pub(crate) fn safe_id(bom_ref: &str) -> String {
    bom_ref
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
