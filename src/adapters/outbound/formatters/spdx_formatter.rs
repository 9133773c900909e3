use super::safe_id;
use crate::analysis::domain::ComponentKind;
use crate::application::read_models::BomReadModel;
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SpdxDocument {
    #[serde(rename = "spdxVersion")]
    spdx_version: String,
    #[serde(rename = "dataLicense")]
    data_license: String,
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    #[serde(rename = "documentNamespace")]
    document_namespace: String,
    #[serde(rename = "creationInfo")]
    creation_info: CreationInfo,
    packages: Vec<SpdxPackage>,
    relationships: Vec<SpdxRelationship>,
}

#[derive(Debug, Serialize)]
struct CreationInfo {
    created: String,
    creators: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SpdxPackage {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    #[serde(rename = "versionInfo", skip_serializing_if = "Option::is_none")]
    version_info: Option<String>,
    #[serde(rename = "downloadLocation")]
    download_location: String,
    #[serde(rename = "licenseConcluded")]
    license_concluded: String,
    #[serde(rename = "primaryPackagePurpose")]
    primary_package_purpose: String,
    #[serde(rename = "externalRefs", skip_serializing_if = "Vec::is_empty")]
    external_refs: Vec<ExternalRef>,
}

#[derive(Debug, Serialize)]
struct ExternalRef {
    #[serde(rename = "referenceCategory")]
    reference_category: String,
    #[serde(rename = "referenceType")]
    reference_type: String,
    #[serde(rename = "referenceLocator")]
    reference_locator: String,
}

#[derive(Debug, Serialize)]
struct SpdxRelationship {
    #[serde(rename = "spdxElementId")]
    spdx_element_id: String,
    #[serde(rename = "relationshipType")]
    relationship_type: String,
    #[serde(rename = "relatedSpdxElement")]
    related_spdx_element: String,
}

/// SpdxFormatter adapter for SPDX 2.3 JSON output.
///
/// The repository maps to a described root package; components become
/// packages with `AI` purpose for models and `LIBRARY` for libraries,
/// connected by DEPENDS_ON relationships mirroring the graph.
pub struct SpdxFormatter;

impl SpdxFormatter {
    pub fn new() -> Self {
        Self
    }

    fn spdx_ref(bom_ref: &str) -> String {
        format!("SPDXRef-{}", safe_id(bom_ref))
    }
}

impl Default for SpdxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for SpdxFormatter {
    fn format(&self, model: &BomReadModel) -> Result<String> {
        let root_id = Self::spdx_ref(&model.graph.root_ref);
        let repo = &model.metadata.repository;

        let mut packages = vec![SpdxPackage {
            spdx_id: root_id.clone(),
            name: repo.full_name(),
            version_info: None,
            download_location: repo
                .url
                .clone()
                .unwrap_or_else(|| "NOASSERTION".to_string()),
            license_concluded: "NOASSERTION".to_string(),
            primary_package_purpose: "APPLICATION".to_string(),
            external_refs: Vec::new(),
        }];
        for c in &model.graph.components {
            packages.push(SpdxPackage {
                spdx_id: Self::spdx_ref(&c.bom_ref),
                name: c.name.clone(),
                version_info: c.version.clone(),
                download_location: "NOASSERTION".to_string(),
                license_concluded: c
                    .license
                    .clone()
                    .unwrap_or_else(|| "NOASSERTION".to_string()),
                primary_package_purpose: match c.kind {
                    ComponentKind::Model => "AI".to_string(),
                    ComponentKind::Library => "LIBRARY".to_string(),
                    ComponentKind::Generic => "APPLICATION".to_string(),
                },
                external_refs: c
                    .purl
                    .iter()
                    .map(|purl| ExternalRef {
                        reference_category: "PACKAGE-MANAGER".to_string(),
                        reference_type: "purl".to_string(),
                        reference_locator: purl.clone(),
                    })
                    .collect(),
            });
        }

        let mut relationships = vec![SpdxRelationship {
            spdx_element_id: "SPDXRef-DOCUMENT".to_string(),
            relationship_type: "DESCRIBES".to_string(),
            related_spdx_element: root_id,
        }];
        for edge in &model.graph.relationships {
            relationships.push(SpdxRelationship {
                spdx_element_id: Self::spdx_ref(&edge.from_ref),
                relationship_type: "DEPENDS_ON".to_string(),
                related_spdx_element: Self::spdx_ref(&edge.to_ref),
            });
        }

        let document = SpdxDocument {
            spdx_version: "SPDX-2.3".to_string(),
            data_license: "CC0-1.0".to_string(),
            spdx_id: "SPDXRef-DOCUMENT".to_string(),
            name: format!("aibom-{}", repo.name),
            document_namespace: format!(
                "https://spdx.org/spdxdocs/aibom-scan/{}",
                model
                    .metadata
                    .serial_number
                    .trim_start_matches("urn:uuid:")
            ),
            creation_info: CreationInfo {
                created: model.metadata.timestamp.clone(),
                creators: vec![format!(
                    "Tool: {}-{}",
                    model.metadata.tool_name, model.metadata.tool_version
                )],
            },
            packages,
            relationships,
        };

        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{
        Category, DependencyInfo, Evidence, Finding, Payload, RepoSummary, Severity,
    };
    use crate::application::read_models::BomReadModelBuilder;

    fn sample_model() -> BomReadModel {
        let finding = Finding::new(
            "dep-openai",
            Category::Dependencies,
            Severity::Medium,
            10,
            "openai",
            "",
        )
        .with_payload(Payload::Dependency(DependencyInfo {
            name: "openai".to_string(),
            version: Some("1.30.0".to_string()),
            ecosystem: "pypi".to_string(),
            source: "dependency-graph".to_string(),
        }))
        .with_evidence(Evidence::file("requirements.txt"));
        BomReadModelBuilder::build(RepoSummary::local("demo"), vec![finding], 10)
    }

    #[test]
    fn test_document_shape() {
        let output = SpdxFormatter::new().format(&sample_model()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["spdxVersion"], "SPDX-2.3");
        assert_eq!(parsed["dataLicense"], "CC0-1.0");
        assert_eq!(parsed["relationships"][0]["relationshipType"], "DESCRIBES");
        // Root package plus one library component
        assert_eq!(parsed["packages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_library_purpose_and_purl() {
        let output = SpdxFormatter::new().format(&sample_model()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let lib = &parsed["packages"][1];
        assert_eq!(lib["primaryPackagePurpose"], "LIBRARY");
        assert_eq!(
            lib["externalRefs"][0]["referenceLocator"],
            "pkg:pypi/openai"
        );
    }
}
