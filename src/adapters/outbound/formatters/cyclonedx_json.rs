use crate::analysis::domain::ComponentKind;
use crate::application::read_models::{BomMetadataView, BomReadModel};
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Bom {
    #[serde(rename = "bomFormat")]
    bom_format: String,
    #[serde(rename = "specVersion")]
    spec_version: String,
    version: u32,
    #[serde(rename = "serialNumber")]
    serial_number: String,
    metadata: Metadata,
    components: Vec<Component>,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    timestamp: String,
    tools: Vec<Tool>,
    component: Component,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct Component {
    #[serde(rename = "type")]
    component_type: String,
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    licenses: Option<Vec<License>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Property>,
}

#[derive(Debug, Serialize)]
struct License {
    license: LicenseContent,
}

#[derive(Debug, Serialize)]
struct LicenseContent {
    name: String,
}

#[derive(Debug, Serialize)]
struct Property {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct Dependency {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(rename = "dependsOn", skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

/// CycloneDxJsonFormatter adapter for CycloneDX 1.6 JSON output.
///
/// Models serialize as `machine-learning-model` components carrying
/// provider/task/architecture properties; libraries as plain `library`
/// components. Topology goes into the `dependencies` array.
pub struct CycloneDxJsonFormatter;

impl CycloneDxJsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn build_metadata(&self, metadata: &BomMetadataView, root_ref: &str) -> Metadata {
        Metadata {
            timestamp: metadata.timestamp.clone(),
            tools: vec![Tool {
                name: metadata.tool_name.clone(),
                version: metadata.tool_version.clone(),
            }],
            component: Component {
                component_type: "application".to_string(),
                bom_ref: root_ref.to_string(),
                name: metadata.repository.full_name(),
                version: None,
                purl: None,
                licenses: None,
                properties: Vec::new(),
            },
        }
    }

    fn build_components(&self, model: &BomReadModel) -> Vec<Component> {
        model
            .graph
            .components
            .iter()
            .map(|c| {
                let mut properties = Vec::new();
                let mut push = |name: &str, value: &Option<String>| {
                    if let Some(value) = value {
                        properties.push(Property {
                            name: format!("aibom:{}", name),
                            value: value.clone(),
                        });
                    }
                };
                push("provider", &c.provider);
                push("task", &c.task);
                push("architecture", &c.architecture);
                for related in &c.related {
                    properties.push(Property {
                        name: "aibom:related-model".to_string(),
                        value: related.clone(),
                    });
                }

                Component {
                    component_type: match c.kind {
                        ComponentKind::Model => "machine-learning-model".to_string(),
                        ComponentKind::Library => "library".to_string(),
                        ComponentKind::Generic => "application".to_string(),
                    },
                    bom_ref: c.bom_ref.clone(),
                    name: c.name.clone(),
                    version: c.version.clone(),
                    purl: c.purl.clone(),
                    licenses: c.license.as_ref().map(|name| {
                        vec![License {
                            license: LicenseContent { name: name.clone() },
                        }]
                    }),
                    properties,
                }
            })
            .collect()
    }

    fn build_dependencies(&self, model: &BomReadModel) -> Vec<Dependency> {
        let mut refs: Vec<&str> = vec![model.graph.root_ref.as_str()];
        refs.extend(model.graph.components.iter().map(|c| c.bom_ref.as_str()));
        refs.iter()
            .map(|r| Dependency {
                bom_ref: r.to_string(),
                depends_on: model
                    .graph
                    .depends_on(r)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }
}

impl Default for CycloneDxJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for CycloneDxJsonFormatter {
    fn format(&self, model: &BomReadModel) -> Result<String> {
        let bom = Bom {
            bom_format: "CycloneDX".to_string(),
            spec_version: "1.6".to_string(),
            version: 1,
            serial_number: model.metadata.serial_number.clone(),
            metadata: self.build_metadata(&model.metadata, &model.graph.root_ref),
            components: self.build_components(model),
            dependencies: self.build_dependencies(model),
        };

        serde_json::to_string_pretty(&bom).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{
        Category, Finding, ModelInfo, Payload, RepoSummary, Severity,
    };
    use crate::application::read_models::BomReadModelBuilder;

    fn sample_model() -> BomReadModel {
        let finding = Finding::new(
            "model-openai-gpt-4o",
            Category::Models,
            Severity::Medium,
            15,
            "Model Reference: gpt-4o",
            "",
        )
        .with_payload(Payload::Model(ModelInfo {
            provider: "openai".to_string(),
            model_name: "gpt-4o".to_string(),
            model_type: None,
            locations: vec!["app.py".to_string()],
            registry: None,
            related_models: Vec::new(),
        }))
        .with_evidence(crate::analysis::domain::Evidence::at_line("app.py", 12));
        BomReadModelBuilder::build(RepoSummary::local("demo"), vec![finding], 15)
    }

    #[test]
    fn test_format_emits_valid_cyclonedx() {
        let output = CycloneDxJsonFormatter::new().format(&sample_model()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["bomFormat"], "CycloneDX");
        assert_eq!(parsed["specVersion"], "1.6");
        assert_eq!(parsed["components"][0]["type"], "machine-learning-model");
        assert_eq!(parsed["components"][0]["name"], "gpt-4o");
    }

    #[test]
    fn test_root_depends_on_all_components() {
        let model = sample_model();
        let output = CycloneDxJsonFormatter::new().format(&model).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let deps = parsed["dependencies"].as_array().unwrap();
        let root = deps
            .iter()
            .find(|d| d["ref"] == serde_json::Value::from(model.graph.root_ref.clone()))
            .unwrap();
        assert_eq!(
            root["dependsOn"].as_array().unwrap().len(),
            model.graph.components.len()
        );
    }
}
