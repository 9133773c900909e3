/// Cross-format consistency tests: every serializer consumes the same
/// read model, so component identity and topology must agree exactly.
use aibom_scan::analysis::domain::{
    Category, DependencyInfo, Evidence, Finding, ModelInfo, Payload, RepoSummary, Severity,
};
use aibom_scan::application::read_models::{BomReadModel, BomReadModelBuilder};
use aibom_scan::prelude::*;

fn sample_findings() -> Vec<Finding> {
    vec![
        Finding::new(
            "dep-openai",
            Category::Dependencies,
            Severity::Medium,
            10,
            "openai - Usage Detected",
            "AI SDK dependency",
        )
        .with_payload(Payload::Dependency(DependencyInfo {
            name: "openai".to_string(),
            version: Some("1.30.0".to_string()),
            ecosystem: "pypi".to_string(),
            source: "requirements.txt".to_string(),
        }))
        .with_evidence(Evidence::at_line("requirements.txt", 1)),
        Finding::new(
            "model-anthropic-claude-3-5-sonnet",
            Category::Models,
            Severity::Medium,
            15,
            "Model Reference: claude-3-5-sonnet",
            "",
        )
        .with_payload(Payload::Model(ModelInfo {
            provider: "anthropic".to_string(),
            model_name: "claude-3-5-sonnet".to_string(),
            model_type: Some("text-generation".to_string()),
            locations: vec!["app.py".to_string()],
            registry: None,
            related_models: Vec::new(),
        }))
        .with_evidence(Evidence::at_line("app.py", 7)),
        Finding::new(
            "gov-license",
            Category::Governance,
            Severity::Info,
            0,
            "License Missing",
            "No top-level license file found",
        ),
    ]
}

fn sample_model() -> BomReadModel {
    let mut summary = RepoSummary::local("demo-bot");
    summary.owner = Some("acme".to_string());
    summary.url = Some("https://github.com/acme/demo-bot".to_string());
    BomReadModelBuilder::build(summary, sample_findings(), 25)
}

#[test]
fn test_graph_is_well_formed() {
    let model = sample_model();
    model.graph.check_well_formed().unwrap();
    assert_eq!(model.graph.components.len(), 2);
}

#[test]
fn test_cyclonedx_json_matches_graph() {
    let model = sample_model();
    let output = CycloneDxJsonFormatter::new().format(&model).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    let refs: Vec<&str> = parsed["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["bom-ref"].as_str().unwrap())
        .collect();
    assert_eq!(refs.len(), model.graph.components.len());
    for component in &model.graph.components {
        assert!(refs.contains(&component.bom_ref.as_str()));
    }

    // Root dependency entry covers every component
    let root = parsed["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["ref"].as_str() == Some(model.graph.root_ref.as_str()))
        .unwrap();
    assert_eq!(
        root["dependsOn"].as_array().unwrap().len(),
        model.graph.components.len()
    );
}

#[test]
fn test_spdx_matches_graph() {
    let model = sample_model();
    let output = SpdxFormatter::new().format(&model).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(parsed["spdxVersion"], "SPDX-2.3");
    // Root package plus one package per component
    assert_eq!(
        parsed["packages"].as_array().unwrap().len(),
        model.graph.components.len() + 1
    );

    let relationships = parsed["relationships"].as_array().unwrap();
    assert!(relationships
        .iter()
        .any(|r| r["relationshipType"] == "DESCRIBES"));
    let depends: usize = relationships
        .iter()
        .filter(|r| r["relationshipType"] == "DEPENDS_ON")
        .count();
    assert_eq!(depends, model.graph.relationships.len());
}

#[test]
fn test_cyclonedx_xml_carries_same_refs() {
    let model = sample_model();
    let output = CycloneDxXmlFormatter::new().format(&model).unwrap();

    assert!(output.starts_with("<?xml"));
    for component in &model.graph.components {
        assert!(output.contains(&component.bom_ref));
    }
    assert!(output.contains("machine-learning-model"));
}

#[test]
fn test_extended_envelope_matches_graph_and_sections() {
    let model = sample_model();
    let output = ExtendedFormatter::new().format(&model).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(
        parsed["graph"]["components"].as_array().unwrap().len(),
        model.graph.components.len()
    );
    assert_eq!(parsed["detection"]["score"], 25);
    // Governance checklist reflects the missing license
    assert!(parsed["governance"]["missing"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v.as_str() == Some("License")));
}

#[test]
fn test_formats_are_deterministic_for_one_model() {
    let model = sample_model();
    for format in OutputFormat::ALL {
        let formatter = aibom_scan::application::factories::FormatterFactory::create(format);
        assert_eq!(
            formatter.format(&model).unwrap(),
            formatter.format(&model).unwrap()
        );
    }
}

#[test]
fn test_all_formats_embed_the_same_serial_number() {
    let model = sample_model();
    let serial = model.metadata.serial_number.clone();
    let uuid = serial.trim_start_matches("urn:uuid:");

    for format in OutputFormat::ALL {
        let formatter = aibom_scan::application::factories::FormatterFactory::create(format);
        let output = formatter.format(&model).unwrap();
        assert!(output.contains(uuid), "{:?} lost the serial", format);
    }
}
