use crate::analysis::domain::{
    BomGraph, Component, ComponentKind, Finding, Payload, RegistryInfo, Relationship, RepoSummary,
};
use crate::analysis::policies::library_vocabulary::{
    canonical_library, implied_libraries, library_purl, DEFAULT_REGISTRY_FRAMEWORKS,
};
use crate::analysis::policies::model_patterns::{infer_architecture, infer_task};

/// Builds the identity-resolved component graph from reconciled
/// findings.
///
/// Model components are keyed by `(provider, model name)` and library
/// components by their canonical vocabulary name, so repeated findings
/// collapse into single nodes. Every component gets exactly one edge
/// from the repository root; models additionally point at the
/// libraries they imply. Libraries are sinks.
pub struct BomSynthesizer;

impl BomSynthesizer {
    pub fn synthesize(summary: &RepoSummary, findings: &[Finding]) -> BomGraph {
        let mut graph = BomGraph {
            root_ref: format!("root:{}", slug(&summary.full_name())),
            components: Vec::new(),
            relationships: Vec::new(),
        };
        let mut model_library_edges: Vec<(String, String)> = Vec::new();

        for finding in findings {
            match &finding.payload {
                Some(Payload::Model(info)) => {
                    let bom_ref = format!("model:{}:{}", slug(&info.provider), slug(&info.model_name));
                    if graph.component(&bom_ref).is_some() {
                        continue;
                    }

                    let mut license = None;
                    let mut task = None;
                    if let Some(RegistryInfo::Verified(meta)) = &info.registry {
                        license = meta.license.clone();
                        task = meta.task.clone();
                    }
                    let task = task.or_else(|| infer_task(&info.model_name).map(str::to_string));

                    for library in Self::libraries_for_model(info, task.as_deref()) {
                        model_library_edges.push((bom_ref.clone(), library.to_string()));
                    }

                    graph.components.push(Component {
                        kind: ComponentKind::Model,
                        bom_ref,
                        name: info.model_name.clone(),
                        version: None,
                        provider: Some(info.provider.clone()),
                        purl: Self::model_purl(info),
                        license,
                        task,
                        architecture: infer_architecture(&info.model_name).map(str::to_string),
                        related: info.related_models.clone(),
                        evidence: finding.evidence.clone(),
                    });
                }
                Some(Payload::Dependency(info)) => {
                    let canonical = canonical_library(&info.name);
                    let name = canonical.unwrap_or(info.name.as_str());
                    let bom_ref = format!("lib:{}", slug(name));
                    if let Some(existing) =
                        graph.components.iter_mut().find(|c| c.bom_ref == bom_ref)
                    {
                        for ev in finding.evidence.iter().cloned() {
                            if existing.evidence.len() < crate::analysis::domain::MAX_EVIDENCE {
                                existing.evidence.push(ev);
                            }
                        }
                        continue;
                    }

                    let mut component = Component::library(bom_ref, name);
                    component.purl = match canonical {
                        Some(canonical) => library_purl(canonical).map(str::to_string),
                        None => Some(format!("pkg:{}/{}", info.ecosystem, info.name)),
                    };
                    // Aggregated vocabulary nodes drop the version; a
                    // package keyed by its own name keeps it.
                    if canonical.is_none() {
                        component.version = info.version.clone();
                    }
                    component.evidence = finding.evidence.clone();
                    graph.components.push(component);
                }
                _ => {}
            }
        }

        // Implied libraries that have no dependency finding of their own.
        for (_, library) in &model_library_edges {
            let bom_ref = format!("lib:{}", slug(library));
            if graph.component(&bom_ref).is_none() {
                let mut component = Component::library(bom_ref, library.clone());
                component.purl = library_purl(library).map(str::to_string);
                graph.components.push(component);
            }
        }

        let root = graph.root_ref.clone();
        for component in &graph.components {
            graph.relationships.push(Relationship {
                from_ref: root.clone(),
                to_ref: component.bom_ref.clone(),
            });
        }
        for (model_ref, library) in model_library_edges {
            let to_ref = format!("lib:{}", slug(&library));
            let edge = Relationship {
                from_ref: model_ref,
                to_ref,
            };
            if !graph.relationships.contains(&edge) {
                graph.relationships.push(edge);
            }
        }

        graph
    }

    /// Canonical libraries a model depends on, derived from its task
    /// and registry provenance.
    fn libraries_for_model(
        info: &crate::analysis::domain::ModelInfo,
        task: Option<&str>,
    ) -> Vec<&'static str> {
        let mut libraries: Vec<&'static str> = task
            .map(implied_libraries)
            .unwrap_or(&[])
            .to_vec();
        if info.provider == "huggingface" {
            for library in DEFAULT_REGISTRY_FRAMEWORKS {
                if !libraries.contains(library) {
                    libraries.push(library);
                }
            }
        }
        libraries
    }

    fn model_purl(info: &crate::analysis::domain::ModelInfo) -> Option<String> {
        match info.provider.as_str() {
            "huggingface" => Some(format!("pkg:huggingface/{}", info.model_name)),
            "local" => None,
            provider => Some(format!("pkg:generic/{}/{}", provider, slug(&info.model_name))),
        }
    }
}

fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
