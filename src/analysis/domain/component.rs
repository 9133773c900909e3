use crate::analysis::domain::finding::Evidence;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Model,
    Library,
    Generic,
}

/// Identity-resolved BOM node derived from one or more findings.
///
/// Models are keyed by `(provider, normalized model name)`; libraries
/// by a canonical name from the controlled vocabulary. Components exist
/// only for the duration of one serialization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    /// Synthetic reference id, unique within one graph.
    pub bom_ref: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Task classification for models ("text-generation", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Architecture family inferred from the model name ("llama", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related: Vec<String>,
    /// Evidence inherited from constituent findings, capped upstream.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub evidence: Vec<Evidence>,
}

impl Component {
    pub fn library(bom_ref: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ComponentKind::Library,
            bom_ref: bom_ref.into(),
            name: name.into(),
            version: None,
            provider: None,
            purl: None,
            license: None,
            task: None,
            architecture: None,
            related: Vec::new(),
            evidence: Vec::new(),
        }
    }
}

/// Directed edge of the BOM graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_ref: String,
    pub to_ref: String,
}

/// The component/relationship graph consumed by every serializer.
///
/// Forms a DAG rooted at the repository node; every component has
/// exactly one incoming root edge, and library nodes are sinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BomGraph {
    pub root_ref: String,
    pub components: Vec<Component>,
    pub relationships: Vec<Relationship>,
}

impl BomGraph {
    pub fn component(&self, bom_ref: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.bom_ref == bom_ref)
    }

    /// Refs the given node depends on.
    pub fn depends_on(&self, bom_ref: &str) -> Vec<&str> {
        self.relationships
            .iter()
            .filter(|r| r.from_ref == bom_ref)
            .map(|r| r.to_ref.as_str())
            .collect()
    }

    /// Validates the structural invariants of the graph.
    ///
    /// Returns the first violation found, or `Ok(())` when the graph is
    /// well-formed: acyclic, one root edge per component, libraries
    /// have no outgoing edges.
    pub fn check_well_formed(&self) -> Result<(), String> {
        for component in &self.components {
            let incoming_from_root = self
                .relationships
                .iter()
                .filter(|r| r.from_ref == self.root_ref && r.to_ref == component.bom_ref)
                .count();
            if incoming_from_root != 1 {
                return Err(format!(
                    "component {} has {} root edges, expected 1",
                    component.bom_ref, incoming_from_root
                ));
            }
            if component.kind == ComponentKind::Library
                && self.relationships.iter().any(|r| r.from_ref == component.bom_ref)
            {
                return Err(format!(
                    "library component {} has outgoing edges",
                    component.bom_ref
                ));
            }
        }
        self.check_acyclic()
    }

    fn check_acyclic(&self) -> Result<(), String> {
        // Depth-first walk from the root; the graph is small enough that
        // a path-based cycle check is sufficient.
        let mut path = Vec::new();
        self.visit(&self.root_ref, &mut path)
    }

    fn visit(&self, node: &str, path: &mut Vec<String>) -> Result<(), String> {
        if path.iter().any(|p| p == node) {
            return Err(format!("cycle through {}", node));
        }
        path.push(node.to_string());
        for next in self.depends_on(node) {
            self.visit(next, path)?;
        }
        path.pop();
        Ok(())
    }
}
