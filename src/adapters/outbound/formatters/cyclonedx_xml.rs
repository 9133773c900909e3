use crate::analysis::domain::{Component, ComponentKind};
use crate::application::read_models::BomReadModel;
use crate::ports::outbound::BomFormatter;
use crate::shared::Result;

/// CycloneDxXmlFormatter adapter for CycloneDX 1.6 XML output.
///
/// Emits the same component set and topology as the JSON formatter;
/// the document is built by hand since the structure is small and
/// fixed.
pub struct CycloneDxXmlFormatter;

impl CycloneDxXmlFormatter {
    pub fn new() -> Self {
        Self
    }

    fn component_type(kind: ComponentKind) -> &'static str {
        match kind {
            ComponentKind::Model => "machine-learning-model",
            ComponentKind::Library => "library",
            ComponentKind::Generic => "application",
        }
    }

    fn write_component(out: &mut String, c: &Component) {
        out.push_str(&format!(
            "    <component type=\"{}\" bom-ref=\"{}\">\n",
            Self::component_type(c.kind),
            escape(&c.bom_ref)
        ));
        out.push_str(&format!("      <name>{}</name>\n", escape(&c.name)));
        if let Some(version) = &c.version {
            out.push_str(&format!("      <version>{}</version>\n", escape(version)));
        }
        if let Some(license) = &c.license {
            out.push_str("      <licenses>\n        <license>\n");
            out.push_str(&format!("          <name>{}</name>\n", escape(license)));
            out.push_str("        </license>\n      </licenses>\n");
        }
        if let Some(purl) = &c.purl {
            out.push_str(&format!("      <purl>{}</purl>\n", escape(purl)));
        }

        let mut properties: Vec<(&str, &str)> = Vec::new();
        if let Some(provider) = &c.provider {
            properties.push(("aibom:provider", provider));
        }
        if let Some(task) = &c.task {
            properties.push(("aibom:task", task));
        }
        if let Some(architecture) = &c.architecture {
            properties.push(("aibom:architecture", architecture));
        }
        for related in &c.related {
            properties.push(("aibom:related-model", related));
        }
        if !properties.is_empty() {
            out.push_str("      <properties>\n");
            for (name, value) in properties {
                out.push_str(&format!(
                    "        <property name=\"{}\">{}</property>\n",
                    name,
                    escape(value)
                ));
            }
            out.push_str("      </properties>\n");
        }
        out.push_str("    </component>\n");
    }
}

impl Default for CycloneDxXmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl BomFormatter for CycloneDxXmlFormatter {
    fn format(&self, model: &BomReadModel) -> Result<String> {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<bom xmlns=\"http://cyclonedx.org/schema/bom/1.6\" serialNumber=\"{}\" version=\"1\">\n",
            escape(&model.metadata.serial_number)
        ));

        out.push_str("  <metadata>\n");
        out.push_str(&format!(
            "    <timestamp>{}</timestamp>\n",
            escape(&model.metadata.timestamp)
        ));
        out.push_str("    <tools>\n      <tool>\n");
        out.push_str(&format!(
            "        <name>{}</name>\n        <version>{}</version>\n",
            escape(&model.metadata.tool_name),
            escape(&model.metadata.tool_version)
        ));
        out.push_str("      </tool>\n    </tools>\n");
        out.push_str(&format!(
            "    <component type=\"application\" bom-ref=\"{}\">\n      <name>{}</name>\n    </component>\n",
            escape(&model.graph.root_ref),
            escape(&model.metadata.repository.full_name())
        ));
        out.push_str("  </metadata>\n");

        out.push_str("  <components>\n");
        for component in &model.graph.components {
            Self::write_component(&mut out, component);
        }
        out.push_str("  </components>\n");

        out.push_str("  <dependencies>\n");
        let mut refs: Vec<&str> = vec![model.graph.root_ref.as_str()];
        refs.extend(model.graph.components.iter().map(|c| c.bom_ref.as_str()));
        for r in refs {
            let depends_on = model.graph.depends_on(r);
            if depends_on.is_empty() {
                out.push_str(&format!("    <dependency ref=\"{}\"/>\n", escape(r)));
            } else {
                out.push_str(&format!("    <dependency ref=\"{}\">\n", escape(r)));
                for dep in depends_on {
                    out.push_str(&format!("      <dependency ref=\"{}\"/>\n", escape(dep)));
                }
                out.push_str("    </dependency>\n");
            }
        }
        out.push_str("  </dependencies>\n");

        out.push_str("</bom>\n");
        Ok(out)
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
