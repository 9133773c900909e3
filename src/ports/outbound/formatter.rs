use crate::application::read_models::BomReadModel;
use crate::shared::Result;

/// BomFormatter port for serializing the component/relationship graph.
///
/// Every formatter is a pure function over the shared read model:
/// all formats must produce identical component sets and identical
/// relationship topology, differing only in container syntax.
pub trait BomFormatter {
    /// Serializes the read model to a document string.
    fn format(&self, model: &BomReadModel) -> Result<String>;
}
