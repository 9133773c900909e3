//! Read models for document serialization
//!
//! Query-optimized views consumed by the BOM formatters. All four
//! serializers read from the same [`BomReadModel`] instance, which is
//! what guarantees they agree on component identity and topology.

mod bom_read_model;
mod bom_read_model_builder;

pub use bom_read_model::{BomMetadataView, BomReadModel};
pub use bom_read_model_builder::BomReadModelBuilder;
