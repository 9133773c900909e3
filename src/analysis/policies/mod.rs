//! Controlled vocabularies and pattern tables shared by the detection
//! units, the reconciler and the BOM synthesizer.

pub mod ai_packages;
pub mod library_vocabulary;
pub mod merge_keywords;
pub mod model_patterns;
pub mod model_validation;
