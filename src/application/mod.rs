/// Application layer - Use cases and application services
///
/// Orchestrates the analysis pipeline and document synthesis, mediating
/// between the CLI and the analysis core through DTOs and read models.
pub mod dto;
pub mod factories;
pub mod read_models;
pub mod session;
pub mod use_cases;
