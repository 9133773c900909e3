/// Mock implementations for testing
mod mock_model_registry;
mod mock_progress_reporter;
mod mock_repository_context;

pub use mock_model_registry::MockModelRegistry;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_repository_context::MockRepositoryContext;
