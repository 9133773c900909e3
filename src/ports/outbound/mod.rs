/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (repository host, model registry,
/// file system, console, etc.).
pub mod doc_extractor;
pub mod formatter;
pub mod model_registry;
pub mod output_presenter;
pub mod progress_reporter;
pub mod repository_context;

pub use doc_extractor::DocExtractor;
pub use formatter::BomFormatter;
pub use model_registry::{ModelRegistry, RegistryLookup};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use repository_context::{RepositoryContext, SbomPackage, SearchHit, SearchOutcome};
