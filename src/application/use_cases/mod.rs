mod analyze_repository;
mod synthesize_documents;

pub use analyze_repository::AnalyzeRepositoryUseCase;
pub use synthesize_documents::SynthesizeDocumentsUseCase;
