mod caching_context;
mod github_client;
mod huggingface_client;

pub use caching_context::CachingRepositoryContext;
pub use github_client::GithubRepositoryContext;
pub use huggingface_client::HuggingFaceClient;
