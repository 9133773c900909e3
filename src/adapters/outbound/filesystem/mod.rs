mod file_writer;
mod local_context;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use local_context::LocalRepositoryContext;
