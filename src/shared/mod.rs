pub mod error;
pub mod result;

pub use error::{AibomError, ExitCode};
pub use result::Result;
