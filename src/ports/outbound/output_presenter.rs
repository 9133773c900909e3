use crate::shared::Result;

/// OutputPresenter port for presenting a generated document
///
/// This port abstracts the output destination (stdout, file, etc.)
/// for formatted BOM documents.
pub trait OutputPresenter {
    /// Presents the formatted output
    ///
    /// # Errors
    /// Returns an error if the output cannot be written
    fn present(&self, content: &str) -> Result<()>;
}
