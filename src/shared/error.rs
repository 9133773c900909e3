use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - analysis completed (possibly with zero findings)
    Success = 0,
    /// AI components were detected and --fail-on-detect was set
    AiComponentsDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (API error, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::AiComponentsDetected => write!(f, "AI Components Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for AIBOM generation.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum AibomError {
    #[error("Invalid scan target: {target}\nReason: {reason}\n\n💡 Hint: pass either a local directory or an owner/repo slug")]
    InvalidTarget { target: String, reason: String },

    #[error("Failed to fetch repository data: {resource}\nDetails: {details}\n\n💡 Hint: check network connectivity and, for private repositories, the access token")]
    RepositoryFetch { resource: String, details: String },

    #[error("Failed to generate {format} output\nDetails: {details}")]
    OutputGeneration { format: String, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read config file: {path}\nDetails: {details}")]
    ConfigError { path: PathBuf, details: String },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::AiComponentsDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::AiComponentsDetected),
            "AI Components Detected (1)"
        );
    }

    #[test]
    fn test_invalid_target_display() {
        let error = AibomError::InvalidTarget {
            target: "not/a/real/slug".to_string(),
            reason: "too many path segments".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Invalid scan target"));
        assert!(display.contains("not/a/real/slug"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_repository_fetch_display() {
        let error = AibomError::RepositoryFetch {
            resource: "file tree".to_string(),
            details: "HTTP 404".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to fetch repository data"));
        assert!(display.contains("HTTP 404"));
    }

    #[test]
    fn test_file_write_error_display() {
        let error = AibomError::FileWriteError {
            path: PathBuf::from("/test/aibom.json"),
            details: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write to file"));
        assert!(display.contains("Permission denied"));
    }
}
