//! Global error handling for concat
//!
//! Every fallible operation in the crate reports through [`ConcatError`], so
//! the binaries can print one actionable message and exit non-zero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for concat operations
#[derive(Error, Debug)]
pub enum ConcatError {
    /// Invalid or incomplete configuration, reported before any traversal
    #[error("Configuration error: {0}")]
    Config(String),

    /// A system, noise or user ignore pattern failed to compile
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// A directory could not be read during traversal
    #[error("Traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    /// A walked entry did not lie under the traversal root
    #[error("Cannot resolve '{}' relative to '{}'", path.display(), root.display())]
    RelativePath { path: PathBuf, root: PathBuf },

    /// An admitted file could not be opened
    #[error("Failed to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An admitted file could not be read to the end
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output sink or other file system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Clipboard collaborator errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Token counting errors
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// JSON report serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Specialized Result type for concat operations
pub type Result<T> = std::result::Result<T, ConcatError>;

/// Creates a ConcatError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ConcatError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
