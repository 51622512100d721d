/*!
 * concat - Concatenate project files into a single snapshot for LLM context
 *
 * A snapshot is a preamble, an optional directory tree and every selected
 * text file wrapped in Markdown or XML delimiters. The `opt` binary
 * post-processes such a stream (whitespace compaction, license stripping,
 * token estimates).
 */

pub mod binary;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod patterns;
pub mod report;
pub mod tokenizer;
pub mod transform;
pub mod tree;
pub mod types;
pub mod utils;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config, OptArgs};
pub use error::{ConcatError, Result};
pub use filter::Filter;
pub use format::OutputFormat;
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use transform::{TransformOptions, Transformer};
pub use tree::TreeGenerator;
pub use walker::{Concatenator, ScanStatistics};
pub use writer::{OutputTarget, SnapshotWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
