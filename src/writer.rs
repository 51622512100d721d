/*!
 * Snapshot assembly and output sinks
 */

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use indicatif::ProgressBar;

use crate::config::Config;
use crate::error::Result;
use crate::filter::Filter;
use crate::tree::TreeGenerator;
use crate::walker::{Concatenator, ScanStatistics};

/// Timestamp layout of the preamble (RFC 1123)
const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

/// Wraps a writer and counts the bytes that reach it
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> CountingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    pub fn bytes_written(&self) -> u64 {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Final destination of the snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output, either forced or because it is a pipe
    Stdout,
    /// A file on disk
    File(PathBuf),
    /// System clipboard, buffered in memory first
    Clipboard,
}

impl OutputTarget {
    /// `--stdout` wins, then `--output`, then a piped stdout, then the
    /// clipboard.
    pub fn select(config: &Config, stdout_is_terminal: bool) -> Self {
        if config.print_to_stdout {
            Self::Stdout
        } else if let Some(path) = &config.output_file {
            Self::File(path.clone())
        } else if !stdout_is_terminal {
            Self::Stdout
        } else {
            Self::Clipboard
        }
    }

    /// Short label for reports
    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::File(path) => format!("'{}'", path.display()),
            Self::Clipboard => "clipboard".to_string(),
        }
    }
}

/// Writes the complete snapshot: preamble, optional tree, then file contents
pub struct SnapshotWriter<'a> {
    config: &'a Config,
    filter: &'a Filter,
    progress: Arc<ProgressBar>,
}

impl<'a> SnapshotWriter<'a> {
    pub fn new(config: &'a Config, filter: &'a Filter, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            filter,
            progress,
        }
    }

    /// Write the snapshot to `sink`. The returned statistics cover the file
    /// section only.
    pub fn write<W: Write>(&self, sink: &mut W) -> Result<ScanStatistics> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        write_preamble(sink, &self.project_name(), &timestamp)?;

        if self.config.include_tree {
            self.progress.set_message("Generating directory tree...");
            let tree = TreeGenerator::new(self.filter).generate(&self.config.target_dir)?;
            write!(sink, "{}\n---\n\n", tree)?;
        }

        self.progress.set_message("Searching for files to process...");
        let concatenator = Concatenator::new(
            self.filter,
            self.config.output_format,
            Arc::clone(&self.progress),
        );
        let stats = concatenator.process(&self.config.target_dir, &mut *sink)?;
        sink.flush()?;

        Ok(stats)
    }

    /// Name of the traversal root directory
    pub fn project_name(&self) -> String {
        fs::canonicalize(&self.config.target_dir)
            .ok()
            .and_then(|path| path.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| "project".to_string())
    }
}

/// Front matter identifying the project and generation time
pub fn write_preamble<W: Write + ?Sized>(sink: &mut W, project: &str, timestamp: &str) -> io::Result<()> {
    write!(
        sink,
        "---\nProject: {}\nGenerated: {}\n---\n\n",
        project, timestamp
    )
}
