/*!
 * Directory walking and file concatenation
 */

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::binary::{is_binary, SNIFF_BUFFER_SIZE};
use crate::error::{ConcatError, Result};
use crate::filter::Filter;
use crate::format::OutputFormat;
use crate::report::FileReportInfo;
use crate::types::{EntryKind, TraversalNode};
use crate::utils::display_path;
use crate::writer::CountingWriter;

/// Counters for one concatenation pass
#[derive(Debug, Clone, Default)]
pub struct ScanStatistics {
    /// Number of files emitted
    pub files_processed: usize,
    /// Bytes written to the sink, markers included
    pub total_bytes: u64,
    /// Total number of lines across emitted files
    pub total_lines: usize,
    /// Files admitted by the filter but skipped as binary
    pub binary_skipped: usize,
    /// Emitted files in output order
    pub file_details: Vec<(String, FileReportInfo)>,
}

/// Walks a directory tree and streams every selected text file into a sink
pub struct Concatenator<'a> {
    filter: &'a Filter,
    format: OutputFormat,
    progress: Arc<ProgressBar>,
}

impl<'a> Concatenator<'a> {
    pub fn new(filter: &'a Filter, format: OutputFormat, progress: Arc<ProgressBar>) -> Self {
        Self {
            filter,
            format,
            progress,
        }
    }

    /// Walk `root` depth-first in file-name order and write each selected
    /// file, wrapped in the configured markers, to `sink`.
    ///
    /// The root itself is never filtered. Directories matched by an ignore
    /// layer are not descended into. Any directory, open or read failure
    /// aborts the walk.
    pub fn process<W: Write>(&self, root: &Path, sink: W) -> Result<ScanStatistics> {
        let mut writer = CountingWriter::new(sink);
        let mut stats = ScanStatistics::default();

        let mut entries = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry?;
            let node = TraversalNode::from_entry(&entry, root).ok_or_else(|| {
                ConcatError::RelativePath {
                    path: entry.path().to_path_buf(),
                    root: root.to_path_buf(),
                }
            })?;

            match node.kind {
                EntryKind::Directory => {
                    if self.filter.is_ignored(&node.path, true) {
                        log::debug!("Pruning directory: {}", node.path.display());
                        entries.skip_current_dir();
                    }
                }
                EntryKind::File => {
                    if !self.filter.should_process(&node.path, false) {
                        continue;
                    }

                    let rel_path = display_path(&node.path);
                    self.progress.inc(1);
                    self.progress.set_message(format!("Current file: {}", rel_path));

                    match self.emit_file(entry.path(), &rel_path, &mut writer)? {
                        Some(info) => {
                            stats.files_processed += 1;
                            stats.total_lines += info.lines;
                            stats.file_details.push((rel_path, info));
                        }
                        None => stats.binary_skipped += 1,
                    }
                }
                EntryKind::Other => {
                    log::debug!("Skipping non-regular entry: {}", node.path.display());
                }
            }
        }

        writer.flush()?;
        stats.total_bytes = writer.bytes_written();
        Ok(stats)
    }

    /// Write one file with its header and footer. Returns `None` when the
    /// file is classified as binary; nothing is written in that case.
    fn emit_file<W: Write>(
        &self,
        abs_path: &Path,
        rel_path: &str,
        writer: &mut CountingWriter<W>,
    ) -> Result<Option<FileReportInfo>> {
        let mut file = File::open(abs_path).map_err(|source| ConcatError::FileOpen {
            path: abs_path.to_path_buf(),
            source,
        })?;

        let read_error = |source| ConcatError::FileRead {
            path: abs_path.to_path_buf(),
            source,
        };

        let mut prefix = Vec::with_capacity(SNIFF_BUFFER_SIZE);
        (&mut file)
            .take(SNIFF_BUFFER_SIZE as u64)
            .read_to_end(&mut prefix)
            .map_err(read_error)?;

        if is_binary(&prefix) {
            self.progress
                .suspend(|| log::warn!("Skipping binary file: {}", rel_path));
            return Ok(None);
        }

        let start = writer.bytes_written();
        self.format.write_header(writer, rel_path)?;

        // The sniffed prefix is the start of the body; the rest is streamed.
        writer.write_all(&prefix)?;
        let mut lines = count_newlines(&prefix);
        let mut content_bytes = prefix.len() as u64;
        let mut last_byte = prefix.last().copied();

        let mut buffer = vec![0u8; SNIFF_BUFFER_SIZE];
        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(read_error(e)),
            };
            writer.write_all(&buffer[..n])?;
            lines += count_newlines(&buffer[..n]);
            content_bytes += n as u64;
            last_byte = Some(buffer[n - 1]);
        }

        // An unterminated final line still counts.
        if matches!(last_byte, Some(b) if b != b'\n') {
            lines += 1;
        }

        self.format.write_footer(writer)?;

        Ok(Some(FileReportInfo {
            lines,
            bytes: content_bytes,
            emitted_bytes: writer.bytes_written() - start,
        }))
    }
}

fn count_newlines(chunk: &[u8]) -> usize {
    chunk.iter().filter(|&&b| b == b'\n').count()
}
