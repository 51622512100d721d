/*!
 * End-of-run reporting
 *
 * Reports always go to stderr so they never mix with snapshot bytes on
 * stdout.
 */

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::tokenizer::estimate_tokens;
use crate::utils::format_file_size;

/// Number of rows the file table shows for large snapshots
const TOP_FILES: usize = 10;

/// Snapshots with more files than this only list the largest ones
const FULL_LISTING_LIMIT: usize = 15;

/// Information about one emitted file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Size of the file body in bytes
    pub bytes: u64,
    /// Bytes written for this file, markers included
    pub emitted_bytes: u64,
}

/// Summary of one snapshot run
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Where the snapshot went (`stdout`, `clipboard` or a quoted path)
    pub destination: String,
    /// Wall time of the whole run
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    /// Number of files emitted
    pub files_processed: usize,
    /// Files skipped as binary
    pub binary_skipped: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Bytes of the file section, markers included
    pub total_bytes: u64,
    /// Emitted files in output order
    pub file_details: Vec<(String, FileReportInfo)>,
}

impl ScanReport {
    /// Estimated token count of the file section
    pub fn estimated_tokens(&self) -> u64 {
        estimate_tokens(self.total_bytes)
    }
}

fn serialize_duration<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Style of the end-of-run report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// One line with file count, bytes and estimated tokens
    #[default]
    Summary,
    /// Per-file table followed by a summary table
    Table,
    /// Machine-readable JSON
    Json,
}

/// Report generator for snapshot runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> Result<String> {
        Ok(match self.format {
            ReportFormat::Summary => self.generate_summary(report),
            ReportFormat::Table => self.generate_tables(report),
            ReportFormat::Json => serde_json::to_string_pretty(report)?,
        })
    }

    /// Print the report to stderr
    pub fn print_report(&self, report: &ScanReport) -> Result<()> {
        eprintln!("{}", self.generate_report(report)?);
        Ok(())
    }

    fn generate_summary(&self, report: &ScanReport) -> String {
        let verb = match report.destination.as_str() {
            "clipboard" => "Copied",
            "stdout" => "Output",
            _ => "Wrote",
        };

        format!(
            "✓ {} {} files ({} bytes, ~{} tokens) to {}.",
            verb,
            report.files_processed,
            report.total_bytes,
            report.estimated_tokens(),
            report.destination
        )
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: &'static str,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Destination",
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time",
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Processed",
                value: format_number(report.files_processed as u64),
            },
            SummaryRow {
                key: "🚫 Binary Skipped",
                value: format_number(report.binary_skipped as u64),
            },
            SummaryRow {
                key: "📝 Total Lines",
                value: format_number(report.total_lines as u64),
            },
            SummaryRow {
                key: "💾 Output Size",
                value: format_file_size(report.total_bytes),
            },
            SummaryRow {
                key: "📦 LLM Tokens",
                value: format!("{} tokens (estimated)", format_number(report.estimated_tokens())),
            },
        ];

        style(Table::new(rows))
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow<'a> {
            #[tabled(rename = "File Path")]
            path: &'a str,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Bytes")]
            bytes: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        if files.len() > FULL_LISTING_LIMIT {
            files.sort_by(|(_, a), (_, b)| b.bytes.cmp(&a.bytes));
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .into_iter()
            .map(|(path, info)| FileRow {
                path,
                lines: format_number(info.lines as u64),
                bytes: format_file_size(info.bytes),
                tokens: format_number(estimate_tokens(info.bytes)),
            })
            .collect();

        style(Table::new(rows))
    }

    fn generate_tables(&self, report: &ScanReport) -> String {
        let files_title = if report.file_details.len() > FULL_LISTING_LIMIT {
            "📋  TOP 10 LARGEST FILES BY SIZE"
        } else {
            "📋  PROCESSED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title,
            self.create_files_table(report),
            "✅  SNAPSHOT COMPLETE",
            self.create_summary_table(report)
        )
    }
}

fn style(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

/// Format a number with human-readable units
pub fn format_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}
