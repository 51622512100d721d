/*!
 * Command-line interface for concat
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use concat::clipboard::copy_to_clipboard;
use concat::config::{Args, Config};
use concat::error::{ConcatError, Result};
use concat::filter::Filter;
use concat::report::{Reporter, ScanReport};
use concat::utils::{decode_text, new_spinner, setup_logging, stdout_is_terminal};
use concat::walker::ScanStatistics;
use concat::writer::{OutputTarget, SnapshotWriter};

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        generate(shell, &mut Args::command(), "concat", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let quiet = args.quiet;
    setup_logging(quiet, args.verbose);

    match run(Config::from_args(args), quiet) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config, quiet: bool) -> Result<()> {
    config.validate()?;

    let filter = Filter::from_config(&config)?;
    let is_terminal = stdout_is_terminal();
    let mut target = OutputTarget::select(&config, is_terminal);
    log::info!(
        "Snapshotting {} ({}) to {}",
        config.target_dir.display(),
        config.extensions.join(", "),
        target.describe()
    );

    // A spinner would interleave with snapshot text on an interactive stdout
    let progress = new_spinner(quiet || (target == OutputTarget::Stdout && is_terminal));
    let writer = SnapshotWriter::new(&config, &filter, progress.clone());
    let start_time = Instant::now();

    let stats = match &target {
        OutputTarget::Stdout => {
            let stdout = io::stdout();
            let mut sink = BufWriter::new(stdout.lock());
            writer.write(&mut sink)?
        }
        OutputTarget::File(path) => {
            let file = File::create(path).map_err(|source| ConcatError::FileOpen {
                path: path.clone(),
                source,
            })?;
            let mut sink = BufWriter::new(file);
            writer.write(&mut sink)?
        }
        OutputTarget::Clipboard => {
            let mut buffer = Vec::new();
            let stats = writer.write(&mut buffer)?;
            let text = decode_text(&buffer, "Snapshot");

            if let Err(e) = copy_to_clipboard(&text) {
                progress.suspend(|| {
                    log::warn!("Failed to copy to clipboard: {}. Printing to stdout instead.", e)
                });
                let mut stdout = io::stdout().lock();
                stdout.write_all(&buffer)?;
                stdout.flush()?;
                target = OutputTarget::Stdout;
            }
            stats
        }
    };

    progress.finish_and_clear();

    if !quiet {
        print_report(&config, &target, stats, start_time)?;
    }

    Ok(())
}

fn print_report(
    config: &Config,
    target: &OutputTarget,
    stats: ScanStatistics,
    start_time: Instant,
) -> Result<()> {
    if stats.binary_skipped > 0 {
        log::info!("Skipped {} binary files", stats.binary_skipped);
    }

    let report = ScanReport {
        destination: target.describe(),
        duration: start_time.elapsed(),
        files_processed: stats.files_processed,
        binary_skipped: stats.binary_skipped,
        total_lines: stats.total_lines,
        total_bytes: stats.total_bytes,
        file_details: stats.file_details,
    };

    Reporter::new(config.report_format).print_report(&report)
}
