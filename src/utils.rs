/*!
 * Utility functions for concat
 */

use std::borrow::Cow;
use std::io::{self, IsTerminal};
use std::path::{Component, Path};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Initialise the `env_logger` backend. `RUST_LOG` overrides the level
/// derived from the flags.
pub fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

/// Whether stdout is attached to a terminal rather than a pipe or file
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Spinner on stderr for progress markers; hidden when `quiet`
pub fn new_spinner(quiet: bool) -> Arc<ProgressBar> {
    if quiet {
        return Arc::new(ProgressBar::hidden());
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} [{pos} files, {elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_prefix("concat");
    progress.enable_steady_tick(Duration::from_millis(100));
    Arc::new(progress)
}

/// Render a relative path with `/` separators on every platform
pub fn display_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode text for consumers that need a `str` (clipboard, transforms).
/// Invalid UTF-8 is replaced with U+FFFD and reported, since the result is
/// then no longer byte-identical to the input.
pub fn decode_text<'a>(bytes: &'a [u8], source: &str) -> Cow<'a, str> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        log::warn!(
            "{} is not valid UTF-8; invalid bytes were replaced with U+FFFD",
            source
        );
    }
    text
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("main.go")), "main.go");
        assert_eq!(display_path(Path::new("pkg/util/strings.go")), "pkg/util/strings.go");
        assert_eq!(display_path(Path::new("./lib/x.go")), "lib/x.go");
    }

    #[test]
    fn test_decode_text() {
        assert!(matches!(decode_text(b"package main\n", "input"), Cow::Borrowed("package main\n")));

        let decoded = decode_text(b"caf\xe9", "input");
        assert!(matches!(decoded, Cow::Owned(_)));
        assert_eq!(decoded, "caf\u{FFFD}");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
