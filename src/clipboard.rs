/*!
 * System clipboard access through the platform's clipboard command
 *
 * Providers are tried in order of preference; the first one whose command
 * is on `PATH` receives the text on its stdin.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// The clipboard command could not be run or exited unsuccessfully
    #[error("{command} failed: {reason}")]
    CommandFailed { command: &'static str, reason: String },

    /// No clipboard command is available on this system
    #[error("No clipboard command found (tried: {0})")]
    NoClipboardFound(String),

    /// Writing to the clipboard command failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Destination able to receive the snapshot text
pub trait Clipboard {
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// External commands that can write the system clipboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    MacOS,
    Wayland,
    Xclip,
    Xsel,
    Windows,
    Termux,
    Tmux,
}

impl ClipboardProvider {
    /// Program and arguments that read the clipboard text from stdin
    pub fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::MacOS => ("pbcopy", &[]),
            Self::Wayland => ("wl-copy", &[]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["--clipboard", "--input"]),
            Self::Windows => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
        }
    }

    fn is_available(&self) -> bool {
        let (program, _) = self.command();
        match self {
            Self::Wayland => env::var_os("WAYLAND_DISPLAY").is_some() && command_exists(program),
            Self::Xclip | Self::Xsel => env::var_os("DISPLAY").is_some() && command_exists(program),
            Self::Tmux => env::var_os("TMUX").is_some() && command_exists(program),
            _ => command_exists(program),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (program, args) = self.command();
        log::debug!("Copying {} bytes with {}", text.len(), program);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError::CommandFailed {
                command: program,
                reason: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed {
                command: program,
                reason: format!("exited with {}", status),
            })
        }
    }
}

/// Providers worth probing on this platform, most preferred first
pub fn candidate_providers() -> Vec<ClipboardProvider> {
    use ClipboardProvider::*;

    if cfg!(target_os = "macos") {
        vec![MacOS, Tmux]
    } else if cfg!(target_os = "windows") {
        vec![Windows]
    } else if cfg!(target_os = "android") {
        vec![Termux, Tmux]
    } else {
        // clip.exe covers WSL, where no display server may be running
        vec![Wayland, Xclip, Xsel, Windows, Tmux]
    }
}

/// Copy text to the first available clipboard provider
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let candidates = candidate_providers();
    let provider = candidates
        .iter()
        .find(|p| p.is_available())
        .ok_or_else(|| {
            let tried: Vec<&str> = candidates.iter().map(|p| p.command().0).collect();
            ClipboardError::NoClipboardFound(tried.join(", "))
        })?;

    provider.copy_to_clipboard(text)
}

/// Whether an executable named `command` is on `PATH`
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH").map_or(false, |paths| {
        env::split_paths(&paths).any(|dir| dir.join(command).is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_exists() {
        assert!(command_exists("sh"));
        assert!(!command_exists("nonexistentcommandxyz"));
    }

    #[test]
    fn test_candidates_are_not_empty() {
        assert!(!candidate_providers().is_empty());
    }

    #[test]
    fn test_provider_commands() {
        assert_eq!(ClipboardProvider::MacOS.command().0, "pbcopy");
        assert_eq!(
            ClipboardProvider::Xclip.command(),
            ("xclip", &["-selection", "clipboard", "-in"][..])
        );
    }

    #[test]
    #[ignore] // Requires a running display server or tmux session
    fn test_copy_roundtrip() {
        copy_to_clipboard("concat clipboard test").unwrap();
    }
}
