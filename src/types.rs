/*!
 * Core types and data structures for concat
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of requested file extensions, stored without the leading dot
///
/// Membership is exact, case-sensitive string equality on the cleaned form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: HashSet<String>,
}

impl ExtensionSet {
    /// Build the set, trimming whitespace and a single leading dot from each
    /// entry. Entries that end up empty are dropped.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .filter_map(|ext| {
                let ext = ext.as_ref().trim();
                let ext = ext.strip_prefix('.').unwrap_or(ext);
                (!ext.is_empty()).then(|| ext.to_string())
            })
            .collect();

        Self { extensions }
    }

    /// Whether `ext` (already dot-stripped) was requested
    pub fn contains(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    /// Whether the file name's extension was requested
    pub fn matches_name(&self, file_name: &str) -> bool {
        extension_of(file_name).map_or(false, |ext| self.contains(ext))
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Extensions in lexicographic order
    pub fn sorted(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

/// Text after the last dot of a file name.
///
/// Dotfiles count as having an extension (`.env` yields `env`), names
/// without a dot have none, and a trailing dot yields an empty extension.
pub fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx + 1..])
}

/// Kind of a walked filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory, descended into unless pruned
    Directory,
    /// Regular file, or a symlink resolving to one
    File,
    /// Anything else: sockets, FIFOs, dangling or directory symlinks
    Other,
}

/// An entry seen during a single traversal
#[derive(Debug, Clone)]
pub struct TraversalNode {
    /// Path relative to the traversal root
    pub path: PathBuf,
    /// Entry kind
    pub kind: EntryKind,
    /// Size in bytes (files only)
    pub size: Option<u64>,
}

impl TraversalNode {
    /// Classify a walked entry. Symlinks are resolved only to decide whether
    /// they point at a regular file; traversal never follows them.
    pub fn from_entry(entry: &walkdir::DirEntry, root: &Path) -> Option<Self> {
        let path = entry.path().strip_prefix(root).ok()?.to_path_buf();
        let file_type = entry.file_type();

        let (kind, size) = if file_type.is_dir() {
            (EntryKind::Directory, None)
        } else if file_type.is_file() {
            (EntryKind::File, entry.metadata().ok().map(|m| m.len()))
        } else if entry.path_is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => (EntryKind::File, Some(meta.len())),
                _ => (EntryKind::Other, None),
            }
        } else {
            (EntryKind::Other, None)
        };

        Some(Self { path, kind, size })
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// File name component, lossily converted
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_set_normalizes_dots_and_blanks() {
        let set = ExtensionSet::new([".go", "rs", " py ", "", "."]);

        assert_eq!(set.len(), 3);
        assert!(set.contains("go"));
        assert!(set.contains("rs"));
        assert!(set.contains("py"));
        assert!(!set.contains(".go"));
        assert_eq!(set.sorted(), vec!["go", "py", "rs"]);
    }

    #[test]
    fn test_extension_set_is_case_sensitive() {
        let set = ExtensionSet::new(["go"]);

        assert!(set.matches_name("main.go"));
        assert!(!set.matches_name("MAIN.GO"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.go"), Some("go"));
        assert_eq!(extension_of("app.min.js"), Some("js"));
        assert_eq!(extension_of(".env"), Some("env"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("trailing."), Some(""));
    }

    #[test]
    fn test_file_without_extension_never_matches() {
        let set = ExtensionSet::new(["go", "md"]);

        assert!(!set.matches_name("Makefile"));
        assert!(!set.matches_name("LICENSE"));
        assert!(!set.matches_name("trailing."));
    }
}
