/*!
 * Directory tree rendering
 *
 * The tree shows the same selection as the content section: directories
 * unless ignored, files only when they carry a requested extension. Entries
 * the walker would skip (dangling links, links to directories, special files)
 * are left out as well.
 */

use std::fmt::Write as _;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{ConcatError, Result};
use crate::filter::Filter;
use crate::types::{EntryKind, TraversalNode};

/// Title line that opens the rendered tree
pub const TREE_TITLE: &str = "### Directory Structure ###";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Renders a directory hierarchy with box-drawing connectors
pub struct TreeGenerator<'a> {
    filter: &'a Filter,
}

impl<'a> TreeGenerator<'a> {
    pub fn new(filter: &'a Filter) -> Self {
        Self { filter }
    }

    /// Render the tree rooted at `root`, title and `.` line included
    pub fn generate(&self, root: &Path) -> Result<String> {
        let mut out = format!("{}\n.\n", TREE_TITLE);
        self.render_dir(root, root, "", &mut out)?;
        Ok(out)
    }

    fn render_dir(&self, root: &Path, dir: &Path, prefix: &str, out: &mut String) -> Result<()> {
        let mut visible = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry?;
            let node = TraversalNode::from_entry(&entry, root).ok_or_else(|| {
                ConcatError::RelativePath {
                    path: entry.path().to_path_buf(),
                    root: root.to_path_buf(),
                }
            })?;

            let is_dir = match node.kind {
                EntryKind::Directory => true,
                EntryKind::File => false,
                EntryKind::Other => continue,
            };

            if self.filter.is_ignored(&node.path, is_dir) {
                continue;
            }
            if !is_dir && !self.filter.has_valid_extension(&node.path) {
                continue;
            }

            visible.push((entry, is_dir));
        }

        let count = visible.len();
        for (i, (entry, is_dir)) in visible.into_iter().enumerate() {
            let is_last = i + 1 == count;
            let (connector, extension) = if is_last {
                (LAST_BRANCH, SPACE)
            } else {
                (BRANCH, PIPE)
            };

            let _ = writeln!(
                out,
                "{}{}{}",
                prefix,
                connector,
                entry.file_name().to_string_lossy()
            );

            if is_dir {
                let child_prefix = format!("{}{}", prefix, extension);
                self.render_dir(root, entry.path(), &child_prefix, out)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn filter(exts: &[&str], ignores: &[&str]) -> Filter {
        let exts: Vec<String> = exts.iter().map(|s| s.to_string()).collect();
        let ignores: Vec<String> = ignores.iter().map(|s| s.to_string()).collect();
        Filter::new(&exts, &ignores, false).unwrap()
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_tree_connectors() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.go");
        touch(dir.path(), "lib/x.go");
        touch(dir.path(), "z.go");

        let tree = TreeGenerator::new(&filter(&["go"], &[]))
            .generate(dir.path())
            .unwrap();

        assert_eq!(
            tree,
            "### Directory Structure ###\n.\n├── a.go\n├── lib\n│   └── x.go\n└── z.go\n"
        );
    }

    #[test]
    fn test_tree_nested_last_directory_uses_blank_prefix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main.go");
        touch(dir.path(), "pkg/a/one.go");
        touch(dir.path(), "pkg/b.go");

        let tree = TreeGenerator::new(&filter(&["go"], &[]))
            .generate(dir.path())
            .unwrap();

        assert_eq!(
            tree,
            "### Directory Structure ###\n.\n\
             ├── main.go\n\
             └── pkg\n    \
             ├── a\n    \
             │   └── one.go\n    \
             └── b.go\n"
        );
    }

    #[test]
    fn test_tree_hides_ignored_and_unrequested_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main.go");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "node_modules/dep/index.go");
        touch(dir.path(), "gen/out.go");

        let tree = TreeGenerator::new(&filter(&["go"], &["gen"]))
            .generate(dir.path())
            .unwrap();

        assert_eq!(tree, "### Directory Structure ###\n.\n└── main.go\n");
    }

    #[test]
    fn test_tree_keeps_directories_without_matching_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "docs/readme.txt");
        touch(dir.path(), "main.go");

        let tree = TreeGenerator::new(&filter(&["go"], &[]))
            .generate(dir.path())
            .unwrap();

        assert_eq!(
            tree,
            "### Directory Structure ###\n.\n├── docs\n└── main.go\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_tree_omits_entries_the_walker_skips() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "real.go");
        touch(dir.path(), "pkg/inner.go");
        std::os::unix::fs::symlink(dir.path().join("missing.go"), dir.path().join("dangling.go"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("pkg"), dir.path().join("pkg.go")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.go"), dir.path().join("link.go")).unwrap();

        let tree = TreeGenerator::new(&filter(&["go"], &[]))
            .generate(dir.path())
            .unwrap();

        assert_eq!(
            tree,
            "### Directory Structure ###\n.\n├── link.go\n├── pkg\n│   └── inner.go\n└── real.go\n"
        );
    }
}
