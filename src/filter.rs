/*!
 * Selection filter: the single inclusion predicate shared by the content
 * walker and the tree renderer
 */

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::patterns::{IgnoreLayers, LayerSource};
use crate::types::ExtensionSet;

/// Name of the repository ignore file looked up in the traversal root
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Decides which files and directories take part in a snapshot.
///
/// Built once per invocation and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Filter {
    extensions: ExtensionSet,
    layers: IgnoreLayers,
    exclude_tests: bool,
}

impl Filter {
    /// Filter with the system, noise and user layers
    pub fn new(extensions: &[String], user_patterns: &[String], exclude_tests: bool) -> Result<Self> {
        let extensions = ExtensionSet::new(extensions);
        let layers = IgnoreLayers::new(&extensions, user_patterns)?;

        Ok(Self {
            extensions,
            layers,
            exclude_tests,
        })
    }

    /// Add the repository ignore file layer. Absent or malformed files are
    /// tolerated.
    pub fn with_ignore_file(mut self, path: &Path) -> Self {
        self.layers = self.layers.with_ignore_file(path);
        self
    }

    /// Build the filter described by a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut patterns = config.ignore_patterns.clone();
        if let Some(pattern) = config.output_exclusion_pattern() {
            log::debug!("Excluding output file via pattern {}", pattern);
            patterns.push(pattern);
        }

        let filter = Self::new(&config.extensions, &patterns, config.exclude_tests)?;

        Ok(match config.ignore_file() {
            Some(path) => filter.with_ignore_file(&path),
            None => filter,
        })
    }

    /// True iff the entry is not ignored and is either a directory or a file
    /// with a requested extension that passes the test-file policy.
    pub fn should_process(&self, path: &Path, is_dir: bool) -> bool {
        if self.is_ignored(path, is_dir) {
            return false;
        }

        if is_dir {
            return true;
        }

        if self.exclude_tests && is_test_file(path) {
            log::trace!("Excluding test file: {}", path.display());
            return false;
        }

        self.has_valid_extension(path)
    }

    /// True iff any ignore layer matches. For directories this means prune.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        match self.layers.matching_layer(path, is_dir) {
            Some(source) => {
                log::trace!("{} ignored by {} layer", path.display(), source);
                true
            }
            None => false,
        }
    }

    /// Layer responsible for excluding `path`, for diagnostics
    pub fn ignored_by(&self, path: &Path, is_dir: bool) -> Option<LayerSource> {
        self.layers.matching_layer(path, is_dir)
    }

    /// Whether the final path component carries a requested extension
    pub fn has_valid_extension<P: AsRef<Path>>(&self, file_name: P) -> bool {
        file_name
            .as_ref()
            .file_name()
            .map_or(false, |name| self.extensions.matches_name(&name.to_string_lossy()))
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn excludes_tests(&self) -> bool {
        self.exclude_tests
    }
}

/// Naming conventions that mark a file as a test, checked against the
/// lower-cased base name
const TEST_INFIXES: [&str; 3] = ["_test.", ".test.", ".spec."];
const TEST_PREFIX: &str = "test_";

/// Whether the base name follows a common test-file naming convention
/// (`foo_test.go`, `foo.test.ts`, `foo.spec.js`, `test_foo.py`)
pub fn is_test_file<P: AsRef<Path>>(path: P) -> bool {
    let base = match path.as_ref().file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return false,
    };

    base.starts_with(TEST_PREFIX) || TEST_INFIXES.iter().any(|infix| base.contains(infix))
}

/// Relative location of the repository ignore file for a traversal root
pub fn default_ignore_file(root: &Path) -> PathBuf {
    root.join(IGNORE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_test_file() {
        let cases = [
            ("main.go", false),
            ("main_test.go", true),
            ("utils.js", false),
            ("utils.test.js", true),
            ("utils.spec.js", true),
            ("component.ts", false),
            ("component.test.ts", true),
            ("component.spec.ts", true),
            ("script.py", false),
            ("test_script.py", true),
            ("random_file.txt", false),
            ("pkg/Handler_Test.go", true),
            ("TEST_api.py", true),
            ("testing.go", false),
            ("contest.go", false),
        ];

        for (path, expected) in cases {
            assert_eq!(is_test_file(path), expected, "is_test_file({:?})", path);
        }
    }

    #[test]
    fn test_should_process_files() {
        let filter = Filter::new(&strings(&["go", ".md"]), &[], false).unwrap();

        assert!(filter.should_process(Path::new("main.go"), false));
        assert!(filter.should_process(Path::new("docs/README.md"), false));
        assert!(!filter.should_process(Path::new("script.py"), false));
        assert!(!filter.should_process(Path::new("Makefile"), false));
    }

    #[test]
    fn test_directories_pass_through_unless_ignored() {
        let filter = Filter::new(&strings(&["go"]), &strings(&["generated"]), false).unwrap();

        assert!(filter.should_process(Path::new("src"), true));
        assert!(!filter.should_process(Path::new("node_modules"), true));
        assert!(!filter.should_process(Path::new("src/generated"), true));
        assert!(filter.is_ignored(Path::new("src/generated"), true));
        assert!(!filter.is_ignored(Path::new("src"), true));
    }

    #[test]
    fn test_ignore_layers_beat_requested_extensions() {
        let filter = Filter::new(&strings(&["go", "log"]), &strings(&["*.log"]), false).unwrap();

        assert!(!filter.should_process(Path::new("server.log"), false));
        assert!(filter.has_valid_extension("server.log"));
        assert_eq!(
            filter.ignored_by(Path::new("server.log"), false),
            Some(LayerSource::User)
        );
    }

    #[test]
    fn test_system_layer_is_always_active() {
        let filter = Filter::new(&strings(&["exe", "js"]), &[], false).unwrap();

        assert!(filter.is_ignored(Path::new(".git"), true));
        assert!(filter.is_ignored(Path::new("tool.exe"), false));
        assert!(!filter.should_process(Path::new("node_modules/react/index.js"), false));
    }

    #[test]
    fn test_requested_extension_disables_noise_rule() {
        let without = Filter::new(&strings(&["go"]), &[], false).unwrap();
        let with = Filter::new(&strings(&["svg"]), &[], false).unwrap();

        assert!(without.is_ignored(Path::new("logo.svg"), false));
        assert!(!with.is_ignored(Path::new("logo.svg"), false));
        assert!(with.should_process(Path::new("assets/logo.svg"), false));
    }

    #[test]
    fn test_test_policy() {
        let excluding = Filter::new(&strings(&["go", "py"]), &[], true).unwrap();
        let including = Filter::new(&strings(&["go", "py"]), &[], false).unwrap();

        assert!(!excluding.should_process(Path::new("main_test.go"), false));
        assert!(!excluding.should_process(Path::new("test_main.py"), false));
        assert!(excluding.should_process(Path::new("main.go"), false));
        assert!(including.should_process(Path::new("main_test.go"), false));
        assert!(including.should_process(Path::new("test_main.py"), false));
    }

    #[test]
    fn test_has_valid_extension_uses_base_name() {
        let filter = Filter::new(&strings(&["rs"]), &[], false).unwrap();

        assert!(filter.has_valid_extension("src/lib.rs"));
        assert!(!filter.has_valid_extension("src.rs/lib"));
        assert!(!filter.has_valid_extension("Cargo.toml"));
    }
}
