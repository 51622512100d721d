/*!
 * Ignore-pattern matching
 *
 * Patterns use gitignore syntax and are compiled with the `ignore` crate.
 * They are grouped into layers that are consulted in a fixed order; a path is
 * excluded as soon as any layer matches it.
 */

use std::fmt;
use std::fs;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use once_cell::sync::Lazy;

use crate::error::{ConcatError, Result};
use crate::types::{extension_of, ExtensionSet};

/// Fixed exclusions that are always active: version-control internals, OS
/// metadata, native binaries, dependency/build output and editor state
pub static SYSTEM_IGNORES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // OS Files
        ".DS_Store",
        "Thumbs.db",
        "desktop.ini",
        // Native binaries
        "*.exe",
        "*.dll",
        "*.so",
        "*.dylib",
        "*.pyc",
        "*.class",
        // Dependencies & Build
        "node_modules",
        "bower_components",
        "__pycache__",
        ".venv",
        "venv",
        "vendor",
        "target",
        "dist",
        "build",
        // IDEs & Editors
        ".idea",
        ".vscode",
        ".vs",
        "*.swp",
        "*.swo",
    ]
});

/// Text files that are usually noise in a prompt. Each rule is dropped when
/// its extension is explicitly requested.
pub static NOISE_IGNORES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Lockfiles
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "composer.lock",
        "go.sum",
        "Cargo.lock",
        // Media
        "*.svg",
        "*.png",
        "*.jpg",
        "*.jpeg",
        "*.gif",
        "*.ico",
        // Generated
        "*.min.js",
        "*.min.css",
        "*.map",
        "*.log",
    ]
});

/// Where a layer's patterns came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSource {
    /// Always-on hard exclusions
    System,
    /// Default exclusions that yield to requested extensions
    Noise,
    /// Patterns supplied on the command line
    User,
    /// Patterns read from the repository ignore file
    IgnoreFile,
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::Noise => "noise",
            Self::User => "user",
            Self::IgnoreFile => "ignore-file",
        };
        f.write_str(name)
    }
}

/// A compiled group of gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    gitignore: Gitignore,
}

impl PatternMatcher {
    /// Compile patterns relative to the traversal root. Blank lines and `#`
    /// comments are accepted and skipped.
    pub fn compile<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new(".");
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|source| ConcatError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
        }

        let gitignore = builder
            .build()
            .map_err(|source| ConcatError::InvalidPattern {
                pattern: "<pattern set>".to_string(),
                source,
            })?;

        Ok(Self { gitignore })
    }

    /// Whether `path` (relative to the root) is excluded.
    ///
    /// Parents are checked as directories, so a bare folder pattern such as
    /// `node_modules` also covers everything beneath that folder, and a
    /// directory-only pattern (`build/`) only fires for directories.
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if path.has_root() {
            return self.gitignore.matched(path, is_dir).is_ignore();
        }
        self.gitignore
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }

    pub fn len(&self) -> usize {
        self.gitignore.num_ignores() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.gitignore.is_empty()
    }
}

/// A matcher tagged with its source
#[derive(Debug, Clone)]
pub struct IgnoreLayer {
    pub source: LayerSource,
    pub matcher: PatternMatcher,
}

/// The ordered ignore layers of one invocation
#[derive(Debug, Clone, Default)]
pub struct IgnoreLayers {
    layers: Vec<IgnoreLayer>,
}

impl IgnoreLayers {
    /// System, noise and user layers. Noise rules governed by a requested
    /// extension are removed before compiling.
    pub fn new(extensions: &ExtensionSet, user_patterns: &[String]) -> Result<Self> {
        let mut layers = Self::default();
        layers.push(LayerSource::System, PatternMatcher::compile(SYSTEM_IGNORES.iter())?);
        layers.push(
            LayerSource::Noise,
            PatternMatcher::compile(active_noise_patterns(extensions))?,
        );
        layers.push(LayerSource::User, PatternMatcher::compile(user_patterns)?);
        Ok(layers)
    }

    /// Append the repository ignore file as the last layer.
    ///
    /// A missing, unreadable or malformed file leaves the layers unchanged.
    pub fn with_ignore_file(mut self, path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No ignore file at {}: {}", path.display(), e);
                return self;
            }
        };

        match PatternMatcher::compile(content.lines()) {
            Ok(matcher) => {
                log::debug!(
                    "Loaded {} ignore rules from {}",
                    matcher.len(),
                    path.display()
                );
                self.push(LayerSource::IgnoreFile, matcher);
            }
            Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
        }
        self
    }

    fn push(&mut self, source: LayerSource, matcher: PatternMatcher) {
        self.layers.push(IgnoreLayer { source, matcher });
    }

    /// First layer that excludes `path`, if any
    pub fn matching_layer(&self, path: &Path, is_dir: bool) -> Option<LayerSource> {
        self.layers
            .iter()
            .find(|layer| layer.matcher.matches(path, is_dir))
            .map(|layer| layer.source)
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.matching_layer(path, is_dir).is_some()
    }

    pub fn layers(&self) -> &[IgnoreLayer] {
        &self.layers
    }
}

/// Noise patterns whose governing extension was not requested.
///
/// The governing extension is the pattern's own extension: `*.svg` is
/// governed by `svg`, `go.sum` by `sum`, `*.min.js` by `js`.
pub fn active_noise_patterns(extensions: &ExtensionSet) -> Vec<&'static str> {
    NOISE_IGNORES
        .iter()
        .copied()
        .filter(|pattern| {
            extension_of(pattern).map_or(true, |ext| !extensions.contains(ext))
        })
        .collect()
}
