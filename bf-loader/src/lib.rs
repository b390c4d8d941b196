//! Loads build files into a [`BuildConfig`].
//!
//! The loader knows four top-level blocks:
//!
//! * `plugins`, bare plugin names or `id("...")`.
//! * `repositories`, well-known repositories or `maven("<url>")`.
//! * `dependencies`, `scope("group:artifact:version")` for the scopes in [`Scope`].
//! * `tasks`, one block per task. The options of the `test` task are also read into a
//!   [`TestEngineConfig`](bf_types::TestEngineConfig).
//!
//! Anything unknown inside one of these blocks fails the load. Unknown top-level blocks are
//! skipped with a [`Warning`], so newer build files still load.
//!
//! Loading is pure, nothing is read from disk or the network, except for [`load_file`] which
//! reads the build file itself.
//!
//! ```
//! let config = bf_loader::load(r#"
//!     plugins { java; scala }
//!     repositories { jcenter(); mavenCentral() }
//!     dependencies { implementation("org.scala-lang:scala-library:2.12.8") }
//! "#).unwrap();
//!
//! assert_eq!(config.plugins().len(), 2);
//! assert_eq!(config.dependencies()[0].artifact(), "scala-library");
//! ```
//!
//! [`Scope`]: bf_types::Scope

use std::fmt;
use std::path::{Path, PathBuf};

use bf_cfg::SettingSet;
use bf_syntax::{ParseError, Parser, Position};
use bf_types::{BuildConfig, ContentHash};
use compact_str::CompactString;

mod cache;
mod interpret;
mod pretty;
mod serialize;
pub mod settings;

pub use cache::LoadCache;
pub use pretty::PrettyNode;
pub use serialize::{to_source, to_syntax};

/// Options that influence how a build file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Blocks nested deeper than this fail to load.
    pub max_nesting_depth: usize,
    /// Reject unknown top-level blocks instead of warning about them.
    pub strict_blocks: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            max_nesting_depth: bf_syntax::DEFAULT_MAX_DEPTH,
            strict_blocks: false,
        }
    }
}

impl LoadOptions {
    /// Reads the current values of the loader settings.
    ///
    /// `max_nesting_depth` is capped at [`MAX_DEPTH_LIMIT`](bf_syntax::MAX_DEPTH_LIMIT).
    pub fn from_settings(settings: &SettingSet) -> Self {
        let depth = settings::MAX_NESTING_DEPTH.read(settings);
        let limit = bf_syntax::MAX_DEPTH_LIMIT;
        let max_nesting_depth = match usize::try_from(depth) {
            Ok(depth) if depth <= limit => depth,
            _ => {
                tracing::warn!(depth, limit, "max_nesting_depth too large, capping it");
                limit
            }
        };
        LoadOptions {
            max_nesting_depth,
            strict_blocks: settings::STRICT_BLOCKS.read(settings),
        }
    }
}

/// A successfully loaded build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub config: BuildConfig,
    /// Parts of the file that were ignored.
    pub warnings: Vec<Warning>,
    /// Hash of the source text.
    pub source_hash: ContentHash,
}

/// Something in a build file that was skipped rather than loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A top-level block we don't know about.
    UnknownBlock {
        name: CompactString,
        position: Position,
    },
    /// A top-level entry that isn't a block, e.g. `version = "1.0"`.
    UnknownEntry {
        name: CompactString,
        position: Position,
    },
}

impl Warning {
    pub fn position(&self) -> Position {
        match self {
            Warning::UnknownBlock { position, .. } | Warning::UnknownEntry { position, .. } => {
                *position
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownBlock { name, position } => {
                write!(f, "{position}: ignoring unknown block '{name}'")
            }
            Warning::UnknownEntry { name, position } => {
                write!(f, "{position}: ignoring top-level entry '{name}'")
            }
        }
    }
}

/// Loads a build file with the default [`LoadOptions`], dropping any warnings.
pub fn load(source: &str) -> Result<BuildConfig, ParseError> {
    load_with(source, &LoadOptions::default()).map(|loaded| loaded.config)
}

/// Loads a build file.
///
/// Either the whole file loads, or a [`ParseError`] is returned for the first problem found.
pub fn load_with(source: &str, options: &LoadOptions) -> Result<Loaded, ParseError> {
    let file = Parser::new(source)
        .with_max_depth(options.max_nesting_depth)
        .parse()?;
    let (config, warnings) = interpret::interpret(&file, options)?;
    let source_hash = bf_ore::hash::hash_str(source);

    tracing::debug!(
        plugins = config.plugins().len(),
        repositories = config.repositories().len(),
        dependencies = config.dependencies().len(),
        tasks = config.tasks().len(),
        warnings = warnings.len(),
        %source_hash,
        "loaded build file"
    );

    Ok(Loaded {
        config,
        warnings,
        source_hash,
    })
}

/// Failure to load a build file from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadFileError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}:{source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

impl LoadFileError {
    /// Resolved path of the build file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadFileError::Io { path, .. } | LoadFileError::Parse { path, .. } => path,
        }
    }
}

/// Reads and loads the build file at `path`.
///
/// If `path` is a directory the file named by the [`BUILD_FILENAME`] setting within it is
/// loaded.
///
/// [`BUILD_FILENAME`]: settings::BUILD_FILENAME
pub fn load_file(path: &Path, settings: &SettingSet) -> Result<Loaded, LoadFileError> {
    let (path, source) = read_build_file(path, settings)?;
    let options = LoadOptions::from_settings(settings);
    load_with(&source, &options).map_err(|source| LoadFileError::Parse { path, source })
}

/// Path of the build file `path` refers to, `path` itself unless it is a directory.
pub fn resolve_build_file(path: &Path, settings: &SettingSet) -> PathBuf {
    if path.is_dir() {
        path.join(settings::BUILD_FILENAME.read(settings).as_str())
    } else {
        path.to_path_buf()
    }
}

/// Reads the build file `path` refers to, returning its resolved path and contents.
pub(crate) fn read_build_file(
    path: &Path,
    settings: &SettingSet,
) -> Result<(PathBuf, String), LoadFileError> {
    let path = resolve_build_file(path, settings);
    tracing::info!(?path, "reading build file");

    match std::fs::read_to_string(&path) {
        Ok(source) => Ok((path, source)),
        Err(source) => Err(LoadFileError::Io { path, source }),
    }
}
