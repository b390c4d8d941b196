//! Memoizes loaded build files by the hash of their contents.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bf_cfg::SettingSet;
use bf_ore::hash::ContentHasher;
use bf_syntax::ParseError;
use bf_types::ContentHash;

use crate::{LoadFileError, LoadOptions, Loaded, load_with, read_build_file};

/// Cache of [`Loaded`] build files.
///
/// Loading is pure, so the same source with the same options always loads the same way. The
/// current [`LoadOptions`] are part of the key, changing a setting won't return stale results.
/// Failed loads are not cached.
///
/// Entries are never evicted, the cache grows with every distinct source until
/// [`LoadCache::clear`] is called. Meant for a single run over a known set of files, not a long
/// lived process.
#[derive(Debug)]
pub struct LoadCache {
    settings: SettingSet,
    entries: HashMap<ContentHash, Arc<Loaded>>,
}

impl LoadCache {
    pub fn new(settings: SettingSet) -> Self {
        LoadCache {
            settings,
            entries: HashMap::new(),
        }
    }

    /// Load `source`, or return the result of an earlier identical load.
    pub fn load(&mut self, source: &str) -> Result<Arc<Loaded>, ParseError> {
        let options = LoadOptions::from_settings(&self.settings);
        let key = cache_key(source, &options);

        if let Some(loaded) = self.entries.get(&key) {
            tracing::trace!(%key, "build file cache hit");
            return Ok(Arc::clone(loaded));
        }

        let loaded = Arc::new(load_with(source, &options)?);
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Reads the build file `path` refers to and loads it through the cache.
    pub fn load_file(&mut self, path: &Path) -> Result<Arc<Loaded>, LoadFileError> {
        let (path, source) = read_build_file(path, &self.settings)?;
        self.load(&source)
            .map_err(|source| LoadFileError::Parse { path, source })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn cache_key(source: &str, options: &LoadOptions) -> ContentHash {
    let LoadOptions {
        max_nesting_depth,
        strict_blocks,
    } = *options;

    let mut hasher = ContentHasher::new();
    hasher
        .update(source.as_bytes())
        .update_u64(max_nesting_depth as u64)
        .update_u64(u64::from(strict_blocks));
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{STRICT_BLOCKS, default_settings};

    static SOURCE: &str = "plugins { java }\nextra { stuff() }";

    #[test]
    fn smoketest_cache() {
        let mut cache = LoadCache::new(default_settings());
        let first = cache.load(SOURCE).unwrap();
        let second = cache.load(SOURCE).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let other = cache.load("plugins { scala }").unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn settings_are_part_of_the_key() {
        let settings = default_settings();
        let mut cache = LoadCache::new(settings.clone());

        let lenient = cache.load(SOURCE).unwrap();
        assert_eq!(lenient.warnings.len(), 1);

        settings.update(&STRICT_BLOCKS, true);
        assert!(cache.load(SOURCE).is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn load_file_failures_are_independent() {
        let temp = tempfile::TempDir::new().unwrap();
        let bad = temp.path().join("bad.kts");
        let missing = temp.path().join("missing.kts");
        let good = temp.path().join("good");
        std::fs::write(&bad, "plugins {").unwrap();
        std::fs::create_dir(&good).unwrap();
        std::fs::write(good.join("build.gradle.kts"), "plugins { java }").unwrap();

        let mut cache = LoadCache::new(default_settings());
        let results: Vec<_> = [&bad, &missing, &good]
            .into_iter()
            .map(|path| cache.load_file(path))
            .collect();

        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, LoadFileError::Parse { .. }));
        assert_eq!(err.path(), bad);
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, LoadFileError::Io { .. }));
        assert_eq!(err.path(), missing);
        assert!(err.to_string().starts_with("failed to read"));

        let loaded = results[2].as_ref().unwrap();
        assert_eq!(loaded.config.plugins().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache = LoadCache::new(default_settings());
        assert!(cache.load("plugins {").is_err());
        assert!(cache.is_empty());
    }
}
