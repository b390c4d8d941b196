//! Runtime settings for `bf` itself.
//!
//! Settings tune how build files get loaded, they are _not_ part of a build file. Each setting is
//! declared once as a `static` [`Setting`], registered with a [`SettingSetBuilder`], and then read
//! from the resulting [`SettingSet`]:
//!
//! ```
//! use bf_cfg::{Setting, SettingSet};
//!
//! static VERBOSE: Setting<bool> = Setting::new("verbose", "Print more things.", false);
//!
//! let mut builder = SettingSet::builder();
//! builder.register(&VERBOSE);
//! let settings = builder.build();
//!
//! settings.try_update("verbose", "true").unwrap();
//! assert!(VERBOSE.read(&settings));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use bf_ore::assert_none;
use compact_str::CompactString;

/// A single named setting with a default value.
pub struct Setting<V: SettingType> {
    name: &'static str,
    desc: &'static str,
    default: V,
}

impl<V: SettingType> Setting<V> {
    /// Declare a new [`Setting`].
    pub const fn new(name: &'static str, desc: &'static str, default: V) -> Self {
        Setting {
            name,
            desc,
            default,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read the current value of this [`Setting`] from the provided [`SettingSet`].
    ///
    /// # Panics
    ///
    /// * If this setting was never registered with the set.
    pub fn read(&self, set: &SettingSet) -> V::Output {
        let Some(entry) = set.entries.get(self.name) else {
            panic!("tried to read unregistered setting {}", self.name);
        };
        V::read(&entry.value)
    }
}

/// A thread-safe shareable set of [`Setting`]s.
///
/// Clones share their values, an update through one clone is visible through all of them.
#[derive(Clone, Debug)]
pub struct SettingSet {
    entries: Arc<BTreeMap<CompactString, SettingEntry>>,
}

impl SettingSet {
    /// Returns a new [`SettingSetBuilder`].
    pub fn builder() -> SettingSetBuilder {
        SettingSetBuilder::default()
    }

    /// Set the [`Setting`] to `value`.
    ///
    /// # Panics
    ///
    /// * If the setting was never registered with the set.
    pub fn update<V: SettingType>(&self, setting: &'static Setting<V>, value: V) {
        let entry = self
            .entries
            .get(setting.name)
            .expect("tried to update unregistered setting");
        value.store(&entry.value);
    }

    /// Set the setting named `name` by parsing `value`.
    ///
    /// # Errors
    ///
    /// * If no setting named `name` exists in this set.
    /// * If `value` can't be parsed as the type of the setting.
    pub fn try_update(&self, name: &str, value: &str) -> Result<(), anyhow::Error> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("no setting named '{name}'"))?;
        entry
            .value
            .parse_and_store(value)
            .map_err(|err| anyhow::anyhow!("invalid value '{value}' for '{name}': {err}"))
    }

    /// Parses an `name=value` pair and applies it with [`SettingSet::try_update`].
    pub fn try_update_pair(&self, pair: &str) -> Result<(), anyhow::Error> {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected 'name=value', found '{pair}'"))?;
        self.try_update(name.trim(), value.trim())
    }
}

impl fmt::Display for SettingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, entry) in self.entries.iter() {
            writeln!(f, "{name} = {}\n\t└─ {}", entry.value, entry.desc)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct SettingEntry {
    value: SharedValue,
    desc: &'static str,
}

/// A builder for a [`SettingSet`].
#[derive(Default, Debug)]
pub struct SettingSetBuilder {
    entries: BTreeMap<CompactString, SettingEntry>,
}

impl SettingSetBuilder {
    /// Register a [`Setting`] with its default value.
    ///
    /// # Panics
    ///
    /// * If a setting with the same name was already registered.
    pub fn register<V: SettingType>(&mut self, setting: &'static Setting<V>) -> &mut Self {
        let entry = SettingEntry {
            value: setting.default.share(),
            desc: setting.desc,
        };
        let prev = self
            .entries
            .insert(CompactString::const_new(setting.name), entry);
        assert_none!(
            prev.map(|_| setting.name),
            "setting '{}' registered more than once",
            setting.name
        );
        self
    }

    /// Consumes this [`SettingSetBuilder`] constructing a [`SettingSet`].
    pub fn build(self) -> SettingSet {
        SettingSet {
            entries: Arc::new(self.entries),
        }
    }
}

/// Types that a [`Setting`] can hold.
pub trait SettingType {
    /// What reading the setting returns.
    type Output;

    /// Create the shared storage for this value.
    fn share(&self) -> SharedValue;
    /// Overwrite the shared storage with this value.
    fn store(&self, shared: &SharedValue);
    fn read(shared: &SharedValue) -> Self::Output;
}

impl SettingType for bool {
    type Output = bool;

    fn share(&self) -> SharedValue {
        SharedValue::Bool(Arc::new(AtomicBool::new(*self)))
    }

    fn store(&self, shared: &SharedValue) {
        let SharedValue::Bool(val) = shared else {
            panic!("programming error, found {shared:?} for bool")
        };
        val.store(*self, Ordering::SeqCst);
    }

    fn read(shared: &SharedValue) -> bool {
        let SharedValue::Bool(val) = shared else {
            panic!("programming error, found {shared:?} for bool")
        };
        val.load(Ordering::SeqCst)
    }
}

impl SettingType for u64 {
    type Output = u64;

    fn share(&self) -> SharedValue {
        SharedValue::U64(Arc::new(AtomicU64::new(*self)))
    }

    fn store(&self, shared: &SharedValue) {
        let SharedValue::U64(val) = shared else {
            panic!("programming error, found {shared:?} for u64")
        };
        val.store(*self, Ordering::SeqCst);
    }

    fn read(shared: &SharedValue) -> u64 {
        let SharedValue::U64(val) = shared else {
            panic!("programming error, found {shared:?} for u64")
        };
        val.load(Ordering::SeqCst)
    }
}

impl SettingType for &str {
    type Output = CompactString;

    fn share(&self) -> SharedValue {
        SharedValue::Text(Arc::new(RwLock::new(CompactString::new(self))))
    }

    fn store(&self, shared: &SharedValue) {
        let SharedValue::Text(val) = shared else {
            panic!("programming error, found {shared:?} for string")
        };
        let mut write_lock = val.write().expect("SharedValue::Text lock poisoned");
        *write_lock = CompactString::new(self);
    }

    fn read(shared: &SharedValue) -> CompactString {
        let SharedValue::Text(val) = shared else {
            panic!("programming error, found {shared:?} for string")
        };
        val.read().expect("SharedValue::Text lock poisoned").clone()
    }
}

/// Storage for a setting value that is shared between clones of a [`SettingSet`].
///
/// An enum rather than `Box<dyn Any>`, we only ever need a handful of types.
#[derive(Clone, Debug)]
pub enum SharedValue {
    Bool(Arc<AtomicBool>),
    U64(Arc<AtomicU64>),
    Text(Arc<RwLock<CompactString>>),
}

impl SharedValue {
    fn parse_and_store(&self, raw: &str) -> Result<(), anyhow::Error> {
        match self {
            SharedValue::Bool(shared) => shared.store(raw.parse()?, Ordering::SeqCst),
            SharedValue::U64(shared) => shared.store(raw.parse()?, Ordering::SeqCst),
            SharedValue::Text(shared) => {
                let mut write_lock = shared.write().expect("SharedValue::Text lock poisoned");
                *write_lock = CompactString::new(raw);
            }
        }
        Ok(())
    }
}

impl fmt::Display for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharedValue::Bool(val) => write!(f, "{}", val.load(Ordering::SeqCst)),
            SharedValue::U64(val) => write!(f, "{}", val.load(Ordering::SeqCst)),
            SharedValue::Text(val) => {
                let read_lock = val.read().expect("SharedValue::Text lock poisoned");
                write!(f, "'{}'", *read_lock)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_FLAG: Setting<bool> = Setting::new("test_flag", "A test flag.", true);
    static TEST_LIMIT: Setting<u64> = Setting::new("test_limit", "A test limit.", 16);
    static TEST_NAME: Setting<&'static str> = Setting::new("test_name", "A test name.", "foo.kts");

    fn test_set() -> SettingSet {
        let mut builder = SettingSet::builder();
        builder
            .register(&TEST_FLAG)
            .register(&TEST_LIMIT)
            .register(&TEST_NAME);
        builder.build()
    }

    #[test]
    fn smoketest_read() {
        let settings = test_set();
        assert!(TEST_FLAG.read(&settings));
        assert_eq!(TEST_LIMIT.read(&settings), 16);
        assert_eq!(TEST_NAME.read(&settings), "foo.kts");
    }

    #[test]
    fn updates_are_shared() {
        let settings = test_set();
        let clone = settings.clone();

        settings.update(&TEST_FLAG, false);
        settings.update(&TEST_NAME, "bar.kts");
        assert!(!TEST_FLAG.read(&clone));
        assert_eq!(TEST_NAME.read(&clone), "bar.kts");
    }

    #[test]
    fn smoketest_parse() {
        let settings = test_set();
        settings.try_update("test_limit", "128").unwrap();
        settings.try_update_pair("test_flag = false").unwrap();
        settings.try_update_pair("test_name=build.gradle.kts").unwrap();

        assert_eq!(TEST_LIMIT.read(&settings), 128);
        assert!(!TEST_FLAG.read(&settings));
        assert_eq!(TEST_NAME.read(&settings), "build.gradle.kts");
    }

    #[test]
    fn parse_errors() {
        let settings = test_set();
        assert!(settings.try_update("nope", "1").is_err());
        assert!(settings.try_update("test_limit", "-1").is_err());
        assert!(settings.try_update("test_flag", "maybe").is_err());
        assert!(settings.try_update_pair("test_flag").is_err());
        // Failed updates leave the old value in place.
        assert_eq!(TEST_LIMIT.read(&settings), 16);
    }

    #[test]
    #[should_panic(expected = "registered more than once")]
    fn double_register_panics() {
        let mut builder = SettingSet::builder();
        builder.register(&TEST_FLAG).register(&TEST_FLAG);
    }

    #[test]
    fn display_lists_everything() {
        let rendered = test_set().to_string();
        assert!(rendered.contains("test_flag = true"));
        assert!(rendered.contains("test_limit = 16"));
        assert!(rendered.contains("test_name = 'foo.kts'"));
    }
}
