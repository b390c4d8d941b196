//! Every [`Setting`] that influences loading, registered in one place.

use bf_cfg::{Setting, SettingSet, SettingSetBuilder};

pub static BUILD_FILENAME: Setting<&'static str> = Setting::new(
    "build_filename",
    "Name of the build file to look for when given a directory.",
    "build.gradle.kts",
);

pub static MAX_NESTING_DEPTH: Setting<u64> = Setting::new(
    "max_nesting_depth",
    "How deeply blocks may nest before the file is rejected, at most 256.",
    bf_syntax::DEFAULT_MAX_DEPTH as u64,
);

pub static STRICT_BLOCKS: Setting<bool> = Setting::new(
    "strict_blocks",
    "Reject unknown top-level blocks instead of ignoring them.",
    false,
);

pub fn register_settings(builder: &mut SettingSetBuilder) {
    builder
        .register(&BUILD_FILENAME)
        .register(&MAX_NESTING_DEPTH)
        .register(&STRICT_BLOCKS);
}

/// A [`SettingSet`] with every loader setting at its default.
pub fn default_settings() -> SettingSet {
    let mut builder = SettingSet::builder();
    register_settings(&mut builder);
    builder.build()
}
