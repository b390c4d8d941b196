//! Types describing a loaded build file.
//!
//! The goal of this crate is to be very lightweight, so take care with adding dependencies.

use std::collections::BTreeMap;
use std::fmt;

use compact_str::CompactString;

mod dependency;
mod repository;
mod task;

pub use dependency::{Coordinate, DependencyDeclaration, Scope};
pub use repository::{RepositoryReference, RepositorySet};
pub use task::{TaskOption, TaskOverride, TestEngineConfig, TestLogEvent, Value};

/// Everything declared by a single build file.
///
/// Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    plugins: Vec<PluginDeclaration>,
    repositories: RepositorySet,
    dependencies: Vec<DependencyDeclaration>,
    tasks: BTreeMap<CompactString, TaskOverride>,
}

impl BuildConfig {
    /// Returns a new [`BuildConfigBuilder`].
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }

    /// Plugins in declaration order.
    pub fn plugins(&self) -> &[PluginDeclaration] {
        &self.plugins[..]
    }

    pub fn repositories(&self) -> &RepositorySet {
        &self.repositories
    }

    /// Dependencies in declaration order, duplicates included.
    pub fn dependencies(&self) -> &[DependencyDeclaration] {
        &self.dependencies[..]
    }

    /// Dependencies declared with the provided [`Scope`].
    pub fn dependencies_in(&self, scope: Scope) -> impl Iterator<Item = &DependencyDeclaration> {
        self.dependencies.iter().filter(move |dep| dep.scope() == scope)
    }

    /// Task overrides, keyed by task name.
    pub fn tasks(&self) -> &BTreeMap<CompactString, TaskOverride> {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&TaskOverride> {
        self.tasks.get(name)
    }

    /// Test engine selection of the `test` task, if the file overrides it.
    pub fn test_engine(&self) -> Option<&TestEngineConfig> {
        self.task(task::TEST_TASK).and_then(|task| task.test_engine())
    }
}

/// A builder for a [`BuildConfig`].
#[derive(Debug, Default)]
pub struct BuildConfigBuilder {
    inner: BuildConfig,
}

impl BuildConfigBuilder {
    pub fn plugin(&mut self, plugin: PluginDeclaration) -> &mut Self {
        self.inner.plugins.push(plugin);
        self
    }

    /// Adds a repository, returns `false` if it was already declared.
    pub fn repository(&mut self, repository: RepositoryReference) -> bool {
        self.inner.repositories.insert(repository)
    }

    pub fn dependency(&mut self, dependency: DependencyDeclaration) -> &mut Self {
        self.inner.dependencies.push(dependency);
        self
    }

    /// Adds a task override. Declaring the same task twice merges the two.
    pub fn task(&mut self, task: TaskOverride) -> &mut Self {
        match self.inner.tasks.get_mut(task.name()) {
            Some(existing) => existing.merge(task),
            None => {
                self.inner.tasks.insert(task.name().into(), task);
            }
        }
        self
    }

    /// Consumes this [`BuildConfigBuilder`] constructing a [`BuildConfig`].
    pub fn build(self) -> BuildConfig {
        self.inner
    }
}

/// A plugin applied by the build file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluginDeclaration {
    /// A plugin shipped with the build tool, written as a bare name, e.g. `java`.
    Builtin(CompactString),
    /// A plugin referenced by its fully qualified id, e.g. `id("org.example.greeting")`.
    Id(CompactString),
}

impl PluginDeclaration {
    /// Identifier of this plugin as the build tool knows it.
    pub fn id(&self) -> &str {
        match self {
            PluginDeclaration::Builtin(name) => name,
            PluginDeclaration::Id(id) => id,
        }
    }
}

impl fmt::Display for PluginDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Hash of the contents of a build file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash(u128);

impl ContentHash {
    pub const fn new(val: u128) -> Self {
        ContentHash(val)
    }

    pub const fn as_u128(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}
