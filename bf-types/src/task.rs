//! Overrides of built-in build tasks.

use std::collections::BTreeSet;
use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

/// Name of the task that runs the tests.
pub(crate) const TEST_TASK: &str = "test";

/// A literal value passed to a call or assigned to a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    String(CompactString),
    /// A bare name, e.g. `FULL` in `exceptionFormat = FULL`.
    Identifier(CompactString),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Identifier(ident) => f.write_str(ident),
            Value::Integer(val) => write!(f, "{val}"),
            Value::Boolean(val) => write!(f, "{val}"),
        }
    }
}

/// A single option inside a task override, mirroring how it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOption {
    /// `name` or `name()`, the two are equivalent.
    Flag(CompactString),
    /// `name(arg, ...)`
    Call {
        name: CompactString,
        args: SmallVec<[Value; 2]>,
    },
    /// `name { ... }`
    Block {
        name: CompactString,
        options: Vec<TaskOption>,
    },
    /// `name = value`
    Assign { name: CompactString, value: Value },
}

impl TaskOption {
    pub fn name(&self) -> &str {
        match self {
            TaskOption::Flag(name)
            | TaskOption::Call { name, .. }
            | TaskOption::Block { name, .. }
            | TaskOption::Assign { name, .. } => name,
        }
    }
}

/// A named adjustment to one of the build tool's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOverride {
    name: CompactString,
    /// Options exactly as declared, handed as-is to the build tool.
    options: Vec<TaskOption>,
    /// Typed view of the options of the `test` task.
    test_engine: Option<TestEngineConfig>,
}

impl TaskOverride {
    pub fn new(name: impl Into<CompactString>) -> Self {
        TaskOverride {
            name: name.into(),
            options: Vec::new(),
            test_engine: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[TaskOption] {
        &self.options[..]
    }

    pub fn push_option(&mut self, option: TaskOption) {
        self.options.push(option);
    }

    pub fn test_engine(&self) -> Option<&TestEngineConfig> {
        self.test_engine.as_ref()
    }

    /// Returns the [`TestEngineConfig`] of this task, creating an empty one if needed.
    pub fn test_engine_mut(&mut self) -> &mut TestEngineConfig {
        self.test_engine.get_or_insert_with(TestEngineConfig::default)
    }

    pub(crate) fn merge(&mut self, other: TaskOverride) {
        self.options.extend(other.options);
        if let Some(engine) = other.test_engine {
            self.test_engine_mut().merge(engine);
        }
    }
}

/// Which test engines run and which of their events get logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestEngineConfig {
    /// Whether tests run on the JUnit Platform.
    pub junit_platform: bool,
    pub include_engines: BTreeSet<CompactString>,
    pub exclude_engines: BTreeSet<CompactString>,
    pub include_tags: BTreeSet<CompactString>,
    pub exclude_tags: BTreeSet<CompactString>,
    /// Test events reported while the tests run.
    pub events: BTreeSet<TestLogEvent>,
}

impl TestEngineConfig {
    fn merge(&mut self, other: TestEngineConfig) {
        self.junit_platform |= other.junit_platform;
        self.include_engines.extend(other.include_engines);
        self.exclude_engines.extend(other.exclude_engines);
        self.include_tags.extend(other.include_tags);
        self.exclude_tags.extend(other.exclude_tags);
        self.events.extend(other.events);
    }
}

/// Kinds of test events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestLogEvent {
    Started,
    Passed,
    Skipped,
    Failed,
    StandardOut,
    StandardError,
}

impl TestLogEvent {
    pub const ALL: &'static [TestLogEvent] = &[
        TestLogEvent::Started,
        TestLogEvent::Passed,
        TestLogEvent::Skipped,
        TestLogEvent::Failed,
        TestLogEvent::StandardOut,
        TestLogEvent::StandardError,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            TestLogEvent::Started => "started",
            TestLogEvent::Passed => "passed",
            TestLogEvent::Skipped => "skipped",
            TestLogEvent::Failed => "failed",
            TestLogEvent::StandardOut => "standard_out",
            TestLogEvent::StandardError => "standard_error",
        }
    }

    /// Case-insensitive lookup, so both `"passed"` and `PASSED` resolve.
    pub fn from_name(name: &str) -> Option<TestLogEvent> {
        TestLogEvent::ALL
            .iter()
            .copied()
            .find(|event| event.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for TestLogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_event_lookup() {
        assert_eq!(TestLogEvent::from_name("passed"), Some(TestLogEvent::Passed));
        assert_eq!(TestLogEvent::from_name("SKIPPED"), Some(TestLogEvent::Skipped));
        assert_eq!(
            TestLogEvent::from_name("STANDARD_ERROR"),
            Some(TestLogEvent::StandardError)
        );
        assert_eq!(TestLogEvent::from_name("exploded"), None);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::String("a \"b\"".into()).to_string(), r#""a \"b\"""#);
        assert_eq!(Value::Identifier("FULL".into()).to_string(), "FULL");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
        assert_eq!(Value::Boolean(true).to_string(), "true");
    }
}
