//! Turns a syntax tree into a [`BuildConfig`].

use bf_syntax::{Entry, EntryKind, File, ParseError, ParseErrorKind};
use bf_types::{
    BuildConfig, BuildConfigBuilder, Coordinate, DependencyDeclaration, PluginDeclaration,
    RepositoryReference, Scope, TaskOption, TaskOverride, TestEngineConfig, TestLogEvent, Value,
};
use compact_str::{CompactString, format_compact};

use crate::{LoadOptions, Warning};

/// Name of the task whose options we read into a [`TestEngineConfig`].
const TEST_TASK: &str = "test";

/// Properties of the `test` task that are passed along without interpretation.
static TEST_PROPERTIES: &[&str] = &[
    "failFast",
    "forkEvery",
    "ignoreFailures",
    "maxHeapSize",
    "maxParallelForks",
    "minHeapSize",
];

/// Properties of `testLogging` that are passed along without interpretation.
static TEST_LOGGING_PROPERTIES: &[&str] = &[
    "displayGranularity",
    "exceptionFormat",
    "maxGranularity",
    "minGranularity",
    "showCauses",
    "showExceptions",
    "showStackTraces",
    "showStandardStreams",
];

pub(crate) fn interpret(
    file: &File,
    options: &LoadOptions,
) -> Result<(BuildConfig, Vec<Warning>), ParseError> {
    let mut interpreter = Interpreter {
        builder: BuildConfig::builder(),
        warnings: Vec::new(),
        strict_blocks: options.strict_blocks,
    };
    for entry in &file.entries {
        interpreter.top_level(entry)?;
    }
    Ok((interpreter.builder.build(), interpreter.warnings))
}

struct Interpreter {
    builder: BuildConfigBuilder,
    warnings: Vec<Warning>,
    strict_blocks: bool,
}

impl Interpreter {
    fn top_level(&mut self, entry: &Entry) -> Result<(), ParseError> {
        let EntryKind::Block { name, entries } = &entry.kind else {
            self.warn(Warning::UnknownEntry {
                name: entry.name().into(),
                position: entry.position,
            });
            return Ok(());
        };

        match name.as_str() {
            "plugins" => entries.iter().try_for_each(|e| self.plugin(e)),
            "repositories" => entries.iter().try_for_each(|e| self.repository(e)),
            "dependencies" => entries.iter().try_for_each(|e| self.dependency(e)),
            "tasks" => entries.iter().try_for_each(|e| self.task(e)),
            _ if self.strict_blocks => {
                let kind = ParseErrorKind::UnknownBlock { name: name.clone() };
                Err(ParseError::new(entry.position, kind))
            }
            _ => {
                self.warn(Warning::UnknownBlock {
                    name: name.clone(),
                    position: entry.position,
                });
                Ok(())
            }
        }
    }

    fn warn(&mut self, warning: Warning) {
        tracing::warn!(%warning, "skipping part of build file");
        self.warnings.push(warning);
    }

    fn plugin(&mut self, entry: &Entry) -> Result<(), ParseError> {
        let Some(args) = entry.kind.call_args() else {
            return Err(unknown_entry("plugins", entry));
        };

        let plugin = match entry.name() {
            "id" => PluginDeclaration::Id(single_string(entry, args, "a single plugin id")?),
            "kotlin" => {
                let module = single_string(entry, args, "a single Kotlin plugin name")?;
                PluginDeclaration::Id(format_compact!("org.jetbrains.kotlin.{module}"))
            }
            name if args.is_empty() => PluginDeclaration::Builtin(name.into()),
            _ => return Err(invalid_args(entry, "no arguments")),
        };
        self.builder.plugin(plugin);
        Ok(())
    }

    fn repository(&mut self, entry: &Entry) -> Result<(), ParseError> {
        let Some(args) = entry.kind.call_args() else {
            return Err(unknown_entry("repositories", entry));
        };

        let repository = match (entry.name(), args) {
            ("maven", _) => RepositoryReference::Maven {
                url: single_string(entry, args, "a single repository URL")?,
            },
            (alias, []) => RepositoryReference::from_alias(alias)
                .ok_or_else(|| unknown_entry("repositories", entry))?,
            (alias, _) if RepositoryReference::from_alias(alias).is_some() => {
                return Err(invalid_args(entry, "no arguments"));
            }
            _ => return Err(unknown_entry("repositories", entry)),
        };

        let alias = repository.alias();
        if !self.builder.repository(repository) {
            tracing::debug!(alias, "repository declared more than once");
        }
        Ok(())
    }

    fn dependency(&mut self, entry: &Entry) -> Result<(), ParseError> {
        let scope = Scope::from_name(entry.name())
            .ok_or_else(|| unknown_entry("dependencies", entry))?;
        let raw = match entry.kind.call_args() {
            Some([Value::String(raw)]) => raw,
            _ => return Err(invalid_args(entry, "a single \"group:artifact:version\" string")),
        };
        let coordinate = Coordinate::parse(raw).ok_or_else(|| {
            ParseError::new(
                entry.position,
                ParseErrorKind::InvalidCoordinate(raw.clone()),
            )
        })?;

        self.builder
            .dependency(DependencyDeclaration::new(scope, coordinate));
        Ok(())
    }

    fn task(&mut self, entry: &Entry) -> Result<(), ParseError> {
        let EntryKind::Block { name, entries } = &entry.kind else {
            return Err(unknown_entry("tasks", entry));
        };

        let mut task = TaskOverride::new(name.clone());
        for option in entries {
            task.push_option(task_option(option));
        }
        if name == TEST_TASK {
            test_options(entries, task.test_engine_mut())?;
        }

        tracing::debug!(task = %name, options = entries.len(), "task override");
        self.builder.task(task);
        Ok(())
    }
}

/// Converts an entry into the [`TaskOption`] handed to the build tool.
fn task_option(entry: &Entry) -> TaskOption {
    match &entry.kind {
        EntryKind::Identifier(name) => TaskOption::Flag(name.clone()),
        EntryKind::Call { name, args } if args.is_empty() => TaskOption::Flag(name.clone()),
        EntryKind::Call { name, args } => TaskOption::Call {
            name: name.clone(),
            args: args.clone(),
        },
        EntryKind::Block { name, entries } => TaskOption::Block {
            name: name.clone(),
            options: entries.iter().map(task_option).collect(),
        },
        EntryKind::Assignment { name, value } => TaskOption::Assign {
            name: name.clone(),
            value: value.clone(),
        },
    }
}

fn test_options(entries: &[Entry], engine: &mut TestEngineConfig) -> Result<(), ParseError> {
    for entry in entries {
        match (entry.name(), &entry.kind) {
            ("useJUnitPlatform", EntryKind::Block { entries, .. }) => {
                engine.junit_platform = true;
                junit_platform_options(entries, engine)?;
            }
            ("useJUnitPlatform", kind) => match kind.call_args() {
                Some([]) => engine.junit_platform = true,
                _ => return Err(invalid_args(entry, "no arguments or a block")),
            },
            ("testLogging", _) => test_logging(entry, engine)?,
            (name, EntryKind::Assignment { .. }) if TEST_PROPERTIES.contains(&name) => (),
            _ => return Err(unknown_entry(TEST_TASK, entry)),
        }
    }
    Ok(())
}

fn junit_platform_options(
    entries: &[Entry],
    engine: &mut TestEngineConfig,
) -> Result<(), ParseError> {
    for entry in entries {
        let target = match entry.name() {
            "includeEngines" => &mut engine.include_engines,
            "excludeEngines" => &mut engine.exclude_engines,
            "includeTags" => &mut engine.include_tags,
            "excludeTags" => &mut engine.exclude_tags,
            // Not where the build tool documents it, but it is accepted here too.
            "testLogging" => {
                test_logging(entry, engine)?;
                continue;
            }
            _ => return Err(unknown_entry("test.useJUnitPlatform", entry)),
        };
        target.extend(strings(entry)?);
    }
    Ok(())
}

fn test_logging(entry: &Entry, engine: &mut TestEngineConfig) -> Result<(), ParseError> {
    let EntryKind::Block { entries, .. } = &entry.kind else {
        return Err(invalid_args(entry, "a block"));
    };

    for option in entries {
        match (option.name(), &option.kind) {
            ("events", EntryKind::Call { args, .. }) if !args.is_empty() => {
                for arg in args {
                    let (Value::String(name) | Value::Identifier(name)) = arg else {
                        return Err(invalid_args(option, "test log event names"));
                    };
                    let event = TestLogEvent::from_name(name).ok_or_else(|| {
                        let kind = ParseErrorKind::UnknownLogEvent(name.clone());
                        ParseError::new(option.position, kind)
                    })?;
                    engine.events.insert(event);
                }
            }
            ("events", _) => return Err(invalid_args(option, "one or more test log events")),
            (name, EntryKind::Assignment { .. }) if TEST_LOGGING_PROPERTIES.contains(&name) => (),
            _ => return Err(unknown_entry("testLogging", option)),
        }
    }
    Ok(())
}

/// Arguments of a call that takes one or more strings.
fn strings(entry: &Entry) -> Result<Vec<CompactString>, ParseError> {
    let args = match &entry.kind {
        EntryKind::Call { args, .. } if !args.is_empty() => args,
        _ => return Err(invalid_args(entry, "one or more strings")),
    };
    args.iter()
        .map(|arg| match arg {
            Value::String(val) => Ok(val.clone()),
            _ => Err(invalid_args(entry, "one or more strings")),
        })
        .collect()
}

fn single_string(
    entry: &Entry,
    args: &[Value],
    expected: &'static str,
) -> Result<CompactString, ParseError> {
    match args {
        [Value::String(val)] if !val.is_empty() => Ok(val.clone()),
        _ => Err(invalid_args(entry, expected)),
    }
}

fn unknown_entry(block: &str, entry: &Entry) -> ParseError {
    let kind = ParseErrorKind::UnknownEntry {
        block: block.into(),
        entry: entry.name().into(),
    };
    ParseError::new(entry.position, kind)
}

fn invalid_args(entry: &Entry, expected: &'static str) -> ParseError {
    let kind = ParseErrorKind::InvalidArguments {
        entry: entry.name().into(),
        expected,
    };
    ParseError::new(entry.position, kind)
}
