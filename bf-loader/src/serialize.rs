//! Writes a [`BuildConfig`] back out as a build file.
//!
//! Loading the output gives back an equal [`BuildConfig`]. Things the loader skipped, like unknown
//! blocks and comments, are gone.

use bf_syntax::{Entry, EntryKind, File};
use bf_types::{BuildConfig, PluginDeclaration, RepositoryReference, TaskOption, Value};
use compact_str::{CompactString, ToCompactString};
use smallvec::smallvec;

/// Renders `config` as canonical build file source.
pub fn to_source(config: &BuildConfig) -> String {
    to_syntax(config).to_string()
}

/// Converts `config` into the syntax tree of an equivalent build file.
pub fn to_syntax(config: &BuildConfig) -> File {
    let mut entries = Vec::new();

    let plugins: Vec<_> = config.plugins().iter().map(plugin).collect();
    push_block(&mut entries, "plugins", plugins);

    let repositories: Vec<_> = config.repositories().iter().map(repository).collect();
    push_block(&mut entries, "repositories", repositories);

    let dependencies: Vec<_> = config
        .dependencies()
        .iter()
        .map(|dep| {
            let coordinate = Value::String(dep.coordinate().to_compact_string());
            call(dep.scope().name(), coordinate)
        })
        .collect();
    push_block(&mut entries, "dependencies", dependencies);

    let tasks: Vec<_> = config
        .tasks()
        .values()
        .map(|task| block(task.name(), task.options().iter().map(option_entry).collect()))
        .collect();
    push_block(&mut entries, "tasks", tasks);

    File { entries }
}

fn push_block(entries: &mut Vec<Entry>, name: &str, children: Vec<Entry>) {
    if !children.is_empty() {
        entries.push(block(name, children));
    }
}

fn block(name: &str, entries: Vec<Entry>) -> Entry {
    Entry::synthesized(EntryKind::Block {
        name: name.into(),
        entries,
    })
}

fn call(name: &str, arg: Value) -> Entry {
    Entry::synthesized(EntryKind::Call {
        name: name.into(),
        args: smallvec![arg],
    })
}

fn plugin(plugin: &PluginDeclaration) -> Entry {
    match plugin {
        PluginDeclaration::Builtin(name) => Entry::synthesized(EntryKind::Identifier(name.clone())),
        PluginDeclaration::Id(id) => call("id", Value::String(id.clone())),
    }
}

fn repository(repository: &RepositoryReference) -> Entry {
    match repository {
        RepositoryReference::Maven { url } => call("maven", Value::String(url.clone())),
        other => Entry::synthesized(EntryKind::Call {
            name: CompactString::const_new(other.alias()),
            args: smallvec![],
        }),
    }
}

fn option_entry(option: &TaskOption) -> Entry {
    let kind = match option {
        TaskOption::Flag(name) => EntryKind::Call {
            name: name.clone(),
            args: smallvec![],
        },
        TaskOption::Call { name, args } => EntryKind::Call {
            name: name.clone(),
            args: args.clone(),
        },
        TaskOption::Block { name, options } => EntryKind::Block {
            name: name.clone(),
            entries: options.iter().map(option_entry).collect(),
        },
        TaskOption::Assign { name, value } => EntryKind::Assignment {
            name: name.clone(),
            value: value.clone(),
        },
    };
    Entry::synthesized(kind)
}
