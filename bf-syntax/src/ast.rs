//! The syntax tree of a build file.
//!
//! Every construct is an [`Entry`], blocks simply contain more entries. The tree keeps the form
//! an entry was written in, e.g. `jcenter` and `jcenter()` are different [`EntryKind`]s here even
//! though they mean the same thing to the loader.

use bf_types::Value;
use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::Position;

/// A whole build file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    /// Where the entry starts in the source, [`Position::default`] for synthesized entries.
    pub position: Position,
}

impl Entry {
    /// An entry that doesn't originate from any source text.
    pub fn synthesized(kind: EntryKind) -> Self {
        Entry {
            kind,
            position: Position::default(),
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// `java`
    Identifier(CompactString),
    /// `implementation("org.scala-lang:scala-library:2.12.8")`
    Call {
        name: CompactString,
        args: SmallVec<[Value; 2]>,
    },
    /// `repositories { ... }`
    Block {
        name: CompactString,
        entries: Vec<Entry>,
    },
    /// `maxParallelForks = 4`
    Assignment { name: CompactString, value: Value },
}

impl EntryKind {
    pub fn name(&self) -> &str {
        match self {
            EntryKind::Identifier(name)
            | EntryKind::Call { name, .. }
            | EntryKind::Block { name, .. }
            | EntryKind::Assignment { name, .. } => name,
        }
    }

    /// Arguments of a call, `Some(&[])` for a bare identifier, `None` for everything else.
    ///
    /// Bare identifiers and calls without arguments are interchangeable in a build file.
    pub fn call_args(&self) -> Option<&[Value]> {
        match self {
            EntryKind::Identifier(_) => Some(&[]),
            EntryKind::Call { args, .. } => Some(&args[..]),
            EntryKind::Block { .. } | EntryKind::Assignment { .. } => None,
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            EntryKind::Identifier(_) => "identifier",
            EntryKind::Call { .. } => "call",
            EntryKind::Block { .. } => "block",
            EntryKind::Assignment { .. } => "assignment",
        }
    }
}
