//! Writes a [`File`] back out in canonical form.
//!
//! Four space indentation, one entry per line, a blank line between top-level blocks. Parsing
//! the output yields the same tree, modulo positions.

use std::fmt;

use bf_types::Value;

use crate::ast::{Entry, EntryKind, File};
use crate::lexer::is_plain_ident;

const INDENT: &str = "    ";

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prev: Option<&Entry> = None;
        for entry in &self.entries {
            let is_block = |e: &Entry| matches!(e.kind, EntryKind::Block { .. });
            if prev.is_some_and(|prev| is_block(prev) || is_block(entry)) {
                writeln!(f)?;
            }
            write_entry(f, entry, 0)?;
            prev = Some(entry);
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entry(f, self, 0)
    }
}

fn write_entry(f: &mut fmt::Formatter<'_>, entry: &Entry, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    match &entry.kind {
        EntryKind::Identifier(name) => writeln!(f, "{indent}{}", Ident(name)),
        EntryKind::Call { name, args } => {
            write!(f, "{indent}{}(", Ident(name))?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", Literal(arg))?;
            }
            writeln!(f, ")")
        }
        EntryKind::Block { name, entries } if entries.is_empty() => {
            writeln!(f, "{indent}{} {{}}", Ident(name))
        }
        EntryKind::Block { name, entries } => {
            writeln!(f, "{indent}{} {{", Ident(name))?;
            for child in entries {
                write_entry(f, child, depth + 1)?;
            }
            writeln!(f, "{indent}}}")
        }
        EntryKind::Assignment { name, value } => {
            writeln!(f, "{indent}{} = {}", Ident(name), Literal(value))
        }
    }
}

/// An identifier, backtick-quoted if it isn't a plain name.
struct Ident<'a>(&'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_plain_ident(self.0) {
            f.write_str(self.0)
        } else {
            write!(f, "`{}`", self.0)
        }
    }
}

/// A [`Value`] written the way the lexer reads it.
struct Literal<'a>(&'a Value);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(val) => {
                f.write_str("\"")?;
                for c in val.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        '\u{8}' => f.write_str("\\b")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Value::Identifier(ident) => write!(f, "{}", Ident(ident)),
            Value::Integer(val) => write!(f, "{val}"),
            Value::Boolean(val) => write!(f, "{val}"),
        }
    }
}
