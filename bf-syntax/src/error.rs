use std::fmt;

use compact_str::CompactString;

/// A location within a build file, both components are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Failure to load a build file. Always fatal, nothing of the file is kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{position}: {kind}")]
pub struct ParseError {
    pub position: Position,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: Position, kind: ParseErrorKind) -> Self {
        ParseError { position, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated quoted identifier")]
    UnterminatedIdentifier,
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid integer literal '{0}'")]
    InvalidInteger(CompactString),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: CompactString,
    },
    #[error("block '{name}' is never closed")]
    UnclosedBlock { name: CompactString },
    #[error("'}}' without a matching '{{'")]
    UnmatchedClose,
    #[error("blocks nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
    #[error("unknown block '{name}'")]
    UnknownBlock { name: CompactString },
    #[error("unknown entry '{entry}' in '{block}'")]
    UnknownEntry {
        block: CompactString,
        entry: CompactString,
    },
    #[error("'{entry}' expects {expected}")]
    InvalidArguments {
        entry: CompactString,
        expected: &'static str,
    },
    #[error("invalid dependency coordinate '{0}', expected 'group:artifact:version'")]
    InvalidCoordinate(CompactString),
    #[error("unknown test log event '{0}'")]
    UnknownLogEvent(CompactString),
}
