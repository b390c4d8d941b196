//! Syntax of build files.
//!
//! A build file is a list of entries, where an entry is one of
//!
//! ```text
//! Entry       := Identifier | Call | Block | Assignment
//! Block       := Identifier '{' Entry* '}'
//! Call        := Identifier '(' [ Value (',' Value)* ] ')'
//! Assignment  := Identifier '=' Value
//! Value       := String | Identifier | Integer | Boolean
//! ```
//!
//! Entries are separated by newlines or `;`, and `//` and `/* */` comments are ignored. This
//! crate only knows about the shape of a file, what the entries mean is up to `bf-loader`.

mod ast;
mod error;
mod lexer;
mod parser;
mod print;

pub use ast::{Entry, EntryKind, File};
pub use error::{ParseError, ParseErrorKind, Position};
pub use parser::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT, Parser};

/// Parses `source` with the default nesting limit.
pub fn parse(source: &str) -> Result<File, ParseError> {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests;
