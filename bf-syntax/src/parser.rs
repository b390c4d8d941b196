//! Recursive descent parser producing a [`File`].

use bf_types::Value;
use compact_str::ToCompactString;
use smallvec::SmallVec;

use crate::ast::{Entry, EntryKind, File};
use crate::error::{ParseError, ParseErrorKind, Position};
use crate::lexer::{Token, TokenKind, tokenize};

/// How deeply blocks may nest when no other limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Upper bound for any configured nesting limit. The parser recurses once per block, deeper
/// limits would let a hostile file overflow the stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Parses a build file.
///
/// ```
/// let file = bf_syntax::Parser::new("plugins { java; scala }")
///     .with_max_depth(8)
///     .parse()
///     .unwrap();
/// assert_eq!(file.entries.len(), 1);
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    source: &'a str,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Blocks nested deeper than `max_depth` fail to parse. Capped at [`MAX_DEPTH_LIMIT`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    pub fn parse(self) -> Result<File, ParseError> {
        let tokens = tokenize(self.source)?;
        let mut state = ParseState {
            tokens,
            next: 0,
            depth: 0,
            max_depth: self.max_depth,
        };
        let entries = state.entries(None)?;
        Ok(File { entries })
    }
}

struct ParseState {
    tokens: Vec<Token>,
    next: usize,
    depth: usize,
    max_depth: usize,
}

impl ParseState {
    fn peek(&self) -> &Token {
        // `tokenize` always ends with an `Eof`, which we never advance past.
        &self.tokens[self.next]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.next].clone();
        if token.kind != TokenKind::Eof {
            self.next += 1;
        }
        token
    }

    /// Consumes the next token if it is `kind`.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let matches = self.peek().kind == *kind;
        if matches {
            self.advance();
        }
        matches
    }

    fn unexpected(position: Position, found: &TokenKind, expected: &'static str) -> ParseError {
        let kind = ParseErrorKind::UnexpectedToken {
            expected,
            found: found.to_compact_string(),
        };
        ParseError::new(position, kind)
    }

    fn skip_newlines(&mut self) {
        while self.peek().kind == TokenKind::Newline {
            self.advance();
        }
    }

    /// Parses entries until the end of the file, or the `}` closing `block`.
    fn entries(&mut self, block: Option<(&str, Position)>) -> Result<Vec<Entry>, ParseError> {
        let mut entries = Vec::new();
        loop {
            while matches!(self.peek().kind, TokenKind::Newline | TokenKind::Semi) {
                self.advance();
            }

            let token = self.peek();
            match (&token.kind, block) {
                (TokenKind::Eof, None) => return Ok(entries),
                (TokenKind::Eof, Some((name, position))) => {
                    let kind = ParseErrorKind::UnclosedBlock { name: name.into() };
                    return Err(ParseError::new(position, kind));
                }
                (TokenKind::RBrace, Some(_)) => {
                    self.advance();
                    return Ok(entries);
                }
                (TokenKind::RBrace, None) => {
                    return Err(ParseError::new(
                        token.position,
                        ParseErrorKind::UnmatchedClose,
                    ));
                }
                (TokenKind::Ident(_), _) => {
                    entries.push(self.entry()?);

                    // Entries end at a separator, or where the enclosing block or file ends.
                    let token = self.peek();
                    match token.kind {
                        TokenKind::Newline | TokenKind::Semi | TokenKind::Eof => (),
                        TokenKind::RBrace if block.is_some() => (),
                        ref other => {
                            let err = Self::unexpected(token.position, other, "end of line or ';'");
                            return Err(err);
                        }
                    }
                }
                (other, _) => {
                    return Err(Self::unexpected(token.position, other, "an identifier"));
                }
            }
        }
    }

    fn entry(&mut self) -> Result<Entry, ParseError> {
        let Token { kind, position } = self.advance();
        let TokenKind::Ident(name) = kind else {
            unreachable!("entries start with an identifier");
        };

        let kind = if self.eat(&TokenKind::LParen) {
            let args = self.arguments()?;
            EntryKind::Call { name, args }
        } else if self.eat(&TokenKind::LBrace) {
            if self.depth >= self.max_depth {
                let kind = ParseErrorKind::NestingTooDeep {
                    limit: self.max_depth,
                };
                return Err(ParseError::new(position, kind));
            }
            self.depth += 1;
            let entries = self.entries(Some((name.as_str(), position)))?;
            self.depth -= 1;
            EntryKind::Block { name, entries }
        } else if self.eat(&TokenKind::Eq) {
            let value = self.value()?;
            EntryKind::Assignment { name, value }
        } else {
            EntryKind::Identifier(name)
        };

        Ok(Entry { kind, position })
    }

    /// Parses call arguments, the opening `(` has already been consumed.
    fn arguments(&mut self) -> Result<SmallVec<[Value; 2]>, ParseError> {
        let mut args = SmallVec::new();

        // Argument lists may span multiple lines.
        self.skip_newlines();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            self.skip_newlines();
            args.push(self.value()?);
            self.skip_newlines();

            let Token { kind, position } = self.advance();
            match kind {
                TokenKind::Comma => continue,
                TokenKind::RParen => return Ok(args),
                other => return Err(Self::unexpected(position, &other, "',' or ')'")),
            }
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        let Token { kind, position } = self.advance();
        let value = match kind {
            TokenKind::Str(val) => Value::String(val),
            TokenKind::Int(val) => Value::Integer(val),
            TokenKind::Ident(ident) => match ident.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => Value::Identifier(ident),
            },
            other => return Err(Self::unexpected(position, &other, "a value")),
        };
        Ok(value)
    }
}
