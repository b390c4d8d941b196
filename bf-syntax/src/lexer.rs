//! Splits a build file into [`Token`]s.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use compact_str::CompactString;

use crate::error::{ParseError, ParseErrorKind, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(CompactString),
    Str(CompactString),
    Int(i64),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Eq,
    Semi,
    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Str(val) => write!(f, "string {val:?}"),
            TokenKind::Int(val) => write!(f, "integer {val}"),
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Eq => f.write_str("'='"),
            TokenKind::Semi => f.write_str("';'"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// Tokenize all of `source`. The returned tokens always end with [`TokenKind::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        chars: source.chars().peekable(),
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_trivia()?;

        let position = self.position();
        let Some(c) = self.bump() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position,
            });
        };

        let kind = match c {
            '\n' => TokenKind::Newline,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '=' => TokenKind::Eq,
            ';' => TokenKind::Semi,
            '"' => TokenKind::Str(self.string(position)?),
            '`' => TokenKind::Ident(self.quoted_ident(position)?),
            '-' if self.chars.peek().is_some_and(|c| c.is_ascii_digit()) => {
                TokenKind::Int(self.integer('-', position)?)
            }
            c if c.is_ascii_digit() => TokenKind::Int(self.integer(c, position)?),
            c if is_ident_start(c) => TokenKind::Ident(self.ident(c)),
            other => {
                return Err(ParseError::new(
                    position,
                    ParseErrorKind::UnexpectedChar(other),
                ));
            }
        };

        Ok(Token { kind, position })
    }

    /// Skips whitespace, except for newlines, and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.chars.peek() {
                Some('\n') => return Ok(()),
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.next() {
                        Some('/') => self.line_comment(),
                        Some('*') => self.block_comment()?,
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn line_comment(&mut self) {
        while self.chars.peek().is_some_and(|c| *c != '\n') {
            self.bump();
        }
    }

    fn block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.position();
        // Skip the opening '/*'.
        self.bump();
        self.bump();

        // Like Kotlin, block comments nest.
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Some('*') if self.chars.peek() == Some(&'/') => {
                    self.bump();
                    depth -= 1;
                }
                Some('/') if self.chars.peek() == Some(&'*') => {
                    self.bump();
                    depth += 1;
                }
                Some(_) => (),
                None => {
                    return Err(ParseError::new(
                        start,
                        ParseErrorKind::UnterminatedComment,
                    ));
                }
            }
        }
        Ok(())
    }

    fn string(&mut self, start: Position) -> Result<CompactString, ParseError> {
        let mut value = CompactString::default();
        loop {
            let escape_position = self.position();
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('$') => '$',
                        Some('\'') => '\'',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('u') => self.unicode_escape(escape_position)?,
                        Some(other) => {
                            return Err(ParseError::new(
                                escape_position,
                                ParseErrorKind::InvalidEscape(other),
                            ));
                        }
                        None => break,
                    };
                    value.push(escaped);
                }
                // Single line strings only.
                Some('\n') | None => break,
                Some(c) => value.push(c),
            }
        }
        Err(ParseError::new(start, ParseErrorKind::UnterminatedString))
    }

    /// Reads the four hex digits of a `\uXXXX` escape, the `\u` has already been consumed.
    fn unicode_escape(&mut self, start: Position) -> Result<char, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .chars
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| ParseError::new(start, ParseErrorKind::InvalidEscape('u')))?;
            self.bump();
            code = code * 16 + digit;
        }
        // Lone surrogates aren't chars.
        char::from_u32(code)
            .ok_or_else(|| ParseError::new(start, ParseErrorKind::InvalidEscape('u')))
    }

    fn quoted_ident(&mut self, start: Position) -> Result<CompactString, ParseError> {
        let mut value = CompactString::default();
        loop {
            match self.bump() {
                Some('`') if !value.is_empty() => return Ok(value),
                Some('`') | Some('\n') | None => {
                    return Err(ParseError::new(
                        start,
                        ParseErrorKind::UnterminatedIdentifier,
                    ));
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn ident(&mut self, first: char) -> CompactString {
        let mut value = CompactString::default();
        value.push(first);
        while let Some(c) = self.chars.peek().copied().filter(|c| is_ident_continue(*c)) {
            value.push(c);
            self.bump();
        }
        value
    }

    fn integer(&mut self, first: char, start: Position) -> Result<i64, ParseError> {
        let mut raw = CompactString::default();
        raw.push(first);
        while let Some(c) = self
            .chars
            .peek()
            .copied()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            raw.push(c);
            self.bump();
        }

        // Kotlin's `L` suffix for longs, every value is an i64 here anyway.
        let digits = raw.strip_suffix('L').unwrap_or(raw.as_str());
        let digits: CompactString = digits.chars().filter(|c| *c != '_').collect();
        digits
            .parse()
            .map_err(|_| ParseError::new(start, ParseErrorKind::InvalidInteger(raw)))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Whether `name` can be written without backticks.
pub(crate) fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(is_ident_start);
    starts_ok && chars.all(is_ident_continue) && !matches!(name, "true" | "false")
}
