//! A module splitting an input line into an argument vector.
//!
//! The grammar depends on the command name: once token 0 is read, a [`Grammar`]
//! is picked for the rest of the line and drives the extraction.

use crate::command::Argv;
use crate::input::{CONTINUATION_PROMPT, LineSource};
use crate::tokens::TokenList;
use thiserror::Error;

/// Characters that separate tokens. `=` is one of them, so `export X=5` and
/// `export X = 5` read the same.
pub const SEPARATORS: [char; 7] = [' ', '=', '\t', '\n', '\r', '\x0c', '\x0b'];

const QUOTE: char = '"';

/// Text inserted between physical lines of a quoted value spanning several lines.
pub const LINE_JOIN: char = '\n';

pub fn is_separator(ch: char) -> bool {
    SEPARATORS.contains(&ch)
}

/// How the tokens after the command name are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// Separator-delimited arguments, the usual argv splitting.
    GenericArgs,
    /// The rest of the line as one verbatim argument (`echo`).
    VerbatimRemainder,
    /// An identifier followed by a literal or double-quoted value (`export`).
    IdentifierValuePair,
}

impl Grammar {
    pub fn for_command(name: &str) -> Self {
        match name {
            "export" => Grammar::IdentifierValuePair,
            "echo" => Grammar::VerbatimRemainder,
            _ => Grammar::GenericArgs,
        }
    }
}

/// Errors that can occur while tokenizing a line.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The line is blank or holds only separators.
    #[error("empty command")]
    EmptyCommand,
    /// `export` without a name to define.
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Input ended before the closing quote of an `export` value.
    #[error("unterminated quoted value")]
    UnterminatedQuote,
    /// The line source failed while a continuation line was needed.
    #[error("cannot read continuation line")]
    Input(#[source] std::io::Error),
}

struct Scanner<'a> {
    buffer: String,
    pos: usize,
    source: &'a mut dyn LineSource,
}

impl<'a> Scanner<'a> {
    fn new(line: &str, source: &'a mut dyn LineSource) -> Self {
        Scanner {
            buffer: line.to_owned(),
            pos: 0,
            source,
        }
    }

    fn rest(&self) -> &str {
        &self.buffer[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_separators(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches(is_separator).len();
    }

    /// Take everything up to the first `stop` character, then step over that
    /// character. An empty span yields `None` and consumes nothing.
    fn consume_until(&mut self, stop: impl Fn(char) -> bool) -> Option<String> {
        let rest = self.rest();
        let end = rest.find(&stop).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        let token = rest[..end].to_owned();
        self.pos += end;
        if let Some(delimiter) = self.peek_char() {
            self.pos += delimiter.len_utf8();
        }
        Some(token)
    }

    fn next_word(&mut self) -> Option<String> {
        self.skip_separators();
        self.consume_until(is_separator)
    }

    fn remainder(&mut self) -> Option<String> {
        let rest = self.rest().to_owned();
        self.pos = self.buffer.len();
        if rest.is_empty() { None } else { Some(rest) }
    }

    /// Read a double-quoted value whose opening quote is at the current position,
    /// pulling more lines from the source until the closing quote shows up.
    fn quoted(&mut self) -> Result<String, ParseError> {
        self.pos += QUOTE.len_utf8();
        loop {
            if let Some(end) = self.rest().find(QUOTE) {
                let value = self.rest()[..end].to_owned();
                self.pos += end + QUOTE.len_utf8();
                return Ok(value);
            }
            match self.source.read_line(CONTINUATION_PROMPT) {
                Ok(Some(next)) => {
                    self.buffer.push(LINE_JOIN);
                    self.buffer.push_str(&next);
                }
                Ok(None) => return Err(ParseError::UnterminatedQuote),
                Err(err) => return Err(ParseError::Input(err)),
            }
        }
    }

    fn value(&mut self) -> Result<String, ParseError> {
        self.skip_separators();
        if self.peek_char() == Some(QUOTE) {
            self.quoted()
        } else {
            Ok(self.consume_until(is_separator).unwrap_or_default())
        }
    }

    fn make_tokens(&mut self) -> Result<TokenList, ParseError> {
        let mut tokens = TokenList::new();

        let command = self.next_word().ok_or(ParseError::EmptyCommand)?;
        let grammar = Grammar::for_command(&command);
        tokens.push_back(command);

        match grammar {
            Grammar::IdentifierValuePair => {
                let identifier = self.next_word().ok_or(ParseError::ExpectedIdentifier)?;
                tokens.push_back(identifier);
                tokens.push_back(self.value()?);
            }
            Grammar::VerbatimRemainder => {
                if let Some(text) = self.remainder() {
                    tokens.push_back(text);
                }
            }
            Grammar::GenericArgs => {
                while let Some(arg) = self.next_word() {
                    tokens.push_back(arg);
                }
            }
        }

        Ok(tokens)
    }
}

/// Split `line` into an argument vector.
///
/// `source` is only consulted when an `export` value opens a double quote that
/// `line` does not close; the extra lines are joined with [`LINE_JOIN`].
pub fn tokenize(line: &str, source: &mut dyn LineSource) -> Result<Argv, ParseError> {
    let tokens = Scanner::new(line, source).make_tokens()?;
    Argv::new(tokens.into_vec()).ok_or(ParseError::EmptyCommand)
}
