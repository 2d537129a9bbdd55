//! # Lexer
//!
//! Turns score text into a lazy stream of [`LocatedToken`]s.
//!
//! Rules are tried first-match in this order once spaces, tabs and carriage returns are
//! skipped:
//!
//! 1. ID-like words `[a-zA-Z_][ +()\-a-zA-Z_0-9]*`, trimmed; reserved words become keywords
//! 2. `\n` (significant, it terminates declarations and lines)
//! 3. comments, `# ...` to end of line or `/* ... */`, dropped
//! 4. integers `[+-]*[0-9]+`, sign text kept as written
//! 5. `-` as a rest
//! 6. single-character literals `( ) { } [ ] = , : < >`
//!
//! Anything else is a [`LexError`]: it is logged, recorded, and one character is skipped.

use crate::error::LexError;
use std::fmt;

/// Token types for score text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Reserved words
    Tempo,
    Instrument,
    Octave,
    Volume,
    Id,

    /// Any other ID-like word, such as an instrument name. May contain inner spaces.
    Name(String),
    /// Integer literal text, sign included (`-3`, `+2`, `12`).
    Integer(String),
    Rest, // -
    Newline,

    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Equals,       // =
    Comma,        // ,
    Colon,        // :
    LeftAngle,    // <
    RightAngle,   // >
}

impl Token {
    fn keyword(word: &str) -> Option<Token> {
        match word {
            "tempo" => Some(Token::Tempo),
            "instrument" => Some(Token::Instrument),
            "octave" => Some(Token::Octave),
            "volume" => Some(Token::Volume),
            "id" => Some(Token::Id),
            _ => None,
        }
    }

    fn literal(c: char) -> Option<Token> {
        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '=' => Token::Equals,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '<' => Token::LeftAngle,
            '>' => Token::RightAngle,
            _ => return None,
        };
        Some(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Tempo => write!(f, "'tempo'"),
            Token::Instrument => write!(f, "'instrument'"),
            Token::Octave => write!(f, "'octave'"),
            Token::Volume => write!(f, "'volume'"),
            Token::Id => write!(f, "'id'"),
            Token::Name(name) => write!(f, "name '{}'", name),
            Token::Integer(text) => write!(f, "integer {}", text),
            Token::Rest => write!(f, "rest '-'"),
            Token::Newline => write!(f, "newline"),
            Token::LeftParen => write!(f, "'('"),
            Token::RightParen => write!(f, "')'"),
            Token::LeftBrace => write!(f, "'{{'"),
            Token::RightBrace => write!(f, "'}}'"),
            Token::LeftBracket => write!(f, "'['"),
            Token::RightBracket => write!(f, "']'"),
            Token::Equals => write!(f, "'='"),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::LeftAngle => write!(f, "'<'"),
            Token::RightAngle => write!(f, "'>'"),
        }
    }
}

/// A token with its position in the source.
///
/// Only names and integers carry their text; for keywords and punctuation the text is
/// implied by the kind and recovered through `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

/// Lexer for score text.
///
/// Iterating the lexer yields tokens lazily; [`Lexer::tokenize`] collects them all.
/// Skipped characters are available from [`Lexer::errors`] afterwards.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Collect every remaining token.
    pub fn tokenize(&mut self) -> Vec<LocatedToken> {
        self.by_ref().collect()
    }

    /// Characters skipped so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexError> {
        self.errors
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advance over `len` bytes of the remaining input and return them.
    fn consume(&mut self, len: usize) -> &'a str {
        let start = self.position;
        while self.position < start + len {
            self.advance();
        }
        &self.input[start..self.position]
    }

    fn skip_ignored(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn lex_word(&mut self) -> Token {
        let len = self
            .remaining()
            .char_indices()
            .find(|&(i, c)| {
                let allowed = if i == 0 {
                    c.is_ascii_alphabetic() || c == '_'
                } else {
                    c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '+' | '(' | ')' | '-')
                };
                !allowed
            })
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.remaining().len());
        let word = self.consume(len).trim();
        Token::keyword(word).unwrap_or_else(|| Token::Name(word.to_string()))
    }

    /// Skip a comment if one starts here. An unterminated `/*` is not a comment.
    fn skip_comment(&mut self) -> bool {
        let rest = self.remaining();
        if rest.starts_with('#') {
            let len = rest.find('\n').unwrap_or(rest.len());
            self.consume(len);
            return true;
        }
        if let Some(body) = rest.strip_prefix("/*") {
            if let Some(end) = body.find("*/") {
                self.consume(2 + end + 2);
                return true;
            }
        }
        false
    }

    fn lex_integer(&mut self) -> Option<Token> {
        let rest = self.remaining();
        let signs = rest.len() - rest.trim_start_matches(['+', '-']).len();
        let digits = rest[signs..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        let text = self.consume(signs + digits);
        Some(Token::Integer(text.to_string()))
    }

    fn next_token(&mut self) -> Option<LocatedToken> {
        loop {
            self.skip_ignored();
            let c = self.peek()?;
            let line = self.line;
            let column = self.column;

            let token = if c.is_ascii_alphabetic() || c == '_' {
                self.lex_word()
            } else if c == '\n' {
                self.advance();
                Token::Newline
            } else if self.skip_comment() {
                continue;
            } else if let Some(integer) = self.lex_integer() {
                integer
            } else if c == '-' {
                self.advance();
                Token::Rest
            } else if let Some(literal) = Token::literal(c) {
                self.advance();
                literal
            } else {
                self.advance();
                let err = LexError {
                    character: c,
                    line,
                    column,
                };
                log::warn!("{}; skipping it", err);
                self.errors.push(err);
                continue;
            };

            log::trace!("{}:{} {}", line, column, token);
            return Some(LocatedToken {
                token,
                line,
                column,
            });
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = LocatedToken;

    fn next(&mut self) -> Option<LocatedToken> {
        self.next_token()
    }
}
