//! # Parser Module
//!
//! Recursive-descent parser from tokens to a [`Score`].
//!
//! ## Grammar
//! ```text
//! song           := intro section+
//! intro          := NEWLINE* TEMPO '=' '(' INTEGER ',' INTEGER ')' NEWLINE+
//! section        := instrument+ line+
//! instrument     := INSTRUMENT '=' (NAME | INTEGER) [',' ID ':' INTEGER]
//!                   [',' instrumentPart (',' instrumentPart)*] NEWLINE+
//! instrumentPart := (OCTAVE | VOLUME) ':' INTEGER
//! line           := [selector] frame+ NEWLINE+
//! frame          := '[' INTEGER ']' (chord | note)+
//! chord          := '{' note+ '}'
//! note           := INTEGER | REST
//! selector       := '<' INTEGER (',' INTEGER)* '>'
//! ```
//!
//! ## Work done while parsing
//! - the tempo is the product of the two intro integers
//! - instrument ids are allocated in declaration order from one running counter: an
//!   explicit `id: N` sets the counter to `N`, otherwise the counter is incremented
//!
//! Parsing stops at the first unexpected token with a `ParseError`.
//!
//! ## Entry Point
//! `parse(source: &str) -> Result<Score, ScoreError>`
//!
//! ## Example
//! ```rust
//! use trackscore::parse;
//!
//! let score = parse("tempo = (60, 2)\ninstrument = piano\ninstrument = flute, id: 7\n[4] 0\n").unwrap();
//! assert_eq!(score.tempo, 120);
//! assert_eq!(score.instrument_ids, vec![1, 7]);
//! ```

use crate::ast::*;
use crate::error::{ScoreError, Warning};
use crate::lexer::{Lexer, LocatedToken, Token};

/// Parser for score text
pub struct Parser {
    tokens: Vec<LocatedToken>,
    position: usize,
    /// Running instrument id counter.
    last_id: i64,
    instrument_ids: Vec<i64>,
}

impl Parser {
    pub fn new(tokens: Vec<LocatedToken>) -> Self {
        Self {
            tokens,
            position: 0,
            last_id: 0,
            instrument_ids: Vec::new(),
        }
    }

    fn current(&self) -> Option<&LocatedToken> {
        self.tokens.get(self.position)
    }

    fn check(&self, token: &Token) -> bool {
        self.current().is_some_and(|t| &t.token == token)
    }

    fn advance(&mut self) -> Option<&LocatedToken> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    /// Location of the current token, or just past the last one at end of input.
    fn location(&self) -> (usize, usize) {
        match self.current() {
            Some(t) => (t.line, t.column),
            None => self
                .tokens
                .last()
                .map(|t| (t.line, t.column + 1))
                .unwrap_or((1, 1)),
        }
    }

    fn unexpected(&self, expected: &str) -> ScoreError {
        let (line, column) = self.location();
        let found = match self.current() {
            Some(t) => t.token.to_string(),
            None => "end of input".to_string(),
        };
        ScoreError::ParseError {
            line,
            column,
            message: format!("Expected {}, found {}", expected, found),
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), ScoreError> {
        if self.check(&token) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&token.to_string()))
        }
    }

    fn expect_integer(&mut self, what: &str) -> Result<i64, ScoreError> {
        let Some(LocatedToken {
            token: Token::Integer(text),
            line,
            column,
        }) = self.current()
        else {
            return Err(self.unexpected(what));
        };
        let value = parse_integer(text, *line, *column)?;
        self.advance();
        Ok(value)
    }

    /// NEWLINE+
    fn expect_newlines(&mut self, expected: &str) -> Result<(), ScoreError> {
        if !self.check(&Token::Newline) {
            return Err(self.unexpected(expected));
        }
        self.skip_newlines();
        Ok(())
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    /// Parse the whole token stream.
    pub fn parse_score(&mut self) -> Result<Score, ScoreError> {
        let tempo = self.parse_intro()?;

        let mut sections = vec![self.parse_section()?];
        while self.check(&Token::Instrument) {
            sections.push(self.parse_section()?);
        }
        if self.current().is_some() {
            return Err(self.unexpected("'instrument', '<' or '['"));
        }

        Ok(Score {
            tempo,
            sections,
            instrument_ids: std::mem::take(&mut self.instrument_ids),
            warnings: Vec::new(),
        })
    }

    fn parse_intro(&mut self) -> Result<i64, ScoreError> {
        self.skip_newlines();
        let (line, column) = self.location();
        self.expect(Token::Tempo)?;
        self.expect(Token::Equals)?;
        self.expect(Token::LeftParen)?;
        let beats = self.expect_integer("tempo integer")?;
        self.expect(Token::Comma)?;
        let multiplier = self.expect_integer("tempo integer")?;
        self.expect(Token::RightParen)?;
        self.expect_newlines("newline after tempo")?;

        beats
            .checked_mul(multiplier)
            .ok_or_else(|| ScoreError::ParseError {
                line,
                column,
                message: format!("Tempo {} * {} is out of range", beats, multiplier),
            })
    }

    fn parse_section(&mut self) -> Result<Section, ScoreError> {
        let mut instruments = vec![self.parse_instrument()?];
        while self.check(&Token::Instrument) {
            instruments.push(self.parse_instrument()?);
        }

        let mut lines = Vec::new();
        while self.check(&Token::LeftAngle) || self.check(&Token::LeftBracket) || lines.is_empty() {
            lines.push(self.parse_line()?);
        }

        Ok(Section { instruments, lines })
    }

    fn parse_instrument(&mut self) -> Result<InstrumentDecl, ScoreError> {
        let (line, column) = self.location();
        self.expect(Token::Instrument)?;
        self.expect(Token::Equals)?;

        let name = match self.current().map(|t| &t.token) {
            Some(Token::Name(name)) => InstrumentName::Named(name.clone()),
            Some(Token::Integer(code)) => InstrumentName::Code(code.clone()),
            _ => return Err(self.unexpected("instrument name or number")),
        };
        self.advance();

        let mut explicit_id = None;
        let mut octave = InstrumentDecl::DEFAULT_OCTAVE;
        let mut volume = InstrumentDecl::DEFAULT_VOLUME;

        if self.check(&Token::Comma) {
            self.advance();
            let mut parts = true;
            if self.check(&Token::Id) {
                self.advance();
                self.expect(Token::Colon)?;
                explicit_id = Some(self.expect_integer("instrument id")?);
                parts = self.check(&Token::Comma);
                if parts {
                    self.advance();
                }
            }
            while parts {
                // Later values for the same setting win
                let setting = self.current().map(|t| t.token.clone());
                match setting {
                    Some(Token::Octave) => {
                        self.advance();
                        self.expect(Token::Colon)?;
                        let (line, column) = self.location();
                        octave = self.expect_integer("octave")?;
                        if octave.checked_mul(12).is_none() {
                            return Err(ScoreError::ParseError {
                                line,
                                column,
                                message: format!("Octave {} is out of range", octave),
                            });
                        }
                    }
                    Some(Token::Volume) => {
                        self.advance();
                        self.expect(Token::Colon)?;
                        volume = self.expect_integer("volume")?;
                    }
                    _ => return Err(self.unexpected("'octave' or 'volume'")),
                }
                parts = self.check(&Token::Comma);
                if parts {
                    self.advance();
                }
            }
        }

        self.expect_newlines("',' or newline")?;

        let id = match explicit_id {
            Some(id) => id,
            None => self.last_id.checked_add(1).ok_or(ScoreError::ParseError {
                line,
                column,
                message: "Instrument id is out of range".to_string(),
            })?,
        };
        self.last_id = id;
        self.instrument_ids.push(id);
        log::debug!("line {}: instrument '{}' gets id {}", line, name.as_written(), id);

        Ok(InstrumentDecl {
            id,
            name,
            octave,
            volume,
            line,
        })
    }

    fn parse_line(&mut self) -> Result<Line, ScoreError> {
        let selector = if self.check(&Token::LeftAngle) {
            self.parse_selector()?
        } else {
            Selector::all()
        };

        let mut frames = vec![self.parse_frame()?];
        while self.check(&Token::LeftBracket) {
            frames.push(self.parse_frame()?);
        }
        self.expect_newlines("note, chord, '[' or newline")?;

        Ok(Line { selector, frames })
    }

    fn parse_selector(&mut self) -> Result<Selector, ScoreError> {
        self.expect(Token::LeftAngle)?;
        let mut ids = vec![self.expect_integer("instrument id")?];
        while self.check(&Token::Comma) {
            self.advance();
            ids.push(self.expect_integer("instrument id")?);
        }
        self.expect(Token::RightAngle)?;
        Ok(Selector { ids })
    }

    fn parse_frame(&mut self) -> Result<Frame, ScoreError> {
        self.expect(Token::LeftBracket)?;
        let (line, column) = self.location();
        let duration = self.expect_integer("duration")?;
        if duration <= 0 {
            return Err(ScoreError::ParseError {
                line,
                column,
                message: format!("Duration must be positive, found {}", duration),
            });
        }
        self.expect(Token::RightBracket)?;

        let mut phrases = Vec::new();
        loop {
            let phrase = match self.current().map(|t| &t.token) {
                Some(Token::LeftBrace) => Phrase::Chord(self.parse_chord()?),
                Some(Token::Integer(_)) | Some(Token::Rest) => Phrase::Note(self.parse_note()?),
                _ if phrases.is_empty() => return Err(self.unexpected("note or chord")),
                _ => break,
            };
            phrases.push(phrase);
        }

        Ok(Frame { duration, phrases })
    }

    fn parse_chord(&mut self) -> Result<Vec<Note>, ScoreError> {
        self.expect(Token::LeftBrace)?;
        let mut notes = vec![self.parse_note()?];
        while !self.check(&Token::RightBrace) {
            notes.push(self.parse_note()?);
        }
        self.advance();
        Ok(notes)
    }

    fn parse_note(&mut self) -> Result<Note, ScoreError> {
        if self.check(&Token::Rest) {
            self.advance();
            return Ok(Note::Rest);
        }
        let (line, column) = self.location();
        let offset = self.expect_integer("note")?;
        if offset.checked_add(MIDDLE_C).is_none() {
            return Err(ScoreError::ParseError {
                line,
                column,
                message: format!("Note {} is out of range", offset),
            });
        }
        Ok(Note::Pitch(offset))
    }
}

/// Convert integer literal text. At most one sign character is accepted.
fn parse_integer(text: &str, line: usize, column: usize) -> Result<i64, ScoreError> {
    let signs = text.chars().take_while(|c| *c == '+' || *c == '-').count();
    if signs > 1 {
        return Err(ScoreError::ParseError {
            line,
            column,
            message: format!("Invalid integer '{}': more than one sign", text),
        });
    }
    text.parse().map_err(|_| ScoreError::ParseError {
        line,
        column,
        message: format!("Integer '{}' is out of range", text),
    })
}

/// Parse score text into a [`Score`].
///
/// Characters the lexer cannot read are skipped and reported in `Score::warnings`.
pub fn parse(source: &str) -> Result<Score, ScoreError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    let warnings = lexer.into_errors().into_iter().map(Warning::from).collect();

    let mut parser = Parser::new(tokens);
    let mut score = parser.parse_score()?;
    score.warnings = warnings;
    Ok(score)
}
