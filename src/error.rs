//! # Error Types
//!
//! This module defines the error and warning types for the score compiler.
//!
//! ## Fatal errors
//! - `ParseError` - the first token that fits no grammar production; aborts the compile
//! - `InstrumentTableError` - the instrument name table could not be read as `name: code` pairs
//! - `Io` - a score or table file could not be read
//!
//! ## Non-fatal conditions
//! - [`LexError`] - a character that matches no lexical rule; the lexer skips it and continues
//! - [`Warning`] - everything non-fatal that a caller may want to surface, collected on the
//!   compiled score
//!
//! ## Usage
//! ```rust
//! use trackscore::{compile, ScoreError};
//!
//! match compile("tempo = (120, 2)\ninstrument = piano\n[4] 0 2 4\n") {
//!     Ok(score) => assert_eq!(score.tempo, 240),
//!     Err(ScoreError::ParseError { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    /// Parse error with location information.
    ///
    /// # Example
    /// ```
    /// # use trackscore::ScoreError;
    /// let err = ScoreError::ParseError {
    ///     line: 3,
    ///     column: 7,
    ///     message: "Expected ']', found '}'".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 3, column 7: Expected ']', found '}'");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// The instrument name table is not a list of `name: code` pairs.
    #[error("Invalid instrument table: {0}")]
    InstrumentTableError(String),

    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A character that matched no lexical rule.
///
/// The lexer reports it and skips exactly one character.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Illegal character '{character}' at line {line}, column {column}")]
pub struct LexError {
    pub character: char,
    pub line: usize,
    pub column: usize,
}

/// A non-fatal condition observed while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Warning {
    /// Skipped input character.
    IllegalCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    /// A numeric instrument name with no entry in the instrument table; the literal
    /// text was used as the instrument name.
    UnresolvedAlias { code: String, line: usize },
}

impl From<LexError> for Warning {
    fn from(err: LexError) -> Self {
        Warning::IllegalCharacter {
            character: err.character,
            line: err.line,
            column: err.column,
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::IllegalCharacter {
                character,
                line,
                column,
            } => write!(
                f,
                "illegal character '{}' skipped at line {}, column {}",
                character, line, column
            ),
            Warning::UnresolvedAlias { code, line } => write!(
                f,
                "instrument {} at line {} is not in the instrument table; using the number as its name",
                code, line
            ),
        }
    }
}
