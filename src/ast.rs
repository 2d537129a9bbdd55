//! # Abstract Syntax Tree (AST) Types
//!
//! The parsed form of a score, before track numbers and event streams are assigned.
//!
//! ## Type Hierarchy
//! ```text
//! Score
//!   ├── tempo: i64 (product of the two intro integers)
//!   ├── instrument_ids: Vec<i64> (every allocated id, declaration order)
//!   └── Vec<Section>
//!         ├── Vec<InstrumentDecl> (id, name, octave, volume)
//!         └── Vec<Line>
//!               ├── Selector (ids the line is audible for; empty = everyone)
//!               └── Vec<Frame>
//!                     ├── duration
//!                     └── Vec<Phrase> (Note | Chord(Vec<Note>))
//! ```
//!
//! ## Pitch encoding
//! A note is a signed offset from middle C. It encodes to `offset + 60`, and a rest
//! encodes to `0`. The offset `-60` therefore also encodes to `0` and cannot be told apart
//! from a rest once encoded; see [`Note::encode`].

use crate::error::Warning;

/// Encoded value of middle C (offset 0).
pub const MIDDLE_C: i64 = 60;

/// Encoded value of a rest.
pub const REST_PITCH: i64 = 0;

/// A complete parsed score.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub tempo: i64,
    pub sections: Vec<Section>,
    /// Every id handed out by an instrument declaration, in declaration order.
    /// Duplicates are kept.
    pub instrument_ids: Vec<i64>,
    /// Non-fatal lexing problems encountered while reading the source.
    pub warnings: Vec<Warning>,
}

/// A block of instruments sharing one time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub instruments: Vec<InstrumentDecl>,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentDecl {
    pub id: i64,
    pub name: InstrumentName,
    pub octave: i64,
    pub volume: i64,
    /// Source line of the declaration.
    pub line: usize,
}

impl InstrumentDecl {
    pub const DEFAULT_OCTAVE: i64 = 0;
    pub const DEFAULT_VOLUME: i64 = 100;
}

/// How an instrument was named in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentName {
    /// A written-out name such as `Acoustic Grand Piano`.
    Named(String),
    /// A numeric instrument code, kept as written (`+5` stays `+5`) so that an
    /// unresolved code can fall back to its literal text.
    Code(String),
}

impl InstrumentName {
    /// The numeric value of a code, if this is one.
    pub fn code(&self) -> Option<i64> {
        match self {
            InstrumentName::Code(text) => text.parse().ok(),
            InstrumentName::Named(_) => None,
        }
    }

    /// The text as written in the source.
    pub fn as_written(&self) -> &str {
        match self {
            InstrumentName::Named(name) | InstrumentName::Code(name) => name,
        }
    }
}

/// One line of a section: an optional selector and the frames it plays.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub selector: Selector,
    pub frames: Vec<Frame>,
}

/// Instrument ids a line is audible for. An empty selector means all of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub ids: Vec<i64>,
}

impl Selector {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn includes(&self, id: i64) -> bool {
        self.ids.is_empty() || self.ids.contains(&id)
    }
}

/// A time slot: every phrase in it lasts `duration` ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub duration: i64,
    pub phrases: Vec<Phrase>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phrase {
    Note(Note),
    Chord(Vec<Note>),
}

impl Phrase {
    /// Encoded pitches, one per note (a bare note gives a single value).
    pub fn pitches(&self) -> Vec<i64> {
        match self {
            Phrase::Note(note) => vec![note.encode()],
            Phrase::Chord(notes) => notes.iter().map(Note::encode).collect(),
        }
    }

    pub fn note_count(&self) -> usize {
        match self {
            Phrase::Note(_) => 1,
            Phrase::Chord(notes) => notes.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    /// Semitone offset from middle C.
    Pitch(i64),
    Rest,
}

impl Note {
    /// Encode as a pitch value: `offset + 60`, or `0` for a rest.
    ///
    /// `Note::Pitch(-60)` also encodes to `0`, the same value as a rest. The parser rejects
    /// offsets whose pitch would not fit in an `i64`; hand-built notes saturate.
    pub fn encode(&self) -> i64 {
        match self {
            Note::Pitch(offset) => offset.saturating_add(MIDDLE_C),
            Note::Rest => REST_PITCH,
        }
    }
}
