//! # Instrument Name Table
//!
//! Maps numeric instrument codes to instrument names, so a score can say
//! `instrument = 41` instead of spelling the name out.
//!
//! The table file lists one `name: code` pair per line:
//!
//! ```text
//! Acoustic Grand Piano: 0
//! Violin: 40
//! Viola: 41
//! ```
//!
//! It is inverted into code → name for lookup. When two names share a code the later one
//! wins. A table that is missing or unreadable means no code can be resolved; see
//! [`InstrumentTable::load_or_empty`].

use crate::error::ScoreError;
use std::collections::HashMap;
use std::path::Path;

/// Default file name the command-line host looks for.
pub const DEFAULT_TABLE_FILE: &str = "INSTRUMENTS.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentTable {
    names: HashMap<i64, String>,
}

impl InstrumentTable {
    /// A table that resolves nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, code)` pairs; later pairs win on a shared code.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, code) in pairs {
            table.names.insert(code, name.into().trim().to_string());
        }
        table
    }

    /// Parse table text, one `name: code` pair per line. Blank lines and `#` comment
    /// lines are skipped.
    pub fn parse(content: &str) -> Result<Self, ScoreError> {
        let mut pairs = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split(':').collect();
            let [name, code] = fields.as_slice() else {
                return Err(ScoreError::InstrumentTableError(format!(
                    "line {}: expected 'name: code', found '{}'",
                    index + 1,
                    line
                )));
            };
            let code = code.trim().parse::<i64>().map_err(|_| {
                ScoreError::InstrumentTableError(format!(
                    "line {}: code for '{}' must be an integer, found '{}'",
                    index + 1,
                    name.trim(),
                    code.trim()
                ))
            })?;
            pairs.push((*name, code));
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn load(path: &Path) -> Result<Self, ScoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load a table, treating a missing or malformed file as an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                log::info!(
                    "loaded {} instrument names from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(e) => {
                log::warn!("{}; numeric instrument names will not be resolved", e);
                Self::new()
            }
        }
    }

    pub fn lookup(&self, code: i64) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
