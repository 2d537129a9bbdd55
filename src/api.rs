//! # Public API
//!
//! Entry points that run the whole pipeline: lex, parse, assign.
//!
//! - [`compile()`] - score text with no instrument table
//! - [`compile_with_instruments()`] - score text, resolving numeric instrument names
//! - [`compile_file()`] - read a score file first
//!
//! ## Typical Usage
//!
//! ```rust
//! use trackscore::{compile_with_instruments, InstrumentTable};
//!
//! let table = InstrumentTable::from_pairs([("Violin", 40)]);
//! let score = compile_with_instruments(
//!     "tempo = (90, 2)\ninstrument = 40, volume: 80\n[4] 0 {0 7}\n",
//!     &table,
//! )?;
//!
//! assert_eq!(score.tempo, 180);
//! assert_eq!(score.tracks[0].instrument_name, "Violin");
//! assert_eq!(score.tracks[0].events[1].pitches, vec![60, 67]);
//! # Ok::<(), trackscore::ScoreError>(())
//! ```

use crate::{assign, parse, CompiledScore, InstrumentTable, ScoreError};
use std::path::Path;

/// Compile score text without an instrument table.
///
/// Numeric instrument names keep their number as the name.
///
/// # Errors
/// Returns [`ScoreError::ParseError`] at the first unexpected token.
pub fn compile(source: &str) -> Result<CompiledScore, ScoreError> {
    compile_with_instruments(source, &InstrumentTable::new())
}

/// Compile score text, resolving numeric instrument names through `table`.
pub fn compile_with_instruments(
    source: &str,
    table: &InstrumentTable,
) -> Result<CompiledScore, ScoreError> {
    let score = parse(source)?;
    let compiled = assign(&score, table);
    log::info!(
        "compiled {} section(s) into {} scheduled track(s) of {}",
        score.sections.len(),
        compiled.tracks.len(),
        compiled.track_count
    );
    Ok(compiled)
}

/// Read and compile a score file.
pub fn compile_file(path: &Path, table: &InstrumentTable) -> Result<CompiledScore, ScoreError> {
    let source = std::fs::read_to_string(path).map_err(|source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_with_instruments(&source, table)
}
