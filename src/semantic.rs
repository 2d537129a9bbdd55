//! # Semantic Assignment
//!
//! Turns a parsed [`Score`] into a [`CompiledScore`]: track numbers, instrument names,
//! and one event stream per instrument per section.
//!
//! ## Rules
//!
//! ### Track numbers
//! Each section's instruments get the next contiguous track numbers in declaration
//! order, continuing from where the previous section ended. The channel is the track
//! number minus one and the pitch shift is `octave * 12`.
//!
//! ### Event streams
//! Every instrument walks all of its section's lines. Each phrase (bare note or chord)
//! becomes one [`Event`] with the frame's duration. When the line has a selector that
//! does not name the instrument, the phrase is muted: every pitch becomes `0`, so a muted
//! three-note chord is `[0, 0, 0]`.
//!
//! ### Scheduling
//! A stream is scheduled only when its instrument id is greater than every id scheduled
//! before it. Declaring an id again in a later section (or declaring a smaller id after a
//! larger one) still allocates a track number and computes a stream, but that stream
//! never reaches the output. When one section declares the same id twice, the later
//! declaration supplies the scheduled track.
//!
//! ### Instrument names
//! A numeric instrument name is looked up in the [`InstrumentTable`]. If the code is not
//! there the number is used as written and a [`Warning::UnresolvedAlias`] is recorded.
//!
//! ## Entry Point
//! `assign(score: &Score, table: &InstrumentTable) -> CompiledScore`

use crate::ast::*;
use crate::error::Warning;
use crate::instruments::InstrumentTable;
use crate::playback::{CompiledScore, Event, TrackSpec};

/// Running state threaded through the sections of one compile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignState {
    /// Last track number handed out.
    pub ending_track_no: usize,
    /// Highest instrument id whose stream has been scheduled.
    pub highest_scheduled_id: i64,
    pub tracks: Vec<TrackSpec>,
    pub warnings: Vec<Warning>,
}

impl AssignState {
    /// Assign tracks and streams for one section and schedule the new ones.
    pub fn assign_section(mut self, section: &Section, table: &InstrumentTable) -> Self {
        let starting_track_no = self.ending_track_no;

        let specs: Vec<TrackSpec> = section
            .instruments
            .iter()
            .enumerate()
            .map(|(i, instrument)| {
                let track_number = starting_track_no + i + 1;
                TrackSpec {
                    track_number,
                    instrument_id: instrument.id,
                    instrument_name: resolve_name(instrument, table, &mut self.warnings),
                    channel: track_number - 1,
                    pitch_shift: instrument.octave.saturating_mul(12),
                    volume: instrument.volume,
                    events: expand_events(instrument.id, &section.lines),
                }
            })
            .collect();

        self.ending_track_no = starting_track_no + specs.len();
        log::debug!(
            "tracks {}..={} for instrument ids {:?}",
            starting_track_no + 1,
            self.ending_track_no,
            section.instruments.iter().map(|i| i.id).collect::<Vec<_>>()
        );

        for instrument in &section.instruments {
            if instrument.id <= self.highest_scheduled_id {
                log::debug!(
                    "instrument id {} (line {}) not scheduled: id {} was already scheduled",
                    instrument.id,
                    instrument.line,
                    self.highest_scheduled_id
                );
                continue;
            }
            if let Some(spec) = specs.iter().rev().find(|s| s.instrument_id == instrument.id) {
                self.tracks.push(spec.clone());
                self.highest_scheduled_id = instrument.id;
            }
        }

        self
    }
}

/// Compile a parsed score into tracks.
pub fn assign(score: &Score, table: &InstrumentTable) -> CompiledScore {
    let state = score
        .sections
        .iter()
        .fold(AssignState::default(), |state, section| {
            state.assign_section(section, table)
        });

    let mut warnings = score.warnings.clone();
    warnings.extend(state.warnings);

    CompiledScore {
        tempo: score.tempo,
        track_count: state.ending_track_no,
        tracks: state.tracks,
        warnings,
    }
}

/// The event stream an instrument plays over a section's lines.
pub fn expand_events(instrument_id: i64, lines: &[Line]) -> Vec<Event> {
    let mut events = Vec::new();
    for line in lines {
        let audible = line.selector.includes(instrument_id);
        for frame in &line.frames {
            for phrase in &frame.phrases {
                let pitches = if audible {
                    phrase.pitches()
                } else {
                    vec![REST_PITCH; phrase.note_count()]
                };
                events.push(Event {
                    pitches,
                    duration: frame.duration,
                });
            }
        }
    }
    events
}

fn resolve_name(
    instrument: &InstrumentDecl,
    table: &InstrumentTable,
    warnings: &mut Vec<Warning>,
) -> String {
    let InstrumentName::Code(text) = &instrument.name else {
        return instrument.name.as_written().to_string();
    };
    if let Some(name) = instrument.name.code().and_then(|code| table.lookup(code)) {
        return name.to_string();
    }

    let warning = Warning::UnresolvedAlias {
        code: text.clone(),
        line: instrument.line,
    };
    log::warn!("{}", warning);
    warnings.push(warning);
    text.clone()
}
